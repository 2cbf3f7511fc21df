use ipnetwork::IpNetwork;
use std::net::IpAddr;

/// CIDR ranges no connection may target.
#[derive(Debug, Clone, Default)]
pub struct IpBlacklist {
    networks: Vec<IpNetwork>,
}

impl IpBlacklist {
    pub fn new(networks: Vec<IpNetwork>) -> Self {
        Self { networks }
    }

    pub fn from_cidrs<I, S>(cidrs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let networks = cidrs
            .into_iter()
            .map(|cidr| {
                let cidr = cidr.as_ref();
                cidr.parse::<IpNetwork>()
                    .map_err(|e| format!("Invalid blacklist range '{}': {}", cidr, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(networks))
    }

    /// The first network containing `ip`.
    pub fn find(&self, ip: IpAddr) -> Option<&IpNetwork> {
        self.networks.iter().find(|network| network.contains(ip))
    }

    pub fn contains(&self, ip: IpAddr) -> bool {
        self.find(ip).is_some()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}
