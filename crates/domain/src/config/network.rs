use serde::{Deserialize, Serialize};

/// Connection policy enforced by the dialer.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Exact hostnames (`blocked.com`) or wildcard patterns (`*.blocked.com`).
    #[serde(default)]
    pub block_hostnames: Vec<String>,

    /// CIDR ranges no connection may target (`10.0.0.0/8`, `fd00::/8`).
    #[serde(default)]
    pub blacklist_ips: Vec<String>,
}

impl NetworkConfig {
    pub fn is_restricted(&self) -> bool {
        !self.block_hostnames.is_empty() || !self.blacklist_ips.is_empty()
    }
}

/// Checks a blocked-hostname pattern: labels of `[a-z0-9_-]`, optionally
/// preceded by a single leading `*.` wildcard.
pub fn validate_hostname_pattern(pattern: &str) -> Result<(), String> {
    let domain = pattern.strip_prefix("*.").unwrap_or(pattern);
    let domain = domain.strip_suffix('.').unwrap_or(domain);

    if domain.is_empty() {
        return Err(format!("empty hostname pattern '{}'", pattern));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(format!("empty label in hostname pattern '{}'", pattern));
        }
        if let Some(c) = label
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(format!(
                "invalid character '{}' in hostname pattern '{}'",
                c, pattern
            ));
        }
    }

    Ok(())
}
