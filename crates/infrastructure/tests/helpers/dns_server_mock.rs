use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

#[derive(Debug, Clone)]
pub enum MockRecord {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Cname(String),
}

impl MockRecord {
    fn rtype(&self) -> u16 {
        match self {
            MockRecord::A(_) => 1,
            MockRecord::Aaaa(_) => 28,
            MockRecord::Cname(_) => 5,
        }
    }

    fn rdata(&self) -> Vec<u8> {
        match self {
            MockRecord::A(ip) => ip.octets().to_vec(),
            MockRecord::Aaaa(ip) => ip.octets().to_vec(),
            MockRecord::Cname(target) => encode_name(target),
        }
    }
}

/// How the server reacts to every query it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Behaviour {
    /// Answer from the zone, NXDOMAIN for unknown names.
    #[default]
    Answer,
    /// Answer from the zone with the TC bit set.
    Truncated,
    /// Reply with the given rcode and no answers.
    Rcode(u8),
    /// Never reply.
    Silent,
    /// Reply with a datagram larger than 4096 bytes.
    Oversized,
    /// Reply from the zone with a different message id.
    WrongId,
}

#[derive(Debug, Clone, Default)]
pub struct MockZone {
    records: HashMap<String, Vec<MockRecord>>,
    behaviour: Behaviour,
}

impl MockZone {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn a(self, name: &str, ip: &str) -> Self {
        self.record(name, MockRecord::A(ip.parse().unwrap()))
    }

    pub fn aaaa(self, name: &str, ip: &str) -> Self {
        self.record(name, MockRecord::Aaaa(ip.parse().unwrap()))
    }

    pub fn cname(self, name: &str, target: &str) -> Self {
        self.record(name, MockRecord::Cname(target.to_string()))
    }

    pub fn behaviour(mut self, behaviour: Behaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    fn record(mut self, name: &str, record: MockRecord) -> Self {
        self.records.entry(normalize(name)).or_default().push(record);
        self
    }
}

pub struct MockDnsServer {
    addr: SocketAddr,
    packets: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    /// Starts a server on an ephemeral loopback IPv4 port.
    pub async fn start(zone: MockZone) -> Result<Self, std::io::Error> {
        Self::start_on(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)), zone).await
    }

    /// Starts a server on an ephemeral loopback IPv6 port.
    pub async fn start_v6(zone: MockZone) -> Result<Self, std::io::Error> {
        Self::start_on(SocketAddr::from((Ipv6Addr::LOCALHOST, 0)), zone).await
    }

    pub async fn start_on(addr: SocketAddr, zone: MockZone) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(addr).await?;
        let local_addr = socket.local_addr()?;
        let packets = Arc::new(AtomicUsize::new(0));
        let counter = packets.clone();

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            counter.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = build_mock_response(&zone, &buf[..len]) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr: local_addr,
            packets,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Nameserver string for this server (`ip:port`, IPv6 bracketed).
    pub fn nameserver(&self) -> String {
        self.addr.to_string()
    }

    /// Number of datagrams received so far.
    pub fn packets(&self) -> usize {
        self.packets.load(Ordering::SeqCst)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn build_mock_response(zone: &MockZone, query: &[u8]) -> Option<Vec<u8>> {
    if query.len() < 12 {
        return None;
    }

    let (qname, question_end) = decode_question_name(query)?;
    if query.len() < question_end + 4 {
        return None;
    }
    let qtype = u16::from_be_bytes([query[question_end], query[question_end + 1]]);
    let question = &query[12..question_end + 4];

    let mut id = [query[0], query[1]];
    let mut flags = [0x81, 0x80];
    let mut answers: Vec<&MockRecord> = Vec::new();

    match zone.behaviour {
        Behaviour::Silent => return None,
        Behaviour::Oversized => {
            let mut response = vec![0u8; 5000];
            response[..2].copy_from_slice(&id);
            response[2] = 0x81;
            response[3] = 0x80;
            return Some(response);
        }
        Behaviour::Rcode(rcode) => flags[1] |= rcode & 0x0f,
        Behaviour::Answer | Behaviour::Truncated | Behaviour::WrongId => {
            match zone.records.get(&qname) {
                Some(records) => answers.extend(
                    records
                        .iter()
                        .filter(|r| r.rtype() == qtype || r.rtype() == 5),
                ),
                None => flags[1] |= 0x03,
            }
            if zone.behaviour == Behaviour::Truncated {
                flags[0] |= 0x02;
            }
            if zone.behaviour == Behaviour::WrongId {
                id = (u16::from_be_bytes(id) ^ 0xffff).to_be_bytes();
            }
        }
    }

    let mut response = Vec::with_capacity(512);
    response.extend_from_slice(&id);
    response.extend_from_slice(&flags);
    response.extend_from_slice(&[0x00, 0x01]);
    response.extend_from_slice(&(answers.len() as u16).to_be_bytes());
    response.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    response.extend_from_slice(question);

    for record in answers {
        let rdata = record.rdata();
        response.extend_from_slice(&[0xc0, 0x0c]);
        response.extend_from_slice(&record.rtype().to_be_bytes());
        response.extend_from_slice(&[0x00, 0x01, 0x00, 0x00, 0x00, 0x3c]);
        response.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        response.extend_from_slice(&rdata);
    }

    Some(response)
}

/// Lower-cased question name without the root label, and the offset of QTYPE.
fn decode_question_name(query: &[u8]) -> Option<(String, usize)> {
    let mut labels = Vec::new();
    let mut pos = 12;
    loop {
        let len = *query.get(pos)? as usize;
        pos += 1;
        if len == 0 {
            break;
        }
        let label = query.get(pos..pos + len)?;
        labels.push(String::from_utf8_lossy(label).to_ascii_lowercase());
        pos += len;
    }
    Some((labels.join("."), pos))
}

fn encode_name(name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for label in normalize(name).split('.').filter(|l| !l.is_empty()) {
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    out
}

fn normalize(name: &str) -> String {
    name.strip_suffix('.').unwrap_or(name).to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_for(name: &str, qtype: u16) -> Vec<u8> {
        let mut query = vec![0xab, 0xcd, 0x01, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0];
        query.extend_from_slice(&encode_name(name));
        query.extend_from_slice(&qtype.to_be_bytes());
        query.extend_from_slice(&[0x00, 0x01]);
        query
    }

    #[test]
    fn test_mock_response_builder() {
        let zone = MockZone::new().a("example.com", "192.0.2.1");
        let response = build_mock_response(&zone, &query_for("Example.com.", 1)).unwrap();

        assert_eq!(response[0..2], [0xab, 0xcd]);
        assert_eq!(response[2], 0x81);
        assert_eq!(response[3] & 0x0f, 0);
        assert_eq!(u16::from_be_bytes([response[6], response[7]]), 1);
        assert_eq!(response[response.len() - 4..], [192, 0, 2, 1]);
    }

    #[test]
    fn test_unknown_name_is_nxdomain() {
        let response = build_mock_response(&MockZone::new(), &query_for("nope.test", 1)).unwrap();
        assert_eq!(response[3] & 0x0f, 3);
    }

    #[tokio::test]
    async fn test_mock_server_counts_packets() {
        let server = MockDnsServer::start(MockZone::new().behaviour(Behaviour::Silent))
            .await
            .unwrap();
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        client
            .send_to(&query_for("example.com", 1), server.addr())
            .await
            .unwrap();

        for _ in 0..50 {
            if server.packets() == 1 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(server.packets(), 1);
    }
}
