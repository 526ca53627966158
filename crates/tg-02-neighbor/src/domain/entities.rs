//! # Neighbor Entities

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use parking_lot::{Mutex, RwLock};
use shared_types::PeerId;
use tracing::{info, warn};

use crate::ports::outbound::AddressResolver;

/// Traffic counters for one round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundStats {
    /// Every datagram attributed to the neighbor.
    pub received_all: u64,
    /// Transactions not seen before.
    pub received_new: u64,
    /// Transactions the neighbor asked us for.
    pub requested: u64,
    /// Datagrams that failed to decode.
    pub invalid: u64,
    /// Datagrams dropped because the quota was exhausted.
    pub ignored: u64,
}

impl fmt::Display for RoundStats {
    /// Fixed-width report columns: `all|new|req|inv|ign`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<5}|{:<5}|{:<5}|{:<5}|{:<5}",
            self.received_all, self.received_new, self.requested, self.invalid, self.ignored
        )
    }
}

#[derive(Debug)]
struct RoundState {
    current: RoundStats,
    previous: RoundStats,
    quota: u64,
}

/// A configured peer.
///
/// The host name is kept so the address can be re-resolved when the peer
/// moves. Until the first successful resolution the neighbor has no address
/// and is skipped by the sender.
#[derive(Debug)]
pub struct Neighbor {
    id: PeerId,
    host: String,
    port: u16,
    address: RwLock<Option<SocketAddr>>,
    round: Mutex<RoundState>,
}

impl Neighbor {
    pub fn new(id: PeerId, host: impl Into<String>, port: u16, quota: u64) -> Self {
        Self {
            id,
            host: host.into(),
            port,
            address: RwLock::new(None),
            round: Mutex::new(RoundState {
                current: RoundStats::default(),
                previous: RoundStats::default(),
                quota,
            }),
        }
    }

    pub fn id(&self) -> PeerId {
        self.id
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The last successfully resolved address.
    pub fn address(&self) -> Option<SocketAddr> {
        *self.address.read()
    }

    /// Re-resolves the host.
    ///
    /// On failure the previous address stays in place.
    pub fn resolve_address(&self, resolver: &dyn AddressResolver) -> Option<SocketAddr> {
        match resolver.resolve(&self.host, self.port) {
            Ok(resolved) => {
                let mut address = self.address.write();
                if *address != Some(resolved) {
                    info!(peer = %self.id, host = %self.host, %resolved, "neighbor address resolved");
                    *address = Some(resolved);
                }
                Some(resolved)
            }
            Err(e) => {
                warn!(peer = %self.id, host = %self.host, port = self.port, error = %e, "unknown host");
                self.address()
            }
        }
    }

    /// Whether a datagram from `ip:port` came from this neighbor.
    ///
    /// Both the resolved IP and the configured port must match. An
    /// unresolved neighbor matches nothing.
    pub fn matches_origin(&self, ip: IpAddr, port: u16) -> bool {
        match self.address() {
            Some(address) => {
                port == self.port && address.ip().to_canonical() == ip.to_canonical()
            }
            None => false,
        }
    }

    pub fn record_inbound_all(&self) {
        self.round.lock().current.received_all += 1;
    }

    pub fn record_inbound_new(&self) {
        self.round.lock().current.received_new += 1;
    }

    pub fn record_requested(&self) {
        self.round.lock().current.requested += 1;
    }

    pub fn record_invalid(&self) {
        self.round.lock().current.invalid += 1;
    }

    pub fn record_ignored(&self) {
        self.round.lock().current.ignored += 1;
    }

    /// Whether this round's inbound traffic reached the quota.
    pub fn quota_exceeded(&self) -> bool {
        let round = self.round.lock();
        round.current.received_all >= round.quota
    }

    pub fn quota(&self) -> u64 {
        self.round.lock().quota
    }

    pub fn current_stats(&self) -> RoundStats {
        self.round.lock().current
    }

    pub fn previous_stats(&self) -> RoundStats {
        self.round.lock().previous
    }

    /// Closes the current round.
    ///
    /// Logs the finished counters, starts from zero and installs
    /// `new_quota`. Returns the finished round.
    pub fn advance_round(&self, new_quota: u64) -> RoundStats {
        let finished = {
            let mut round = self.round.lock();
            let finished = round.current;
            round.previous = finished;
            round.current = RoundStats::default();
            round.quota = new_quota;
            finished
        };
        let address = self
            .address()
            .map_or_else(|| format!("{}:{}", self.host, self.port), |a| a.to_string());
        info!(peer = %self.id, "{finished}   {address}");
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::net::Ipv6Addr;

    struct FixedResolver(io::Result<SocketAddr>);

    impl AddressResolver for FixedResolver {
        fn resolve(&self, _host: &str, _port: u16) -> io::Result<SocketAddr> {
            match &self.0 {
                Ok(addr) => Ok(*addr),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    fn resolved(addr: &str, quota: u64) -> Neighbor {
        let addr: SocketAddr = addr.parse().unwrap();
        let neighbor = Neighbor::new(PeerId(1), addr.ip().to_string(), addr.port(), quota);
        neighbor.resolve_address(&FixedResolver(Ok(addr)));
        neighbor
    }

    #[test]
    fn test_unresolved_matches_nothing() {
        let neighbor = Neighbor::new(PeerId(1), "example.org", 1337, 10);
        assert!(neighbor.address().is_none());
        assert!(!neighbor.matches_origin("127.0.0.1".parse().unwrap(), 1337));
    }

    #[test]
    fn test_origin_requires_ip_and_port() {
        let neighbor = resolved("10.0.0.7:1337", 10);
        assert!(neighbor.matches_origin("10.0.0.7".parse().unwrap(), 1337));
        assert!(!neighbor.matches_origin("10.0.0.7".parse().unwrap(), 1338));
        assert!(!neighbor.matches_origin("10.0.0.8".parse().unwrap(), 1337));
    }

    #[test]
    fn test_origin_accepts_mapped_ipv4() {
        let neighbor = resolved("10.0.0.7:1337", 10);
        let mapped = IpAddr::V6(Ipv6Addr::new(0, 0, 0, 0, 0, 0xffff, 0x0a00, 0x0007));
        assert!(neighbor.matches_origin(mapped, 1337));
    }

    #[test]
    fn test_failed_resolution_keeps_address() {
        let neighbor = resolved("10.0.0.7:1337", 10);
        let failing = FixedResolver(Err(io::Error::new(io::ErrorKind::NotFound, "nxdomain")));
        assert_eq!(
            neighbor.resolve_address(&failing),
            Some("10.0.0.7:1337".parse().unwrap())
        );
        assert_eq!(neighbor.address(), Some("10.0.0.7:1337".parse().unwrap()));
    }

    #[test]
    fn test_changed_address_is_adopted() {
        let neighbor = resolved("10.0.0.7:1337", 10);
        let moved: SocketAddr = "10.0.0.9:1337".parse().unwrap();
        neighbor.resolve_address(&FixedResolver(Ok(moved)));
        assert_eq!(neighbor.address(), Some(moved));
    }

    #[test]
    fn test_counters() {
        let neighbor = resolved("10.0.0.7:1337", 10);
        neighbor.record_inbound_all();
        neighbor.record_inbound_all();
        neighbor.record_inbound_new();
        neighbor.record_requested();
        neighbor.record_invalid();
        neighbor.record_ignored();
        assert_eq!(
            neighbor.current_stats(),
            RoundStats {
                received_all: 2,
                received_new: 1,
                requested: 1,
                invalid: 1,
                ignored: 1,
            }
        );
    }

    #[test]
    fn test_quota_and_round_rollover() {
        let neighbor = resolved("10.0.0.7:1337", 5);
        for _ in 0..4 {
            neighbor.record_inbound_all();
        }
        assert!(!neighbor.quota_exceeded());
        neighbor.record_inbound_all();
        assert!(neighbor.quota_exceeded());

        let finished = neighbor.advance_round(10);
        assert_eq!(finished.received_all, 5);
        assert_eq!(neighbor.previous_stats(), finished);
        assert_eq!(neighbor.current_stats(), RoundStats::default());
        assert_eq!(neighbor.quota(), 10);
        assert!(!neighbor.quota_exceeded());
    }

    #[test]
    fn test_zero_quota_is_always_exceeded() {
        let neighbor = resolved("10.0.0.7:1337", 0);
        assert!(neighbor.quota_exceeded());
    }

    #[test]
    fn test_stats_report_columns() {
        let stats = RoundStats {
            received_all: 12,
            received_new: 3,
            requested: 0,
            invalid: 1,
            ignored: 100,
        };
        assert_eq!(stats.to_string(), "12   |3    |0    |1    |100  ");
    }
}
