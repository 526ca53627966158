//! # Node Configuration
//!
//! Settings are layered: built-in defaults, then an optional JSON file named
//! by `TG_CONFIG`, then individual environment variables.
//!
//! ```json
//! {
//!   "network": { "bind_host": "0.0.0.0", "port": 1337 },
//!   "neighbors": ["node-b.example.org:1337", "10.0.0.7:1338"],
//!   "gossip": { "max_forward_delay_ms": 300, "max_tx_per_round": 500 }
//! }
//! ```
//!
//! | Variable | Field |
//! |----------|-------|
//! | `TG_BIND_HOST` | `network.bind_host` |
//! | `TG_PORT` | `network.port` |
//! | `TG_NEIGHBORS` | `neighbors` (comma separated `host:port`) |
//! | `TG_MIN_FORWARD_DELAY_MS` | `gossip.min_forward_delay_ms` |
//! | `TG_MAX_FORWARD_DELAY_MS` | `gossip.max_forward_delay_ms` |
//! | `TG_ROUND_DURATION_MS` | `gossip.round_duration_ms` |
//! | `TG_TIMESTAMP_TOLERANCE_MS` | `gossip.timestamp_tolerance_ms` |
//! | `TG_MAX_PENDING_REQUESTS` | `gossip.max_pending_requests` |
//! | `TG_MAX_TX_PER_ROUND` | `gossip.max_tx_per_round` |
//! | `TG_CASCADE_ROUNDS` | `gossip.cascade_rounds` |

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tg_03_gossip_sender::{SchedulingParams, SenderError};
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Local socket.
    pub network: NetworkConfig,
    /// Static peer list.
    pub neighbors: Vec<NeighborConfig>,
    /// Scheduler and anti-spam settings.
    pub gossip: GossipConfig,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("invalid neighbor {0:?}, expected host:port")]
    InvalidNeighbor(String),

    #[error(transparent)]
    Scheduling(#[from] SenderError),
}

impl NodeConfig {
    /// Defaults, then `TG_CONFIG`, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var_os("TG_CONFIG") {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|var| env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON file. Absent keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overrides fields from variables returned by `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("TG_BIND_HOST") {
            self.network.bind_host = host;
        }
        override_from(&lookup, "TG_PORT", &mut self.network.port)?;

        if let Some(list) = lookup("TG_NEIGHBORS") {
            self.neighbors = list
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::parse::<NeighborConfig>)
                .collect::<Result<Vec<_>, _>>()?;
        }

        let gossip = &mut self.gossip;
        override_from(&lookup, "TG_MIN_FORWARD_DELAY_MS", &mut gossip.min_forward_delay_ms)?;
        override_from(&lookup, "TG_MAX_FORWARD_DELAY_MS", &mut gossip.max_forward_delay_ms)?;
        override_from(&lookup, "TG_ROUND_DURATION_MS", &mut gossip.round_duration_ms)?;
        override_from(&lookup, "TG_TIMESTAMP_TOLERANCE_MS", &mut gossip.timestamp_tolerance_ms)?;
        override_from(&lookup, "TG_MAX_PENDING_REQUESTS", &mut gossip.max_pending_requests)?;
        override_from(&lookup, "TG_MAX_TX_PER_ROUND", &mut gossip.max_tx_per_round)?;
        override_from(&lookup, "TG_CASCADE_ROUNDS", &mut gossip.cascade_rounds)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scheduling_params().validate()?;
        Ok(())
    }

    pub fn scheduling_params(&self) -> SchedulingParams {
        SchedulingParams {
            min_forward_delay_ms: self.gossip.min_forward_delay_ms,
            max_forward_delay_ms: self.gossip.max_forward_delay_ms,
            round_duration_ms: self.gossip.round_duration_ms,
            timestamp_tolerance_ms: self.gossip.timestamp_tolerance_ms,
            max_pending_requests: self.gossip.max_pending_requests,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.network.bind_host, self.network.port)
    }
}

fn override_from<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    slot: &mut T,
) -> Result<(), ConfigError> {
    if let Some(value) = lookup(var) {
        match value.trim().parse() {
            Ok(parsed) => *slot = parsed,
            Err(_) => return Err(ConfigError::InvalidEnv { var, value }),
        }
    }
    Ok(())
}

/// Network configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub bind_host: String,
    /// UDP port for gossip traffic.
    pub port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 1337,
        }
    }
}

/// One static peer, written as `host:port`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct NeighborConfig {
    pub host: String,
    pub port: u16,
}

impl FromStr for NeighborConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidNeighbor(s.to_string());
        let (host, port) = s.trim().rsplit_once(':').ok_or_else(invalid)?;
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            host: host.to_string(),
            port: port.parse().map_err(|_| invalid())?,
        })
    }
}

impl TryFrom<String> for NeighborConfig {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for NeighborConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Gossip configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GossipConfig {
    pub min_forward_delay_ms: u64,
    pub max_forward_delay_ms: u64,
    pub round_duration_ms: u64,
    /// Transactions whose issuance time is off by more than 90% of this
    /// are not forwarded.
    pub timestamp_tolerance_ms: u64,
    pub max_pending_requests: usize,
    /// Inbound datagrams accepted per neighbor per round.
    pub max_tx_per_round: u64,
    /// Advance every neighbor's round when the sender's round elapses.
    pub cascade_rounds: bool,
}

impl Default for GossipConfig {
    fn default() -> Self {
        let params = SchedulingParams::default();
        Self {
            min_forward_delay_ms: params.min_forward_delay_ms,
            max_forward_delay_ms: params.max_forward_delay_ms,
            round_duration_ms: params.round_duration_ms,
            timestamp_tolerance_ms: params.timestamp_tolerance_ms,
            max_pending_requests: params.max_pending_requests,
            max_tx_per_round: 1000,
            cascade_rounds: true,
        }
    }
}
