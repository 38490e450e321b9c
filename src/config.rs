use std::env;
use std::time::Duration;

use log::warn;

use crate::blockchain::{DEFAULT_DIFFICULTY, MAX_DIFFICULTY};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_PEER_TIMEOUT_SECS: u64 = 5;

/// Node settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    pub difficulty: u32,
    /// Upper bound on every outbound request to a peer.
    pub peer_timeout: Duration,
    /// Address announced to peers when syncing. Derived from the inbound
    /// request when unset.
    pub advertised_address: Option<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            difficulty: DEFAULT_DIFFICULTY,
            peer_timeout: Duration::from_secs(DEFAULT_PEER_TIMEOUT_SECS),
            advertised_address: None,
        }
    }
}

impl NodeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset or unparsable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            difficulty: lookup("DIFFICULTY")
                .and_then(|v| v.parse().ok())
                .map(clamp_difficulty)
                .unwrap_or(defaults.difficulty),
            peer_timeout: lookup("PEER_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.peer_timeout),
            advertised_address: lookup("NODE_ADDRESS").filter(|v| !v.trim().is_empty()),
        }
    }
}

fn clamp_difficulty(requested: u32) -> u32 {
    if requested > MAX_DIFFICULTY {
        warn!("DIFFICULTY={requested} is too high, capping at {MAX_DIFFICULTY}");
        return MAX_DIFFICULTY;
    }
    requested
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = NodeConfig::from_lookup(|_| None);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.difficulty, 2);
        assert_eq!(cfg.peer_timeout, Duration::from_secs(5));
        assert!(cfg.advertised_address.is_none());
    }

    #[test]
    fn difficulty_is_capped() {
        let cfg = NodeConfig::from_lookup(|k| (k == "DIFFICULTY").then(|| "65".to_string()));
        assert_eq!(cfg.difficulty, MAX_DIFFICULTY);

        let cfg = NodeConfig::from_lookup(|k| (k == "DIFFICULTY").then(|| "6".to_string()));
        assert_eq!(cfg.difficulty, 6);
    }

    #[test]
    fn reads_overrides_and_skips_garbage() {
        let vars: HashMap<&str, &str> = [
            ("HOST", "0.0.0.0"),
            ("PORT", "not-a-port"),
            ("DIFFICULTY", "3"),
            ("PEER_TIMEOUT_SECS", "1"),
            ("NODE_ADDRESS", "http://10.0.0.5:8000"),
        ]
        .into_iter()
        .collect();
        let cfg = NodeConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.difficulty, 3);
        assert_eq!(cfg.peer_timeout, Duration::from_secs(1));
        assert_eq!(
            cfg.advertised_address.as_deref(),
            Some("http://10.0.0.5:8000")
        );
    }
}
