use log::{info, warn};
use std::env;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;
use crate::sensors::trend::TrendRule;

/// Value the controller pre-fills for parameters the user has not set yet.
pub const PLACEHOLDER: &str = "<your value here>";

const DEFAULT_ENDPOINT: &str = "https://api.ambientweather.net";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// API key and station MAC address. Both are opaque to the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub mac_address: String,
}

impl Credentials {
    /// Both credentials from `lookup`, or `None` while either is unset.
    pub fn from_lookup<F>(lookup: &F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Some(Credentials {
            api_key: credential(lookup, "AMBIENT_API_KEY")?,
            mac_address: credential(lookup, "AMBIENT_MAC_ADDRESS")?,
        })
    }

    /// Re-read the credentials from the environment and the `.env` file.
    pub fn reload() -> Option<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }
}

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// `None` until both the API key and the MAC address are set.
    pub credentials: Option<Credentials>,
    pub indoor_enabled: bool,
    pub endpoint: Url,
    pub poll_interval: Duration,
    pub http_timeout: Duration,
    pub trend_rule: TrendRule,
}

impl BridgeConfig {
    pub fn new() -> Result<Self, ConfigError> {
        // Load environment variables
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = Credentials::from_lookup(&lookup);
        if credentials.is_none() {
            if credential(&lookup, "AMBIENT_API_KEY").is_none() {
                warn!("AMBIENT_API_KEY is not set, please set it to your Ambient API key");
            }
            if credential(&lookup, "AMBIENT_MAC_ADDRESS").is_none() {
                warn!("AMBIENT_MAC_ADDRESS is not set, please set it to your station MAC address");
            }
        }

        let indoor_enabled = match lookup("AMBIENT_INDOOR") {
            None => false,
            Some(value) => match value.trim().to_lowercase().as_str() {
                "" | "disabled" => false,
                "enabled" => true,
                _ => {
                    return Err(ConfigError::InvalidChoice {
                        name: "AMBIENT_INDOOR",
                        expected: "enabled, disabled",
                        value,
                    })
                }
            },
        };

        let endpoint_str = lookup("AMBIENT_API_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = match Url::parse(&endpoint_str) {
            Ok(url) if !url.cannot_be_a_base() => url,
            _ => return Err(ConfigError::InvalidEndpoint(endpoint_str)),
        };

        let poll_interval = seconds(&lookup, "POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        let http_timeout = seconds(&lookup, "HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;

        let trend_rule = match lookup("PRESSURE_TREND_MODE") {
            None => TrendRule::default(),
            Some(value) => match value.trim().to_lowercase().as_str() {
                "" | "literal" => TrendRule::Literal,
                "deadband" => TrendRule::DeadBand,
                _ => {
                    return Err(ConfigError::InvalidChoice {
                        name: "PRESSURE_TREND_MODE",
                        expected: "literal, deadband",
                        value,
                    })
                }
            },
        };

        info!(
            "Configuration loaded: endpoint={}, interval={}s, indoor={}, trend={:?}",
            endpoint,
            poll_interval.as_secs(),
            if indoor_enabled { "enabled" } else { "disabled" },
            trend_rule
        );

        Ok(BridgeConfig {
            credentials,
            indoor_enabled,
            endpoint,
            poll_interval,
            http_timeout,
            trend_rule,
        })
    }
}

fn credential<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != PLACEHOLDER)
}

fn seconds<F>(lookup: &F, name: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = match lookup(name) {
        Some(value) if !value.trim().is_empty() => value,
        _ => return Ok(Duration::from_secs(default)),
    };

    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidNumber { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<BridgeConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BridgeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_any_variables() {
        let config = load(&[]).unwrap();
        assert!(config.credentials.is_none());
        assert!(!config.indoor_enabled);
        assert_eq!(config.endpoint.as_str(), "https://api.ambientweather.net/");
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.trend_rule, TrendRule::Literal);
    }

    #[test]
    fn credentials_require_both_values() {
        let config = load(&[("AMBIENT_API_KEY", "key")]).unwrap();
        assert!(config.credentials.is_none());

        let config = load(&[("AMBIENT_API_KEY", "key"), ("AMBIENT_MAC_ADDRESS", " AA:BB ")]).unwrap();
        assert_eq!(
            config.credentials,
            Some(Credentials {
                api_key: "key".into(),
                mac_address: "AA:BB".into(),
            })
        );
    }

    #[test]
    fn credentials_from_lookup_alone() {
        let vars: HashMap<&str, &str> = [("AMBIENT_API_KEY", "key"), ("AMBIENT_MAC_ADDRESS", "AA:BB")].into();
        let lookup = |key: &str| vars.get(key).map(|v| v.to_string());
        assert_eq!(
            Credentials::from_lookup(&lookup),
            Some(Credentials {
                api_key: "key".into(),
                mac_address: "AA:BB".into(),
            })
        );
        assert_eq!(Credentials::from_lookup(&|_: &str| None), None);
    }

    #[test]
    fn placeholder_counts_as_unset() {
        let config = load(&[
            ("AMBIENT_API_KEY", PLACEHOLDER),
            ("AMBIENT_MAC_ADDRESS", "AA:BB"),
        ])
        .unwrap();
        assert!(config.credentials.is_none());
    }

    #[test]
    fn indoor_toggle_is_case_insensitive() {
        assert!(load(&[("AMBIENT_INDOOR", "Enabled")]).unwrap().indoor_enabled);
        assert!(!load(&[("AMBIENT_INDOOR", "disabled")]).unwrap().indoor_enabled);
        assert!(matches!(
            load(&[("AMBIENT_INDOOR", "sometimes")]),
            Err(ConfigError::InvalidChoice { name: "AMBIENT_INDOOR", .. })
        ));
    }

    #[test]
    fn rejects_bad_numbers_and_endpoints() {
        assert!(matches!(
            load(&[("POLL_INTERVAL_SECS", "0")]),
            Err(ConfigError::InvalidNumber { name: "POLL_INTERVAL_SECS", .. })
        ));
        assert!(matches!(
            load(&[("HTTP_TIMEOUT_SECS", "ten")]),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            load(&[("AMBIENT_API_URL", "mailto:someone@example.com")]),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn trend_mode_selects_rule() {
        let config = load(&[("PRESSURE_TREND_MODE", "deadband"), ("POLL_INTERVAL_SECS", "300")]).unwrap();
        assert_eq!(config.trend_rule, TrendRule::DeadBand);
        assert_eq!(config.poll_interval, Duration::from_secs(300));
    }
}
