use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::gateway::Timeouts;

const DEFAULT_HTTP_BIND: &str = "0.0.0.0:8080";
const DEFAULT_MSP_ID: &str = "Org1MSP";
const DEFAULT_CRYPTO_PATH: &str =
    "../../test-network/organizations/peerOrganizations/org1.example.com";
const DEFAULT_PEER_ENDPOINT: &str = "localhost:7051";
const DEFAULT_GATEWAY_PEER: &str = "peer0.org1.example.com";
const DEFAULT_CHANNEL_NAME: &str = "mychannel";
const DEFAULT_CHAINCODE_NAME: &str = "basic";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { name: &'static str, value: String },
}

/// Startup settings. Every value has a built-in default and can be
/// overridden from the environment (or a `.env` file).
#[derive(Debug, Clone)]
pub struct Config {
    pub http_bind: String,
    pub msp_id: String,
    pub tls_cert_path: PathBuf,
    pub cert_path: PathBuf,
    pub key_dir: PathBuf,
    pub peer_endpoint: String,
    pub gateway_peer: String,
    pub channel_name: String,
    pub chaincode_name: String,
    pub timeouts: Timeouts,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let crypto_path = PathBuf::from(string("CRYPTO_PATH", DEFAULT_CRYPTO_PATH));
        let user_msp = crypto_path.join("users/User1@org1.example.com/msp");
        let path = |name: &str, default: PathBuf| lookup(name).map(PathBuf::from).unwrap_or(default);

        let defaults = Timeouts::default();
        let seconds = |name: &'static str, default: Duration| -> Result<Duration, ConfigError> {
            match lookup(name) {
                None => Ok(default),
                Some(value) => value
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| ConfigError::InvalidTimeout { name, value }),
            }
        };

        Ok(Config {
            http_bind: string("HTTP_BIND", DEFAULT_HTTP_BIND),
            msp_id: string("MSP_ID", DEFAULT_MSP_ID),
            tls_cert_path: path(
                "TLS_CERT_PATH",
                crypto_path.join("peers/peer0.org1.example.com/tls/ca.crt"),
            ),
            cert_path: path("CERT_PATH", user_msp.join("signcerts/cert.pem")),
            key_dir: path("KEY_DIR", user_msp.join("keystore")),
            peer_endpoint: string("PEER_ENDPOINT", DEFAULT_PEER_ENDPOINT),
            gateway_peer: string("GATEWAY_PEER", DEFAULT_GATEWAY_PEER),
            channel_name: string("CHANNEL_NAME", DEFAULT_CHANNEL_NAME),
            chaincode_name: string("CHAINCODE_NAME", DEFAULT_CHAINCODE_NAME),
            timeouts: Timeouts {
                evaluate: seconds("EVALUATE_TIMEOUT_SECS", defaults.evaluate)?,
                endorse: seconds("ENDORSE_TIMEOUT_SECS", defaults.endorse)?,
                submit: seconds("SUBMIT_TIMEOUT_SECS", defaults.submit)?,
                commit_status: seconds("COMMIT_STATUS_TIMEOUT_SECS", defaults.commit_status)?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_point_at_the_test_network() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.http_bind, "0.0.0.0:8080");
        assert_eq!(config.msp_id, "Org1MSP");
        assert_eq!(config.peer_endpoint, "localhost:7051");
        assert_eq!(config.gateway_peer, "peer0.org1.example.com");
        assert_eq!(config.channel_name, "mychannel");
        assert_eq!(config.chaincode_name, "basic");
        assert_eq!(config.timeouts, Timeouts::default());
        assert!(config
            .cert_path
            .ends_with("users/User1@org1.example.com/msp/signcerts/cert.pem"));
        assert!(config.key_dir.ends_with("users/User1@org1.example.com/msp/keystore"));
        assert!(config
            .tls_cert_path
            .ends_with("peers/peer0.org1.example.com/tls/ca.crt"));
    }

    #[test]
    fn crypto_path_moves_derived_paths() {
        let config = config_from(&[("CRYPTO_PATH", "/etc/org1"), ("KEY_DIR", "/keys")]).unwrap();
        assert_eq!(
            config.cert_path,
            PathBuf::from("/etc/org1/users/User1@org1.example.com/msp/signcerts/cert.pem")
        );
        assert_eq!(config.key_dir, PathBuf::from("/keys"));
    }

    #[test]
    fn timeouts_are_read_in_seconds() {
        let config = config_from(&[("COMMIT_STATUS_TIMEOUT_SECS", "90")]).unwrap();
        assert_eq!(config.timeouts.commit_status, Duration::from_secs(90));
        assert_eq!(config.timeouts.evaluate, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = config_from(&[("ENDORSE_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("ENDORSE_TIMEOUT_SECS"));
    }
}
