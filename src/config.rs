use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const ADDR_VAR: &str = "TTT_ADDR";
pub const LOG_DIR_VAR: &str = "TTT_LOG_DIR";
pub const LOG_FILE_VAR: &str = "TTT_LOG_FILE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub addr: SocketAddr,
    pub log_dir: PathBuf,
    pub log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            addr: ([127, 0, 0, 1], 8000).into(),
            log_dir: PathBuf::from("./logs"),
            log_file: "server.log".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::from_lookup(|var| env::var(var).ok())
    }

    // Unset variables keep their defaults
    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        if let Some(value) = lookup(ADDR_VAR) {
            config.addr = value.trim().parse().map_err(|_| ConfigError::InvalidAddr {
                var: ADDR_VAR,
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(LOG_DIR_VAR) {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(LOG_DIR_VAR));
            }
            config.log_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup(LOG_FILE_VAR) {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(LOG_FILE_VAR));
            }
            config.log_file = value;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.addr.to_string(), "127.0.0.1:8000");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (ADDR_VAR, "0.0.0.0:9000"),
            (LOG_DIR_VAR, "/var/log/ttt"),
            (LOG_FILE_VAR, "ttt.log"),
        ]))
        .unwrap();
        assert_eq!(config.addr.to_string(), "0.0.0.0:9000");
        assert_eq!(config.log_dir, PathBuf::from("/var/log/ttt"));
        assert_eq!(config.log_file, "ttt.log");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[(ADDR_VAR, "localhost")])),
            Err(ConfigError::InvalidAddr { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(LOG_FILE_VAR, " ")])),
            Err(ConfigError::Empty(LOG_FILE_VAR))
        ));
    }
}
