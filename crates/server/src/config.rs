//! Server settings read from the environment.

use std::path::PathBuf;
use std::str::FromStr;

use restyler_core::{RestylerError, Result};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_FETCH_TIMEOUT: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Listener, asset and timeout settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// Timeout for outbound page fetches, in seconds.
    pub fetch_timeout: u64,
    /// Timeout for a whole inbound request, in seconds.
    pub request_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// Reads `RESTYLER_*` variables, falling back to defaults for unset ones.
    ///
    /// # Errors
    ///
    /// Returns [`RestylerError::ConfigError`] when a variable is set but malformed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = match lookup("RESTYLER_HOST") {
            Some(host) if host.trim().is_empty() => {
                return Err(RestylerError::ConfigError("RESTYLER_HOST must not be empty".to_string()));
            }
            Some(host) => host.trim().to_string(),
            None => defaults.host,
        };

        let static_dir = lookup("RESTYLER_STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir);

        Ok(Self {
            host,
            port: parse_var(&lookup, "RESTYLER_PORT", defaults.port)?,
            static_dir,
            fetch_timeout: parse_var(&lookup, "RESTYLER_FETCH_TIMEOUT", defaults.fetch_timeout)?,
            request_timeout: parse_var(&lookup, "RESTYLER_REQUEST_TIMEOUT", defaults.request_timeout)?,
        })
    }

    /// Address the listener binds to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| RestylerError::ConfigError(format!("{} has invalid value '{}': {}", key, raw, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr(), "0.0.0.0:8000");
        assert_eq!(config.static_dir, PathBuf::from("static"));
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("RESTYLER_HOST", "127.0.0.1"),
            ("RESTYLER_PORT", " 9000 "),
            ("RESTYLER_STATIC_DIR", "/srv/restyler"),
            ("RESTYLER_FETCH_TIMEOUT", "3"),
            ("RESTYLER_REQUEST_TIMEOUT", "60"),
        ]))
        .unwrap();

        assert_eq!(config.addr(), "127.0.0.1:9000");
        assert_eq!(config.static_dir, PathBuf::from("/srv/restyler"));
        assert_eq!(config.fetch_timeout, 3);
        assert_eq!(config.request_timeout, 60);
    }

    #[test]
    fn test_malformed_port() {
        let err = ServerConfig::from_lookup(lookup_from(&[("RESTYLER_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, RestylerError::ConfigError(ref msg) if msg.contains("RESTYLER_PORT")));
    }

    #[test]
    fn test_port_out_of_range() {
        let result = ServerConfig::from_lookup(lookup_from(&[("RESTYLER_PORT", "70000")]));
        assert!(matches!(result, Err(RestylerError::ConfigError(_))));
    }

    #[test]
    fn test_empty_host() {
        let result = ServerConfig::from_lookup(lookup_from(&[("RESTYLER_HOST", "  ")]));
        assert!(matches!(result, Err(RestylerError::ConfigError(_))));
    }
}
