use std::env;
use std::time::Duration;

use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const BASE_URL_VAR: &str = "PUBSCOUT_BASE_URL";
pub const TIMEOUT_VAR: &str = "PUBSCOUT_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid search service URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("search service URL must use http or https, got '{0}'")]
    UnsupportedScheme(String),

    #[error("invalid PUBSCOUT_TIMEOUT_SECS '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// Runtime settings.
///
/// Configuration via environment variables:
/// - `PUBSCOUT_BASE_URL`: search service root (default `http://localhost:8000`)
/// - `PUBSCOUT_TIMEOUT_SECS`: whole-request timeout (default 30)
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: Url,
    pub request_timeout: Duration,
}

impl Settings {
    /// Resolve settings from the process environment. `base_url_flag` wins over the env var.
    pub fn from_env(base_url_flag: Option<&str>) -> Result<Self, ConfigError> {
        Self::resolve(base_url_flag, |key| env::var(key).ok())
    }

    fn resolve(
        base_url_flag: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let raw_url = base_url_flag
            .map(str::to_string)
            .or_else(|| lookup(BASE_URL_VAR))
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&raw_url)?;

        let request_timeout = match lookup(TIMEOUT_VAR).map(|t| t.trim().to_string()) {
            Some(t) if !t.is_empty() => match t.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(t)),
            },
            _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            base_url,
            request_timeout,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let settings = Settings::resolve(None, lookup(&[])).unwrap();
        assert_eq!(settings.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn env_var_sets_base_url() {
        let settings =
            Settings::resolve(None, lookup(&[(BASE_URL_VAR, "https://search.example.org")]))
                .unwrap();
        assert_eq!(settings.base_url.host_str(), Some("search.example.org"));
    }

    #[test]
    fn flag_overrides_env_var() {
        let settings = Settings::resolve(
            Some("http://127.0.0.1:9000"),
            lookup(&[(BASE_URL_VAR, "https://search.example.org")]),
        )
        .unwrap();
        assert_eq!(settings.base_url.port(), Some(9000));
    }

    #[test]
    fn rejects_malformed_url() {
        let err = Settings::resolve(Some("not a url"), lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }), "got: {err}");
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = Settings::resolve(Some("ftp://example.com"), lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("http or https"), "got: {err}");
    }

    #[test]
    fn timeout_from_env() {
        let settings = Settings::resolve(None, lookup(&[(TIMEOUT_VAR, "5")])).unwrap();
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_zero_or_garbage_timeout() {
        for bad in ["0", "ten", "-3"] {
            let err = Settings::resolve(None, lookup(&[(TIMEOUT_VAR, bad)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTimeout(_)), "{bad}: {err}");
        }
    }
}
