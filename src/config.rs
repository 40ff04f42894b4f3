use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

// ---------------------------------------------------------------------------
// Upstream
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Full URL to the upstream API root (e.g. `https://api.github.com` or
    /// `https://ghe.corp.example.com/api/v3`).
    pub api_url: String,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address for the HTTP listener (e.g. `0.0.0.0:8080`).
    #[serde(default = "default_http_listen")]
    pub http_listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_listen: default_http_listen(),
        }
    }
}

fn default_http_listen() -> String {
    "0.0.0.0:8080".to_string()
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Load and validate a [`Config`] from a YAML file at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Basic sanity checks that cannot be expressed purely with serde.
fn validate_config(config: &Config) -> Result<()> {
    let api_url = reqwest::Url::parse(&config.upstream.api_url)
        .with_context(|| format!("invalid upstream.api_url: {}", config.upstream.api_url))?;
    anyhow::ensure!(
        matches!(api_url.scheme(), "http" | "https"),
        "upstream.api_url must use http or https, got {}",
        api_url.scheme()
    );
    anyhow::ensure!(
        config
            .server
            .http_listen
            .parse::<std::net::SocketAddr>()
            .is_ok(),
        "server.http_listen is not a valid socket address: {}",
        config.server.http_listen
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<Config> {
        let config: Config = serde_yaml::from_str(yaml)?;
        validate_config(&config)?;
        Ok(config)
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let config = parse(
            r#"
            upstream:
              api_url: https://api.github.com
            "#,
        )
        .unwrap();
        assert_eq!(config.upstream.api_url, "https://api.github.com");
        assert_eq!(config.server.http_listen, "0.0.0.0:8080");
    }

    #[test]
    fn explicit_listen_address_survives() {
        let config = parse(
            r#"
            upstream:
              api_url: https://ghe.corp.example.com/api/v3
            server:
              http_listen: 127.0.0.1:9090
            "#,
        )
        .unwrap();
        assert_eq!(config.server.http_listen, "127.0.0.1:9090");
    }

    #[test]
    fn rejects_missing_api_url() {
        assert!(parse("server:\n  http_listen: 0.0.0.0:8080\n").is_err());
    }

    #[test]
    fn rejects_non_http_api_url() {
        assert!(parse("upstream:\n  api_url: ftp://example.com\n").is_err());
    }

    #[test]
    fn rejects_unparseable_listen_address() {
        assert!(parse(
            "upstream:\n  api_url: https://api.github.com\nserver:\n  http_listen: not-an-addr\n"
        )
        .is_err());
    }
}
