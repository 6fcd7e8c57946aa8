//! Client configuration (`config.toml` served next to `index.html`)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend port on the same host that served the page
    #[serde(default = "default_port")]
    pub port: u16,
    /// Full base URL; overrides `port` when set
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
}

fn default_port() -> u16 {
    3000
}

fn default_poll_interval_secs() -> u32 {
    15
}

fn default_debounce_ms() -> u32 {
    300
}

fn default_min_chars() -> usize {
    2
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            base_url: None,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_chars: default_min_chars(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            refresh: RefreshConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

/// Default configuration embedded in the bundle
pub const DEFAULT_CONFIG: &str = r#"
[api]
port = 3000

[refresh]
poll_interval_secs = 15

[search]
debounce_ms = 300
min_chars = 2
"#;

/// Parse and sanity-check a `config.toml`
pub fn parse_config(contents: &str) -> anyhow::Result<ClientConfig> {
    let config: ClientConfig = toml::from_str(contents)?;
    if config.refresh.poll_interval_secs == 0 {
        anyhow::bail!("refresh.poll_interval_secs must be at least 1");
    }
    if let Some(url) = &config.api.base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("api.base_url must start with http:// or https://, got {url}");
        }
    }
    Ok(config)
}

impl ClientConfig {
    /// Base URL for API requests, given the page's `location.protocol` and `location.hostname`
    pub fn api_base(&self, protocol: &str, hostname: &str) -> String {
        match &self.api.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("{}//{}:{}", protocol, hostname, self.api.port),
        }
    }

    pub fn poll_interval_ms(&self) -> u32 {
        self.refresh.poll_interval_secs.saturating_mul(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.poll_interval_ms(), 15_000);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = parse_config("[api]\nport = 8080\n").unwrap();
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.api_base("http:", "10.0.0.5"), "http://10.0.0.5:8080");
    }

    #[test]
    fn test_base_url_overrides_port() {
        let config =
            parse_config("[api]\nbase_url = \"https://inventario.example.com/\"\n").unwrap();
        assert_eq!(
            config.api_base("http:", "localhost"),
            "https://inventario.example.com"
        );
    }

    #[test]
    fn test_rejects_zero_interval_and_bad_url() {
        assert!(parse_config("[api]\n[refresh]\npoll_interval_secs = 0\n").is_err());
        assert!(parse_config("[api]\nbase_url = \"ftp://x\"\n").is_err());
        assert!(parse_config("not toml at all = = =").is_err());
    }
}
