//! Client configuration loading.
//!
//! `config.toml` is fetched once from the static host before the app is
//! mounted; if it is missing or invalid the embedded default is used.

use contracts::shared::config::{parse_config, ClientConfig, DEFAULT_CONFIG};
use gloo_net::http::Request;
use once_cell::sync::OnceCell;

const CONFIG_URL: &str = "config.toml";

static CONFIG: OnceCell<ClientConfig> = OnceCell::new();

/// Resolved configuration. Falls back to defaults if `install` was never called.
pub fn config() -> &'static ClientConfig {
    CONFIG.get_or_init(ClientConfig::default)
}

pub fn install(config: ClientConfig) {
    if CONFIG.set(config).is_err() {
        log::warn!("client config already installed, keeping the first one");
    }
}

pub async fn load_config() -> ClientConfig {
    match fetch_config_text().await {
        Ok(text) => match parse_config(&text) {
            Ok(cfg) => {
                log::info!("Loaded {}", CONFIG_URL);
                return cfg;
            }
            Err(e) => log::error!("Invalid {}: {:#}", CONFIG_URL, e),
        },
        Err(e) => log::warn!("{} not available ({}), using defaults", CONFIG_URL, e),
    }

    parse_config(DEFAULT_CONFIG).unwrap_or_default()
}

async fn fetch_config_text() -> Result<String, String> {
    let response = Request::get(CONFIG_URL)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }

    response
        .text()
        .await
        .map_err(|e| format!("Failed to read body: {}", e))
}
