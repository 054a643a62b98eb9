//! Harness configuration - endpoint list and chain expectations
//!
//! Models the external input a connection is configured from: a named
//! list of endpoints and an optional expected chain id (e.g. a local
//! fork). Nothing in the call layer depends on these values.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::connection::ProviderConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointEntry {
    pub name: Option<String>,
    pub rpc: Option<String>,
    pub ws: Option<String>,
    pub ipc: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoints: Vec<EndpointEntry>,

    /// Chain id the caller expects the endpoint to report, if any
    pub chain_id: Option<u64>,
}

impl Config {
    /// Turn the configured entries into connection configurations,
    /// deduplicated in order, falling back to the local default node
    pub fn provider_configs(&self) -> Vec<ProviderConfig> {
        use std::collections::BTreeSet;

        let mut configs = Vec::new();
        let mut seen = BTreeSet::<String>::new();

        let mut push = |configs: &mut Vec<ProviderConfig>, config: ProviderConfig| {
            let key = config.display().to_lowercase();
            if seen.insert(key) {
                configs.push(config);
            }
        };

        for entry in &self.endpoints {
            if let Some(rpc) = entry.rpc.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                push(&mut configs, ProviderConfig::Http(normalize_http_endpoint(rpc)));
                continue;
            }
            if let Some(ws) = entry.ws.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                push(&mut configs, ProviderConfig::WebSocket(normalize_ws_endpoint(ws)));
                continue;
            }
            if let Some(ipc) = entry.ipc.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                #[cfg(unix)]
                if let Some(path) = expand_path(ipc) {
                    push(&mut configs, ProviderConfig::Ipc(path));
                }
                #[cfg(not(unix))]
                let _ = ipc;
            }
        }

        if configs.is_empty() {
            configs.push(ProviderConfig::Http(normalize_http_endpoint(
                "localhost:8545",
            )));
        }

        configs
    }
}

/// Load configuration, falling back to defaults if no file is present
/// or the file does not parse
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    toml::from_str::<Config>(&content).unwrap_or_default()
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("CONDUIT_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("conduit").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("conduit").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "conduit", "conduit")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn normalize_http_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

fn normalize_ws_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim();
    if trimmed.starts_with("ws://") || trimmed.starts_with("wss://") {
        trimmed.to_string()
    } else {
        format!("ws://{}", trimmed)
    }
}

#[cfg(unix)]
fn expand_path(path: &str) -> Option<PathBuf> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
            return Some(home.join(rest));
        }
    }

    let mut buf = PathBuf::from(trimmed);
    if buf.is_relative() {
        if let Ok(cwd) = std::env::current_dir() {
            buf = cwd.join(buf);
        }
    }
    Some(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config: Config = toml::from_str(
            r#"
            chain_id = 1337

            [[endpoints]]
            name = "fork"
            rpc = "localhost:8545"

            [[endpoints]]
            name = "live"
            ws = "ws://localhost:8546"
            "#,
        )
        .unwrap();

        assert_eq!(config.chain_id, Some(1337));
        assert_eq!(config.endpoints.len(), 2);
        assert_eq!(config.endpoints[0].name.as_deref(), Some("fork"));
    }

    #[test]
    fn test_provider_configs_normalize_and_dedupe() {
        let config: Config = toml::from_str(
            r#"
            [[endpoints]]
            rpc = "localhost:8545"

            [[endpoints]]
            rpc = "http://localhost:8545"

            [[endpoints]]
            ws = "localhost:8546"
            "#,
        )
        .unwrap();

        let configs = config.provider_configs();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].display(), "http://localhost:8545");
        assert_eq!(configs[1].display(), "ws://localhost:8546");
    }

    #[test]
    fn test_empty_config_falls_back_to_local() {
        let configs = Config::default().provider_configs();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].display(), "http://localhost:8545");
    }
}
