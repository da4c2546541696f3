//! Config loader — reads `~/.filmgate/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.filmgate/config.json`
//! 3. Environment variables `FILMGATE_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be
/// parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    load_config_from_path(&config_path)
}

fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `FILMGATE_<SECTION>__<FIELD>` (double underscore as
/// delimiter).
///
/// Supported overrides:
/// - `FILMGATE_TELEGRAM__TOKEN` → `telegram.token`
/// - `FILMGATE_TELEGRAM__ADMIN_IDS` → `telegram.admin_ids` (comma-separated)
/// - `FILMGATE_STORE__PATH` → `store.path`
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(val) = std::env::var("FILMGATE_TELEGRAM__TOKEN") {
        config.telegram.token = val;
    }
    if let Ok(val) = std::env::var("FILMGATE_TELEGRAM__ADMIN_IDS") {
        config.telegram.admin_ids = parse_admin_ids(&val);
    }
    if let Ok(val) = std::env::var("FILMGATE_STORE__PATH") {
        config.store.path = val;
    }
    config
}

/// Parse a comma-separated admin id list, skipping malformed entries.
fn parse_admin_ids(raw: &str) -> Vec<u64> {
    raw.split(',')
        .filter_map(|part| {
            let part = part.trim();
            if part.is_empty() {
                return None;
            }
            match part.parse::<u64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!(entry = part, "ignoring malformed admin id");
                    None
                }
            }
        })
        .collect()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
