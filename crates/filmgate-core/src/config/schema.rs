//! Configuration schema.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! `#[serde(rename_all = "camelCase")]` handles the conversion.

use serde::{Deserialize, Serialize};

/// Root configuration — loaded from `~/.filmgate/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub store: StoreConfig,
}

/// Telegram bot settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    #[serde(default)]
    pub token: String,
    /// User ids allowed to run the admin commands.
    #[serde(default)]
    pub admin_ids: Vec<u64>,
}

impl TelegramConfig {
    /// Whether a bot token has been configured.
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty()
    }
}

/// Document store settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// Path of the JSON store file. `~` expands to the home directory.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "~/.filmgate/store.json".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
