//! Configuration — JSON file with env-var overrides.

mod loader;
mod schema;

pub use loader::{get_config_path, load_config};
pub use schema::{Config, StoreConfig, TelegramConfig};
