//! Run command — wires the store, gate, router, and bot together.
//!
//! Startup sequence:
//! 1. Load config
//! 2. Open the file store
//! 3. Build the Telegram platform + directory + catalog + gate + router
//! 4. Run the polling loop; Ctrl+C triggers graceful shutdown

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use teloxide::Bot;
use tracing::info;

use filmgate_core::config::load_config;
use filmgate_core::gate::{AdminSet, SubscriptionGate};
use filmgate_core::router::CommandRouter;
use filmgate_core::store::FileStore;
use filmgate_core::utils::expand_home;
use filmgate_core::{ChannelDirectory, MediaCatalog};
use filmgate_telegram::{FilmgateBot, TelegramPlatform};

/// Run the bot until Ctrl+C.
pub async fn run() -> Result<()> {
    // 1. Load config
    let config = load_config(None);
    if !config.telegram.is_configured() {
        bail!(
            "no bot token configured; set telegram.token in config.json \
             or FILMGATE_TELEGRAM__TOKEN"
        );
    }

    // 2. Open the store
    let store_path = expand_home(&config.store.path);
    let store = Arc::new(
        FileStore::open(store_path.clone())
            .with_context(|| format!("failed to open store at {}", store_path.display()))?,
    );

    // 3. Build the components
    let bot = Bot::new(&config.telegram.token);
    let platform = Arc::new(TelegramPlatform::new(bot.clone()));
    let admins = AdminSet::new(config.telegram.admin_ids.iter().copied());

    let directory = Arc::new(ChannelDirectory::new(store.clone(), platform.clone()));
    let catalog = MediaCatalog::new(store.clone());
    let gate = Arc::new(SubscriptionGate::new(
        directory.clone(),
        store.clone(),
        platform,
        admins.clone(),
    ));
    let router = Arc::new(CommandRouter::new(gate, directory, catalog, admins.clone()));

    let filmgate = FilmgateBot::new(bot, router);

    info!(
        store = %store_path.display(),
        admins = admins.len(),
        "filmgate starting"
    );

    println!("  Store:  {}", store_path.display());
    println!("  Admins: {}", admins.len());
    println!();
    println!("  Ctrl+C to stop");
    println!();

    // 4. Run until Ctrl+C
    tokio::select! {
        result = filmgate.run() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            println!();
            println!("  Shutting down...");
            info!("received Ctrl+C, shutting down");
            filmgate.stop();
        }
    }

    println!("  Filmgate stopped. Goodbye!");
    Ok(())
}
