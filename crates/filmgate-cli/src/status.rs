//! Status command — print resolved configuration and store counts.

use anyhow::{Context, Result};

use filmgate_core::config::{get_config_path, load_config};
use filmgate_core::store::{FileStore, Store};
use filmgate_core::utils::expand_home;

pub async fn run() -> Result<()> {
    let config = load_config(None);

    println!();
    println!("Filmgate status");
    println!("  Config:     {}", get_config_path().display());
    println!(
        "  Bot token:  {}",
        if config.telegram.is_configured() {
            "configured"
        } else {
            "NOT configured"
        }
    );
    println!("  Admins:     {}", config.telegram.admin_ids.len());

    let store_path = expand_home(&config.store.path);
    println!("  Store:      {}", store_path.display());

    if store_path.exists() {
        let store = FileStore::open(store_path)
            .context("failed to open store")?;
        println!("  Channels:   {}", store.list_channels().await?.len());
        println!("  Users seen: {}", store.count_users().await?);
    } else {
        println!("  Contents:   (store not created yet)");
    }
    println!();

    Ok(())
}
