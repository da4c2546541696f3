//! Channel directory — the list of channels users must be subscribed to.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::{DirectoryError, StoreError};
use crate::store::Store;
use crate::types::RequiredChannel;

/// Resolves a public channel handle to its platform identity.
///
/// Implemented by the Telegram adapter via `getChat`; tests supply mocks.
#[async_trait]
pub trait ChatResolver: Send + Sync {
    async fn resolve(&self, username: &str) -> anyhow::Result<ResolvedChat>;
}

/// The platform's answer for a resolved handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedChat {
    pub chat_id: String,
    pub title: String,
}

/// CRUD over the required-channel collection.
///
/// Exclusively owns the `channels` records; the gate only reads them through
/// `list()`.
pub struct ChannelDirectory {
    store: Arc<dyn Store>,
    resolver: Arc<dyn ChatResolver>,
}

impl ChannelDirectory {
    pub fn new(store: Arc<dyn Store>, resolver: Arc<dyn ChatResolver>) -> Self {
        Self { store, resolver }
    }

    /// Register a channel by its public handle.
    ///
    /// The handle is resolved to a chat id and title before insertion; a
    /// failed resolution aborts the add with `Unresolvable`.
    pub async fn add(&self, username: &str) -> Result<RequiredChannel, DirectoryError> {
        let username = username.trim_start_matches('@');

        let resolved = self
            .resolver
            .resolve(username)
            .await
            .map_err(|e| DirectoryError::Unresolvable(e.to_string()))?;

        if self
            .store
            .find_channel_by_chat_id(&resolved.chat_id)
            .await?
            .is_some()
            || self
                .store
                .find_channel_by_username(username)
                .await?
                .is_some()
        {
            return Err(DirectoryError::Duplicate);
        }

        let channel = RequiredChannel {
            chat_id: resolved.chat_id,
            name: resolved.title,
            username: username.to_string(),
        };

        match self.store.insert_channel(channel.clone()).await {
            Ok(()) => {}
            // Lost a race with a concurrent add of the same channel.
            Err(StoreError::DuplicateKey(_)) => return Err(DirectoryError::Duplicate),
            Err(e) => return Err(e.into()),
        }

        info!(chat_id = %channel.chat_id, name = %channel.name, "channel registered");
        Ok(channel)
    }

    /// All required channels in insertion order.
    pub async fn list(&self) -> Result<Vec<RequiredChannel>, DirectoryError> {
        Ok(self.store.list_channels().await?)
    }

    /// Remove the channel matching both keys.
    ///
    /// Permissive: succeeds even when nothing matches.
    pub async fn remove(&self, chat_id: &str, name: &str) -> Result<(), DirectoryError> {
        let removed = self.store.delete_channel(chat_id, name).await?;
        if removed {
            info!(chat_id = %chat_id, name = %name, "channel removed");
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
