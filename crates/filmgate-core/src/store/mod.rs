//! Document store — persistence for channels, users, and films.
//!
//! The `Store` trait is the seam the rest of the crate programs against.
//! Uniqueness (channel chat id / username, film code / url, user chat id) is
//! enforced here, so concurrent duplicate inserts resolve to
//! `StoreError::DuplicateKey` rather than corrupt data.
//!
//! Two implementations:
//! - `MemoryStore` — ephemeral, used by tests
//! - `FileStore` — JSON file with atomic writes (write tmp, then rename)

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::types::{Film, KnownUser, RequiredChannel};

/// The document store consumed by the directory, catalog, and gate.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a channel. Fails with `DuplicateKey` if the chat id or
    /// username is already present.
    async fn insert_channel(&self, channel: RequiredChannel) -> Result<(), StoreError>;

    async fn find_channel_by_chat_id(
        &self,
        chat_id: &str,
    ) -> Result<Option<RequiredChannel>, StoreError>;

    async fn find_channel_by_username(
        &self,
        username: &str,
    ) -> Result<Option<RequiredChannel>, StoreError>;

    /// All channels in insertion order.
    async fn list_channels(&self) -> Result<Vec<RequiredChannel>, StoreError>;

    /// Delete the channel matching both `chat_id` and `name`.
    ///
    /// Returns whether a record was removed.
    async fn delete_channel(&self, chat_id: &str, name: &str) -> Result<bool, StoreError>;

    /// Record that a user has been seen. Idempotent: a concurrent or repeat
    /// insert of the same user is a no-op, never an error.
    async fn ensure_user(&self, chat_id: &str) -> Result<(), StoreError>;

    async fn count_users(&self) -> Result<u64, StoreError>;

    /// Insert a film. Fails with `DuplicateKey` if the code or url is
    /// already present.
    async fn insert_film(&self, film: Film) -> Result<(), StoreError>;

    async fn find_film_by_code(&self, code: i64) -> Result<Option<Film>, StoreError>;

    async fn find_film_by_url(&self, url: &str) -> Result<Option<Film>, StoreError>;

    /// Delete the film with the given code. Returns whether a record was
    /// removed.
    async fn delete_film(&self, code: i64) -> Result<bool, StoreError>;
}

// ─────────────────────────────────────────────
// Shared collection state
// ─────────────────────────────────────────────

/// The raw collections, shared by both store implementations.
///
/// Channels and films are kept as vectors to preserve insertion order.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Collections {
    pub channels: Vec<RequiredChannel>,
    pub users: Vec<KnownUser>,
    pub films: Vec<Film>,
}

impl Collections {
    pub fn insert_channel(&mut self, channel: RequiredChannel) -> Result<(), StoreError> {
        if self.channels.iter().any(|c| c.chat_id == channel.chat_id) {
            return Err(StoreError::DuplicateKey("chatId"));
        }
        if self.channels.iter().any(|c| c.username == channel.username) {
            return Err(StoreError::DuplicateKey("username"));
        }
        self.channels.push(channel);
        Ok(())
    }

    pub fn delete_channel(&mut self, chat_id: &str, name: &str) -> bool {
        let before = self.channels.len();
        self.channels
            .retain(|c| !(c.chat_id == chat_id && c.name == name));
        self.channels.len() != before
    }

    /// Returns true if the user was newly inserted.
    pub fn ensure_user(&mut self, chat_id: &str) -> bool {
        if self.users.iter().any(|u| u.chat_id == chat_id) {
            return false;
        }
        self.users.push(KnownUser {
            chat_id: chat_id.to_string(),
        });
        true
    }

    pub fn insert_film(&mut self, film: Film) -> Result<(), StoreError> {
        if self.films.iter().any(|f| f.code == film.code) {
            return Err(StoreError::DuplicateKey("code"));
        }
        if self.films.iter().any(|f| f.url == film.url) {
            return Err(StoreError::DuplicateKey("url"));
        }
        self.films.push(film);
        Ok(())
    }

    pub fn delete_film(&mut self, code: i64) -> bool {
        let before = self.films.len();
        self.films.retain(|f| f.code != code);
        self.films.len() != before
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
