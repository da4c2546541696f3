//! In-memory store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Collections, Store};
use crate::error::StoreError;
use crate::types::{Film, RequiredChannel};

/// Ephemeral store backed by a `RwLock`. Used by tests and by `status`-style
/// inspection where no persistence is wanted.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_channel(&self, channel: RequiredChannel) -> Result<(), StoreError> {
        let mut c = self.collections.write().await;
        c.insert_channel(channel)
    }

    async fn find_channel_by_chat_id(
        &self,
        chat_id: &str,
    ) -> Result<Option<RequiredChannel>, StoreError> {
        let c = self.collections.read().await;
        Ok(c.channels.iter().find(|ch| ch.chat_id == chat_id).cloned())
    }

    async fn find_channel_by_username(
        &self,
        username: &str,
    ) -> Result<Option<RequiredChannel>, StoreError> {
        let c = self.collections.read().await;
        Ok(c.channels
            .iter()
            .find(|ch| ch.username == username)
            .cloned())
    }

    async fn list_channels(&self) -> Result<Vec<RequiredChannel>, StoreError> {
        let c = self.collections.read().await;
        Ok(c.channels.clone())
    }

    async fn delete_channel(&self, chat_id: &str, name: &str) -> Result<bool, StoreError> {
        let mut c = self.collections.write().await;
        Ok(c.delete_channel(chat_id, name))
    }

    async fn ensure_user(&self, chat_id: &str) -> Result<(), StoreError> {
        let mut c = self.collections.write().await;
        c.ensure_user(chat_id);
        Ok(())
    }

    async fn count_users(&self) -> Result<u64, StoreError> {
        let c = self.collections.read().await;
        Ok(c.users.len() as u64)
    }

    async fn insert_film(&self, film: Film) -> Result<(), StoreError> {
        let mut c = self.collections.write().await;
        c.insert_film(film)
    }

    async fn find_film_by_code(&self, code: i64) -> Result<Option<Film>, StoreError> {
        let c = self.collections.read().await;
        Ok(c.films.iter().find(|f| f.code == code).cloned())
    }

    async fn find_film_by_url(&self, url: &str) -> Result<Option<Film>, StoreError> {
        let c = self.collections.read().await;
        Ok(c.films.iter().find(|f| f.url == url).cloned())
    }

    async fn delete_film(&self, code: i64) -> Result<bool, StoreError> {
        let mut c = self.collections.write().await;
        Ok(c.delete_film(code))
    }
}
