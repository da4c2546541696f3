//! File-backed store with JSON persistence.
//!
//! All mutations are persisted via atomic writes (write to tmp, then rename)
//! so a crash mid-write cannot truncate the store.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{Collections, Store};
use crate::error::StoreError;
use crate::types::{Film, RequiredChannel};

/// Durable store at a single JSON file.
///
/// The collections are held in memory behind a `RwLock`; the file is the
/// source of truth across restarts.
pub struct FileStore {
    path: PathBuf,
    collections: RwLock<Collections>,
}

impl FileStore {
    /// Open the store at `path`, loading existing contents if the file
    /// exists. The parent directory is created if needed.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let collections = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            Collections::default()
        };

        debug!(path = %path.display(), "store opened");
        Ok(Self {
            path,
            collections: RwLock::new(collections),
        })
    }

    fn save(&self, collections: &Collections) -> Result<(), StoreError> {
        let tmp_path = self.path.with_extension("tmp");
        let data = serde_json::to_string_pretty(collections)?;
        std::fs::write(&tmp_path, data)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl Store for FileStore {
    async fn insert_channel(&self, channel: RequiredChannel) -> Result<(), StoreError> {
        let mut c = self.collections.write().await;
        c.insert_channel(channel)?;
        self.save(&c)
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
        let removed = c.delete_channel(chat_id, name);
        if removed {
            self.save(&c)?;
        }
        Ok(removed)
    }

    async fn ensure_user(&self, chat_id: &str) -> Result<(), StoreError> {
        let mut c = self.collections.write().await;
        if c.ensure_user(chat_id) {
            self.save(&c)?;
        }
        Ok(())
    }

    async fn count_users(&self) -> Result<u64, StoreError> {
        let c = self.collections.read().await;
        Ok(c.users.len() as u64)
    }

    async fn insert_film(&self, film: Film) -> Result<(), StoreError> {
        let mut c = self.collections.write().await;
        c.insert_film(film)?;
        self.save(&c)
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
        let removed = c.delete_film(code);
        if removed {
            self.save(&c)?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_persistence_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let store = FileStore::open(path.clone()).unwrap();
            store
                .insert_channel(RequiredChannel {
                    chat_id: "c1".into(),
                    name: "News".into(),
                    username: "news".into(),
                })
                .await
                .unwrap();
            store
                .insert_film(Film {
                    code: 7,
                    url: "https://x/1".into(),
                    name: "My Movie".into(),
                })
                .await
                .unwrap();
            store.ensure_user("42").await.unwrap();
        }

        let store = FileStore::open(path).unwrap();
        assert_eq!(store.list_channels().await.unwrap().len(), 1);
        assert_eq!(
            store
                .find_film_by_code(7)
                .await
                .unwrap()
                .unwrap()
                .name,
            "My Movie"
        );
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_channel_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).unwrap();

        store
            .insert_channel(RequiredChannel {
                chat_id: "c1".into(),
                name: "News".into(),
                username: "news".into(),
            })
            .await
            .unwrap();

        let err = store
            .insert_channel(RequiredChannel {
                chat_id: "c1".into(),
                name: "Copy".into(),
                username: "copy".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey("chatId")));
    }

    #[tokio::test]
    async fn test_open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("fresh.json")).unwrap();
        assert!(store.list_channels().await.unwrap().is_empty());
        assert_eq!(store.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let store = FileStore::open(path.clone()).unwrap();
            store
                .insert_film(Film {
                    code: 7,
                    url: "https://x/1".into(),
                    name: "My Movie".into(),
                })
                .await
                .unwrap();
            assert!(store.delete_film(7).await.unwrap());
        }

        let store = FileStore::open(path).unwrap();
        assert!(store.find_film_by_code(7).await.unwrap().is_none());
    }
}
