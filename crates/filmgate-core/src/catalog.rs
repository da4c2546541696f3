//! Film catalog — media items retrievable by numeric code.

use std::sync::Arc;

use tracing::info;

use crate::error::{CatalogError, StoreError};
use crate::store::Store;
use crate::types::Film;

/// CRUD and code lookup over the film collection.
pub struct MediaCatalog {
    store: Arc<dyn Store>,
}

impl MediaCatalog {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Add a film.
    ///
    /// `code_text` is validated as an integer before any duplicate check
    /// runs; url then code duplicates are rejected in that order.
    pub async fn add(
        &self,
        url: &str,
        code_text: &str,
        name: &str,
    ) -> Result<Film, CatalogError> {
        let code: i64 = code_text.parse().map_err(|_| CatalogError::InvalidCode)?;

        if self.store.find_film_by_url(url).await?.is_some() {
            return Err(CatalogError::DuplicateUrl);
        }
        if self.store.find_film_by_code(code).await?.is_some() {
            return Err(CatalogError::DuplicateCode);
        }

        let film = Film {
            code,
            url: url.to_string(),
            name: name.to_string(),
        };

        match self.store.insert_film(film.clone()).await {
            Ok(()) => {}
            Err(StoreError::DuplicateKey("url")) => return Err(CatalogError::DuplicateUrl),
            Err(StoreError::DuplicateKey(_)) => return Err(CatalogError::DuplicateCode),
            Err(e) => return Err(e.into()),
        }

        info!(code, name = %film.name, "film added");
        Ok(film)
    }

    pub async fn find_by_code(&self, code: i64) -> Result<Film, CatalogError> {
        self.store
            .find_film_by_code(code)
            .await?
            .ok_or(CatalogError::NotFound)
    }

    /// Remove the film with the given code.
    ///
    /// Unlike the channel directory's permissive delete, a missing film is
    /// reported as `NotFound`.
    pub async fn remove(&self, code: i64) -> Result<(), CatalogError> {
        if !self.store.delete_film(code).await? {
            return Err(CatalogError::NotFound);
        }
        info!(code, "film removed");
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn catalog() -> MediaCatalog {
        MediaCatalog::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_add_then_lookup() {
        let cat = catalog();
        let film = cat.add("https://x/1", "7", "My Movie").await.unwrap();
        assert_eq!(film.code, 7);

        let found = cat.find_by_code(7).await.unwrap();
        assert_eq!(found, film);
    }

    #[tokio::test]
    async fn test_invalid_code_checked_first() {
        let cat = catalog();
        cat.add("https://x/1", "7", "My Movie").await.unwrap();
        // Same url, but the bad code must be reported before the duplicate.
        let err = cat.add("https://x/1", "abc", "Other").await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidCode));
    }

    #[tokio::test]
    async fn test_duplicate_url() {
        let cat = catalog();
        cat.add("https://x/1", "7", "My Movie").await.unwrap();
        let err = cat.add("https://x/1", "8", "Other").await.unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateUrl));
    }

    #[tokio::test]
    async fn test_duplicate_code_regardless_of_url() {
        let cat = catalog();
        cat.add("https://x/1", "7", "My Movie").await.unwrap();
        let err = cat.add("https://x/2", "7", "Other").await.unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateCode));
    }

    #[tokio::test]
    async fn test_remove_missing_reports_not_found() {
        let cat = catalog();
        let err = cat.remove(99).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));
    }

    #[tokio::test]
    async fn test_remove_then_lookup_fails() {
        let cat = catalog();
        cat.add("https://x/1", "7", "My Movie").await.unwrap();
        cat.remove(7).await.unwrap();
        assert!(matches!(
            cat.find_by_code(7).await.unwrap_err(),
            CatalogError::NotFound
        ));
    }
}
