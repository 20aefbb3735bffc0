//! Club-type lookup ports and application service.

use std::sync::Arc;

use async_trait::async_trait;
use registar_core::{AppResult, NonEmptyString};

/// Club-type lookup row.
#[derive(Debug, Clone)]
pub struct ClubTypeRecord {
    /// Club-type identifier.
    pub id: i32,
    /// Full label.
    pub label: String,
    /// Short label used in listings.
    pub short_label: String,
}

/// Repository port for club-type persistence.
#[async_trait]
pub trait ClubTypeRepository: Send + Sync {
    /// Lists club types ordered by id.
    async fn list(&self) -> AppResult<Vec<ClubTypeRecord>>;

    /// Inserts a club type and returns its id.
    async fn create(&self, label: &str, short_label: &str) -> AppResult<i32>;

    /// Deletes one club type.
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Application service for club-type operations.
#[derive(Clone)]
pub struct ClubTypeService {
    repository: Arc<dyn ClubTypeRepository>,
}

impl ClubTypeService {
    /// Creates a club-type service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn ClubTypeRepository>) -> Self {
        Self { repository }
    }

    /// Lists all club types.
    pub async fn list(&self) -> AppResult<Vec<ClubTypeRecord>> {
        self.repository.list().await
    }

    /// Creates a club type with validated labels.
    pub async fn create(&self, label: String, short_label: String) -> AppResult<ClubTypeRecord> {
        let label = NonEmptyString::new(label)?;
        let short_label = NonEmptyString::new(short_label)?;
        let id = self
            .repository
            .create(label.as_str(), short_label.as_str())
            .await?;
        Ok(ClubTypeRecord {
            id,
            label: label.into(),
            short_label: short_label.into(),
        })
    }

    /// Deletes one club type.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.delete(id).await
    }
}
