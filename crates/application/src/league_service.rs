//! League ports and application service.

use std::sync::Arc;

use async_trait::async_trait;
use registar_core::{AppResult, NonEmptyString};
use registar_domain::LeagueId;

/// League row.
#[derive(Debug, Clone)]
pub struct LeagueRecord {
    /// League identifier.
    pub id: LeagueId,
    /// League name.
    pub name: String,
}

/// Repository port for league persistence.
#[async_trait]
pub trait LeagueRepository: Send + Sync {
    /// Lists leagues ordered by name.
    async fn list(&self) -> AppResult<Vec<LeagueRecord>>;

    /// Inserts a league and returns its id.
    async fn create(&self, name: &str) -> AppResult<LeagueId>;

    /// Renames a league.
    async fn rename(&self, id: LeagueId, name: &str) -> AppResult<()>;

    /// Deletes one league.
    async fn delete(&self, id: LeagueId) -> AppResult<()>;
}

/// Application service for league operations.
#[derive(Clone)]
pub struct LeagueService {
    repository: Arc<dyn LeagueRepository>,
}

impl LeagueService {
    /// Creates a league service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn LeagueRepository>) -> Self {
        Self { repository }
    }

    /// Lists all leagues.
    pub async fn list(&self) -> AppResult<Vec<LeagueRecord>> {
        self.repository.list().await
    }

    /// Creates a league with a validated name.
    pub async fn create(&self, name: String) -> AppResult<LeagueRecord> {
        let name = NonEmptyString::new(name)?;
        let id = self.repository.create(name.as_str()).await?;
        Ok(LeagueRecord {
            id,
            name: name.into(),
        })
    }

    /// Renames a league.
    pub async fn rename(&self, id: LeagueId, name: String) -> AppResult<LeagueRecord> {
        let name = NonEmptyString::new(name)?;
        self.repository.rename(id, name.as_str()).await?;
        Ok(LeagueRecord {
            id,
            name: name.into(),
        })
    }

    /// Deletes one league.
    pub async fn delete(&self, id: LeagueId) -> AppResult<()> {
        self.repository.delete(id).await
    }
}
