//! Competition ports, grouping aggregator, and application service.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use registar_core::{AppError, AppResult};
use registar_domain::{ClubId, CompetitionId, LeagueId};

use crate::sort::SortAllowlist;

/// Stored location of a competition round.
#[derive(Debug, Clone)]
pub struct LocationRecord {
    /// Location row identifier.
    pub id: i32,
    /// Competition group held at this location.
    pub group_label: String,
    /// City the location is in; may be blank.
    pub city: String,
    /// Hosting club.
    pub club_id: ClubId,
}

/// One flat row of the competition × location join.
#[derive(Debug, Clone)]
pub struct CompetitionRow {
    /// Competition identifier.
    pub id: CompetitionId,
    /// Season year, derived from the date.
    pub year: i32,
    /// Round ordinal within the league year.
    pub round: i32,
    /// Competition date.
    pub date: NaiveDate,
    /// League the competition belongs to.
    pub league_id: LeagueId,
    /// League name.
    pub league: String,
    /// Joined location; absent for a competition without locations.
    pub location: Option<LocationRecord>,
}

/// Competition with its locations nested in.
#[derive(Debug, Clone)]
pub struct CompetitionRecord {
    /// Competition identifier.
    pub id: CompetitionId,
    /// Season year.
    pub year: i32,
    /// Round ordinal within the league year.
    pub round: i32,
    /// Competition date.
    pub date: NaiveDate,
    /// League the competition belongs to.
    pub league_id: LeagueId,
    /// League name.
    pub league: String,
    /// Locations in first-seen row order.
    pub locations: Vec<LocationRecord>,
}

/// Folds flat join rows into one record per competition.
///
/// Competitions keep the order they were first seen in; locations keep the
/// order of their rows within a competition. A pure O(n) fold over the input.
#[must_use]
pub fn group_competition_rows(rows: Vec<CompetitionRow>) -> Vec<CompetitionRecord> {
    let mut grouped: Vec<CompetitionRecord> = Vec::new();
    let mut position_by_id: HashMap<i32, usize> = HashMap::new();

    for row in rows {
        let CompetitionRow {
            id,
            year,
            round,
            date,
            league_id,
            league,
            location,
        } = row;

        let position = match position_by_id.get(&id.as_i32()) {
            Some(position) => *position,
            None => {
                grouped.push(CompetitionRecord {
                    id,
                    year,
                    round,
                    date,
                    league_id,
                    league,
                    locations: Vec::new(),
                });
                position_by_id.insert(id.as_i32(), grouped.len() - 1);
                grouped.len() - 1
            }
        };

        if let Some(location) = location {
            grouped[position].locations.push(location);
        }
    }

    grouped
}

/// Location supplied when creating a competition.
#[derive(Debug, Clone)]
pub struct NewLocation {
    /// Competition group held at this location.
    pub group_label: String,
    /// City the location is in; blank is allowed.
    pub city: String,
    /// Hosting club.
    pub club_id: ClubId,
}

impl NewLocation {
    fn validate(&self) -> AppResult<()> {
        if self.group_label.trim().is_empty() {
            return Err(AppError::Validation(
                "location group must not be empty".to_owned(),
            ));
        }

        if self.club_id.as_i32() < 1 {
            return Err(AppError::Validation(
                "location club_id must be a positive id".to_owned(),
            ));
        }

        Ok(())
    }
}

/// Payload for creating one competition with its locations.
#[derive(Debug, Clone)]
pub struct CreateCompetitionInput {
    /// League the competition belongs to.
    pub league_id: LeagueId,
    /// Round ordinal within the league year.
    pub round: i32,
    /// Competition date; the season year is derived from it.
    pub date: NaiveDate,
    /// Locations; at least one is required.
    pub locations: Vec<NewLocation>,
}

impl CreateCompetitionInput {
    /// Checks the payload before any store access.
    pub fn validate(&self) -> AppResult<()> {
        if self.league_id.as_i32() < 1 {
            return Err(AppError::Validation(
                "league_id must be a positive id".to_owned(),
            ));
        }

        if self.round < 1 {
            return Err(AppError::Validation(
                "round must be a positive ordinal".to_owned(),
            ));
        }

        if self.locations.is_empty() {
            return Err(AppError::Validation(
                "a competition needs at least one location".to_owned(),
            ));
        }

        for location in &self.locations {
            location.validate()?;
        }

        Ok(())
    }
}

/// Sparse set of competition columns to update.
#[derive(Debug, Clone, Default)]
pub struct UpdateCompetitionFields {
    /// New season year.
    pub year: Option<i32>,
    /// New league.
    pub league_id: Option<LeagueId>,
    /// New round ordinal.
    pub round: Option<i32>,
    /// New date.
    pub date: Option<NaiveDate>,
}

impl UpdateCompetitionFields {
    /// Returns whether no column was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.year.is_none()
            && self.league_id.is_none()
            && self.round.is_none()
            && self.date.is_none()
    }
}

/// Partial-match search over the competition listing.
///
/// Every supplied field is matched case-insensitively as a substring; the
/// conditions are AND-ed. The field set is fixed, not client-extensible.
#[derive(Debug, Clone, Default)]
pub struct CompetitionSearchInput {
    /// Location group to match.
    pub group_label: Option<String>,
    /// Location city to match.
    pub city: Option<String>,
    /// League name to match.
    pub league: Option<String>,
}

/// Repository port for competition persistence.
#[async_trait]
pub trait CompetitionRepository: Send + Sync {
    /// Lists flat competition × location rows ordered by an allowlisted
    /// column.
    async fn list(&self, order_by: &'static str) -> AppResult<Vec<CompetitionRow>>;

    /// Searches flat rows with the fixed partial-match field set.
    async fn search(&self, search: &CompetitionSearchInput) -> AppResult<Vec<CompetitionRow>>;

    /// Returns the flat rows of one competition; empty when it is absent.
    async fn rows_by_id(&self, id: CompetitionId) -> AppResult<Vec<CompetitionRow>>;

    /// Inserts a competition and all its locations atomically.
    async fn create(&self, input: &CreateCompetitionInput, year: i32) -> AppResult<CompetitionId>;

    /// Applies a sparse column update.
    async fn update(&self, id: CompetitionId, fields: UpdateCompetitionFields) -> AppResult<()>;

    /// Deletes one competition; location rows are removed by cascade.
    async fn delete(&self, id: CompetitionId) -> AppResult<()>;
}

/// Sort keys accepted by the competition listing.
const COMPETITION_SORT: SortAllowlist = SortAllowlist::new(
    "competition",
    "competition.date",
    &[
        ("year", "competition.year"),
        ("round", "competition.round"),
        ("date", "competition.date"),
        ("league", "league.name"),
    ],
);

/// Application service for competition operations.
#[derive(Clone)]
pub struct CompetitionService {
    repository: Arc<dyn CompetitionRepository>,
}

impl CompetitionService {
    /// Creates a competition service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn CompetitionRepository>) -> Self {
        Self { repository }
    }

    /// Lists competitions with their locations nested in.
    pub async fn list(&self, sort_by: Option<&str>) -> AppResult<Vec<CompetitionRecord>> {
        let order_by = COMPETITION_SORT.resolve(sort_by)?;
        let rows = self.repository.list(order_by).await?;
        Ok(group_competition_rows(rows))
    }

    /// Searches competitions with the fixed partial-match field set.
    pub async fn search(
        &self,
        search: CompetitionSearchInput,
    ) -> AppResult<Vec<CompetitionRecord>> {
        let rows = self.repository.search(&search).await?;
        Ok(group_competition_rows(rows))
    }

    /// Returns one competition or a not-found failure.
    pub async fn get(&self, id: CompetitionId) -> AppResult<CompetitionRecord> {
        let rows = self.repository.rows_by_id(id).await?;
        group_competition_rows(rows)
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("competition {id} does not exist")))
    }

    /// Creates a competition with its locations.
    pub async fn create(&self, input: CreateCompetitionInput) -> AppResult<CompetitionId> {
        input.validate()?;
        let year = input.date.year();
        self.repository.create(&input, year).await
    }

    /// Applies a sparse update and returns the fresh record.
    ///
    /// When the date changes and no explicit year is supplied, the season
    /// year is re-derived from the new date.
    pub async fn update(
        &self,
        id: CompetitionId,
        mut fields: UpdateCompetitionFields,
    ) -> AppResult<CompetitionRecord> {
        if fields.is_empty() {
            return Err(AppError::Validation("no fields to update".to_owned()));
        }

        if let Some(date) = fields.date
            && fields.year.is_none()
        {
            fields.year = Some(date.year());
        }

        self.repository.update(id, fields).await?;
        self.get(id).await
    }

    /// Deletes one competition together with its locations.
    pub async fn delete(&self, id: CompetitionId) -> AppResult<()> {
        self.repository.delete(id).await
    }
}

#[cfg(test)]
mod tests;
