use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use registar_core::{AppError, AppResult};
use registar_domain::{ClubId, CompetitionId, LeagueId};
use tokio::sync::Mutex;

use super::{
    CompetitionRecord, CompetitionRepository, CompetitionRow, CompetitionSearchInput,
    CompetitionService, CreateCompetitionInput, LocationRecord, NewLocation,
    UpdateCompetitionFields, group_competition_rows,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn row(competition: i32, location: Option<(i32, &str)>) -> CompetitionRow {
    CompetitionRow {
        id: CompetitionId::from_i32(competition),
        year: 2025,
        round: 1,
        date: date(2025, 5, 17),
        league_id: LeagueId::from_i32(1),
        league: "Extraliga".to_owned(),
        location: location.map(|(id, group_label)| LocationRecord {
            id,
            group_label: group_label.to_owned(),
            city: "Trenčín".to_owned(),
            club_id: ClubId::from_i32(2),
        }),
    }
}

#[test]
fn grouping_preserves_first_seen_order_on_both_levels() {
    let rows = vec![
        row(1, Some((10, "A"))),
        row(1, Some((11, "B"))),
        row(2, Some((12, "C"))),
    ];

    let grouped = group_competition_rows(rows);

    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[0].id, CompetitionId::from_i32(1));
    let first_groups: Vec<&str> = grouped[0]
        .locations
        .iter()
        .map(|location| location.group_label.as_str())
        .collect();
    assert_eq!(first_groups, vec!["A", "B"]);
    assert_eq!(grouped[1].id, CompetitionId::from_i32(2));
    let second_groups: Vec<&str> = grouped[1]
        .locations
        .iter()
        .map(|location| location.group_label.as_str())
        .collect();
    assert_eq!(second_groups, vec!["C"]);
}

#[test]
fn grouping_handles_interleaved_competitions() {
    let rows = vec![
        row(2, Some((20, "B1"))),
        row(1, Some((10, "A1"))),
        row(2, Some((21, "B2"))),
    ];

    let grouped = group_competition_rows(rows);

    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[0].id, CompetitionId::from_i32(2));
    assert_eq!(grouped[0].locations.len(), 2);
    assert_eq!(grouped[1].locations.len(), 1);
}

#[test]
fn competition_without_location_rows_keeps_an_empty_list() {
    let grouped = group_competition_rows(vec![row(7, None)]);
    assert_eq!(grouped.len(), 1);
    assert!(grouped[0].locations.is_empty());
}

#[derive(Default)]
struct RecordingRepository {
    created_years: Mutex<Vec<i32>>,
    updates: Mutex<Vec<UpdateCompetitionFields>>,
}

#[async_trait]
impl CompetitionRepository for RecordingRepository {
    async fn list(&self, _order_by: &'static str) -> AppResult<Vec<CompetitionRow>> {
        Ok(Vec::new())
    }

    async fn search(&self, _search: &CompetitionSearchInput) -> AppResult<Vec<CompetitionRow>> {
        Ok(Vec::new())
    }

    async fn rows_by_id(&self, id: CompetitionId) -> AppResult<Vec<CompetitionRow>> {
        Ok(vec![row(id.as_i32(), Some((1, "A")))])
    }

    async fn create(
        &self,
        _input: &CreateCompetitionInput,
        year: i32,
    ) -> AppResult<CompetitionId> {
        self.created_years.lock().await.push(year);
        Ok(CompetitionId::from_i32(1))
    }

    async fn update(
        &self,
        _id: CompetitionId,
        fields: UpdateCompetitionFields,
    ) -> AppResult<()> {
        self.updates.lock().await.push(fields);
        Ok(())
    }

    async fn delete(&self, _id: CompetitionId) -> AppResult<()> {
        Ok(())
    }
}

fn sample_input() -> CreateCompetitionInput {
    CreateCompetitionInput {
        league_id: LeagueId::from_i32(1),
        round: 2,
        date: date(2025, 5, 17),
        locations: vec![NewLocation {
            group_label: "A".to_owned(),
            city: String::new(),
            club_id: ClubId::from_i32(3),
        }],
    }
}

fn service() -> (CompetitionService, Arc<RecordingRepository>) {
    let repository = Arc::new(RecordingRepository::default());
    (CompetitionService::new(repository.clone()), repository)
}

#[tokio::test]
async fn create_derives_the_season_year_from_the_date() {
    let (service, repository) = service();
    assert!(service.create(sample_input()).await.is_ok());
    assert_eq!(*repository.created_years.lock().await, vec![2025]);
}

#[tokio::test]
async fn create_without_locations_is_rejected() {
    let (service, repository) = service();
    let mut input = sample_input();
    input.locations.clear();

    let result = service.create(input).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(repository.created_years.lock().await.is_empty());
}

#[tokio::test]
async fn date_update_re_derives_the_year_when_not_supplied() {
    let (service, repository) = service();
    let fields = UpdateCompetitionFields {
        date: Some(date(2026, 2, 7)),
        ..UpdateCompetitionFields::default()
    };

    let updated: AppResult<CompetitionRecord> =
        service.update(CompetitionId::from_i32(1), fields).await;
    assert!(updated.is_ok());

    let updates = repository.updates.lock().await;
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].year, Some(2026));
}

#[tokio::test]
async fn empty_competition_update_is_rejected() {
    let (service, repository) = service();
    let result = service
        .update(CompetitionId::from_i32(1), UpdateCompetitionFields::default())
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(repository.updates.lock().await.is_empty());
}
