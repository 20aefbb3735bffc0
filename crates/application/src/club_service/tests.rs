use std::sync::Arc;

use async_trait::async_trait;
use registar_core::{AppError, AppResult};
use registar_domain::{ClubId, PersonId};
use tokio::sync::Mutex;

use super::{ClubRecord, ClubRepository, ClubService, CreateClubInput, UpdateClubFields};

#[derive(Default)]
struct RecordingRepository {
    list_orders: Mutex<Vec<&'static str>>,
    created: Mutex<Vec<CreateClubInput>>,
    updates: Mutex<Vec<ClubId>>,
}

#[async_trait]
impl ClubRepository for RecordingRepository {
    async fn list(&self, order_by: &'static str) -> AppResult<Vec<ClubRecord>> {
        self.list_orders.lock().await.push(order_by);
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: ClubId) -> AppResult<Option<ClubRecord>> {
        Ok(None)
    }

    async fn create_many(&self, clubs: &[CreateClubInput]) -> AppResult<Vec<ClubId>> {
        let mut created = self.created.lock().await;
        let start = i32::try_from(created.len()).map_err(|_| {
            AppError::Internal("fake repository overflow".to_owned())
        })?;
        created.extend(clubs.iter().cloned());
        Ok((0..clubs.len())
            .map(|offset| ClubId::from_i32(start + 1 + offset as i32))
            .collect())
    }

    async fn update(&self, id: ClubId, _fields: UpdateClubFields) -> AppResult<()> {
        self.updates.lock().await.push(id);
        Ok(())
    }

    async fn delete(&self, _id: ClubId) -> AppResult<()> {
        Ok(())
    }
}

fn sample_input() -> CreateClubInput {
    CreateClubInput {
        name: "TJ Sokol".to_owned(),
        city_id: 5,
        street: "Hlavná 1".to_owned(),
        postal: "01001".to_owned(),
        ico: "12345678".to_owned(),
        email: None,
        phone: None,
        chairman_id: Some(PersonId::from_i32(7)),
    }
}

fn service() -> (ClubService, Arc<RecordingRepository>) {
    let repository = Arc::new(RecordingRepository::default());
    (ClubService::new(repository.clone()), repository)
}

#[tokio::test]
async fn listing_without_sort_key_uses_default_column() {
    let (service, repository) = service();
    let listed = service.list(None).await;
    assert!(listed.is_ok());
    assert_eq!(*repository.list_orders.lock().await, vec!["club.name"]);
}

#[tokio::test]
async fn unknown_sort_key_is_rejected_before_the_store() {
    let (service, repository) = service();
    let listed = service.list(Some("street")).await;
    assert!(matches!(listed, Err(AppError::Validation(_))));
    assert!(repository.list_orders.lock().await.is_empty());
}

#[tokio::test]
async fn missing_club_maps_to_not_found() {
    let (service, _) = service();
    let fetched = service.get(ClubId::from_i32(99)).await;
    assert!(matches!(fetched, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn bulk_create_returns_one_id_per_element() {
    let (service, _) = service();
    let mut second = sample_input();
    second.ico = "87654321".to_owned();

    let ids = service.create_many(vec![sample_input(), second]).await;
    assert_eq!(
        ids.ok().map(|ids| ids.len()),
        Some(2),
        "both elements should be inserted"
    );
}

#[tokio::test]
async fn invalid_bulk_element_reports_its_position_and_inserts_nothing() {
    let (service, repository) = service();
    let mut second = sample_input();
    second.ico = "not-an-ico".to_owned();

    let result = service.create_many(vec![sample_input(), second]).await;
    let message = result
        .map_err(|error| error.to_string())
        .err()
        .unwrap_or_default();
    assert!(message.contains("position 2"), "got: {message}");
    assert!(repository.created.lock().await.is_empty());
}

#[tokio::test]
async fn empty_bulk_create_is_a_no_op() {
    let (service, repository) = service();
    let ids = service.create_many(Vec::new()).await;
    assert_eq!(ids.ok().map(|ids| ids.len()), Some(0));
    assert!(repository.created.lock().await.is_empty());
}

#[tokio::test]
async fn empty_update_is_rejected_before_the_store() {
    let (service, repository) = service();
    let result = service
        .update(ClubId::from_i32(1), UpdateClubFields::default())
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(repository.updates.lock().await.is_empty());
}

#[tokio::test]
async fn update_with_invalid_ico_is_rejected_before_the_store() {
    let (service, repository) = service();
    let fields = UpdateClubFields {
        ico: Some("123".to_owned()),
        ..UpdateClubFields::default()
    };
    let result = service.update(ClubId::from_i32(1), fields).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(repository.updates.lock().await.is_empty());
}
