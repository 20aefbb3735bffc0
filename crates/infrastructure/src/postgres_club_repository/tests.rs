use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use registar_application::{ClubRepository, CreateClubInput, UpdateClubFields};
use registar_core::AppError;
use registar_domain::{ClubId, PersonId};

use super::PostgresClubRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres club tests: {error}");
    }

    Some(pool)
}

static ICO_COUNTER: AtomicU32 = AtomicU32::new(0);

fn unique_ico() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    let count = ICO_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!(
        "{:08}",
        nanos.wrapping_add(count.wrapping_mul(7919)) % 100_000_000
    )
}

async fn any_city_id(pool: &PgPool) -> i32 {
    let city = sqlx::query_scalar::<_, i32>("SELECT id FROM city ORDER BY id LIMIT 1")
        .fetch_optional(pool)
        .await;
    match city {
        Ok(Some(id)) => id,
        Ok(None) => panic!("city seed migration did not run"),
        Err(error) => panic!("failed to look up a seeded city: {error}"),
    }
}

async fn seed_person(pool: &PgPool, first_name: &str, last_name: &str) -> PersonId {
    let id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO person (first_name, last_name, birth_date, gender)
        VALUES ($1, $2, '1985-03-12', 'male')
        RETURNING id
        "#,
    )
    .bind(first_name)
    .bind(last_name)
    .fetch_one(pool)
    .await;

    match id {
        Ok(id) => PersonId::from_i32(id),
        Err(error) => panic!("failed to seed a person: {error}"),
    }
}

async fn person_club_id(pool: &PgPool, person_id: PersonId) -> Option<i32> {
    let club_id =
        sqlx::query_scalar::<_, Option<i32>>("SELECT club_id FROM person WHERE id = $1")
            .bind(person_id.as_i32())
            .fetch_one(pool)
            .await;
    match club_id {
        Ok(club_id) => club_id,
        Err(error) => panic!("failed to read back person {person_id}: {error}"),
    }
}

fn club_input(city_id: i32, ico: String, chairman_id: Option<PersonId>) -> CreateClubInput {
    CreateClubInput {
        name: "TJ Sokol".to_owned(),
        city_id,
        street: "Hlavná 1".to_owned(),
        postal: "01001".to_owned(),
        ico,
        email: Some("klub@example.com".to_owned()),
        phone: None,
        chairman_id,
    }
}

#[tokio::test]
async fn creating_a_club_assigns_the_chairman_back_reference() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresClubRepository::new(pool.clone());

    let city_id = any_city_id(&pool).await;
    let chairman = seed_person(&pool, "Peter", "Predseda").await;

    let created = repository
        .create_many(&[club_input(city_id, unique_ico(), Some(chairman))])
        .await;
    assert!(created.is_ok());
    let created = created.unwrap_or_else(|_| unreachable!());
    assert_eq!(created.len(), 1);

    assert_eq!(
        person_club_id(&pool, chairman).await,
        Some(created[0].as_i32()),
        "chairman's club membership must be updated in the same operation"
    );

    let fetched = repository.find_by_id(created[0]).await;
    assert!(fetched.is_ok_and(|club| {
        club.is_some_and(|club| {
            club.chairman
                .as_ref()
                .is_some_and(|chairman_record| chairman_record.id == chairman)
        })
    }));
}

#[tokio::test]
async fn duplicate_ico_is_reported_as_a_conflict() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresClubRepository::new(pool.clone());

    let city_id = any_city_id(&pool).await;
    let ico = unique_ico();

    let first = repository
        .create_many(&[club_input(city_id, ico.clone(), None)])
        .await;
    assert!(first.is_ok());

    let second = repository.create_many(&[club_input(city_id, ico, None)]).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn bulk_insert_rolls_back_when_one_element_fails() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresClubRepository::new(pool.clone());

    let city_id = any_city_id(&pool).await;
    let first_ico = unique_ico();
    let broken = club_input(i32::MAX, unique_ico(), None);

    let result = repository
        .create_many(&[club_input(city_id, first_ico.clone(), None), broken])
        .await;
    assert!(result.is_err());

    let persisted = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM club WHERE ico = $1")
        .bind(first_ico.as_str())
        .fetch_one(&pool)
        .await;
    assert_eq!(
        persisted.ok(),
        Some(0),
        "no row of a failed batch may survive"
    );
}

#[tokio::test]
async fn missing_club_is_absent_not_an_error() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresClubRepository::new(pool);

    let fetched = repository.find_by_id(ClubId::from_i32(0)).await;
    assert!(matches!(fetched, Ok(None)));
}

#[tokio::test]
async fn reassigning_the_chairman_updates_the_new_chairmans_membership() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresClubRepository::new(pool.clone());

    let city_id = any_city_id(&pool).await;
    let first_chairman = seed_person(&pool, "Prvý", "Predseda").await;
    let second_chairman = seed_person(&pool, "Druhý", "Predseda").await;

    let created = repository
        .create_many(&[club_input(city_id, unique_ico(), Some(first_chairman))])
        .await;
    assert!(created.is_ok());
    let club_id = created.unwrap_or_else(|_| unreachable!())[0];

    let updated = repository
        .update(
            club_id,
            UpdateClubFields {
                chairman_id: Some(second_chairman),
                ..UpdateClubFields::default()
            },
        )
        .await;
    assert!(updated.is_ok());

    assert_eq!(
        person_club_id(&pool, second_chairman).await,
        Some(club_id.as_i32())
    );
}

#[tokio::test]
async fn updating_a_missing_club_is_not_found() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresClubRepository::new(pool);

    let result = repository
        .update(
            ClubId::from_i32(0),
            UpdateClubFields {
                name: Some("Nowhere".to_owned()),
                ..UpdateClubFields::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
