use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use registar_application::{
    CreatePersonInput, NewContact, PersonRepository, UpdatePersonFields,
};
use registar_core::AppError;
use registar_domain::{ClubId, ContactType, Gender, PersonId};

use super::PostgresPersonRepository;

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
        panic!("failed to run migrations for postgres person tests: {error}");
    }

    Some(pool)
}

static NAME_COUNTER: AtomicU32 = AtomicU32::new(0);

fn unique_last_name() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    let count = NAME_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("Vzperac{}", nanos.wrapping_add(count.wrapping_mul(7919)))
}

fn person_input(last_name: &str, club_id: Option<ClubId>) -> CreatePersonInput {
    CreatePersonInput {
        first_name: "Peter".to_owned(),
        last_name: last_name.to_owned(),
        birth_date: NaiveDate::from_ymd_opt(1992, 8, 30).unwrap_or_default(),
        gender: Gender::Male,
        club_id,
        contacts: vec![
            NewContact {
                contact_type: ContactType::Email,
                contact_value: format!("{}@example.com", last_name.to_lowercase()),
            },
            NewContact {
                contact_type: ContactType::Phone,
                contact_value: "+421900123456".to_owned(),
            },
        ],
    }
}

#[tokio::test]
async fn created_person_carries_generated_contact_rows_in_order() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresPersonRepository::new(pool);

    let created = repository
        .create_many(&[person_input(&unique_last_name(), None)])
        .await;
    assert!(created.is_ok());
    let created = created.unwrap_or_else(|_| unreachable!());
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].contacts.len(), 2);
    assert_eq!(created[0].contacts[0].contact_type, ContactType::Email);
    assert_eq!(created[0].contacts[1].contact_type, ContactType::Phone);
}

#[tokio::test]
async fn bulk_insert_rolls_back_when_one_element_fails() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresPersonRepository::new(pool.clone());

    let surviving_name = unique_last_name();
    let broken = person_input(&unique_last_name(), Some(ClubId::from_i32(i32::MAX)));

    let result = repository
        .create_many(&[person_input(&surviving_name, None), broken])
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let persisted =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM person WHERE last_name = $1")
            .bind(surviving_name.as_str())
            .fetch_one(&pool)
            .await;
    assert_eq!(
        persisted.ok(),
        Some(0),
        "no row of a failed batch may survive"
    );
}

#[tokio::test]
async fn deleting_a_person_removes_their_contacts() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresPersonRepository::new(pool.clone());

    let created = repository
        .create_many(&[person_input(&unique_last_name(), None)])
        .await;
    assert!(created.is_ok());
    let person_id = created.unwrap_or_else(|_| unreachable!())[0].id;

    assert!(repository.delete(person_id).await.is_ok());

    let orphaned = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM person_contact WHERE person_id = $1",
    )
    .bind(person_id.as_i32())
    .fetch_one(&pool)
    .await;
    assert_eq!(orphaned.ok(), Some(0), "contacts must cascade with the person");
}

#[tokio::test]
async fn contact_replacement_swaps_the_whole_set() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresPersonRepository::new(pool);

    let created = repository
        .create_many(&[person_input(&unique_last_name(), None)])
        .await;
    assert!(created.is_ok());
    let person_id = created.unwrap_or_else(|_| unreachable!())[0].id;

    let replaced = repository
        .update(
            person_id,
            UpdatePersonFields::default(),
            Some(vec![NewContact {
                contact_type: ContactType::Phone,
                contact_value: "+421905999888".to_owned(),
            }]),
        )
        .await;
    assert!(replaced.is_ok());

    let fetched = repository.find_by_id(person_id).await;
    assert!(fetched.is_ok());
    let record = fetched.unwrap_or_else(|_| unreachable!());
    assert!(record.is_some_and(|record| {
        record.contacts.len() == 1
            && record.contacts[0].contact_value == "+421905999888"
    }));
}

#[tokio::test]
async fn missing_person_is_absent_not_an_error() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresPersonRepository::new(pool);

    let fetched = repository.find_by_id(PersonId::from_i32(0)).await;
    assert!(matches!(fetched, Ok(None)));
}
