//! `DbAdapter` against a live PostgreSQL database.
//!
//! Skipped unless `DATABASE_URL` is set. Every test works on users with fresh
//! random emails, so the suite can share a database with other runs.

use api_lib::adapters::DbAdapter;
use chrono::{Duration, Utc};
use selections_core::{
    AccountStore, NewSelection, PortError, SelectionChanges, SelectionStore,
};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

/// Connects and migrates, or returns from the test when `DATABASE_URL` is unset.
macro_rules! db_or_skip {
    () => {{
        let Ok(url) = std::env::var("DATABASE_URL") else {
            println!("SKIP — set DATABASE_URL to run the PostgreSQL adapter tests");
            return;
        };
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("DATABASE_URL is set but the database is unreachable");
        let db = DbAdapter::new(pool);
        db.run_migrations().await.expect("migrations failed");
        db
    }};
}

async fn user(db: &DbAdapter) -> Uuid {
    let email = format!("{}@example.com", Uuid::new_v4());
    db.create_user_with_email(&email, "hash")
        .await
        .unwrap()
        .user_id
}

fn new_selection(text: &str) -> NewSelection {
    NewSelection {
        pdf_name: "doc.pdf".to_string(),
        page_number: 3,
        selected_text: text.to_string(),
        coordinates: json!({"x": 1, "y": 2}),
    }
}

#[tokio::test]
async fn partial_update_keeps_the_stored_columns() {
    let db = db_or_skip!();
    let owner = user(&db).await;
    let created = db.create(owner, new_selection("hello")).await.unwrap();

    let changes = SelectionChanges {
        selected_text: Some("goodbye".to_string()),
        ..SelectionChanges::default()
    };
    let updated = db.update(created.id, changes).await.unwrap();

    assert_eq!(updated.selected_text, "goodbye");
    assert_eq!(updated.pdf_name, created.pdf_name);
    assert_eq!(updated.page_number, created.page_number);
    assert_eq!(updated.coordinates, created.coordinates);
    assert_eq!(updated.owner, owner);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(db.get(created.id).await.unwrap(), updated);

    let replaced = db
        .update(
            created.id,
            SelectionChanges {
                coordinates: Some(json!([10, 20])),
                page_number: Some(7),
                ..SelectionChanges::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(replaced.coordinates, json!([10, 20]));
    assert_eq!(replaced.page_number, 7);
    assert_eq!(replaced.selected_text, "goodbye");
}

#[tokio::test]
async fn missing_ids_are_not_found() {
    let db = db_or_skip!();
    let owner = user(&db).await;
    let created = db.create(owner, new_selection("short-lived")).await.unwrap();
    db.delete(created.id).await.unwrap();

    assert!(matches!(db.get(created.id).await, Err(PortError::NotFound(_))));
    assert!(matches!(
        db.update(created.id, SelectionChanges::default()).await,
        Err(PortError::NotFound(_))
    ));
    assert!(matches!(db.delete(created.id).await, Err(PortError::NotFound(_))));

    let next = db.create(owner, new_selection("next")).await.unwrap();
    assert!(next.id > created.id);
}

#[tokio::test]
async fn deleting_a_user_cascades_to_selections_and_sessions() {
    let db = db_or_skip!();
    let gone = user(&db).await;
    let kept = user(&db).await;
    db.create(gone, new_selection("a")).await.unwrap();
    db.create(gone, new_selection("b")).await.unwrap();
    let survivor = db.create(kept, new_selection("c")).await.unwrap();
    let session = Uuid::new_v4().to_string();
    db.create_auth_session(&session, gone, Utc::now() + Duration::days(1))
        .await
        .unwrap();
    assert_eq!(db.validate_auth_session(&session).await.unwrap(), gone);

    db.delete_user(gone).await.unwrap();

    let remaining = db.list().await.unwrap();
    assert!(remaining.iter().all(|s| s.owner != gone));
    assert!(remaining.contains(&survivor));
    assert!(matches!(
        db.validate_auth_session(&session).await,
        Err(PortError::Unauthorized)
    ));
    assert!(matches!(
        db.create(gone, new_selection("late")).await,
        Err(PortError::Unauthorized)
    ));
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let db = db_or_skip!();
    let email = format!("{}@example.com", Uuid::new_v4());
    db.create_user_with_email(&email, "hash").await.unwrap();

    assert!(matches!(
        db.create_user_with_email(&email, "hash").await,
        Err(PortError::Conflict(_))
    ));
}
