//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `SelectionStore` and `AccountStore` ports from the `core` crate. It handles
//! all interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use selections_core::domain::{NewSelection, Selection, SelectionChanges, User, UserCredentials};
use selections_core::ports::{AccountStore, PortError, PortResult, SelectionStore};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the storage ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

const SELECTION_COLUMNS: &str =
    "id, owner_id, pdf_name, page_number, selected_text, coordinates, created_at";

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct SelectionRecord {
    id: i64,
    owner_id: Uuid,
    pdf_name: String,
    page_number: i32,
    selected_text: String,
    coordinates: Json<Value>,
    created_at: DateTime<Utc>,
}
impl SelectionRecord {
    fn to_domain(self) -> Selection {
        Selection {
            id: self.id,
            owner: self.owner_id,
            pdf_name: self.pdf_name,
            page_number: self.page_number,
            selected_text: self.selected_text,
            coordinates: self.coordinates.0,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
    email: Option<String>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
            email: self.email,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    user_id: Uuid,
    email: String,
    hashed_password: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.user_id,
            email: self.email,
            hashed_password: self.hashed_password,
        }
    }
}

//=========================================================================================
// `SelectionStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl SelectionStore for DbAdapter {
    async fn get(&self, id: i64) -> PortResult<Selection> {
        let record = sqlx::query_as::<_, SelectionRecord>(&format!(
            "SELECT {SELECTION_COLUMNS} FROM selections WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Selection {} not found", id)))?;
        Ok(record.to_domain())
    }

    async fn list(&self) -> PortResult<Vec<Selection>> {
        let records = sqlx::query_as::<_, SelectionRecord>(&format!(
            "SELECT {SELECTION_COLUMNS} FROM selections ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn create(&self, owner: Uuid, new: NewSelection) -> PortResult<Selection> {
        let record = sqlx::query_as::<_, SelectionRecord>(&format!(
            "INSERT INTO selections (owner_id, pdf_name, page_number, selected_text, coordinates) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {SELECTION_COLUMNS}"
        ))
        .bind(owner)
        .bind(&new.pdf_name)
        .bind(new.page_number)
        .bind(&new.selected_text)
        .bind(Json(&new.coordinates))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            // The owner's account is gone, so the caller's session no longer counts.
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                PortError::Unauthorized
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn update(&self, id: i64, changes: SelectionChanges) -> PortResult<Selection> {
        // NULL parameters keep the stored column.
        let record = sqlx::query_as::<_, SelectionRecord>(&format!(
            "UPDATE selections SET \
                pdf_name = COALESCE($2, pdf_name), \
                page_number = COALESCE($3, page_number), \
                selected_text = COALESCE($4, selected_text), \
                coordinates = COALESCE($5, coordinates) \
             WHERE id = $1 RETURNING {SELECTION_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.pdf_name)
        .bind(changes.page_number)
        .bind(changes.selected_text)
        .bind(changes.coordinates.map(Json))
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Selection {} not found", id)))?;
        Ok(record.to_domain())
    }

    async fn delete(&self, id: i64) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM selections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Selection {} not found", id)));
        }
        Ok(())
    }
}

//=========================================================================================
// `AccountStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl AccountStore for DbAdapter {
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (user_id, email, hashed_password) VALUES ($1, $2, $3) \
             RETURNING user_id, email",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                PortError::Conflict(format!("A user with email {} already exists", email))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT user_id, email, hashed_password FROM users \
             WHERE email = $1 AND hashed_password IS NOT NULL",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))?;
        Ok(record.to_domain())
    }

    async fn delete_user(&self, user_id: Uuid) -> PortResult<()> {
        // Selections and auth sessions go with it via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let user_id: Option<Uuid> = sqlx::query_scalar(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > now()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        user_id.ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }
}
