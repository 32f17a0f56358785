//! services/api/src/adapters/memory.rs
//!
//! A process-local implementation of the storage ports. Same semantics as the
//! PostgreSQL adapter, including cascading user deletes and ids that are never
//! reused, but nothing survives a restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use selections_core::domain::{
    AuthSession, NewSelection, Selection, SelectionChanges, User, UserCredentials,
};
use selections_core::ports::{AccountStore, PortError, PortResult, SelectionStore};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    last_selection_id: i64,
    selections: BTreeMap<i64, Selection>,
    users: HashMap<Uuid, UserCredentials>,
    auth_sessions: HashMap<String, AuthSession>,
}

/// An in-memory adapter that implements the storage ports.
#[derive(Default)]
pub struct MemoryAdapter {
    tables: RwLock<Tables>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

fn selection_not_found(id: i64) -> PortError {
    PortError::NotFound(format!("Selection {} not found", id))
}

#[async_trait]
impl SelectionStore for MemoryAdapter {
    async fn get(&self, id: i64) -> PortResult<Selection> {
        let tables = self.tables.read().await;
        tables
            .selections
            .get(&id)
            .cloned()
            .ok_or_else(|| selection_not_found(id))
    }

    async fn list(&self) -> PortResult<Vec<Selection>> {
        let tables = self.tables.read().await;
        Ok(tables.selections.values().cloned().collect())
    }

    async fn create(&self, owner: Uuid, new: NewSelection) -> PortResult<Selection> {
        let mut tables = self.tables.write().await;
        // The caller's account was deleted after its session was checked.
        if !tables.users.contains_key(&owner) {
            return Err(PortError::Unauthorized);
        }

        tables.last_selection_id += 1;
        let selection = Selection {
            id: tables.last_selection_id,
            owner,
            pdf_name: new.pdf_name,
            page_number: new.page_number,
            selected_text: new.selected_text,
            coordinates: new.coordinates,
            created_at: Utc::now(),
        };
        tables.selections.insert(selection.id, selection.clone());
        Ok(selection)
    }

    async fn update(&self, id: i64, changes: SelectionChanges) -> PortResult<Selection> {
        let mut tables = self.tables.write().await;
        let selection = tables
            .selections
            .get_mut(&id)
            .ok_or_else(|| selection_not_found(id))?;
        changes.apply_to(selection);
        Ok(selection.clone())
    }

    async fn delete(&self, id: i64) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .selections
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| selection_not_found(id))
    }
}

#[async_trait]
impl AccountStore for MemoryAdapter {
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == email) {
            return Err(PortError::Conflict(format!(
                "A user with email {} already exists",
                email
            )));
        }

        let user_id = Uuid::new_v4();
        tables.users.insert(
            user_id,
            UserCredentials {
                user_id,
                email: email.to_string(),
                hashed_password: hashed_password.to_string(),
            },
        );
        Ok(User {
            user_id,
            email: Some(email.to_string()),
        })
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let tables = self.tables.read().await;
        tables
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))
    }

    async fn delete_user(&self, user_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&user_id).is_none() {
            return Err(PortError::NotFound(format!("User {} not found", user_id)));
        }
        tables.selections.retain(|_, s| s.owner != user_id);
        tables.auth_sessions.retain(|_, s| s.user_id != user_id);
        Ok(())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(PortError::NotFound(format!("User {} not found", user_id)));
        }
        tables.auth_sessions.insert(
            session_id.to_string(),
            AuthSession {
                id: session_id.to_string(),
                user_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let tables = self.tables.read().await;
        match tables.auth_sessions.get(session_id) {
            Some(session) if session.expires_at > Utc::now() => Ok(session.user_id),
            _ => Err(PortError::Unauthorized),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        tables.auth_sessions.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn new_selection(text: &str) -> NewSelection {
        NewSelection {
            pdf_name: "doc.pdf".to_string(),
            page_number: 3,
            selected_text: text.to_string(),
            coordinates: json!({"x": 1, "y": 2}),
        }
    }

    async fn user(store: &MemoryAdapter, email: &str) -> Uuid {
        store.create_user_with_email(email, "hash").await.unwrap().user_id
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let store = MemoryAdapter::new();
        let owner = user(&store, "a@example.com").await;

        let first = store.create(owner, new_selection("one")).await.unwrap();
        let second = store.create(owner, new_selection("two")).await.unwrap();
        store.delete(second.id).await.unwrap();
        let third = store.create(owner, new_selection("three")).await.unwrap();

        assert!(first.id < second.id && second.id < third.id);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = MemoryAdapter::new();
        assert!(matches!(store.get(1).await, Err(PortError::NotFound(_))));
        assert!(matches!(
            store.update(1, SelectionChanges::default()).await,
            Err(PortError::NotFound(_))
        ));
        assert!(matches!(store.delete(1).await, Err(PortError::NotFound(_))));
    }

    #[tokio::test]
    async fn deleting_a_user_cascades() {
        let store = MemoryAdapter::new();
        let gone = user(&store, "gone@example.com").await;
        let kept = user(&store, "kept@example.com").await;
        store.create(gone, new_selection("a")).await.unwrap();
        store.create(gone, new_selection("b")).await.unwrap();
        let survivor = store.create(kept, new_selection("c")).await.unwrap();
        store
            .create_auth_session("s1", gone, Utc::now() + Duration::days(1))
            .await
            .unwrap();

        store.delete_user(gone).await.unwrap();

        assert_eq!(store.list().await.unwrap(), vec![survivor]);
        assert!(matches!(
            store.validate_auth_session("s1").await,
            Err(PortError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn creating_for_a_deleted_owner_is_unauthorized() {
        let store = MemoryAdapter::new();
        let owner = user(&store, "gone@example.com").await;
        store.delete_user(owner).await.unwrap();

        assert!(matches!(
            store.create(owner, new_selection("late")).await,
            Err(PortError::Unauthorized)
        ));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn expired_sessions_do_not_authenticate() {
        let store = MemoryAdapter::new();
        let owner = user(&store, "a@example.com").await;
        store
            .create_auth_session("old", owner, Utc::now() - Duration::seconds(1))
            .await
            .unwrap();
        store
            .create_auth_session("new", owner, Utc::now() + Duration::hours(1))
            .await
            .unwrap();

        assert!(store.validate_auth_session("old").await.is_err());
        assert_eq!(store.validate_auth_session("new").await.unwrap(), owner);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryAdapter::new();
        user(&store, "a@example.com").await;
        assert!(matches!(
            store.create_user_with_email("a@example.com", "hash").await,
            Err(PortError::Conflict(_))
        ));
    }
}
