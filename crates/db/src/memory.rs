//! In-memory [`AuthStore`] double for service-level tests.
//!
//! Enforces the same uniqueness semantics as the Postgres store: the
//! conflict check and the insert happen under one lock, so there is no
//! check-then-insert window.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::session::{CreateSession, Session};
use crate::models::user::{CreateUser, User};
use crate::store::{AuthStore, StoreError};

#[derive(Default)]
struct Inner {
    users: HashMap<String, User>,
    sessions: HashMap<Uuid, Session>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a session's revocation flag, standing in for the administrative
    /// block path so tests can exercise blocked-session renewal.
    pub fn block_session(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let session = inner.sessions.get_mut(&id).ok_or(StoreError::NotFound)?;
        session.is_blocked = true;
        Ok(())
    }
}

#[async_trait]
impl AuthStore for MemoryStore {
    async fn create_user(&self, input: CreateUser) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let duplicate = inner.users.contains_key(&input.username)
            || inner.users.values().any(|u| u.email == input.email);
        if duplicate {
            return Err(StoreError::Conflict);
        }

        let now = Utc::now();
        let user = User {
            username: input.username.clone(),
            hashed_password: input.hashed_password,
            full_name: input.full_name,
            email: input.email,
            password_changed_at: now,
            created_at: now,
        };
        inner.users.insert(input.username, user.clone());
        Ok(user)
    }

    async fn get_user(&self, username: &str) -> Result<User, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner.users.get(username).cloned().ok_or(StoreError::NotFound)
    }

    async fn create_session(&self, input: CreateSession) -> Result<Session, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.sessions.contains_key(&input.id) {
            return Err(StoreError::Conflict);
        }

        let session = Session {
            id: input.id,
            username: input.username,
            refresh_token: input.refresh_token,
            user_agent: input.user_agent,
            client_ip: input.client_ip,
            is_blocked: input.is_blocked,
            expires_at: input.expires_at,
            created_at: Utc::now(),
        };
        inner.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: Uuid) -> Result<Session, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner.sessions.get(&id).cloned().ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn user_input(username: &str, email: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            hashed_password: "$argon2id$fake".to_string(),
            full_name: "Test User".to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryStore::new();
        store.create_user(user_input("alice", "alice@bank.test")).await.unwrap();

        let result = store.create_user(user_input("alice", "other@bank.test")).await;
        assert_matches!(result, Err(StoreError::Conflict));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.create_user(user_input("alice", "alice@bank.test")).await.unwrap();

        let result = store.create_user(user_input("bob", "alice@bank.test")).await;
        assert_matches!(result, Err(StoreError::Conflict));
    }

    #[tokio::test]
    async fn test_distinct_users_both_succeed() {
        let store = MemoryStore::new();
        store.create_user(user_input("alice", "alice@bank.test")).await.unwrap();
        store.create_user(user_input("bob", "bob@bank.test")).await.unwrap();

        assert_eq!(store.get_user("alice").await.unwrap().username, "alice");
        assert_eq!(store.get_user("bob").await.unwrap().username, "bob");
    }

    #[tokio::test]
    async fn test_missing_records_are_not_found() {
        let store = MemoryStore::new();
        assert_matches!(store.get_user("ghost").await, Err(StoreError::NotFound));
        assert_matches!(
            store.get_session(Uuid::new_v4()).await,
            Err(StoreError::NotFound)
        );
    }
}
