//! In-memory user repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use chirp_core::UserId;
use chirp_core::error::AppError;
use chirp_core::result::AppResult;
use chirp_entity::{CreateUser, UpdateCredentials, User};

use crate::repositories::UserRepository;

/// User repository held in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<DashMap<UserId, User>>,
    /// Lowercased email to user id.
    by_email: Arc<DashMap<String, UserId>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no users are stored.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let Some(id) = self.by_email.get(&email_key(email)).map(|entry| *entry) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|user| user.clone()))
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|user| user.clone()))
    }

    async fn create(&self, user: &CreateUser) -> AppResult<User> {
        let now = Utc::now();
        let record = User {
            id: UserId::new(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };

        match self.by_email.entry(email_key(&user.email)) {
            Entry::Occupied(_) => Err(AppError::conflict("Email is already registered")),
            Entry::Vacant(slot) => {
                slot.insert(record.id);
                self.users.insert(record.id, record.clone());
                Ok(record)
            }
        }
    }

    async fn update_credentials(
        &self,
        id: UserId,
        update: &UpdateCredentials,
    ) -> AppResult<Option<User>> {
        let Some(current_email) = self.users.get(&id).map(|user| email_key(&user.email)) else {
            return Ok(None);
        };

        let new_email = email_key(&update.email);
        if new_email != current_email {
            match self.by_email.entry(new_email) {
                Entry::Occupied(_) => return Err(AppError::conflict("Email is already registered")),
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
            self.by_email.remove(&current_email);
        }

        let Some(mut user) = self.users.get_mut(&id) else {
            return Ok(None);
        };
        user.email = update.email.clone();
        user.password_hash = update.password_hash.clone();
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirp_core::error::ErrorKind;

    fn new_user(email: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(&new_user("a@b.com")).await.unwrap();

        let by_email = repo.find_by_email("A@B.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@b.com");
        assert!(repo.find_by_email("nobody@b.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = InMemoryUserRepository::new();
        repo.create(&new_user("a@b.com")).await.unwrap();
        let err = repo.create(&new_user("A@b.com")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_update_credentials_moves_email_index() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(&new_user("old@b.com")).await.unwrap();

        let updated = repo
            .update_credentials(
                user.id,
                &UpdateCredentials {
                    email: "new@b.com".into(),
                    password_hash: "$argon2id$other".into(),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.email, "new@b.com");
        assert!(repo.find_by_email("old@b.com").await.unwrap().is_none());
        assert!(repo.find_by_email("new@b.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_to_taken_email_conflicts() {
        let repo = InMemoryUserRepository::new();
        repo.create(&new_user("taken@b.com")).await.unwrap();
        let user = repo.create(&new_user("me@b.com")).await.unwrap();

        let err = repo
            .update_credentials(
                user.id,
                &UpdateCredentials {
                    email: "taken@b.com".into(),
                    password_hash: "$argon2id$x".into(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let repo = InMemoryUserRepository::new();
        let result = repo
            .update_credentials(
                UserId::new(),
                &UpdateCredentials {
                    email: "x@b.com".into(),
                    password_hash: "h".into(),
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
