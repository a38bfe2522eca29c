//! In-memory refresh token repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use chirp_core::UserId;
use chirp_core::error::AppError;
use chirp_core::result::AppResult;
use chirp_entity::{RefreshToken, RefreshTokenStatus};

use crate::repositories::RefreshTokenRepository;

/// Refresh token repository held in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRefreshTokenRepository {
    tokens: Arc<DashMap<String, RefreshToken>>,
}

impl InMemoryRefreshTokenRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, revoked ones included.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether no records are stored.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn insert_new(&self, token: &RefreshToken) -> AppResult<()> {
        match self.tokens.entry(token.token_hash.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict("Refresh token already exists")),
            Entry::Vacant(slot) => {
                slot.insert(token.clone());
                Ok(())
            }
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn create(&self, token: &RefreshToken) -> AppResult<()> {
        self.insert_new(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<RefreshToken>> {
        Ok(self.tokens.get(token_hash).map(|token| token.clone()))
    }

    async fn revoke(&self, token_hash: &str, at: DateTime<Utc>) -> AppResult<bool> {
        Ok(self
            .tokens
            .get_mut(token_hash)
            .map(|mut token| token.revoke(at))
            .unwrap_or(false))
    }

    async fn revoke_all_for_user(&self, user_id: UserId, at: DateTime<Utc>) -> AppResult<u64> {
        let mut revoked = 0u64;
        for mut token in self.tokens.iter_mut() {
            if token.user_id == user_id && token.revoke(at) {
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn rotate(
        &self,
        old_hash: &str,
        replacement: &RefreshToken,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        {
            // The shard write lock is held across check-and-revoke.
            let Some(mut old) = self.tokens.get_mut(old_hash) else {
                return Ok(false);
            };
            if old.status_at(at) != RefreshTokenStatus::Active {
                return Ok(false);
            }
            old.revoke(at);
        }
        self.insert_new(replacement)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(hash: &str, user_id: UserId) -> RefreshToken {
        let now = Utc::now();
        RefreshToken::new(hash, user_id, now, now + Duration::days(60))
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryRefreshTokenRepository::new();
        let user = UserId::new();
        repo.create(&record("h1", user)).await.unwrap();

        let found = repo.find_by_hash("h1").await.unwrap().unwrap();
        assert_eq!(found.user_id, user);
        assert!(repo.find_by_hash("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revoke_reports_transition_only_once() {
        let repo = InMemoryRefreshTokenRepository::new();
        repo.create(&record("h1", UserId::new())).await.unwrap();

        assert!(repo.revoke("h1", Utc::now()).await.unwrap());
        assert!(!repo.revoke("h1", Utc::now()).await.unwrap());
        assert!(!repo.revoke("unknown", Utc::now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_revoke_all_only_touches_one_user() {
        let repo = InMemoryRefreshTokenRepository::new();
        let alice = UserId::new();
        let bob = UserId::new();
        repo.create(&record("a1", alice)).await.unwrap();
        repo.create(&record("a2", alice)).await.unwrap();
        repo.create(&record("b1", bob)).await.unwrap();

        assert_eq!(repo.revoke_all_for_user(alice, Utc::now()).await.unwrap(), 2);
        assert!(repo.find_by_hash("a1").await.unwrap().unwrap().is_revoked());
        assert!(!repo.find_by_hash("b1").await.unwrap().unwrap().is_revoked());
    }

    #[tokio::test]
    async fn test_rotate_revokes_old_and_inserts_replacement() {
        let repo = InMemoryRefreshTokenRepository::new();
        let user = UserId::new();
        repo.create(&record("old", user)).await.unwrap();

        assert!(repo.rotate("old", &record("new", user), Utc::now()).await.unwrap());
        assert!(repo.find_by_hash("old").await.unwrap().unwrap().is_revoked());
        assert!(!repo.find_by_hash("new").await.unwrap().unwrap().is_revoked());
    }

    #[tokio::test]
    async fn test_rotate_refuses_inactive_record() {
        let repo = InMemoryRefreshTokenRepository::new();
        let user = UserId::new();
        repo.create(&record("old", user)).await.unwrap();
        repo.revoke("old", Utc::now()).await.unwrap();

        assert!(!repo.rotate("old", &record("new", user), Utc::now()).await.unwrap());
        assert!(repo.find_by_hash("new").await.unwrap().is_none());
        assert!(!repo.rotate("ghost", &record("new", user), Utc::now()).await.unwrap());
    }
}
