use anyhow::Result;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::common::UserId;

/// Session token (random UUID)
pub type SessionToken = String;

/// Session data stored after a successful login.
///
/// Only the user id is held; role and confirmation state are loaded fresh
/// from the store per request so promotions take effect immediately.
#[derive(Clone, Debug)]
pub struct Session {
    pub user_id: UserId,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// In-memory session store
///
/// Sessions expire after 24 hours
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionToken, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a new session and return the token
    pub async fn create_session(&self, user_id: UserId) -> SessionToken {
        let token = Uuid::new_v4().to_string();
        let session = Session {
            user_id,
            created_at: chrono::Utc::now(),
        };
        let mut sessions = self.sessions.write().await;
        sessions.insert(token.clone(), session);
        token
    }

    /// Get session by token
    pub async fn get_session(&self, token: &str) -> Option<Session> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(token)?;

        // Check if session is expired (24 hours)
        let now = chrono::Utc::now();
        let elapsed = now.signed_duration_since(session.created_at);
        if elapsed.num_hours() >= 24 {
            return None;
        }

        Some(session.clone())
    }

    /// Delete session (logout)
    pub async fn delete_session(&self, token: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token);
        Ok(())
    }

    /// Clean up expired sessions (run periodically)
    pub async fn cleanup_expired(&self) {
        let mut sessions = self.sessions.write().await;
        let now = chrono::Utc::now();

        sessions.retain(|_, session| {
            let elapsed = now.signed_duration_since(session.created_at);
            elapsed.num_hours() < 24
        });
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Salted password digest, stored as `salt$hex`.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let digest = digest_with_salt(&salt, password);
    format!("{salt}${digest}")
}

/// Constant-shape verify against a stored `salt$hex` digest.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, digest)) = stored.split_once('$') else {
        return false;
    };
    digest_with_salt(salt, password) == digest
}

fn digest_with_salt(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_creation() {
        let store = SessionStore::new();
        let user_id = UserId::new();

        let token = store.create_session(user_id).await;
        assert!(!token.is_empty());

        let retrieved = store.get_session(&token).await;
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().user_id, user_id);
    }

    #[tokio::test]
    async fn test_session_expiration() {
        let store = SessionStore::new();
        let user_id = UserId::new();
        let token = store.create_session(user_id).await;

        // Backdate the session past the expiry window
        {
            let mut sessions = store.sessions.write().await;
            let session = sessions.get_mut(&token).unwrap();
            session.created_at = chrono::Utc::now() - chrono::Duration::hours(25);
        }

        let retrieved = store.get_session(&token).await;
        assert!(retrieved.is_none(), "Expired session should return None");
    }

    #[tokio::test]
    async fn test_logout_removes_session() {
        let store = SessionStore::new();
        let token = store.create_session(UserId::new()).await;
        store.delete_session(&token).await.unwrap();
        assert!(store.get_session(&token).await.is_none());
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let stored = hash_password("hunter2-but-longer");
        assert!(verify_password("hunter2-but-longer", &stored));
        assert!(!verify_password("wrong", &stored));
    }

    #[test]
    fn test_password_hash_salted() {
        let a = hash_password("same-password");
        let b = hash_password("same-password");
        assert_ne!(a, b, "Salts should differ per hash");
    }
}
