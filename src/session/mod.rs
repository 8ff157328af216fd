//! Persisted authentication state.
//!
//! The console keeps exactly two values between runs: the bearer token and the
//! profile returned at login. Both live behind a [`SessionStore`] and are only
//! touched through a [`SessionContext`], which is handed to whatever needs it.

pub mod file;
pub mod memory;

use std::sync::Arc;

use crate::error::Result;
use crate::models::UserProfile;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const USER_KEY: &str = "user";

/// Key/value backing storage for the session.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Token plus cached profile, as read back from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub user: Option<UserProfile>,
}

#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::default()))
    }

    /// Stores the token and the serialized profile. Expiry is never tracked
    /// locally; the gateway finds out when the backend answers 401.
    pub fn save_auth(&self, access: &str, user: &UserProfile) -> Result<()> {
        let raw_user = serde_json::to_string(user)?;
        self.store.set(ACCESS_TOKEN_KEY, access)?;
        self.store.set(USER_KEY, &raw_user)?;
        tracing::debug!(user = %user.username, "session saved");
        Ok(())
    }

    /// Replaces only the access token, keeping the cached profile.
    pub fn replace_token(&self, access: &str) -> Result<()> {
        self.store.set(ACCESS_TOKEN_KEY, access)
    }

    pub fn clear_auth(&self) -> Result<()> {
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        tracing::debug!("session cleared");
        Ok(())
    }

    /// Stored bearer token. Unreadable storage counts as logged out.
    pub fn token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    /// Cached profile, or `None` when it is missing or does not parse.
    pub fn stored_user(&self) -> Option<UserProfile> {
        let raw = self.read(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("ignoring corrupt stored profile: {}", e);
                None
            }
        }
    }

    pub fn load(&self) -> Option<Session> {
        let access_token = self.token()?;
        Some(Session {
            access_token,
            user: self.stored_user(),
        })
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, "session storage unreadable: {}", e);
                None
            }
        }
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.has_token())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn profile() -> UserProfile {
        UserProfile {
            id: 7,
            username: "jtapia".into(),
            first_name: "Juan".into(),
            last_name: "Tapia".into(),
            email: Some("jtapia@kvc.cl".into()),
            is_active: true,
            roles: vec![Role {
                id: 2,
                nombre: "Responsable TI".into(),
                slug: "resp_ti".into(),
                descripcion: "Soporte".into(),
            }],
        }
    }

    #[test]
    fn saved_profile_reads_back_equal() {
        let session = SessionContext::in_memory();
        let user = profile();
        session.save_auth("tok-123", &user).unwrap();

        assert_eq!(session.stored_user(), Some(user.clone()));
        assert_eq!(
            session.load(),
            Some(Session {
                access_token: "tok-123".into(),
                user: Some(user)
            })
        );
    }

    #[test]
    fn clear_removes_everything() {
        let session = SessionContext::in_memory();
        session.save_auth("tok-123", &profile()).unwrap();
        session.clear_auth().unwrap();

        assert!(session.stored_user().is_none());
        assert!(session.token().is_none());
        assert!(session.load().is_none());
    }

    #[test]
    fn clear_on_empty_store_is_fine() {
        let session = SessionContext::in_memory();
        session.clear_auth().unwrap();
        assert!(!session.has_token());
    }

    #[test]
    fn corrupt_profile_is_treated_as_absent() {
        let store = Arc::new(MemorySessionStore::default());
        store.set(ACCESS_TOKEN_KEY, "tok").unwrap();
        store.set(USER_KEY, "{not json").unwrap();
        let session = SessionContext::new(store);

        assert!(session.has_token());
        assert!(session.stored_user().is_none());
        assert_eq!(session.load().map(|s| s.user), Some(None));
    }

    #[test]
    fn replace_token_keeps_profile() {
        let session = SessionContext::in_memory();
        session.save_auth("old", &profile()).unwrap();
        session.replace_token("new").unwrap();

        assert_eq!(session.token().as_deref(), Some("new"));
        assert_eq!(session.stored_user(), Some(profile()));
    }
}
