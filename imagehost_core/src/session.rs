use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rand::distr::{Alphanumeric, SampleString};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::entity::user;

/// Fixed attribute key the authenticated user is stored under.
pub const LOGGED_USER_KEY: &str = "loggeduser";

const SESSION_ID_LEN: usize = 64;

/// Opaque session identifier carried in the cookie.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    fn generate() -> Self {
        Self(Alphanumeric.sample_string(&mut rand::rng(), SESSION_ID_LEN))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-browser-session attribute map. Last write wins; concurrent requests
/// for the same session are not coordinated beyond the store lock.
#[derive(Clone, Debug, Default)]
pub struct Session {
    attributes: HashMap<String, Value>,
}

impl Session {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn logged_user(&self) -> Option<user::Model> {
        self.get(LOGGED_USER_KEY)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// In-process session store addressed by the id carried in the cookie.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh, empty session.
    pub async fn create(&self) -> SessionId {
        let id = SessionId::generate();
        self.sessions
            .write()
            .await
            .insert(id.clone(), Session::default());
        id
    }

    pub async fn contains(&self, id: &SessionId) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    pub async fn attribute(&self, id: &SessionId, key: &str) -> Option<Value> {
        self.sessions
            .read()
            .await
            .get(id)
            .and_then(|s| s.get(key).cloned())
    }

    pub async fn set_attribute(&self, id: &SessionId, key: impl Into<String>, value: Value) {
        if let Some(session) = self.sessions.write().await.get_mut(id) {
            session.set(key, value);
        }
    }

    /// Store the authenticated user's record under the fixed key. The
    /// credential hash never makes it in; it is skipped on serialization.
    pub async fn set_logged_user(&self, id: &SessionId, user: &user::Model) {
        let value = serde_json::to_value(user).unwrap_or(Value::Null);
        self.set_attribute(id, LOGGED_USER_KEY, value).await;
    }

    pub async fn logged_user(&self, id: &SessionId) -> Option<user::Model> {
        self.sessions
            .read()
            .await
            .get(id)
            .and_then(|s| s.logged_user())
    }

    /// Destroy the session and every attribute in it, not just the auth key.
    pub async fn invalidate(&self, id: &SessionId) {
        self.sessions.write().await.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::UserId;
    use serde_json::json;

    fn test_user(username: &str) -> user::Model {
        user::Model {
            id: UserId::new(),
            username: username.to_string(),
            password_hash: "$2b$12$secret".to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn session_ids_are_unique_and_opaque() {
        let store = SessionStore::new();
        let a = store.create().await;
        let b = store.create().await;
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), SESSION_ID_LEN);
    }

    #[tokio::test]
    async fn logged_user_round_trips_without_the_hash() {
        let store = SessionStore::new();
        let id = store.create().await;
        let user = test_user("alice");

        store.set_logged_user(&id, &user).await;

        let logged = store.logged_user(&id).await.unwrap();
        assert_eq!(logged.id, user.id);
        assert_eq!(logged.username, "alice");
        // skip_serializing keeps the hash out of the attribute map
        assert_eq!(logged.password_hash, "");
    }

    #[tokio::test]
    async fn invalidate_destroys_every_attribute() {
        let store = SessionStore::new();
        let id = store.create().await;

        store.set_logged_user(&id, &test_user("bob")).await;
        store
            .set_attribute(&id, "theme", json!("dark"))
            .await;

        store.invalidate(&id).await;

        assert!(!store.contains(&id).await);
        assert!(store.logged_user(&id).await.is_none());
        assert!(store.attribute(&id, "theme").await.is_none());
    }

    #[tokio::test]
    async fn unknown_session_id_has_no_user() {
        let store = SessionStore::new();
        let bogus = SessionId::from("not-a-real-session".to_string());
        assert!(store.logged_user(&bogus).await.is_none());
    }
}
