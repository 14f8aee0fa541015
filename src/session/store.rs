//! Storage seam for the signup session. Production uses the Postgres-backed
//! store in `databases::signup`; tests use the in-memory one. A record that
//! is missing or fails to parse reads as "no session", never as an error.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use super::{SessionPatch, SignupSession};

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<SignupSession>>;

    /// Shallow-merge `patch` into the stored session (creating it if absent)
    /// and write back. Returns the merged session.
    async fn update(&self, key: &str, patch: SessionPatch) -> Result<SignupSession>;

    async fn clear(&self, key: &str) -> Result<()>;
}

#[derive(Default)]
pub struct MemorySessionStore {
    records: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn insert_raw(&self, key: &str, raw: &str) {
        self.records
            .lock()
            .unwrap()
            .insert(key.to_string(), raw.to_string());
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, key: &str) -> Result<Option<SignupSession>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .get(key)
            .and_then(|raw| serde_json::from_str(raw).ok()))
    }

    async fn update(&self, key: &str, patch: SessionPatch) -> Result<SignupSession> {
        let mut records = self.records.lock().unwrap();
        let mut session: SignupSession = records
            .get(key)
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();
        session.merge(patch);
        records.insert(key.to_string(), serde_json::to_string(&session)?);
        Ok(session)
    }

    async fn clear(&self, key: &str) -> Result<()> {
        self.records.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{UserCreationResponse, VerificationData, UserType};

    #[tokio::test]
    async fn missing_record_loads_as_none() {
        let store = MemorySessionStore::new();
        assert!(store.load("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_record_loads_as_none() {
        let store = MemorySessionStore::new();
        store.insert_raw("k", "{not json");
        assert!(store.load("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_creates_then_merges() {
        let store = MemorySessionStore::new();
        store
            .update(
                "k",
                SessionPatch {
                    verification_data: Some(VerificationData {
                        full_name: "Jane Doe".to_string(),
                        user_type: UserType::Individual,
                    }),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let merged = store
            .update(
                "k",
                SessionPatch {
                    user_creation_response: Some(UserCreationResponse { id: 9 }),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(merged.user_id(), Some(9));
        assert!(merged.verification_data.is_some());

        store.clear("k").await.unwrap();
        assert!(store.load("k").await.unwrap().is_none());
    }
}
