use anyhow::Result;
use async_trait::async_trait;
use log::error;
use sqlx::PgPool;

use crate::session::store::SessionStore;
use crate::session::{SessionPatch, SignupSession};

/// Postgres-backed session store; one jsonb row per browser session key.
/// A row whose payload no longer parses is treated as no session.
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, key: &str) -> Result<Option<SignupSession>> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT data FROM signup_sessions WHERE session_key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.and_then(|(value,)| match serde_json::from_value(value) {
            Ok(session) => Some(session),
            Err(e) => {
                error!("Corrupt signup session for key {}: {:?}", key, e);
                None
            }
        }))
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn load(&self, key: &str) -> Result<Option<SignupSession>> {
        self.fetch(key).await
    }

    async fn update(&self, key: &str, patch: SessionPatch) -> Result<SignupSession> {
        let mut session = self.fetch(key).await?.unwrap_or_default();
        session.merge(patch);

        sqlx::query(
            r#"
            INSERT INTO signup_sessions (session_key, data, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (session_key) DO UPDATE SET data = $2, updated_at = now()
            "#,
        )
        .bind(key)
        .bind(serde_json::to_value(&session)?)
        .execute(&self.pool)
        .await?;

        Ok(session)
    }

    async fn clear(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM signup_sessions WHERE session_key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
