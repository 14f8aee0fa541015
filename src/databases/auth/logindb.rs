use sqlx::{FromRow, PgPool};

#[derive(Debug, FromRow)]
pub struct LoginAccount {
    pub id: i32,
    pub hashed_pin: String,
}

/// The identifier may be an email or a phone number; only fully activated
/// accounts can log in.
pub async fn get_account_by_identifier(
    pool: &PgPool,
    identifier: &str,
) -> Result<Option<LoginAccount>, sqlx::Error> {
    sqlx::query_as::<_, LoginAccount>(
        r#"
        SELECT id, pin AS hashed_pin
        FROM accounts
        WHERE (email = $1 OR phone_number = $1) AND status = 'active' AND pin IS NOT NULL
        "#,
    )
    .bind(identifier)
    .fetch_optional(pool)
    .await
}
