use sqlx::PgPool;

/// Insert payload for a pending account. Entity/director/role are only set
/// on the company path.
#[derive(Debug)]
pub struct NewAccount {
    pub iprs_id: String,
    pub full_name: String,
    pub phone_number: String,
    pub email: String,
    pub entity_id: Option<String>,
    pub director_id: Option<String>,
    pub role: Option<String>,
}

pub async fn account_exists(pool: &PgPool, email: &str, phone: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "SELECT 1 FROM accounts WHERE email = $1 OR phone_number = $2"
    )
    .bind(email)
    .bind(phone)
    .fetch_optional(pool)
    .await?;

    Ok(result.is_some())
}

pub async fn insert_account(pool: &PgPool, account: NewAccount) -> Result<i32, sqlx::Error> {
    let row: (i32,) = sqlx::query_as(
        r#"
        INSERT INTO accounts (iprs_id, full_name, phone_number, email, entity_id, director_id, role, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending')
        RETURNING id
        "#,
    )
    .bind(&account.iprs_id)
    .bind(&account.full_name)
    .bind(&account.phone_number)
    .bind(&account.email)
    .bind(&account.entity_id)
    .bind(&account.director_id)
    .bind(&account.role)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

pub async fn mark_verified(pool: &PgPool, user_id: i32) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE accounts SET status = 'verified' WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Sets the hashed PIN and activates the account in one statement; PIN
/// creation is the last signup step.
pub async fn set_pin_and_activate(
    pool: &PgPool,
    user_id: i32,
    hashed_pin: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE accounts SET pin = $1, status = 'active' WHERE id = $2 AND status = 'verified'",
    )
    .bind(hashed_pin)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}
