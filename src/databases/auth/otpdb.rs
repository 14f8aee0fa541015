use chrono::{DateTime, Utc};
use rand::Rng;
use sqlx::PgPool;

use crate::flow::cooldown::RESEND_COOLDOWN_SECS;

#[derive(Debug)]
pub enum ResendOutcome {
    Issued(String),
    /// Still inside the cooldown window; seconds until resend is allowed.
    CoolingDown { remaining_secs: i64 },
}

/// A code that has sat unverified this long never verifies.
pub const OTP_TTL_SECS: i64 = 300;

fn generate_code() -> String {
    format!("{:06}", rand::thread_rng().gen_range(100000..=999999))
}

fn code_matches(
    stored: &str,
    issued_at: DateTime<Utc>,
    supplied: &str,
    now: DateTime<Utc>,
) -> bool {
    stored == supplied && now.signed_duration_since(issued_at).num_seconds() < OTP_TTL_SECS
}

/// Issues a fresh code for the user, replacing any previous one. Used for
/// the initial send; the cooldown is only enforced on resend.
pub async fn issue_code(pool: &PgPool, user_id: i32, channel: &str) -> Result<String, sqlx::Error> {
    let code = generate_code();

    sqlx::query(
        r#"
        INSERT INTO otp_codes (user_id, code, channel, issued_at)
        VALUES ($1, $2, $3, now())
        ON CONFLICT (user_id) DO UPDATE SET code = $2, channel = $3, issued_at = now()
        "#,
    )
    .bind(user_id)
    .bind(&code)
    .bind(channel)
    .execute(pool)
    .await?;

    Ok(code)
}

/// Resend: rejected while the previous code is younger than the cooldown
/// window; otherwise the old code is invalidated and a fresh one issued.
pub async fn resend_code(
    pool: &PgPool,
    user_id: i32,
    channel: &str,
) -> Result<ResendOutcome, sqlx::Error> {
    let issued_at: Option<(DateTime<Utc>,)> =
        sqlx::query_as("SELECT issued_at FROM otp_codes WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    if let Some((issued_at,)) = issued_at {
        let age = Utc::now().signed_duration_since(issued_at).num_seconds();
        let remaining = RESEND_COOLDOWN_SECS as i64 - age;
        if remaining > 0 {
            return Ok(ResendOutcome::CoolingDown {
                remaining_secs: remaining,
            });
        }
    }

    let code = issue_code(pool, user_id, channel).await?;
    Ok(ResendOutcome::Issued(code))
}

/// Compares and, on a match, consumes the stored code. A mismatch or an
/// expired code leaves the row intact: the user can correct their entry or
/// hit resend.
pub async fn verify_and_consume(
    pool: &PgPool,
    user_id: i32,
    code: &str,
) -> Result<bool, sqlx::Error> {
    let stored: Option<(String, DateTime<Utc>)> =
        sqlx::query_as("SELECT code, issued_at FROM otp_codes WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    match stored {
        Some((stored_code, issued_at)) if code_matches(&stored_code, issued_at, code, Utc::now()) => {
            sqlx::query("DELETE FROM otp_codes WHERE user_id = $1")
                .bind(user_id)
                .execute(pool)
                .await?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn fresh_matching_code_verifies() {
        let now = Utc::now();
        assert!(code_matches("482913", now - Duration::seconds(10), "482913", now));
    }

    #[test]
    fn mismatched_code_is_rejected() {
        let now = Utc::now();
        assert!(!code_matches("482913", now, "482914", now));
    }

    #[test]
    fn expired_code_never_verifies() {
        let now = Utc::now();
        let issued_at = now - Duration::seconds(OTP_TTL_SECS);
        assert!(!code_matches("482913", issued_at, "482913", now));
        // Just inside the window still passes.
        assert!(code_matches(
            "482913",
            now - Duration::seconds(OTP_TTL_SECS - 1),
            "482913",
            now
        ));
    }

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
