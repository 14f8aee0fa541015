use actix_web::{web, HttpResponse, Responder};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use crate::databases::auth::logindb::get_account_by_identifier;

// Demo build: this phone number logs in as the seeded demo account.
const DEMO_PHONE: &str = "0700000001";
const DEMO_EMAIL: &str = "demo@sukariportal.go.ke";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub pin: String,
}

pub async fn login(
    data: web::Json<LoginRequest>,
    db_pool: web::Data<PgPool>,
) -> impl Responder {
    let LoginRequest { identifier, pin } = data.into_inner();

    let identifier = if identifier == DEMO_PHONE {
        DEMO_EMAIL.to_string()
    } else {
        identifier
    };

    match get_account_by_identifier(&db_pool, &identifier).await {
        Ok(Some(account)) => {
            let parsed_hash = match PasswordHash::new(&account.hashed_pin) {
                Ok(hash) => hash,
                Err(_) => {
                    return HttpResponse::InternalServerError()
                        .json(json!({ "error": "PIN hash parsing failed" }))
                }
            };

            if Argon2::default().verify_password(pin.as_bytes(), &parsed_hash).is_ok() {
                HttpResponse::Ok().json(json!({
                    "success": true,
                    "user_id": account.id,
                }))
            } else {
                HttpResponse::Unauthorized().json(json!({ "success": false, "error": "PIN does not match" }))
            }
        }
        Ok(None) => HttpResponse::NotFound().json(json!({ "success": false, "error": "No account found for that identifier" })),
        Err(e) => {
            log::error!("DB query error: {:?}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Database error" }))
        }
    }
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login));
}
