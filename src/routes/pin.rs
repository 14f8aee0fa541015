use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};
use log::error;
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use crate::databases::auth::accounts::set_pin_and_activate;
use crate::flow::requirements::{can_submit, is_requirement_met, PinRequirement};
use crate::routes::redirect_to;
use crate::session::guard::{check, SignupStep};
use crate::session::store::SessionStore;
use crate::session::{PinData, SessionPatch};

pub const LOGIN_REDIRECT: &str = "/login?signup=success";

#[derive(Deserialize)]
pub struct CreatePinRequest {
    pub session_key: String,
    pub pin: String,
    pub confirm_pin: String,
}

/// Final signup step. On success the account is activated, the whole signup
/// session is deleted, and the client is pointed at the login page with the
/// one-time success flag.
pub async fn create_pin(
    data: web::Json<CreatePinRequest>,
    db_pool: web::Data<PgPool>,
    store: web::Data<Arc<dyn SessionStore>>,
) -> impl Responder {
    let req = data.into_inner();

    if !is_requirement_met(PinRequirement::Length, &req.pin) {
        return HttpResponse::BadRequest().json(json!({ "error": "PIN must be exactly 4 digits" }));
    }
    if !is_requirement_met(PinRequirement::Numbers, &req.pin) {
        return HttpResponse::BadRequest().json(json!({ "error": "PIN must contain numbers only" }));
    }
    if !can_submit(&req.pin, &req.confirm_pin) {
        return HttpResponse::BadRequest().json(json!({ "error": "PINs do not match" }));
    }

    let session = match store.load(&req.session_key).await {
        Ok(Some(session)) => session,
        Ok(None) => return redirect_to(SignupStep::Verification),
        Err(e) => {
            error!("Failed to load signup session: {:?}", e);
            return HttpResponse::InternalServerError().json(json!({ "error": "Could not load session" }));
        }
    };

    if let Err(step) = check(SignupStep::Pin, &session) {
        return redirect_to(step);
    }
    let user_id = match session.user_id() {
        Some(id) => id,
        None => return redirect_to(SignupStep::Authentication),
    };

    let salt = SaltString::generate(&mut OsRng);
    let hashed_pin = match Argon2::default().hash_password(req.pin.as_bytes(), &salt) {
        Ok(hash) => hash.to_string(),
        Err(e) => {
            error!("Failed to hash PIN: {:?}", e);
            return HttpResponse::InternalServerError().json(json!({ "error": "Could not secure PIN" }));
        }
    };

    match set_pin_and_activate(&db_pool, user_id, &hashed_pin).await {
        Ok(true) => {}
        Ok(false) => {
            // Account is not in 'verified' state; OTP has not been completed.
            return HttpResponse::Conflict().json(json!({ "error": "Account is not verified yet" }));
        }
        Err(e) => {
            error!("Failed to store PIN: {:?}", e);
            return HttpResponse::InternalServerError().json(json!({ "error": "Could not store PIN" }));
        }
    }

    // The PIN lands in the session only transiently; the whole record is
    // deleted right after, ending the signup lifecycle.
    let patch = SessionPatch {
        pin_data: Some(PinData {
            pin: req.pin,
            confirm_pin: req.confirm_pin,
        }),
        ..Default::default()
    };
    if let Err(e) = store.update(&req.session_key, patch).await {
        error!("Failed to persist signup session: {:?}", e);
    }
    if let Err(e) = store.clear(&req.session_key).await {
        error!("Failed to clear signup session: {:?}", e);
        return HttpResponse::InternalServerError().json(json!({ "error": "Could not clear session" }));
    }

    HttpResponse::Ok().json(json!({ "success": true, "redirect": LOGIN_REDIRECT }))
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.route("/signup/new-pin", web::post().to(create_pin));
}
