use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use crate::databases::auth::accounts::{account_exists, insert_account, NewAccount};
use crate::routes::redirect_to;
use crate::session::guard::{check, SignupStep};
use crate::session::store::SessionStore;
use crate::session::{
    AuthenticationData, SessionPatch, UserCreationData, UserCreationResponse, UserType,
};

#[derive(Deserialize)]
pub struct AuthenticateRequest {
    pub session_key: String,
    pub phone_number: String,
    pub email: String,
}

/// Contact-capture step: creates the pending account from the session's
/// verified identity plus the supplied contact channel. The company path
/// derives its extra payload fields from the entity record in the session.
pub async fn authenticate(
    data: web::Json<AuthenticateRequest>,
    db_pool: web::Data<PgPool>,
    store: web::Data<Arc<dyn SessionStore>>,
) -> impl Responder {
    let req = data.into_inner();

    let session = match store.load(&req.session_key).await {
        Ok(Some(session)) => session,
        Ok(None) => return redirect_to(SignupStep::Verification),
        Err(e) => {
            error!("Failed to load signup session: {:?}", e);
            return HttpResponse::InternalServerError().json(json!({ "error": "Could not load session" }));
        }
    };

    if let Err(step) = check(SignupStep::Authentication, &session) {
        return redirect_to(step);
    }

    // All four upstream identifiers must be present; name the missing one.
    let iprs = match &session.iprs_data {
        Some(iprs) if !iprs.id_number.is_empty() => iprs.clone(),
        _ => return HttpResponse::BadRequest().json(json!({ "error": "Missing required field: iprsID" })),
    };
    if req.phone_number.is_empty() {
        return HttpResponse::BadRequest().json(json!({ "error": "Missing required field: phoneNumber" }));
    }
    if req.email.is_empty() {
        return HttpResponse::BadRequest().json(json!({ "error": "Missing required field: email" }));
    }
    let user_type = session.user_type().unwrap_or(UserType::Individual);
    let entity = session.entity_response.clone();
    if user_type == UserType::Company && entity.is_none() {
        return HttpResponse::BadRequest().json(json!({ "error": "Missing required field: entityID" }));
    }

    match account_exists(&db_pool, &req.email, &req.phone_number).await {
        Ok(true) => return HttpResponse::Conflict().json(json!({ "error": "User already exists" })),
        Err(e) => {
            error!("Error checking if account exists: {:?}", e);
            return HttpResponse::InternalServerError().json(json!({ "error": "DB query failed" }));
        }
        _ => {}
    }

    let full_name = session
        .verification_data
        .as_ref()
        .map(|v| v.full_name.clone())
        .unwrap_or_else(|| iprs.full_name.clone());

    let creation_data = UserCreationData {
        iprs_id: iprs.id_number.clone(),
        phone_number: req.phone_number.clone(),
        email: req.email.clone(),
        entity_id: entity.as_ref().map(|e| e.entity_id.clone()),
        director_id: entity.as_ref().map(|e| e.director_id.clone()),
        role: entity.as_ref().map(|e| e.role.clone()),
    };

    let new_account = NewAccount {
        iprs_id: creation_data.iprs_id.clone(),
        full_name,
        phone_number: creation_data.phone_number.clone(),
        email: creation_data.email.clone(),
        entity_id: creation_data.entity_id.clone(),
        director_id: creation_data.director_id.clone(),
        role: creation_data.role.clone(),
    };

    let user_id = match insert_account(&db_pool, new_account).await {
        Ok(id) => id,
        Err(e) => {
            error!("Account creation failed: {:?}", e);
            return HttpResponse::InternalServerError().json(json!({ "error": "Account creation failed" }));
        }
    };

    // Session is only written after the creation succeeded.
    let patch = SessionPatch {
        authentication_data: Some(AuthenticationData {
            id_number: iprs.id_number.clone(),
            phone_number: req.phone_number,
            email: req.email,
            user_type,
        }),
        user_creation_data: Some(creation_data),
        user_creation_response: Some(UserCreationResponse { id: user_id }),
        ..Default::default()
    };
    if let Err(e) = store.update(&req.session_key, patch).await {
        error!("Failed to persist signup session: {:?}", e);
        return HttpResponse::InternalServerError().json(json!({ "error": "Could not save session" }));
    }

    HttpResponse::Ok().json(json!({ "id": user_id, "next": SignupStep::Otp.path() }))
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.route("/signup/authentication", web::post().to(authenticate));
}
