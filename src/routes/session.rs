use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde_json::json;

use crate::session::guard::earliest_valid_step;
use crate::session::store::SessionStore;

/// Mints the key under which this browser's signup session will live. No
/// row is written until the first step stores something.
pub async fn create_session() -> impl Responder {
    let key = format!("signup-{}", uuid::Uuid::new_v4());
    HttpResponse::Ok().json(json!({ "session_key": key }))
}

/// Session fetch for page-mount prerequisite checks: returns the session (or
/// null) plus the furthest step it is allowed on, so pages can pre-fill and
/// redirect without re-implementing the guard.
pub async fn get_session(
    key: web::Path<String>,
    store: web::Data<Arc<dyn SessionStore>>,
) -> impl Responder {
    let key = key.into_inner();

    match store.load(&key).await {
        Ok(session) => {
            let step = earliest_valid_step(&session.clone().unwrap_or_default());
            HttpResponse::Ok().json(json!({
                "session": session,
                "allowed_step": step.path(),
            }))
        }
        Err(e) => {
            error!("Failed to load signup session: {:?}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Could not load session" }))
        }
    }
}

/// Explicit abandonment.
pub async fn delete_session(
    key: web::Path<String>,
    store: web::Data<Arc<dyn SessionStore>>,
) -> impl Responder {
    match store.clear(&key.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "cleared": true })),
        Err(e) => {
            error!("Failed to clear signup session: {:?}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Could not clear session" }))
        }
    }
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.route("/signup/session", web::post().to(create_session));
    cfg.route("/signup/session/{key}", web::get().to(get_session));
    cfg.route("/signup/session/{key}", web::delete().to(delete_session));
}
