use actix_web::HttpResponse;
use serde_json::json;

use crate::session::guard::SignupStep;

pub mod auth;
pub mod login;
pub mod otp;
pub mod pin;
pub mod session;
pub mod verification;

/// Guard denial: point the client at the earliest step whose prerequisite
/// is missing.
pub(crate) fn redirect_to(step: SignupStep) -> HttpResponse {
    HttpResponse::Forbidden().json(json!({ "redirect": step.path() }))
}
