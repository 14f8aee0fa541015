use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use crate::databases::auth::accounts::mark_verified;
use crate::databases::auth::otpdb::{issue_code, resend_code, verify_and_consume, ResendOutcome};
use crate::routes::redirect_to;
use crate::services::masking::masked_destination;
use crate::services::{email, sms};
use crate::session::guard::{check, SignupStep};
use crate::session::store::SessionStore;
use crate::session::SignupSession;
use crate::validate::is_valid_otp_code;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OtpChannel {
    Email,
    Sms,
}

impl OtpChannel {
    fn as_str(&self) -> &'static str {
        match self {
            OtpChannel::Email => "EMAIL",
            OtpChannel::Sms => "SMS",
        }
    }
}

#[derive(Deserialize)]
pub struct SendOtpRequest {
    pub session_key: String,
    pub user_id: i32,
    pub channel: OtpChannel,
}

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub session_key: String,
    pub user_id: i32,
    pub code: String,
    #[allow(dead_code)]
    pub channel: Option<OtpChannel>,
}

/// Loads the session and enforces the OTP entry guard: no creation
/// response means a redirect to the earliest valid step, same as PIN.
async fn guarded_session(
    store: &Arc<dyn SessionStore>,
    session_key: &str,
    user_id: i32,
) -> Result<SignupSession, HttpResponse> {
    let session = match store.load(session_key).await {
        Ok(Some(session)) => session,
        Ok(None) => return Err(redirect_to(SignupStep::Verification)),
        Err(e) => {
            error!("Failed to load signup session: {:?}", e);
            return Err(HttpResponse::InternalServerError()
                .json(json!({ "error": "Could not load session" })));
        }
    };

    if let Err(step) = check(SignupStep::Otp, &session) {
        return Err(redirect_to(step));
    }
    if session.user_id() != Some(user_id) {
        return Err(HttpResponse::BadRequest()
            .json(json!({ "error": "User id does not match this signup session" })));
    }
    Ok(session)
}

async fn deliver(session: &SignupSession, channel: OtpChannel, code: &str) -> Result<(), String> {
    let auth = session
        .authentication_data
        .as_ref()
        .ok_or_else(|| "No contact details on file".to_string())?;

    let result = match channel {
        OtpChannel::Email => email::send_code_email(&auth.email, code).await,
        OtpChannel::Sms => sms::send_code_sms(&auth.phone_number, code).await,
    };
    result.map_err(|e| e.to_string())
}

fn masked_for(session: &SignupSession) -> Option<String> {
    let auth = session.authentication_data.as_ref()?;
    masked_destination(Some(&auth.email), Some(&auth.phone_number))
}

pub async fn send_otp(
    data: web::Json<SendOtpRequest>,
    db_pool: web::Data<PgPool>,
    store: web::Data<Arc<dyn SessionStore>>,
) -> impl Responder {
    let req = data.into_inner();

    let session = match guarded_session(store.get_ref(), &req.session_key, req.user_id).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let code = match issue_code(&db_pool, req.user_id, req.channel.as_str()).await {
        Ok(code) => code,
        Err(e) => {
            error!("Failed to issue OTP: {:?}", e);
            return HttpResponse::InternalServerError().json(json!({ "error": "Could not issue code" }));
        }
    };

    if let Err(e) = deliver(&session, req.channel, &code).await {
        error!("OTP delivery failed: {}", e);
        return HttpResponse::InternalServerError().json(json!({ "error": format!("Delivery failed: {}", e) }));
    }

    HttpResponse::Ok().json(json!({ "sent": true, "destination": masked_for(&session) }))
}

pub async fn resend_otp(
    data: web::Json<SendOtpRequest>,
    db_pool: web::Data<PgPool>,
    store: web::Data<Arc<dyn SessionStore>>,
) -> impl Responder {
    let req = data.into_inner();

    let session = match guarded_session(store.get_ref(), &req.session_key, req.user_id).await {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    let code = match resend_code(&db_pool, req.user_id, req.channel.as_str()).await {
        Ok(ResendOutcome::Issued(code)) => code,
        Ok(ResendOutcome::CoolingDown { remaining_secs }) => {
            return HttpResponse::TooManyRequests().json(json!({
                "error": "Please wait before requesting another code",
                "remaining_secs": remaining_secs,
            }));
        }
        Err(e) => {
            error!("Failed to reissue OTP: {:?}", e);
            return HttpResponse::InternalServerError().json(json!({ "error": "Could not issue code" }));
        }
    };

    if let Err(e) = deliver(&session, req.channel, &code).await {
        error!("OTP delivery failed: {}", e);
        return HttpResponse::InternalServerError().json(json!({ "error": format!("Delivery failed: {}", e) }));
    }

    HttpResponse::Ok().json(json!({ "sent": true, "destination": masked_for(&session) }))
}

pub async fn verify_otp(
    data: web::Json<VerifyOtpRequest>,
    db_pool: web::Data<PgPool>,
    store: web::Data<Arc<dyn SessionStore>>,
) -> impl Responder {
    let req = data.into_inner();

    if !is_valid_otp_code(&req.code) {
        return HttpResponse::BadRequest().json(json!({ "error": "Code must be exactly 6 digits" }));
    }

    if let Err(resp) = guarded_session(store.get_ref(), &req.session_key, req.user_id).await {
        return resp;
    }

    match verify_and_consume(&db_pool, req.user_id, &req.code).await {
        Ok(true) => {
            if let Err(e) = mark_verified(&db_pool, req.user_id).await {
                error!("Failed to mark account verified: {:?}", e);
                return HttpResponse::InternalServerError().json(json!({ "error": "Could not update account" }));
            }
            HttpResponse::Ok().json(json!({ "verified": true, "next": SignupStep::Pin.path() }))
        }
        // The stored code stays put so the user can correct their entry.
        Ok(false) => HttpResponse::Unauthorized().json(json!({ "error": "Invalid verification code" })),
        Err(e) => {
            error!("OTP verification query failed: {:?}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Could not verify code" }))
        }
    }
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.route("/signup/otp/send", web::post().to(send_otp));
    cfg.route("/signup/otp/resend", web::post().to(resend_otp));
    cfg.route("/signup/otp/verify", web::post().to(verify_otp));
}
