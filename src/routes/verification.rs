use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde::Deserialize;
use serde_json::json;

use crate::services::iprs::{normalize, IdentityRegistry};
use crate::session::store::SessionStore;
use crate::session::{EntityResponse, SessionPatch, UserType};
use crate::validate::is_valid_national_id;

#[derive(Deserialize)]
pub struct VerifyIdentityRequest {
    pub session_key: String,
    pub id_number: String,
}

#[derive(Deserialize)]
pub struct VerifyDirectorRequest {
    pub session_key: String,
    pub id_number: String,
    pub brs_id: String,
    pub company_name: String,
    pub role: String,
}

pub async fn verify_identity(
    req: web::Json<VerifyIdentityRequest>,
    registry: web::Data<Arc<dyn IdentityRegistry>>,
    store: web::Data<Arc<dyn SessionStore>>,
) -> impl Responder {
    let req = req.into_inner();

    if !is_valid_national_id(&req.id_number) {
        return HttpResponse::BadRequest()
            .json(json!({ "error": "National ID must be exactly 8 digits" }));
    }

    let record = match registry.lookup(&req.id_number).await {
        Ok(record) => record,
        // The registry's own message goes back to the client verbatim.
        Err(e) => return HttpResponse::NotFound().json(json!({ "error": e.to_string() })),
    };

    let (iprs_data, verification_data) = normalize(&record, UserType::Individual);

    match store
        .update(
            &req.session_key,
            SessionPatch {
                iprs_data: Some(iprs_data.clone()),
                verification_data: Some(verification_data),
                ..Default::default()
            },
        )
        .await
    {
        Ok(_) => HttpResponse::Ok().json(json!({ "success": true, "data": iprs_data })),
        Err(e) => {
            error!("Failed to persist signup session: {:?}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Could not save session" }))
        }
    }
}

pub async fn verify_director(
    req: web::Json<VerifyDirectorRequest>,
    registry: web::Data<Arc<dyn IdentityRegistry>>,
    store: web::Data<Arc<dyn SessionStore>>,
) -> impl Responder {
    let req = req.into_inner();

    if !is_valid_national_id(&req.id_number) {
        return HttpResponse::BadRequest()
            .json(json!({ "error": "National ID must be exactly 8 digits" }));
    }
    if req.brs_id.is_empty() {
        return HttpResponse::BadRequest()
            .json(json!({ "error": "Missing required field: brsId" }));
    }

    let record = match registry.lookup(&req.id_number).await {
        Ok(record) => record,
        Err(e) => return HttpResponse::NotFound().json(json!({ "error": e.to_string() })),
    };

    let (iprs_data, verification_data) = normalize(&record, UserType::Company);
    let entity_response = EntityResponse {
        entity_id: req.brs_id,
        company_name: req.company_name,
        director_id: record.id_no.clone(),
        role: req.role,
    };

    match store
        .update(
            &req.session_key,
            SessionPatch {
                iprs_data: Some(iprs_data.clone()),
                verification_data: Some(verification_data),
                entity_response: Some(entity_response.clone()),
                ..Default::default()
            },
        )
        .await
    {
        Ok(_) => HttpResponse::Ok().json(json!({
            "success": true,
            "data": iprs_data,
            "entity": entity_response,
        })),
        Err(e) => {
            error!("Failed to persist signup session: {:?}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Could not save session" }))
        }
    }
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.route("/signup/verification", web::post().to(verify_identity));
    cfg.route("/signup/director-verification", web::post().to(verify_director));
}
