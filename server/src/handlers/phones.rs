//! Pool management handlers.

use crate::models::{AddPhoneRequest, PauseRequest, PhoneView};
use crate::state::AppState;
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use adder_core::PoolError;
use serde_json::json;

#[get("/phones")]
pub async fn list_phones(state: web::Data<AppState>) -> impl Responder {
    let phones: Vec<PhoneView> = state.pool.snapshot().iter().map(PhoneView::from).collect();
    HttpResponse::Ok().json(phones)
}

#[post("/phones")]
pub async fn add_phone(
    state: web::Data<AppState>,
    req: web::Json<AddPhoneRequest>,
) -> impl Responder {
    let phone = req.phone.trim();
    if phone.is_empty() || req.api_hash.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({"error": "All fields are required."}));
    }

    match state.pool.add(phone, req.api_id, req.api_hash.trim()) {
        Ok(()) => HttpResponse::Ok().json(json!({"success": true})),
        Err(e @ PoolError::DuplicateAccount { .. }) => {
            HttpResponse::BadRequest().json(json!({"error": e.to_string()}))
        }
        Err(e) => HttpResponse::InternalServerError().json(json!({"error": e.to_string()})),
    }
}

#[delete("/phones/{phone}")]
pub async fn remove_phone(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match state.pool.remove(&path.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(json!({"success": true})),
        Err(PoolError::NotFound { .. }) => {
            HttpResponse::NotFound().json(json!({"success": false, "error": "Phone not found"}))
        }
        Err(e) => HttpResponse::InternalServerError().json(json!({"error": e.to_string()})),
    }
}

#[post("/phones/{phone}/pause")]
pub async fn pause_phone(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<PauseRequest>,
) -> impl Responder {
    match state.pool.set_paused(&path.into_inner(), req.paused) {
        Ok(()) => HttpResponse::Ok().json(json!({"success": true})),
        Err(PoolError::NotFound { .. }) => {
            HttpResponse::NotFound().json(json!({"error": "Phone not found"}))
        }
        Err(e) => HttpResponse::InternalServerError().json(json!({"error": e.to_string()})),
    }
}
