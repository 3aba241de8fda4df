//! Login handshake handlers.
//!
//! These delegate to the external authenticator; the pool only learns the
//! final result through `mark_authenticated`. `SESSION_PASSWORD_NEEDED` is
//! passed through as the sentinel the UI expects for the 2FA step.

use crate::models::{SendCodeRequest, ValidateCodeRequest, ValidatePasswordRequest};
use crate::state::AppState;
use actix_web::{post, web, HttpResponse, Responder};
use adder_core::AuthOutcome;
use serde_json::json;
use tracing::warn;

#[post("/send_code")]
pub async fn send_code(
    state: web::Data<AppState>,
    req: web::Json<SendCodeRequest>,
) -> impl Responder {
    let phone = req.phone.trim();
    if phone.is_empty() {
        return HttpResponse::BadRequest().json(json!({"error": "The phone field is required."}));
    }
    if state.pool.get(phone).is_none() {
        return HttpResponse::NotFound().json(json!({"error": "Phone not found"}));
    }

    match state.authenticator.send_code(phone).await {
        Ok(()) => HttpResponse::Ok().json(json!({"success": true})),
        Err(e) => {
            warn!("send_code failed for {}: {}", phone, e);
            HttpResponse::BadRequest().json(json!({"error": e.to_string()}))
        }
    }
}

#[post("/validate_code")]
pub async fn validate_code(
    state: web::Data<AppState>,
    req: web::Json<ValidateCodeRequest>,
) -> impl Responder {
    let phone = req.phone.trim();
    let code = req.code.trim();
    if phone.is_empty() || code.is_empty() {
        return HttpResponse::BadRequest()
            .json(json!({"error": "The phone and code fields are required."}));
    }
    if state.pool.get(phone).is_none() {
        return HttpResponse::NotFound().json(json!({"error": "Phone not found"}));
    }

    match state.authenticator.validate_code(phone, code).await {
        Ok(AuthOutcome::SignedIn) => {
            if let Err(e) = state.pool.mark_authenticated(phone) {
                return HttpResponse::InternalServerError().json(json!({"error": e.to_string()}));
            }
            HttpResponse::Ok().json(json!({"success": true}))
        }
        // Not a failure: the account needs the 2FA password step next.
        Ok(AuthOutcome::PasswordNeeded) => {
            HttpResponse::BadRequest().json(json!({"error": "SESSION_PASSWORD_NEEDED"}))
        }
        Err(e) => HttpResponse::BadRequest().json(json!({"error": e.to_string()})),
    }
}

#[post("/validate_password")]
pub async fn validate_password(
    state: web::Data<AppState>,
    req: web::Json<ValidatePasswordRequest>,
) -> impl Responder {
    let phone = req.phone.trim();
    if phone.is_empty() || req.password.is_empty() {
        return HttpResponse::BadRequest()
            .json(json!({"error": "The phone and password fields are required."}));
    }
    if state.pool.get(phone).is_none() {
        return HttpResponse::NotFound().json(json!({"error": "Phone not found"}));
    }

    match state
        .authenticator
        .validate_password(phone, &req.password)
        .await
    {
        Ok(()) => {
            if let Err(e) = state.pool.mark_authenticated(phone) {
                return HttpResponse::InternalServerError().json(json!({"error": e.to_string()}));
            }
            HttpResponse::Ok().json(json!({"success": true}))
        }
        Err(e) => HttpResponse::BadRequest().json(json!({"error": e.to_string()})),
    }
}
