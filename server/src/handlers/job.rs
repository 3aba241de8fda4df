//! Batch job handlers: start/stop plus the status endpoints the UI polls.

use crate::models::{LogStatusResponse, PhoneView, StartAddingRequest, SummaryResponse};
use crate::state::AppState;
use actix_web::{get, post, web, HttpResponse, Responder};
use adder_core::JobError;
use serde_json::json;

#[post("/start_adding")]
pub async fn start_adding(
    state: web::Data<AppState>,
    req: web::Json<StartAddingRequest>,
) -> impl Responder {
    let config = req.into_inner().into_job_config();
    match state.controller.start(config) {
        Ok(()) => HttpResponse::Ok().json(json!({"success": true})),
        Err(e @ JobError::AlreadyRunning) => {
            HttpResponse::BadRequest().json(json!({"error": e.to_string()}))
        }
        Err(e @ JobError::InvalidConfig { .. }) => {
            HttpResponse::BadRequest().json(json!({"error": e.to_string()}))
        }
    }
}

#[post("/stop_adding")]
pub async fn stop_adding(state: web::Data<AppState>) -> impl Responder {
    let result = state.controller.stop();
    if result.stopped {
        HttpResponse::Ok().json(json!({"success": true, "message": result.message}))
    } else {
        HttpResponse::BadRequest().json(json!({"success": false, "message": result.message}))
    }
}

#[get("/log_status")]
pub async fn log_status(state: web::Data<AppState>) -> impl Responder {
    let status = state.controller.status();
    HttpResponse::Ok().json(LogStatusResponse {
        running: status.running,
        group: status.group,
        total_added: status.total_added,
        log: status.log,
    })
}

#[get("/summary")]
pub async fn summary(state: web::Data<AppState>) -> impl Responder {
    let phones: Vec<PhoneView> = state.pool.snapshot().iter().map(PhoneView::from).collect();
    HttpResponse::Ok().json(SummaryResponse {
        session_added_total: state.controller.session_added_total(),
        phones,
    })
}
