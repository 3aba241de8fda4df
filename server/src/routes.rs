//! API routes configuration.
//!
//! All endpoints live under the /api prefix the browser client expects.

use crate::handlers;
use actix_web::{web, HttpResponse};
use serde_json::json;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(handlers::phones::list_phones)
            .service(handlers::phones::add_phone)
            .service(handlers::phones::remove_phone)
            .service(handlers::phones::pause_phone)
            .service(handlers::auth::send_code)
            .service(handlers::auth::validate_code)
            .service(handlers::auth::validate_password)
            .service(handlers::job::start_adding)
            .service(handlers::job::stop_adding)
            .service(handlers::job::log_status)
            .service(handlers::job::summary)
            .route("/healthcheck", web::get().to(healthcheck_handler)),
    );
}

async fn healthcheck_handler() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
