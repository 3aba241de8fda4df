use actix_web::{test, web, App};
use adder_core::{
    AuthError, AuthOutcome, Authenticator, JobController, LastSeen, PhonePool, PlatformClient,
    PlatformError, UserProfile,
};
use adder_server::routes;
use adder_server::state::AppState;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

struct StubAuthenticator {
    password_needed: bool,
}

#[async_trait]
impl Authenticator for StubAuthenticator {
    async fn send_code(&self, _phone: &str) -> Result<(), AuthError> {
        Ok(())
    }

    async fn validate_code(&self, _phone: &str, _code: &str) -> Result<AuthOutcome, AuthError> {
        if self.password_needed {
            Ok(AuthOutcome::PasswordNeeded)
        } else {
            Ok(AuthOutcome::SignedIn)
        }
    }

    async fn validate_password(&self, _phone: &str, _password: &str) -> Result<(), AuthError> {
        Ok(())
    }
}

struct InstantPlatform;

#[async_trait]
impl PlatformClient for InstantPlatform {
    async fn user_profile(
        &self,
        _phone: &str,
        _group: &str,
        _user: &str,
    ) -> Result<UserProfile, PlatformError> {
        Ok(UserProfile {
            has_username: true,
            already_member: false,
            last_seen: LastSeen::Recently,
        })
    }

    async fn add_user(&self, _phone: &str, _group: &str, _user: &str) -> Result<(), PlatformError> {
        Ok(())
    }
}

fn test_state(password_needed: bool) -> web::Data<AppState> {
    let pool = Arc::new(PhonePool::new());
    let platform = Arc::new(InstantPlatform);
    let controller = Arc::new(JobController::new(Arc::clone(&pool), platform));
    web::Data::new(AppState {
        pool,
        controller,
        authenticator: Arc::new(StubAuthenticator { password_needed }),
    })
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .configure(routes::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn healthcheck_reports_healthy() {
    let state = test_state(false);
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/api/healthcheck").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn phone_crud_round_trip() {
    let state = test_state(false);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/phones")
        .set_json(json!({"phone": "+111", "api_id": 12345, "api_hash": "abc"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);

    // Duplicates are rejected before any state change.
    let req = test::TestRequest::post()
        .uri("/api/phones")
        .set_json(json!({"phone": "+111", "api_id": 12345, "api_hash": "abc"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::get().uri("/api/phones").to_request();
    let phones: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(phones.as_array().unwrap().len(), 1);
    assert_eq!(phones[0]["phone"], "+111");
    assert_eq!(phones[0]["flood_time"], 0);
    assert_eq!(phones[0]["paused"], false);

    let req = test::TestRequest::post()
        .uri("/api/phones/+111/pause")
        .set_json(json!({"paused": true}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);

    let req = test::TestRequest::get().uri("/api/phones").to_request();
    let phones: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(phones[0]["paused"], true);
    assert_eq!(phones[0]["pause_reason"], "manual");

    let req = test::TestRequest::delete().uri("/api/phones/+111").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);

    let req = test::TestRequest::delete().uri("/api/phones/+111").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn add_phone_requires_all_fields() {
    let state = test_state(false);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/phones")
        .set_json(json!({"phone": "  ", "api_id": 1, "api_hash": "h"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn validate_code_marks_account_authenticated() {
    let state = test_state(false);
    let app = test_app!(state);
    state.pool.add("+111", 1, "h").unwrap();

    let req = test::TestRequest::post()
        .uri("/api/validate_code")
        .set_json(json!({"phone": "+111", "code": "12345"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert!(state.pool.get("+111").unwrap().authenticated);
}

#[actix_web::test]
async fn validate_code_surfaces_2fa_sentinel() {
    let state = test_state(true);
    let app = test_app!(state);
    state.pool.add("+111", 1, "h").unwrap();

    let req = test::TestRequest::post()
        .uri("/api/validate_code")
        .set_json(json!({"phone": "+111", "code": "12345"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "SESSION_PASSWORD_NEEDED");
    assert!(!state.pool.get("+111").unwrap().authenticated);

    // The password step completes the handshake.
    let req = test::TestRequest::post()
        .uri("/api/validate_password")
        .set_json(json!({"phone": "+111", "password": "hunter2"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert!(state.pool.get("+111").unwrap().authenticated);
}

#[actix_web::test]
async fn send_code_unknown_phone_is_404() {
    let state = test_state(false);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/send_code")
        .set_json(json!({"phone": "+999"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn job_lifecycle_over_http() {
    let state = test_state(false);
    let app = test_app!(state);
    state.pool.add("+111", 1, "h").unwrap();
    state.pool.mark_authenticated("+111").unwrap();

    let req = test::TestRequest::post()
        .uri("/api/start_adding")
        .set_json(json!({
            "group_username": "mygroup",
            "user_list": "@a\n@b\n@c",
            "sleep_seconds": 0
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);

    state.controller.join().await;

    let req = test::TestRequest::get().uri("/api/log_status").to_request();
    let status: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(status["running"], false);
    assert_eq!(status["group"], "mygroup");
    assert_eq!(status["total_added"], 3);
    assert!(!status["log"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get().uri("/api/summary").to_request();
    let summary: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary["session_added_total"], 3);
    assert_eq!(summary["phones"][0]["total_added"], 3);
    assert_eq!(summary["phones"][0]["pause_reason"], "none");

    // Stopping a finished job is a benign 400, as the UI expects.
    let req = test::TestRequest::post().uri("/api/stop_adding").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn start_adding_rejects_concurrent_jobs() {
    let state = test_state(false);
    let app = test_app!(state);
    state.pool.add("+111", 1, "h").unwrap();
    state.pool.mark_authenticated("+111").unwrap();

    let start = json!({
        "group_username": "mygroup",
        "user_list": "@a\n@b\n@c",
        "sleep_seconds": 30
    });
    let req = test::TestRequest::post()
        .uri("/api/start_adding")
        .set_json(&start)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);

    let req = test::TestRequest::post()
        .uri("/api/start_adding")
        .set_json(&start)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::post().uri("/api/stop_adding").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    state.controller.join().await;
}

#[actix_web::test]
async fn start_adding_rejects_empty_list() {
    let state = test_state(false);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/start_adding")
        .set_json(json!({"group_username": "mygroup", "user_list": "  \n "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}
