//! HTTP client for the session-agent sidecar.
//!
//! The sidecar owns the MTProto sessions (login handshake, entity
//! resolution, invites) and exposes them as a small JSON API keyed by
//! phone number. This client translates its responses into the typed
//! outcomes the core consumes; the wire protocol to the messaging
//! platform itself never crosses this boundary.

use adder_core::{AuthError, AuthOutcome, Authenticator, LastSeen, PlatformClient, PlatformError, UserProfile};
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Requests to the agent can legitimately take a while: the sidecar talks
/// to the platform synchronously.
const AGENT_TIMEOUT: Duration = Duration::from_secs(120);

pub struct AgentClient {
    base: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct AgentError {
    error: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    seconds: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    has_username: bool,
    already_member: bool,
    #[serde(default)]
    last_seen: Option<String>,
    #[serde(default)]
    last_seen_days: Option<i64>,
}

impl AgentClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(AGENT_TIMEOUT)
            .build()?;
        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.http
            .post(format!("{}{}", self.base, path))
            .json(&body)
            .send()
            .await
    }

    async fn decode_auth_error(&self, response: reqwest::Response) -> AuthError {
        let err: AgentError = match response.json().await {
            Ok(err) => err,
            Err(e) => {
                return AuthError::Agent {
                    msg: format!("unreadable agent response: {}", e),
                }
            }
        };
        match err.kind.as_deref() {
            Some("password_needed") => AuthError::PasswordNeeded,
            Some("phone_banned") => AuthError::PhoneBanned,
            Some("invalid_code") => AuthError::InvalidCode,
            Some("code_expired") => AuthError::CodeExpired,
            Some("invalid_password") => AuthError::InvalidPassword,
            Some("not_registered") => AuthError::NotRegistered,
            _ => AuthError::Agent { msg: err.error },
        }
    }

    async fn decode_platform_error(&self, response: reqwest::Response) -> PlatformError {
        let err: AgentError = match response.json().await {
            Ok(err) => err,
            Err(e) => return PlatformError::Network(format!("unreadable agent response: {}", e)),
        };
        match err.kind.as_deref() {
            Some("flood_wait") => PlatformError::FloodWait {
                seconds: err.seconds.unwrap_or(0),
            },
            Some("peer_flood") => PlatformError::PeerFlood,
            Some("privacy_restricted") => PlatformError::PrivacyRestricted,
            Some("not_mutual_contact") => PlatformError::NotMutualContact,
            Some("user_not_found") => PlatformError::UserNotFound,
            Some("already_participant") => PlatformError::AlreadyParticipant,
            _ => PlatformError::Unknown(err.error),
        }
    }
}

#[async_trait]
impl Authenticator for AgentClient {
    async fn send_code(&self, phone: &str) -> Result<(), AuthError> {
        let response = self
            .post("/send_code", json!({ "phone": phone }))
            .await
            .map_err(|e| AuthError::Agent { msg: e.to_string() })?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.decode_auth_error(response).await)
        }
    }

    async fn validate_code(&self, phone: &str, code: &str) -> Result<AuthOutcome, AuthError> {
        let response = self
            .post("/validate_code", json!({ "phone": phone, "code": code }))
            .await
            .map_err(|e| AuthError::Agent { msg: e.to_string() })?;
        if response.status().is_success() {
            return Ok(AuthOutcome::SignedIn);
        }
        match self.decode_auth_error(response).await {
            AuthError::PasswordNeeded => Ok(AuthOutcome::PasswordNeeded),
            e => Err(e),
        }
    }

    async fn validate_password(&self, phone: &str, password: &str) -> Result<(), AuthError> {
        let response = self
            .post(
                "/validate_password",
                json!({ "phone": phone, "password": password }),
            )
            .await
            .map_err(|e| AuthError::Agent { msg: e.to_string() })?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.decode_auth_error(response).await)
        }
    }
}

#[async_trait]
impl PlatformClient for AgentClient {
    async fn user_profile(
        &self,
        phone: &str,
        group: &str,
        user: &str,
    ) -> Result<UserProfile, PlatformError> {
        let response = self
            .post(
                "/profile",
                json!({ "phone": phone, "group": group, "user": user }),
            )
            .await
            .map_err(|e| PlatformError::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(self.decode_platform_error(response).await);
        }

        let profile: ProfileResponse = response
            .json()
            .await
            .map_err(|e| PlatformError::Network(e.to_string()))?;
        let last_seen = match (profile.last_seen_days, profile.last_seen.as_deref()) {
            (Some(days), _) => LastSeen::DaysAgo(days),
            (None, Some("recently")) => LastSeen::Recently,
            (None, Some("within_week")) => LastSeen::WithinWeek,
            (None, Some("within_month")) => LastSeen::WithinMonth,
            _ => LastSeen::Hidden,
        };
        Ok(UserProfile {
            has_username: profile.has_username,
            already_member: profile.already_member,
            last_seen,
        })
    }

    async fn add_user(&self, phone: &str, group: &str, user: &str) -> Result<(), PlatformError> {
        let response = self
            .post(
                "/invite",
                json!({ "phone": phone, "group": group, "user": user }),
            )
            .await
            .map_err(|e| PlatformError::Network(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.decode_platform_error(response).await)
        }
    }
}
