//! Request and response bodies of the REST surface.

use adder_core::{Account, JobConfig, PauseReason, SkipFlag};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct PhoneView {
    pub phone: String,
    pub api_id: i64,
    pub paused: bool,
    pub pause_reason: PauseReason,
    /// Remaining flood pause in seconds, clamped at 0 once elapsed.
    pub flood_time: u64,
    pub added_today: u32,
    pub total_added: u64,
}

impl From<&Account> for PhoneView {
    fn from(account: &Account) -> Self {
        Self {
            phone: account.phone.clone(),
            api_id: account.api_id,
            paused: account.paused,
            pause_reason: account.pause_reason,
            flood_time: account.flood_remaining(Utc::now()),
            added_today: account.added_today,
            total_added: account.total_added,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddPhoneRequest {
    pub phone: String,
    pub api_id: i64,
    pub api_hash: String,
}

#[derive(Debug, Deserialize)]
pub struct PauseRequest {
    pub paused: bool,
}

#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateCodeRequest {
    pub phone: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidatePasswordRequest {
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct StartAddingRequest {
    pub group_username: String,
    /// Newline-delimited user identifiers, as produced by the UI.
    pub user_list: String,
    pub min_phones_available: Option<usize>,
    pub max_non_result_errors: Option<u32>,
    pub days_pause_non_result_errors: Option<i64>,
    pub sleep_seconds: Option<u64>,
    #[serde(default)]
    pub skip_options: Vec<SkipFlag>,
}

impl StartAddingRequest {
    pub fn into_job_config(self) -> JobConfig {
        let users = self
            .user_list
            .lines()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();

        let mut config = JobConfig::new(self.group_username.trim(), users);
        if let Some(v) = self.min_phones_available {
            config.min_phones_available = v;
        }
        if let Some(v) = self.max_non_result_errors {
            config.max_non_result_errors = v;
        }
        if let Some(v) = self.days_pause_non_result_errors {
            config.days_pause_non_result_errors = v;
        }
        if let Some(v) = self.sleep_seconds {
            config.sleep_seconds = v;
        }
        config.skip_options = self.skip_options;
        config
    }
}

#[derive(Debug, Serialize)]
pub struct LogStatusResponse {
    pub running: bool,
    pub group: String,
    pub total_added: u64,
    pub log: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub session_added_total: u64,
    pub phones: Vec<PhoneView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_list_splits_on_newlines_and_drops_blanks() {
        let req = StartAddingRequest {
            group_username: " mygroup ".to_string(),
            user_list: "@a\n\n  @b  \n@c\n   \n".to_string(),
            min_phones_available: None,
            max_non_result_errors: None,
            days_pause_non_result_errors: None,
            sleep_seconds: Some(5),
            skip_options: vec![SkipFlag::NoUsername],
        };

        let config = req.into_job_config();
        assert_eq!(config.group_target, "mygroup");
        assert_eq!(config.user_list, vec!["@a", "@b", "@c"]);
        assert_eq!(config.sleep_seconds, 5);
        assert_eq!(config.min_phones_available, 1);
        assert_eq!(config.skip_options, vec![SkipFlag::NoUsername]);
    }
}
