use crate::error::JobError;
use serde::{Deserialize, Serialize};

fn default_min_phones() -> usize {
    1
}

fn default_max_non_result_errors() -> u32 {
    3
}

fn default_days_pause() -> i64 {
    2
}

fn default_sleep_seconds() -> u64 {
    10
}

/// Configuration of one batch add run. Immutable once the job starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub group_target: String,
    pub user_list: Vec<String>,
    #[serde(default = "default_min_phones")]
    pub min_phones_available: usize,
    #[serde(default = "default_max_non_result_errors")]
    pub max_non_result_errors: u32,
    #[serde(default = "default_days_pause")]
    pub days_pause_non_result_errors: i64,
    #[serde(default = "default_sleep_seconds")]
    pub sleep_seconds: u64,
    #[serde(default)]
    pub skip_options: Vec<SkipFlag>,
}

impl JobConfig {
    pub fn new(group_target: impl Into<String>, user_list: Vec<String>) -> Self {
        Self {
            group_target: group_target.into(),
            user_list,
            min_phones_available: default_min_phones(),
            max_non_result_errors: default_max_non_result_errors(),
            days_pause_non_result_errors: default_days_pause(),
            sleep_seconds: default_sleep_seconds(),
            skip_options: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), JobError> {
        if self.group_target.trim().is_empty() {
            return Err(JobError::InvalidConfig {
                reason: "group_target is empty".to_string(),
            });
        }
        if self.user_list.iter().all(|u| u.trim().is_empty()) {
            return Err(JobError::InvalidConfig {
                reason: "user_list is empty".to_string(),
            });
        }
        if self.min_phones_available == 0 {
            return Err(JobError::InvalidConfig {
                reason: "min_phones_available must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn skip(&self, flag: SkipFlag) -> bool {
        self.skip_options.contains(&flag)
    }
}

/// Closed set of pre-attempt filters. Wire names match the REST payload
/// the browser client sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipFlag {
    #[serde(rename = "already_member")]
    AlreadyMember,
    #[serde(rename = "no_username")]
    NoUsername,
    #[serde(rename = "last_seen_gt_1_day")]
    LastSeenOver1Day,
    #[serde(rename = "last_seen_gt_7_days")]
    LastSeenOver7Days,
    #[serde(rename = "last_seen_gt_30_days")]
    LastSeenOver30Days,
    #[serde(rename = "last_seen_gt_60_days")]
    LastSeenOver60Days,
    #[serde(rename = "user_status_empty")]
    StatusHidden,
}
