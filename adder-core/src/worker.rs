//! The worker control loop.
//!
//! One worker runs at a time per process. Attempts are sequential across
//! accounts to keep a predictable, low-signature request pace; the loop
//! suspends only while awaiting the platform and during the pacing sleep,
//! and both points observe cancellation.

use crate::classifier::{classify, Outcome};
use crate::config::{JobConfig, SkipFlag};
use crate::error::PlatformError;
use crate::job::{AddJob, JobStatus};
use crate::pool::PhonePool;
use crate::traits::{LastSeen, PlatformClient, UserProfile};
use std::sync::{Arc, Mutex};
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;
use tracing::{info_span, Instrument};

pub(crate) struct Worker {
    pool: Arc<PhonePool>,
    platform: Arc<dyn PlatformClient>,
    job: Arc<Mutex<AddJob>>,
    token: CancellationToken,
}

impl Worker {
    pub(crate) fn new(
        pool: Arc<PhonePool>,
        platform: Arc<dyn PlatformClient>,
        job: Arc<Mutex<AddJob>>,
        token: CancellationToken,
    ) -> Self {
        Self {
            pool,
            platform,
            job,
            token,
        }
    }

    pub(crate) async fn run(self) {
        let group = { self.job.lock().unwrap().config.group_target.clone() };
        let span = info_span!("worker", group = %group);
        self.run_inner().instrument(span).await
    }

    async fn run_inner(self) {
        let config = { self.job.lock().unwrap().config.clone() };
        let group = &config.group_target;
        // Rotating index spreads load across accounts instead of
        // exhausting one account first.
        let mut next_slot = 0usize;

        loop {
            if self.token.is_cancelled() || self.status() == JobStatus::Stopping {
                return self.finish("stopped by operator");
            }

            let cursor = { self.job.lock().unwrap().cursor };
            if cursor >= config.user_list.len() {
                return self.finish("user list exhausted");
            }

            let available = self.pool.available();
            if available.is_empty() || available.len() < config.min_phones_available {
                self.log(format!(
                    "Only {} phone(s) available, {} required.",
                    available.len(),
                    config.min_phones_available
                ));
                return self.finish("insufficient phones available");
            }
            let phone = available[next_slot % available.len()].clone();
            next_slot = next_slot.wrapping_add(1);

            let user = config.user_list[cursor].trim().to_string();
            if user.is_empty() {
                self.advance();
                continue;
            }

            if !config.skip_options.is_empty() {
                match self.platform.user_profile(&phone, group, &user).await {
                    Ok(profile) => {
                        if let Some(flag) = skip_reason(&profile, &config.skip_options) {
                            self.log(format!("[{}] {}: skipped ({:?}).", phone, user, flag));
                            self.advance();
                            continue;
                        }
                    }
                    Err(e) => {
                        // A failed probe is handled like a failed attempt,
                        // but skips the attempt and the pacing delay.
                        self.handle_failure(&phone, &user, &e, &config);
                        continue;
                    }
                }
            }

            match self.platform.add_user(&phone, group, &user).await {
                Ok(()) => {
                    self.pool.record_success(&phone);
                    let mut job = self.job.lock().unwrap();
                    job.session_added_total += 1;
                    job.cursor += 1;
                    job.log_line(format!("[{}] Added {}.", phone, user));
                }
                Err(e) => self.handle_failure(&phone, &user, &e, &config),
            }

            tokio::select! {
                _ = self.token.cancelled() => {
                    return self.finish("stopped by operator");
                }
                _ = sleep(Duration::from_secs(config.sleep_seconds)) => {}
            }
        }
    }

    fn handle_failure(&self, phone: &str, user: &str, err: &PlatformError, config: &JobConfig) {
        match classify(err) {
            Outcome::FloodWait(seconds) => {
                // Cursor stays: the same user is retried by another account.
                self.pool.flood_pause(phone, seconds);
                self.log(format!(
                    "[{}] Flood wait: paused {}s; {} will be retried.",
                    phone, seconds, user
                ));
            }
            Outcome::NonResult => {
                let tripped = self.pool.record_non_result(
                    phone,
                    config.max_non_result_errors,
                    config.days_pause_non_result_errors,
                );
                self.log(format!("[{}] {}: no result ({}).", phone, user, err));
                if tripped {
                    self.log(format!(
                        "[{}] Error threshold reached: paused for {} day(s).",
                        phone, config.days_pause_non_result_errors
                    ));
                }
                self.advance();
            }
            Outcome::Fatal => {
                self.log(format!("[{}] {}: {}. Skipped.", phone, user, err));
                self.advance();
            }
        }
    }

    fn status(&self) -> JobStatus {
        self.job.lock().unwrap().status
    }

    fn advance(&self) {
        self.job.lock().unwrap().cursor += 1;
    }

    fn log(&self, msg: String) {
        self.job.lock().unwrap().log_line(msg);
    }

    fn finish(&self, reason: &str) {
        let mut job = self.job.lock().unwrap();
        job.status = JobStatus::Stopped;
        let total = job.session_added_total;
        job.log_line(format!(
            "Run finished ({}). Added this session: {}.",
            reason, total
        ));
    }
}

/// First configured flag that excludes the user, if any.
fn skip_reason(profile: &UserProfile, flags: &[SkipFlag]) -> Option<SkipFlag> {
    let has = |flag: SkipFlag| flags.contains(&flag);

    if has(SkipFlag::AlreadyMember) && profile.already_member {
        return Some(SkipFlag::AlreadyMember);
    }
    if has(SkipFlag::NoUsername) && !profile.has_username {
        return Some(SkipFlag::NoUsername);
    }
    match profile.last_seen {
        LastSeen::Hidden if has(SkipFlag::StatusHidden) => Some(SkipFlag::StatusHidden),
        LastSeen::DaysAgo(days) => {
            if has(SkipFlag::LastSeenOver60Days) && days > 60 {
                Some(SkipFlag::LastSeenOver60Days)
            } else if has(SkipFlag::LastSeenOver30Days) && days > 30 {
                Some(SkipFlag::LastSeenOver30Days)
            } else if has(SkipFlag::LastSeenOver7Days) && days > 7 {
                Some(SkipFlag::LastSeenOver7Days)
            } else if has(SkipFlag::LastSeenOver1Day) && days > 1 {
                Some(SkipFlag::LastSeenOver1Day)
            } else {
                None
            }
        }
        LastSeen::WithinMonth if has(SkipFlag::LastSeenOver30Days) => {
            Some(SkipFlag::LastSeenOver30Days)
        }
        LastSeen::WithinWeek if has(SkipFlag::LastSeenOver7Days) => {
            Some(SkipFlag::LastSeenOver7Days)
        }
        LastSeen::Recently if has(SkipFlag::LastSeenOver1Day) => Some(SkipFlag::LastSeenOver1Day),
        _ => None,
    }
}
