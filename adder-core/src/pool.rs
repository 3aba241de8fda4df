//! Phone pool: the set of worker accounts and their rate-limit/error state.
//!
//! Every mutation goes through the pool-wide lock, so a manual pause issued
//! from a request handler can never race an automatic transition applied by
//! the worker: the last committed writer wins. Elapsed flood pauses and
//! stale daily counters are cleared lazily at read time.

use crate::error::PoolError;
use crate::store::PoolStore;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::warn;

/// An account stops being selectable after this many successful adds in one
/// UTC day. Keeps the per-account request signature low.
pub const DAILY_ADD_LIMIT: u32 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PauseReason {
    #[default]
    None,
    Flood,
    ErrorThreshold,
    Manual,
}

/// One pool member. Pure data; all behavior lives on [`PhonePool`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub phone: String,
    pub api_id: i64,
    pub api_hash: String,
    /// Set once the external login handshake has produced a session.
    #[serde(default)]
    pub authenticated: bool,
    pub paused: bool,
    #[serde(default)]
    pub pause_reason: PauseReason,
    pub flood_until: Option<DateTime<Utc>>,
    pub non_result_error_count: u32,
    pub added_today: u32,
    pub total_added: u64,
    pub last_reset_date: NaiveDate,
}

impl Account {
    fn new(phone: String, api_id: i64, api_hash: String) -> Self {
        Self {
            phone,
            api_id,
            api_hash,
            authenticated: false,
            paused: false,
            pause_reason: PauseReason::None,
            flood_until: None,
            non_result_error_count: 0,
            added_today: 0,
            total_added: 0,
            last_reset_date: Utc::now().date_naive(),
        }
    }

    /// Remaining flood pause in whole seconds, clamped at 0 once elapsed.
    pub fn flood_remaining(&self, now: DateTime<Utc>) -> u64 {
        match self.flood_until {
            Some(until) if until > now => (until - now).num_seconds().max(0) as u64,
            _ => 0,
        }
    }

    /// Roll the daily counter on UTC day change and lift an elapsed flood
    /// pause. Manual and error-threshold pauses are never lifted here.
    fn refresh(&mut self, now: DateTime<Utc>) {
        let today = now.date_naive();
        if self.last_reset_date != today {
            self.added_today = 0;
            self.last_reset_date = today;
        }
        if self.paused
            && self.pause_reason == PauseReason::Flood
            && self.flood_remaining(now) == 0
        {
            self.paused = false;
            self.pause_reason = PauseReason::None;
            self.flood_until = None;
        }
    }

    fn is_available(&self, now: DateTime<Utc>) -> bool {
        self.authenticated
            && !self.paused
            && self.flood_remaining(now) == 0
            && self.added_today < DAILY_ADD_LIMIT
    }
}

/// Owns the accounts; shared between request handlers and the worker.
pub struct PhonePool {
    accounts: RwLock<HashMap<String, Account>>,
    store: Option<PoolStore>,
}

impl PhonePool {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            store: None,
        }
    }

    /// Create a pool backed by a JSON store, loading any persisted state.
    pub fn with_store(store: PoolStore) -> Result<Self, PoolError> {
        let accounts = store
            .load()?
            .into_iter()
            .map(|a| (a.phone.clone(), a))
            .collect();
        Ok(Self {
            accounts: RwLock::new(accounts),
            store: Some(store),
        })
    }

    pub fn add(&self, phone: &str, api_id: i64, api_hash: &str) -> Result<(), PoolError> {
        let mut accounts = self.accounts.write().unwrap();
        if accounts.contains_key(phone) {
            return Err(PoolError::DuplicateAccount {
                phone: phone.to_string(),
            });
        }
        accounts.insert(
            phone.to_string(),
            Account::new(phone.to_string(), api_id, api_hash.to_string()),
        );
        self.persist(&accounts);
        Ok(())
    }

    pub fn remove(&self, phone: &str) -> Result<(), PoolError> {
        let mut accounts = self.accounts.write().unwrap();
        if accounts.remove(phone).is_none() {
            return Err(PoolError::NotFound {
                phone: phone.to_string(),
            });
        }
        self.persist(&accounts);
        Ok(())
    }

    /// Manual pause/unpause. An explicit unpause always wins: it clears any
    /// residual flood or error-threshold state.
    pub fn set_paused(&self, phone: &str, paused: bool) -> Result<(), PoolError> {
        self.update(phone, |account| {
            account.paused = paused;
            if paused {
                account.pause_reason = PauseReason::Manual;
                account.flood_until = None;
            } else {
                account.pause_reason = PauseReason::None;
                account.flood_until = None;
            }
        })
    }

    /// Flip the gate once the login handshake has completed.
    pub fn mark_authenticated(&self, phone: &str) -> Result<(), PoolError> {
        self.update(phone, |account| {
            account.authenticated = true;
        })
    }

    /// Record one successful add through `phone`'s session.
    pub fn record_success(&self, phone: &str) {
        let _ = self.update(phone, |account| {
            account.added_today += 1;
            account.total_added += 1;
            account.non_result_error_count = 0;
        });
    }

    /// Put the account under a flood pause for `seconds`.
    pub fn flood_pause(&self, phone: &str, seconds: u64) {
        let until = Utc::now() + Duration::seconds(seconds as i64);
        let _ = self.update(phone, |account| {
            account.paused = true;
            account.pause_reason = PauseReason::Flood;
            account.flood_until = Some(until);
        });
    }

    /// Count one ambiguous failure against the account. When the count
    /// reaches `max_errors` the account is quarantined for `pause_days`
    /// and the counter resets. Returns whether the threshold tripped.
    pub fn record_non_result(&self, phone: &str, max_errors: u32, pause_days: i64) -> bool {
        let mut tripped = false;
        let _ = self.update(phone, |account| {
            account.non_result_error_count += 1;
            if account.non_result_error_count >= max_errors {
                account.paused = true;
                account.pause_reason = PauseReason::ErrorThreshold;
                account.flood_until = Some(Utc::now() + Duration::days(pause_days));
                account.non_result_error_count = 0;
                tripped = true;
            }
        });
        tripped
    }

    pub fn get(&self, phone: &str) -> Option<Account> {
        self.accounts.read().unwrap().get(phone).cloned()
    }

    pub fn len(&self) -> usize {
        self.accounts.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().unwrap().is_empty()
    }

    /// Phones currently selectable by the worker, in stable order.
    ///
    /// Takes the write lock because elapsed flood pauses and stale daily
    /// counters are cleared here, transitioning accounts out of pause
    /// before they are returned.
    pub fn available(&self) -> Vec<String> {
        let now = Utc::now();
        let mut accounts = self.accounts.write().unwrap();
        let mut changed = false;
        let mut phones: Vec<String> = accounts
            .values_mut()
            .filter_map(|account| {
                let was_paused = account.paused;
                account.refresh(now);
                changed |= was_paused != account.paused;
                account.is_available(now).then(|| account.phone.clone())
            })
            .collect();
        if changed {
            self.persist(&accounts);
        }
        phones.sort();
        phones
    }

    pub fn available_count(&self) -> usize {
        self.available().len()
    }

    /// Point-in-time copy of every account, refreshed and sorted by phone.
    pub fn snapshot(&self) -> Vec<Account> {
        let now = Utc::now();
        let mut accounts = self.accounts.write().unwrap();
        for account in accounts.values_mut() {
            account.refresh(now);
        }
        let mut all: Vec<Account> = accounts.values().cloned().collect();
        all.sort_by(|a, b| a.phone.cmp(&b.phone));
        all
    }

    fn update<F>(&self, phone: &str, f: F) -> Result<(), PoolError>
    where
        F: FnOnce(&mut Account),
    {
        let mut accounts = self.accounts.write().unwrap();
        let account = accounts.get_mut(phone).ok_or_else(|| PoolError::NotFound {
            phone: phone.to_string(),
        })?;
        account.refresh(Utc::now());
        f(account);
        self.persist(&accounts);
        Ok(())
    }

    /// Best effort: a failed save must never take down a running job.
    fn persist(&self, accounts: &HashMap<String, Account>) {
        if let Some(store) = &self.store {
            let mut all: Vec<&Account> = accounts.values().collect();
            all.sort_by(|a, b| a.phone.cmp(&b.phone));
            if let Err(e) = store.save(&all) {
                warn!("Pool persistence failed: {}", e);
            }
        }
    }
}

impl Default for PhonePool {
    fn default() -> Self {
        Self::new()
    }
}
