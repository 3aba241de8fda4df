#![allow(dead_code)]

use adder_core::{LastSeen, PlatformClient, PlatformError, UserProfile};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Platform stand-in scripted per target user: each attempt pops the next
/// outcome from that user's queue, defaulting to success.
pub struct ScriptedPlatform {
    outcomes: Mutex<HashMap<String, VecDeque<Result<(), PlatformError>>>>,
    profiles: Mutex<HashMap<String, UserProfile>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedPlatform {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(HashMap::new()),
            profiles: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn script(&self, user: &str, outcomes: Vec<Result<(), PlatformError>>) {
        self.outcomes
            .lock()
            .unwrap()
            .insert(user.to_string(), outcomes.into());
    }

    pub fn set_profile(&self, user: &str, profile: UserProfile) {
        self.profiles
            .lock()
            .unwrap()
            .insert(user.to_string(), profile);
    }

    /// (phone, user) pairs, one per add attempt, in order.
    pub fn attempts(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn attempts_by(&self, phone: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == phone)
            .count()
    }
}

#[async_trait]
impl PlatformClient for ScriptedPlatform {
    async fn user_profile(
        &self,
        _phone: &str,
        _group: &str,
        user: &str,
    ) -> Result<UserProfile, PlatformError> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .get(user)
            .cloned()
            .unwrap_or(UserProfile {
                has_username: true,
                already_member: false,
                last_seen: LastSeen::Recently,
            }))
    }

    async fn add_user(&self, phone: &str, _group: &str, user: &str) -> Result<(), PlatformError> {
        self.calls
            .lock()
            .unwrap()
            .push((phone.to_string(), user.to_string()));
        self.outcomes
            .lock()
            .unwrap()
            .get_mut(user)
            .and_then(|queue| queue.pop_front())
            .unwrap_or(Ok(()))
    }
}
