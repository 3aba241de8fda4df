use crate::error::{AuthError, PlatformError};
use async_trait::async_trait;

/// Outcome of a code validation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The session is signed in and usable.
    SignedIn,
    /// The account has 2FA enabled; a password step must follow.
    PasswordNeeded,
}

/// Login/OTP/2FA handshake with the messaging platform.
///
/// Sessions live with the implementor, keyed by phone number; the core
/// only tracks whether the handshake has completed.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Request an OTP code to be sent to the phone.
    async fn send_code(&self, phone: &str) -> Result<(), AuthError>;

    /// Validate the received OTP code.
    async fn validate_code(&self, phone: &str, code: &str) -> Result<AuthOutcome, AuthError>;

    /// Complete a 2FA login with the account password.
    async fn validate_password(&self, phone: &str, password: &str) -> Result<(), AuthError>;
}

/// Coarse last-seen status of a target user, used for skip evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastSeen {
    /// Exact offline timestamp known, expressed as whole days ago.
    DaysAgo(i64),
    Recently,
    WithinWeek,
    WithinMonth,
    /// Status withheld by privacy settings.
    Hidden,
}

/// Pre-attempt view of a target user, as seen through one account's session.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub has_username: bool,
    pub already_member: bool,
    pub last_seen: LastSeen,
}

/// The add-user capability of the messaging platform.
///
/// Implementations own the wire protocol; the worker only sees the raw
/// [`PlatformError`] outcomes, which it folds through the classifier.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Probe a target user through `phone`'s session, for skip evaluation.
    async fn user_profile(
        &self,
        phone: &str,
        group: &str,
        user: &str,
    ) -> Result<UserProfile, PlatformError>;

    /// Attempt to add `user` to `group` using `phone`'s session.
    async fn add_user(&self, phone: &str, group: &str, user: &str) -> Result<(), PlatformError>;
}
