//! # Core Error Types
//!
//! Centralized error definitions for the adder-core crate.
//! All errors implement `std::error::Error` and `std::fmt::Display`.

use thiserror::Error;

/// Phone pool errors
#[derive(Error, Debug, Clone)]
pub enum PoolError {
    #[error("Phone '{phone}' already exists in the pool")]
    DuplicateAccount { phone: String },

    #[error("Phone '{phone}' not found")]
    NotFound { phone: String },

    #[error("Failed to persist pool state to {path}: {msg}")]
    Persist { path: String, msg: String },

    #[error("Failed to load pool state from {path}: {msg}")]
    Load { path: String, msg: String },
}

/// Job controller errors, returned synchronously at request time.
#[derive(Error, Debug, Clone)]
pub enum JobError {
    #[error("An add operation is already in progress")]
    AlreadyRunning,

    #[error("Invalid job config: {reason}")]
    InvalidConfig { reason: String },
}

/// Login handshake errors surfaced by the external authenticator.
///
/// `PasswordNeeded` is not a failure: it signals that the account has 2FA
/// enabled and a password step must follow.
#[derive(Error, Debug, Clone)]
pub enum AuthError {
    #[error("SESSION_PASSWORD_NEEDED")]
    PasswordNeeded,

    #[error("This phone number is banned by the platform")]
    PhoneBanned,

    #[error("Invalid code provided")]
    InvalidCode,

    #[error("The code has expired")]
    CodeExpired,

    #[error("Invalid 2FA password provided")]
    InvalidPassword,

    #[error("No pending login for phone '{phone}'")]
    NoPendingLogin { phone: String },

    #[error("The phone number is not associated with any account")]
    NotRegistered,

    #[error("Authenticator error: {msg}")]
    Agent { msg: String },
}

/// Raw outcome of a single add attempt against the messaging platform.
///
/// The worker never branches on these directly; they are fed to the
/// failure classifier, which folds them into the three outcome classes.
#[derive(Error, Debug, Clone)]
pub enum PlatformError {
    #[error("Flood wait: {seconds}s required")]
    FloodWait { seconds: u64 },

    #[error("Peer flood: account flagged for spam")]
    PeerFlood,

    #[error("User privacy settings forbid the invite")]
    PrivacyRestricted,

    #[error("User is not a mutual contact")]
    NotMutualContact,

    #[error("Username does not exist")]
    UserNotFound,

    #[error("User is already a participant")]
    AlreadyParticipant,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unknown platform error: {0}")]
    Unknown(String),
}
