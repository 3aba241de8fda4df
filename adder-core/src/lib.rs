//! # Adder Core - Phone Pool Scheduler
//!
//! The automation engine behind the group-adder service: a pool of
//! rate-limited, independently-failing phone sessions driven through a
//! long-running batch job that adds a list of target users to a group.
//!
//! ## Modules
//!
//! - [`pool`] - Account pool state machine (pauses, flood timers, counters)
//! - [`classifier`] - Maps raw platform outcomes to FloodWait/NonResult/Fatal
//! - [`job`] - Job controller with the single-active-job invariant
//! - [`config`] - Job configuration and skip flags
//! - [`error`] - Typed error handling with thiserror
//! - [`traits`] - Seams for the external authenticator and platform client
//! - [`store`] - JSON persistence for the pool

pub mod classifier;
pub mod config;
pub mod error;
pub mod job;
pub mod pool;
pub mod store;
pub mod traits;
mod worker;

pub(crate) mod utils;

pub use classifier::{classify, Outcome};
pub use config::{JobConfig, SkipFlag};
pub use error::{AuthError, JobError, PlatformError, PoolError};
pub use job::{AddJob, JobController, JobStatus, JobStatusView, StopResult};
pub use pool::{Account, PauseReason, PhonePool, DAILY_ADD_LIMIT};
pub use store::PoolStore;
pub use traits::{AuthOutcome, Authenticator, LastSeen, PlatformClient, UserProfile};

pub use utils::setup_logger;
