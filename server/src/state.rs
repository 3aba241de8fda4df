use adder_core::{Authenticator, JobController, PhonePool};
use std::sync::Arc;

/// Shared application state handed to every handler.
pub struct AppState {
    pub pool: Arc<PhonePool>,
    pub controller: Arc<JobController>,
    pub authenticator: Arc<dyn Authenticator>,
}
