//! HTTP surface for the phone-pool scheduler.
//!
//! Thin layer over `adder-core`: request/response models, route handlers,
//! and the reqwest client for the session-agent sidecar that owns the
//! actual messaging-platform sessions.

pub mod agent;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
