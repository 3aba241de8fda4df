//! Internal utility modules for the adder-core crate.

pub(crate) mod logger;

pub use logger::setup_logger;
