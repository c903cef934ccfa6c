//! fix-review library crate
//!
//! Exposes the review core (fix list, cascade, markers, session) so the
//! binary, benchmarks and tests can drive it without a terminal.

pub mod app;
pub mod config;
pub mod endpoint;
pub mod filetree;
pub mod fix;
pub mod logging;
pub mod marker;
pub mod session;
pub mod ui;
pub mod util;
pub mod viewer;
