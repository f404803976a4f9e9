//! Backend test support utilities
//!
//! Shared by the drieslag unit and integration tests: logging
//! initialization, problem+json assertions and unique test data.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
