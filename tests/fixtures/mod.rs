//! Test fixtures for rota-planner.
//!
//! Provides realistic test data:
//! - Points in Natal/RN neighborhoods
//! - A test stop builder and distance services with controllable failures

#![allow(dead_code, unused_imports)]

pub mod natal_locations;
pub mod stops;

pub use natal_locations::*;
pub use stops::*;
