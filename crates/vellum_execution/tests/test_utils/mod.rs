//! Test utilities for Vellum execution tests.
//!
//! This module provides mock implementations and test helpers.

pub mod mock_service;

#[allow(unused_imports)]
pub use mock_service::{MockBehavior, MockCall, MockGenerationService};
