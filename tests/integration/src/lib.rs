//! Integration test utilities for the reaction services
//!
//! This crate provides helpers for running end-to-end tests against the
//! service layer on either storage backend.

pub mod helpers;
pub mod fixtures;

pub use helpers::*;
pub use fixtures::*;
