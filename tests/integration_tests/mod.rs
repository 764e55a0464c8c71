//! Integration tests module
//!
//! End-to-end tests running real source directories through text stores,
//! cache stores and locales:
//! - Override precedence across source directories
//! - Runtime edits surviving restarts until refresh
//! - Missing-text policy and placeholder substitution

pub mod layered_sources_test;
pub mod persistence_test;
pub mod resolver_test;
