//! Driftwatch Core
//!
//! Core types for the Driftwatch branch divergence monitor.
//!
//! This crate contains:
//! - Domain types: GitLab entities as the monitor sees them (projects,
//!   branches, merge requests, compare results)
//! - Divergence reports produced by repository watchers

pub mod domain;
