//! Core domain types
//!
//! This module contains the structures shared between the HTTP client
//! (which decodes them from GitLab payloads) and the daemon (which watches
//! them). Only the fields the monitor needs are modelled; every other field
//! of the remote payload is ignored during decoding.

pub mod branch;
pub mod compare;
pub mod divergence;
pub mod merge_request;
pub mod project;

pub use branch::Branch;
pub use compare::Compare;
pub use divergence::Divergence;
pub use merge_request::{MergeRequest, MergeRequestIndex};
pub use project::{Project, ProjectId};
