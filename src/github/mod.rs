//! GitHub-flavoured adapter for the pull request contracts.
//!
//! Implements [`Context`](crate::pull::Context) and
//! [`MembershipContext`](crate::pull::MembershipContext) over the GitHub
//! REST API via Octocrab. Errors are mapped onto the context taxonomy so
//! callers never see Octocrab internals.

pub mod client;
mod context;
mod error_mapping;
mod membership;
mod models;

pub use client::{PersonalAccessToken, api_base_for_host};
pub use context::GithubContext;
pub use membership::{GithubMembership, PermissionLevel};
