//! Host-agnostic pull request state and authorization contracts.
//!
//! This module defines the entity models for a pull request's files,
//! commits, comments, and reviews, together with the [`Context`] and
//! [`MembershipContext`] traits a hosting backend adapter must satisfy.
//! Policy logic depends only on these contracts; adapters own the
//! hosting API, authentication, caching, and pagination.

pub mod context;
pub mod error;
pub mod locator;
pub mod models;
#[cfg(feature = "test-support")]
pub mod test_support;

pub use context::{Context, MembershipContext};
pub use error::{ContextError, ErrorKind};
pub use locator::{
    PullRequestNumber, PullRequestRef, RepositoryName, RepositoryOwner, TeamSlug,
};
pub use models::{
    Branches, Comment, Commit, File, FileStatus, Review, ReviewState, latest_state_by_id,
    sort_by_creation_time,
};

#[cfg(test)]
pub use context::MockMembershipContext;
