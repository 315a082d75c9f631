//! Porter: a host-agnostic view of pull request state for policy
//! evaluation.
//!
//! The [`pull`] module defines the entity models and the
//! [`Context`](pull::Context)/[`MembershipContext`](pull::MembershipContext)
//! contracts policy logic is written against; the [`github`] module
//! supplies an Octocrab-backed adapter. Backends own HTTP, caching, and
//! pagination, and every accessor returns a complete result or an error.

pub mod github;
pub mod pull;

pub use github::{GithubContext, GithubMembership, PermissionLevel, PersonalAccessToken};
pub use pull::{
    Branches, Comment, Commit, Context, ContextError, ErrorKind, File, FileStatus,
    MembershipContext, PullRequestRef, Review, ReviewState, TeamSlug,
};
