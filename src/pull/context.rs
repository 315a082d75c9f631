//! Contracts a hosting backend adapter must satisfy.
//!
//! [`MembershipContext`] answers identity and authorization queries;
//! [`Context`] extends it with accessors scoped to exactly one pull
//! request. The trait-based design lets policy logic run against any
//! hosting service while adapters own HTTP, authentication, caching, and
//! pagination.

use async_trait::async_trait;

use super::error::ContextError;
use super::models::{Branches, Comment, Commit, File, Review};

/// Answers membership and permission queries against a hosting service.
///
/// Each method is a single question with a single answer. Adapters must
/// not conflate "does not exist" with "exists but is not a member": an
/// unresolvable user, org, team, or repo is an error, while a resolvable
/// entity without membership is `Ok(false)`. Where the platform's API
/// cannot distinguish the two, the adapter must pick one mapping,
/// apply it deterministically, and document it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipContext: Send + Sync {
    /// Returns whether `user` is a member of the given team. Teams are
    /// identified as `"org-name/team-name"`.
    ///
    /// Nested or transitive membership is only reflected when the hosting
    /// platform resolves it natively.
    ///
    /// # Errors
    ///
    /// Fails with a lookup error for a malformed team identifier or an
    /// unresolvable org or team, and with a backend error when the hosting
    /// service cannot be reached.
    async fn is_team_member(&self, team: &str, user: &str) -> Result<bool, ContextError>;

    /// Returns whether `user` is a member of the organization as a whole,
    /// independent of any team.
    ///
    /// # Errors
    ///
    /// Fails with a lookup or backend error as for
    /// [`is_team_member`](Self::is_team_member).
    async fn is_org_member(&self, org: &str, user: &str) -> Result<bool, ContextError>;

    /// Returns whether the user's permission level on `org/repo` meets or
    /// exceeds `desired_perm`.
    ///
    /// Permission tokens are adapter-defined; the adapter must document a
    /// consistent total ordering so "meets or exceeds" is well defined.
    ///
    /// # Errors
    ///
    /// Fails with a lookup error for an unknown permission token or an
    /// unresolvable repo or user, and with a backend error on transport
    /// failures.
    async fn is_collaborator(
        &self,
        org: &str,
        repo: &str,
        user: &str,
        desired_perm: &str,
    ) -> Result<bool, ContextError>;
}

/// Accessors scoped to exactly one pull request.
///
/// A `Context` is a stateless facade over a near-point-in-time view of
/// hosting-service state: every accessor is idempotent, returns a fully
/// materialized result or an error, and may block on network I/O inside
/// the adapter. Adapters must never silently return a partial result
/// (such as the first page of a listing) as if it were complete.
///
/// One instance is bound to one pull request and is not required to
/// support concurrent accessor calls; callers needing parallelism must
/// serialize access or construct independent instances.
#[async_trait]
pub trait Context: MembershipContext {
    /// Owner of the repository the pull request targets (merges into),
    /// never the fork it may originate from.
    fn repository_owner(&self) -> &str;

    /// Name of the repository the pull request targets.
    fn repository_name(&self) -> &str;

    /// Number of the pull request within the target repository.
    fn number(&self) -> u64;

    /// Display identifier for the pull request, formatted exactly as
    /// `"<owner>/<repository>#<number>"` and stable for the lifetime of
    /// the instance.
    fn locator(&self) -> String {
        format!(
            "{}/{}#{}",
            self.repository_owner(),
            self.repository_name(),
            self.number()
        )
    }

    /// Login of the user who opened the pull request. Bots have logins
    /// too; a bot author is not an error.
    ///
    /// # Errors
    ///
    /// Fails only on backend failure.
    async fn author(&self) -> Result<String, ContextError>;

    /// Full snapshot of the files changed by the pull request at call
    /// time. Order is implementation-defined; repeated calls may reflect
    /// a newer snapshot if the pull request was updated.
    ///
    /// # Errors
    ///
    /// Fails on backend failure; never returns a partial listing.
    async fn changed_files(&self) -> Result<Vec<File>, ContextError>;

    /// All commits belonging to the pull request, in an
    /// implementation-defined order. Use
    /// [`sort_by_creation_time`](super::models::sort_by_creation_time)
    /// when a deterministic order is needed.
    ///
    /// # Errors
    ///
    /// Fails on backend failure; never returns a partial listing.
    async fn commits(&self) -> Result<Vec<Commit>, ContextError>;

    /// All discussion comments on the pull request, in an
    /// implementation-defined order.
    ///
    /// # Errors
    ///
    /// Fails on backend failure; never returns a partial listing.
    async fn comments(&self) -> Result<Vec<Comment>, ContextError>;

    /// All reviews on the pull request, in an implementation-defined
    /// order. Each record carries its current state only; use
    /// [`latest_state_by_id`](super::models::latest_state_by_id) to
    /// resolve dismissals against earlier verdicts.
    ///
    /// # Errors
    ///
    /// Fails on backend failure; never returns a partial listing.
    async fn reviews(&self) -> Result<Vec<Review>, ContextError>;

    /// Base and head branch names. The base is always bare; the head is
    /// fork-prefixed when the pull request originates from a fork.
    ///
    /// # Errors
    ///
    /// Fails on backend failure, or with a contract violation when the
    /// hosting service reports an empty base branch.
    async fn branches(&self) -> Result<Branches, ContextError>;

    /// A bounded window of recent commits on the target branch, used to
    /// detect rebases and fast-forward state. The window size is an
    /// adapter decision; callers must not assume completeness.
    ///
    /// # Errors
    ///
    /// Fails on backend failure.
    async fn target_commits(&self) -> Result<Vec<Commit>, ContextError>;
}
