//! In-memory context fixtures for consumer test suites.
//!
//! [`StaticContext`] answers every [`Context`] and [`MembershipContext`]
//! query from plain fields, so policy logic can be exercised without a
//! hosting backend. Fields are public: tests construct a context and fill
//! in only the state a scenario needs.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;

use super::context::{Context, MembershipContext};
use super::error::ContextError;
use super::locator::{PullRequestRef, TeamSlug};
use super::models::{Branches, Comment, Commit, File, Review, ReviewState};

/// Builds a commit fixture with the given SHA and creation time in seconds
/// since the Unix epoch.
///
/// # Examples
///
/// ```
/// use porter::pull::test_support::commit_at;
///
/// let commit = commit_at("abc123", 1_700_000_000);
/// assert_eq!(commit.sha, "abc123");
/// assert!(commit.users().is_empty());
/// ```
#[must_use]
pub fn commit_at(sha: &str, seconds: i64) -> Commit {
    Commit {
        sha: sha.to_owned(),
        parents: Vec::new(),
        created_at: DateTime::from_timestamp(seconds, 0).unwrap_or(DateTime::UNIX_EPOCH),
        committed_via_web: false,
        author: None,
        committer: None,
    }
}

/// Builds a review fixture with the given id, author, and state.
///
/// # Examples
///
/// ```
/// use porter::pull::ReviewState;
/// use porter::pull::test_support::review_in_state;
///
/// let review = review_in_state("MDEx", "carol", ReviewState::Approved, 1_700_000_000);
/// assert_eq!(review.state, ReviewState::Approved);
/// ```
#[must_use]
pub fn review_in_state(id: &str, author: &str, state: ReviewState, seconds: i64) -> Review {
    Review {
        id: id.to_owned(),
        created_at: DateTime::from_timestamp(seconds, 0).unwrap_or(DateTime::UNIX_EPOCH),
        author: author.to_owned(),
        state,
        body: String::new(),
    }
}

/// A [`Context`] implementation backed entirely by in-memory state.
///
/// Membership maps key organizations and `"org/team"` slugs to member
/// logins; an absent key models an entity that does not exist and fails
/// as a lookup error, while a present key with a missing login answers
/// `false`. Collaborator permissions use the three-level scale
/// `read < write < admin`.
#[derive(Debug, Clone)]
pub struct StaticContext {
    pull_request: PullRequestRef,
    /// Login of the pull request opener.
    pub author: String,
    /// Snapshot returned by `changed_files`.
    pub changed_files: Vec<File>,
    /// Commits returned by `commits`.
    pub commits: Vec<Commit>,
    /// Comments returned by `comments`.
    pub comments: Vec<Comment>,
    /// Reviews returned by `reviews`.
    pub reviews: Vec<Review>,
    /// Bare name of the target branch.
    pub base_branch: String,
    /// Bare name of the source branch.
    pub head_branch: String,
    /// Owner of the fork the pull request originates from, when it does.
    pub fork_owner: Option<String>,
    /// Commits returned by `target_commits`.
    pub target_commits: Vec<Commit>,
    /// Members per `"org/team"` slug.
    pub teams: HashMap<String, Vec<String>>,
    /// Members per organization.
    pub org_members: HashMap<String, Vec<String>>,
    /// Permission token (`read`, `write`, or `admin`) per collaborator
    /// login on the target repository.
    pub collaborators: HashMap<String, String>,
}

impl StaticContext {
    /// Creates an empty context for the given pull request.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::ContractViolation` when the owner or
    /// repository is empty or the number is zero.
    pub fn new(owner: &str, repository: &str, number: u64) -> Result<Self, ContextError> {
        Ok(Self {
            pull_request: PullRequestRef::new(owner, repository, number)?,
            author: String::new(),
            changed_files: Vec::new(),
            commits: Vec::new(),
            comments: Vec::new(),
            reviews: Vec::new(),
            base_branch: "main".to_owned(),
            head_branch: "feature".to_owned(),
            fork_owner: None,
            target_commits: Vec::new(),
            teams: HashMap::new(),
            org_members: HashMap::new(),
            collaborators: HashMap::new(),
        })
    }

    fn permission_rank(token: &str) -> Result<u8, ContextError> {
        match token {
            "read" => Ok(1),
            "write" => Ok(2),
            "admin" => Ok(3),
            other => Err(ContextError::UnknownPermission {
                permission: other.to_owned(),
            }),
        }
    }
}

#[async_trait]
impl MembershipContext for StaticContext {
    async fn is_team_member(&self, team: &str, user: &str) -> Result<bool, ContextError> {
        let slug = TeamSlug::parse(team)?;
        self.teams.get(&slug.to_string()).map_or_else(
            || {
                Err(ContextError::Lookup {
                    message: format!("no such team: {slug}"),
                })
            },
            |members| Ok(members.iter().any(|member| member == user)),
        )
    }

    async fn is_org_member(&self, org: &str, user: &str) -> Result<bool, ContextError> {
        self.org_members.get(org).map_or_else(
            || {
                Err(ContextError::Lookup {
                    message: format!("no such organization: {org}"),
                })
            },
            |members| Ok(members.iter().any(|member| member == user)),
        )
    }

    async fn is_collaborator(
        &self,
        org: &str,
        repo: &str,
        user: &str,
        desired_perm: &str,
    ) -> Result<bool, ContextError> {
        if org != self.pull_request.owner().as_str()
            || repo != self.pull_request.repository().as_str()
        {
            return Err(ContextError::Lookup {
                message: format!("no such repository: {org}/{repo}"),
            });
        }

        let desired = Self::permission_rank(desired_perm)?;
        self.collaborators
            .get(user)
            .map_or(Ok(false), |granted| {
                Ok(Self::permission_rank(granted)? >= desired)
            })
    }
}

#[async_trait]
impl Context for StaticContext {
    fn repository_owner(&self) -> &str {
        self.pull_request.owner().as_str()
    }

    fn repository_name(&self) -> &str {
        self.pull_request.repository().as_str()
    }

    fn number(&self) -> u64 {
        self.pull_request.number().get()
    }

    async fn author(&self) -> Result<String, ContextError> {
        Ok(self.author.clone())
    }

    async fn changed_files(&self) -> Result<Vec<File>, ContextError> {
        Ok(self.changed_files.clone())
    }

    async fn commits(&self) -> Result<Vec<Commit>, ContextError> {
        Ok(self.commits.clone())
    }

    async fn comments(&self) -> Result<Vec<Comment>, ContextError> {
        Ok(self.comments.clone())
    }

    async fn reviews(&self) -> Result<Vec<Review>, ContextError> {
        Ok(self.reviews.clone())
    }

    async fn branches(&self) -> Result<Branches, ContextError> {
        self.fork_owner.as_deref().map_or_else(
            || Branches::same_repository(&self.base_branch, &self.head_branch),
            |fork_owner| Branches::from_fork(&self.base_branch, fork_owner, &self.head_branch),
        )
    }

    async fn target_commits(&self) -> Result<Vec<Commit>, ContextError> {
        Ok(self.target_commits.clone())
    }
}
