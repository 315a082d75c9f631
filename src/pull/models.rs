//! Entity models for pull request state.
//!
//! These are read-only snapshots handed out by a [`Context`] accessor: a
//! backend adapter owns the authoritative hosting-service state and may
//! cache or refetch it, but the values themselves carry no mutation
//! methods. Consumers must not assume any ordering beyond what each
//! accessor documents.
//!
//! [`Context`]: super::context::Context

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ContextError;

/// Change status of one file within a pull request snapshot.
///
/// Exactly one status applies per file per snapshot. The enumeration is
/// closed: a new hosting-side status must be mapped onto one of these
/// variants by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// The file existed before and was changed.
    Modified,
    /// The file was created by this pull request.
    Added,
    /// The file was removed by this pull request.
    Deleted,
}

impl FileStatus {
    /// Returns the literal token for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Modified => "modified",
            Self::Added => "added",
            Self::Deleted => "deleted",
        }
    }
}

impl FromStr for FileStatus {
    type Err = ContextError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "modified" => Ok(Self::Modified),
            "added" => Ok(Self::Added),
            "deleted" => Ok(Self::Deleted),
            other => Err(ContextError::ContractViolation {
                message: format!("unknown file status token: {other:?}"),
            }),
        }
    }
}

/// One file touched by a pull request.
///
/// Produced fresh on each `changed_files` call; a file has no identity
/// beyond its name within one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// Path of the file within the repository. Never empty.
    pub filename: String,
    /// Change status of the file in this snapshot.
    pub status: FileStatus,
    /// Number of lines added.
    pub additions: u64,
    /// Number of lines deleted.
    pub deletions: u64,
}

/// One commit reachable from a pull request's head branch, or from the
/// target branch when returned by `target_commits`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Commit SHA, unique within its repository.
    pub sha: String,
    /// Parent SHAs in order: none for a root commit, two or more for a
    /// merge.
    pub parents: Vec<String>,
    /// Creation timestamp used for chronological ordering.
    pub created_at: DateTime<Utc>,
    /// True when the commit was produced through the hosting service's web
    /// UI rather than a local client.
    pub committed_via_web: bool,
    /// Login of the linked author identity. `None` means no real platform
    /// user is linked (for example an email-only commit); the source
    /// system modelled this as an empty string, which this crate
    /// deliberately replaces with an option so the unlinked state cannot
    /// be confused with a present-but-empty login.
    pub author: Option<String>,
    /// Login of the linked committer identity; `None` as for `author`.
    pub committer: Option<String>,
}

impl Commit {
    /// Returns the logins associated with this commit: the author first
    /// when linked, then the committer when linked. A commit with neither
    /// identity linked yields an empty sequence.
    #[must_use]
    pub fn users(&self) -> Vec<&str> {
        let mut users = Vec::with_capacity(2);
        if let Some(author) = self.author.as_deref() {
            users.push(author);
        }
        if let Some(committer) = self.committer.as_deref() {
            users.push(committer);
        }
        users
    }
}

/// Sorts commits ascending by creation time.
///
/// The sort is stable, so ties keep their incoming order and re-sorting an
/// already sorted sequence is a no-op.
pub fn sort_by_creation_time(commits: &mut [Commit]) {
    commits.sort_by_key(|commit| commit.created_at);
}

/// A pull-request-level discussion comment (not a line comment).
///
/// Comments carry no identity; the sequence returned by a context is
/// append-only with adapter-defined ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Login of the comment author.
    pub author: String,
    /// Raw comment text.
    pub body: String,
}

/// Current state of a formal code review submission.
///
/// A dismissal is modelled as a state change on the same review record,
/// so a record only ever carries its current state, never a transition
/// log. A dismissed review must never be treated as a live approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    /// The reviewer approved the changes.
    Approved,
    /// The reviewer requested changes.
    ChangesRequested,
    /// The reviewer left comments without a verdict.
    Commented,
    /// An earlier verdict was dismissed and no longer applies.
    Dismissed,
    /// The review was started but not yet submitted.
    Pending,
}

impl ReviewState {
    /// Returns the literal token for this state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::ChangesRequested => "changes_requested",
            Self::Commented => "commented",
            Self::Dismissed => "dismissed",
            Self::Pending => "pending",
        }
    }
}

impl FromStr for ReviewState {
    type Err = ContextError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "approved" => Ok(Self::Approved),
            "changes_requested" => Ok(Self::ChangesRequested),
            "commented" => Ok(Self::Commented),
            "dismissed" => Ok(Self::Dismissed),
            "pending" => Ok(Self::Pending),
            other => Err(ContextError::ContractViolation {
                message: format!("unknown review state token: {other:?}"),
            }),
        }
    }
}

/// A formal code review on a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    /// Host-assigned identifier. A later dismissal resolves back to the
    /// review with this id rather than creating a new record.
    pub id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Login of the reviewer.
    pub author: String,
    /// Current state of the review.
    pub state: ReviewState,
    /// Review body text.
    pub body: String,
}

/// Collapses a review list to the latest state per review id.
///
/// When the same id appears more than once, the entry with the latest
/// `created_at` wins; on equal timestamps the later entry in the slice
/// wins. Consumers checking for live approvals must use this view so a
/// dismissal overrides the approval it targets.
#[must_use]
pub fn latest_state_by_id(reviews: &[Review]) -> HashMap<&str, ReviewState> {
    let mut latest: HashMap<&str, &Review> = HashMap::new();
    for review in reviews {
        let slot = latest.entry(review.id.as_str()).or_insert(review);
        if review.created_at >= slot.created_at {
            *slot = review;
        }
    }
    latest
        .into_iter()
        .map(|(id, review)| (id, review.state))
        .collect()
}

/// Base and head branch names of a pull request.
///
/// The base is always the bare target branch name. The head is bare only
/// when the source branch lives in the target repository; a head from a
/// fork is prefixed `"<fork-owner>:<branch-name>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branches {
    base: String,
    head: String,
}

impl Branches {
    /// Builds branch names for a pull request whose source branch lives in
    /// the target repository.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::ContractViolation` when either name is empty.
    pub fn same_repository(base: &str, head: &str) -> Result<Self, ContextError> {
        Self::validated(base, head.to_owned())
    }

    /// Builds branch names for a pull request opened from a fork, prefixing
    /// the head with the fork owner.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::ContractViolation` when the base, fork owner,
    /// or branch name is empty.
    pub fn from_fork(base: &str, fork_owner: &str, head: &str) -> Result<Self, ContextError> {
        if fork_owner.is_empty() {
            return Err(ContextError::ContractViolation {
                message: "fork owner must not be empty".to_owned(),
            });
        }
        Self::validated(base, format!("{fork_owner}:{head}"))
    }

    fn validated(base: &str, head: String) -> Result<Self, ContextError> {
        if base.is_empty() {
            return Err(ContextError::ContractViolation {
                message: "base branch must not be empty".to_owned(),
            });
        }
        if head.is_empty() || head.ends_with(':') {
            return Err(ContextError::ContractViolation {
                message: "head branch must not be empty".to_owned(),
            });
        }
        Ok(Self {
            base: base.to_owned(),
            head,
        })
    }

    /// Bare name of the target branch.
    #[must_use]
    pub const fn base(&self) -> &str {
        self.base.as_str()
    }

    /// Head branch name, fork-prefixed when the source branch lives in a
    /// fork.
    #[must_use]
    pub const fn head(&self) -> &str {
        self.head.as_str()
    }
}
