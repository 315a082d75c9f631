//! Identity wrappers for pull requests, repositories, and teams.
//!
//! These newtypes keep owner, repository, team, and number parameters from
//! being swapped at call sites and validate the string formats the contract
//! depends on.

use std::fmt;

use super::error::ContextError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Wraps a non-empty owner name.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::ContractViolation` when the value is empty.
    pub fn new(value: &str) -> Result<Self, ContextError> {
        if value.is_empty() {
            return Err(ContextError::ContractViolation {
                message: "repository owner must not be empty".to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Wraps a non-empty repository name.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::ContractViolation` when the value is empty.
    pub fn new(value: &str) -> Result<Self, ContextError> {
        if value.is_empty() {
            return Err(ContextError::ContractViolation {
                message: "repository name must not be empty".to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    /// Wraps a positive pull request number.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::ContractViolation` when the value is zero.
    pub fn new(value: u64) -> Result<Self, ContextError> {
        if value == 0 {
            return Err(ContextError::ContractViolation {
                message: "pull request number must be positive".to_owned(),
            });
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Identifies one pull request by target repository and number.
///
/// The [`fmt::Display`] rendering is the canonical locator string
/// `"<owner>/<repository>#<number>"`, stable for the lifetime of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    owner: RepositoryOwner,
    repository: RepositoryName,
    number: PullRequestNumber,
}

impl PullRequestRef {
    /// Builds a reference from raw owner, repository, and number values.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::ContractViolation` when the owner or
    /// repository is empty or the number is zero.
    pub fn new(owner: &str, repository: &str, number: u64) -> Result<Self, ContextError> {
        Ok(Self {
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repository)?,
            number: PullRequestNumber::new(number)?,
        })
    }

    /// Owner of the target repository.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Name of the target repository.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Pull request number.
    #[must_use]
    pub const fn number(&self) -> PullRequestNumber {
        self.number
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}#{}",
            self.owner.as_str(),
            self.repository.as_str(),
            self.number.get()
        )
    }
}

/// A team identifier in the `"org-name/team-name"` format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSlug {
    org: String,
    team: String,
}

impl TeamSlug {
    /// Parses an `"org-name/team-name"` identifier.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::MalformedTeamSlug` when the input does not
    /// contain exactly one separating slash with non-empty halves.
    pub fn parse(input: &str) -> Result<Self, ContextError> {
        let malformed = || ContextError::MalformedTeamSlug {
            slug: input.to_owned(),
        };

        let (org, team) = input.split_once('/').ok_or_else(malformed)?;
        if org.is_empty() || team.is_empty() || team.contains('/') {
            return Err(malformed());
        }

        Ok(Self {
            org: org.to_owned(),
            team: team.to_owned(),
        })
    }

    /// Organization half of the slug.
    #[must_use]
    pub const fn org(&self) -> &str {
        self.org.as_str()
    }

    /// Team half of the slug.
    #[must_use]
    pub const fn team(&self) -> &str {
        self.team.as_str()
    }
}

impl fmt::Display for TeamSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.org, self.team)
    }
}
