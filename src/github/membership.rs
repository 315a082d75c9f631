//! Membership and permission queries against the GitHub API.
//!
//! GitHub answers membership probes with status codes rather than bodies,
//! so these queries go through Octocrab's raw request path and inspect
//! the response status directly.
//!
//! The REST API returns 404 both for a missing org or team and for a
//! resolvable one the user does not belong to, so this adapter
//! deterministically maps 404 on the two membership probes to `Ok(false)`.
//! The collaborator permission endpoint only returns 404 when the
//! repository or user cannot be resolved, so there it maps to a lookup
//! error.

use std::str::FromStr;

use async_trait::async_trait;
use http::{StatusCode, Uri};
use octocrab::Octocrab;
use tracing::debug;
use url::Url;

use super::client::{PersonalAccessToken, build_octocrab_client};
use super::error_mapping::{extract_github_message, map_http_error, map_octocrab_error};
use super::models::{ApiCollaboratorPermission, ApiTeamMembership};
use crate::pull::{ContextError, MembershipContext, TeamSlug};

/// Repository permission level on GitHub's documented scale.
///
/// The variant order is the total ordering used by `is_collaborator`:
/// `None < Read < Triage < Write < Maintain < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PermissionLevel {
    /// No access.
    None,
    /// Read and clone access.
    Read,
    /// Read access plus issue and pull request management.
    Triage,
    /// Push access.
    Write,
    /// Push access plus repository management short of destructive
    /// actions.
    Maintain,
    /// Full administrative access.
    Admin,
}

impl PermissionLevel {
    /// Returns the GitHub API token for this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Read => "read",
            Self::Triage => "triage",
            Self::Write => "write",
            Self::Maintain => "maintain",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for PermissionLevel {
    type Err = ContextError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "none" => Ok(Self::None),
            // "pull" and "push" are the legacy aliases older endpoints
            // report.
            "read" | "pull" => Ok(Self::Read),
            "triage" => Ok(Self::Triage),
            "write" | "push" => Ok(Self::Write),
            "maintain" => Ok(Self::Maintain),
            "admin" => Ok(Self::Admin),
            other => Err(ContextError::UnknownPermission {
                permission: other.to_owned(),
            }),
        }
    }
}

fn parse_relative_uri(path: &str, operation: &str) -> Result<Uri, ContextError> {
    path.parse::<Uri>().map_err(|error| ContextError::Api {
        message: format!("{operation} path is invalid: {error}"),
    })
}

fn decode_failure(operation: &str, error: &octocrab::Error) -> ContextError {
    ContextError::Api {
        message: format!("{operation} response decode failed: {error}"),
    }
}

/// Queries team membership for `user` against an `"org/team"` slug.
pub(super) async fn query_team_membership(
    client: &Octocrab,
    team: &str,
    user: &str,
) -> Result<bool, ContextError> {
    const OPERATION: &str = "team membership";

    let slug = TeamSlug::parse(team)?;
    debug!(team = %slug, user, "querying team membership");

    let path = format!(
        "/orgs/{}/teams/{}/memberships/{user}",
        slug.org(),
        slug.team()
    );
    let uri = parse_relative_uri(&path, OPERATION)?;
    let response = client
        ._get(uri)
        .await
        .map_err(|error| map_octocrab_error(OPERATION, &error))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Ok(false);
    }

    let body = client
        .body_to_string(response)
        .await
        .map_err(|error| decode_failure(OPERATION, &error))?;

    if !status.is_success() {
        return Err(map_http_error(
            OPERATION,
            status,
            extract_github_message(&body),
        ));
    }

    let membership: ApiTeamMembership =
        serde_json::from_str(&body).map_err(|error| ContextError::Api {
            message: format!("{OPERATION} response deserialization failed: {error}"),
        })?;
    // A pending invitation is not membership.
    Ok(membership.state == "active")
}

/// Queries organization membership for `user`.
pub(super) async fn query_org_membership(
    client: &Octocrab,
    org: &str,
    user: &str,
) -> Result<bool, ContextError> {
    const OPERATION: &str = "org membership";

    debug!(org, user, "querying org membership");

    let uri = parse_relative_uri(&format!("/orgs/{org}/members/{user}"), OPERATION)?;
    let response = client
        ._get(uri)
        .await
        .map_err(|error| map_octocrab_error(OPERATION, &error))?;

    let status = response.status();
    match status {
        StatusCode::NO_CONTENT => Ok(true),
        StatusCode::NOT_FOUND => Ok(false),
        // 302 means the requester may not probe this organization's
        // members at all.
        StatusCode::FOUND => Err(ContextError::Authentication {
            message: format!("{OPERATION} failed: requester cannot view members of {org}"),
        }),
        _ => {
            let body = client
                .body_to_string(response)
                .await
                .unwrap_or_else(|_| String::new());
            Err(map_http_error(
                OPERATION,
                status,
                extract_github_message(&body),
            ))
        }
    }
}

/// Queries whether `user`'s permission on `org/repo` meets `desired_perm`.
pub(super) async fn query_collaborator_permission(
    client: &Octocrab,
    org: &str,
    repo: &str,
    user: &str,
    desired_perm: &str,
) -> Result<bool, ContextError> {
    const OPERATION: &str = "collaborator permission";

    let desired = PermissionLevel::from_str(desired_perm)?;
    debug!(
        org,
        repo,
        user,
        desired = desired.as_str(),
        "querying collaborator permission"
    );

    let uri = parse_relative_uri(
        &format!("/repos/{org}/{repo}/collaborators/{user}/permission"),
        OPERATION,
    )?;
    let response = client
        ._get(uri)
        .await
        .map_err(|error| map_octocrab_error(OPERATION, &error))?;

    let status = response.status();
    let body = client
        .body_to_string(response)
        .await
        .map_err(|error| decode_failure(OPERATION, &error))?;

    if !status.is_success() {
        return Err(map_http_error(
            OPERATION,
            status,
            extract_github_message(&body),
        ));
    }

    let granted: ApiCollaboratorPermission =
        serde_json::from_str(&body).map_err(|error| ContextError::Api {
            message: format!("{OPERATION} response deserialization failed: {error}"),
        })?;
    let level =
        PermissionLevel::from_str(&granted.permission).map_err(|_| ContextError::ContractViolation {
            message: format!(
                "GitHub reported an unrecognized permission: {:?}",
                granted.permission
            ),
        })?;
    Ok(level >= desired)
}

/// Membership oracle backed by the GitHub API.
///
/// Unlike [`GithubContext`](super::GithubContext) this is not bound to a
/// pull request and can serve queries for any org, team, or repository
/// the token can see.
pub struct GithubMembership {
    client: Octocrab,
}

impl GithubMembership {
    /// Creates a membership oracle from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds a membership oracle for the given token and API base URL.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::Api` when the client cannot be constructed.
    pub fn for_token(token: &PersonalAccessToken, api_base: &Url) -> Result<Self, ContextError> {
        Ok(Self::new(build_octocrab_client(token, api_base)?))
    }
}

#[async_trait]
impl MembershipContext for GithubMembership {
    async fn is_team_member(&self, team: &str, user: &str) -> Result<bool, ContextError> {
        query_team_membership(&self.client, team, user).await
    }

    async fn is_org_member(&self, org: &str, user: &str) -> Result<bool, ContextError> {
        query_org_membership(&self.client, org, user).await
    }

    async fn is_collaborator(
        &self,
        org: &str,
        repo: &str,
        user: &str,
        desired_perm: &str,
    ) -> Result<bool, ContextError> {
        query_collaborator_permission(&self.client, org, repo, user, desired_perm).await
    }
}
