//! Deserialization targets for GitHub REST payloads.
//!
//! `Api*` types mirror the wire shape and convert into the host-agnostic
//! domain types from [`crate::pull`]. Conversions that can observe
//! malformed data are `TryFrom` and fail as contract violations.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::pull::{Comment, Commit, ContextError, File, FileStatus, Review};

/// Login of the service account GitHub uses for commits made through the
/// web UI.
const WEB_FLOW_LOGIN: &str = "web-flow";

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRepository {
    pub(super) id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiBranchRef {
    #[serde(rename = "ref")]
    pub(super) ref_name: String,
    pub(super) label: Option<String>,
    pub(super) repo: Option<ApiRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) user: Option<ApiUser>,
    pub(super) base: ApiBranchRef,
    pub(super) head: ApiBranchRef,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiFile {
    pub(super) filename: String,
    pub(super) status: Option<String>,
    pub(super) additions: u64,
    pub(super) deletions: u64,
}

impl TryFrom<ApiFile> for File {
    type Error = ContextError;

    fn try_from(value: ApiFile) -> Result<Self, Self::Error> {
        if value.filename.is_empty() {
            return Err(ContextError::ContractViolation {
                message: "changed file has an empty filename".to_owned(),
            });
        }

        // GitHub also reports renamed/copied/changed; the contract folds
        // those into Modified.
        let status = match value.status.as_deref() {
            Some("added") => FileStatus::Added,
            Some("removed" | "deleted") => FileStatus::Deleted,
            _ => FileStatus::Modified,
        };

        Ok(Self {
            filename: value.filename,
            status,
            additions: value.additions,
            deletions: value.deletions,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommitParent {
    pub(super) sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiGitIdentity {
    pub(super) date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiGitCommit {
    pub(super) author: Option<ApiGitIdentity>,
    pub(super) committer: Option<ApiGitIdentity>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommit {
    pub(super) sha: String,
    #[serde(default)]
    pub(super) parents: Vec<ApiCommitParent>,
    pub(super) commit: ApiGitCommit,
    pub(super) author: Option<ApiUser>,
    pub(super) committer: Option<ApiUser>,
}

impl TryFrom<ApiCommit> for Commit {
    type Error = ContextError;

    fn try_from(value: ApiCommit) -> Result<Self, Self::Error> {
        let created_at = value
            .commit
            .committer
            .as_ref()
            .and_then(|identity| identity.date)
            .or_else(|| {
                value
                    .commit
                    .author
                    .as_ref()
                    .and_then(|identity| identity.date)
            })
            .ok_or_else(|| ContextError::ContractViolation {
                message: format!("commit {} carries no timestamp", value.sha),
            })?;

        let committer = value.committer.and_then(|user| user.login);
        let committed_via_web = committer.as_deref() == Some(WEB_FLOW_LOGIN);

        Ok(Self {
            sha: value.sha,
            parents: value.parents.into_iter().map(|parent| parent.sha).collect(),
            created_at,
            committed_via_web,
            author: value.author.and_then(|user| user.login),
            committer,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiIssueComment {
    pub(super) user: Option<ApiUser>,
    pub(super) body: Option<String>,
    pub(super) created_at: DateTime<Utc>,
}

impl From<ApiIssueComment> for Comment {
    fn from(value: ApiIssueComment) -> Self {
        Self {
            created_at: value.created_at,
            author: value.user.and_then(|user| user.login).unwrap_or_default(),
            body: value.body.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiReview {
    pub(super) id: u64,
    pub(super) node_id: Option<String>,
    pub(super) user: Option<ApiUser>,
    pub(super) body: Option<String>,
    pub(super) state: String,
    pub(super) submitted_at: Option<DateTime<Utc>>,
}

impl TryFrom<ApiReview> for Review {
    type Error = ContextError;

    fn try_from(value: ApiReview) -> Result<Self, Self::Error> {
        // REST reports states upper-case (e.g. APPROVED); the domain
        // tokens are lower-case.
        let state = value.state.to_ascii_lowercase().parse()?;

        // Pending reviews have not been submitted yet and carry no
        // timestamp; they sort before every submitted review.
        let created_at = value.submitted_at.unwrap_or(DateTime::UNIX_EPOCH);

        Ok(Self {
            id: value.node_id.unwrap_or_else(|| value.id.to_string()),
            created_at,
            author: value.user.and_then(|user| user.login).unwrap_or_default(),
            state,
            body: value.body.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiTeamMembership {
    pub(super) state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCollaboratorPermission {
    pub(super) permission: String,
}

#[cfg(test)]
mod tests {
    #![expect(clippy::expect_used, reason = "Tests panic on failure")]

    use rstest::rstest;
    use serde_json::json;

    use super::{ApiCommit, ApiFile, ApiPullRequest, ApiReview};
    use crate::pull::{Commit, ContextError, File, FileStatus, Review, ReviewState};

    #[rstest]
    #[case::added("added", FileStatus::Added)]
    #[case::removed("removed", FileStatus::Deleted)]
    #[case::modified("modified", FileStatus::Modified)]
    #[case::renamed_folds_to_modified("renamed", FileStatus::Modified)]
    #[case::copied_folds_to_modified("copied", FileStatus::Modified)]
    fn api_file_status_maps_onto_the_closed_enum(
        #[case] status: &str,
        #[case] expected: FileStatus,
    ) {
        let api: ApiFile = serde_json::from_value(json!({
            "filename": "src/lib.rs",
            "status": status,
            "additions": 3,
            "deletions": 1
        }))
        .expect("ApiFile should deserialize");

        let file = File::try_from(api).expect("conversion should succeed");
        assert_eq!(file.status, expected);
        assert_eq!(file.filename, "src/lib.rs");
        assert_eq!(file.additions, 3);
        assert_eq!(file.deletions, 1);
    }

    #[test]
    fn api_file_with_an_empty_filename_is_a_contract_violation() {
        let api: ApiFile = serde_json::from_value(json!({
            "filename": "",
            "status": "added",
            "additions": 0,
            "deletions": 0
        }))
        .expect("ApiFile should deserialize");

        let result = File::try_from(api);
        assert!(
            matches!(result, Err(ContextError::ContractViolation { .. })),
            "expected ContractViolation, got {result:?}"
        );
    }

    fn sample_api_commit(committer_login: Option<&str>) -> ApiCommit {
        let committer = committer_login
            .map_or(serde_json::Value::Null, |login| json!({ "login": login }));
        serde_json::from_value(json!({
            "sha": "abc123",
            "parents": [{ "sha": "p1" }, { "sha": "p2" }],
            "commit": {
                "author": { "date": "2025-01-01T00:00:00Z" },
                "committer": { "date": "2025-01-02T00:00:00Z" }
            },
            "author": { "login": "alice" },
            "committer": committer
        }))
        .expect("ApiCommit should deserialize")
    }

    #[test]
    fn api_commit_converts_parents_identities_and_timestamp() {
        let commit = Commit::try_from(sample_api_commit(Some("bob"))).expect("should convert");

        assert_eq!(commit.sha, "abc123");
        assert_eq!(commit.parents, vec!["p1".to_owned(), "p2".to_owned()]);
        assert_eq!(commit.created_at.to_rfc3339(), "2025-01-02T00:00:00+00:00");
        assert_eq!(commit.users(), vec!["alice", "bob"]);
        assert!(!commit.committed_via_web);
    }

    #[test]
    fn api_commit_detects_web_commits_from_the_web_flow_committer() {
        let commit = Commit::try_from(sample_api_commit(Some("web-flow"))).expect("should convert");
        assert!(commit.committed_via_web);
    }

    #[test]
    fn api_commit_with_no_linked_committer_yields_none() {
        let commit = Commit::try_from(sample_api_commit(None)).expect("should convert");
        assert_eq!(commit.committer, None);
        assert_eq!(commit.users(), vec!["alice"]);
    }

    #[test]
    fn api_commit_without_any_timestamp_is_a_contract_violation() {
        let api: ApiCommit = serde_json::from_value(json!({
            "sha": "abc123",
            "parents": [],
            "commit": { "author": null, "committer": null },
            "author": null,
            "committer": null
        }))
        .expect("ApiCommit should deserialize");

        let result = Commit::try_from(api);
        assert!(
            matches!(result, Err(ContextError::ContractViolation { .. })),
            "expected ContractViolation, got {result:?}"
        );
    }

    #[rstest]
    #[case::approved("APPROVED", ReviewState::Approved)]
    #[case::changes_requested("CHANGES_REQUESTED", ReviewState::ChangesRequested)]
    #[case::lower_case_passthrough("dismissed", ReviewState::Dismissed)]
    fn api_review_states_map_case_insensitively(
        #[case] state: &str,
        #[case] expected: ReviewState,
    ) {
        let api: ApiReview = serde_json::from_value(json!({
            "id": 7,
            "node_id": "MDEx",
            "user": { "login": "carol" },
            "body": "Looks good",
            "state": state,
            "submitted_at": "2025-01-03T00:00:00Z"
        }))
        .expect("ApiReview should deserialize");

        let review = Review::try_from(api).expect("conversion should succeed");
        assert_eq!(review.state, expected);
        assert_eq!(review.id, "MDEx");
        assert_eq!(review.author, "carol");
    }

    #[test]
    fn api_review_falls_back_to_the_numeric_id_without_a_node_id() {
        let api: ApiReview = serde_json::from_value(json!({
            "id": 99,
            "node_id": null,
            "user": null,
            "body": null,
            "state": "COMMENTED",
            "submitted_at": "2025-01-03T00:00:00Z"
        }))
        .expect("ApiReview should deserialize");

        let review = Review::try_from(api).expect("conversion should succeed");
        assert_eq!(review.id, "99");
        assert_eq!(review.author, "");
    }

    #[test]
    fn api_review_with_an_unknown_state_is_a_contract_violation() {
        let api: ApiReview = serde_json::from_value(json!({
            "id": 1,
            "node_id": "MDEx",
            "user": null,
            "body": null,
            "state": "SHRUGGED",
            "submitted_at": null
        }))
        .expect("ApiReview should deserialize");

        let result = Review::try_from(api);
        assert!(
            matches!(result, Err(ContextError::ContractViolation { .. })),
            "expected ContractViolation, got {result:?}"
        );
    }

    #[test]
    fn api_pull_request_exposes_branch_refs_and_repo_ids() {
        let api: ApiPullRequest = serde_json::from_value(json!({
            "user": { "login": "dana" },
            "base": {
                "ref": "main",
                "label": "acme:main",
                "repo": { "id": 1 }
            },
            "head": {
                "ref": "fix-1",
                "label": "alice:fix-1",
                "repo": { "id": 2 }
            }
        }))
        .expect("ApiPullRequest should deserialize");

        assert_eq!(api.base.ref_name, "main");
        assert_eq!(api.head.label.as_deref(), Some("alice:fix-1"));
        let base_repo = api.base.repo.expect("base repo should be present");
        let head_repo = api.head.repo.expect("head repo should be present");
        assert_ne!(base_repo.id, head_repo.id);
    }
}
