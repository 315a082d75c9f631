//! Octocrab-backed implementation of the pull request context.

use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use tracing::debug;
use url::Url;

use super::client::{PersonalAccessToken, build_octocrab_client};
use super::error_mapping::map_octocrab_error;
use super::membership::{
    query_collaborator_permission, query_org_membership, query_team_membership,
};
use super::models::{ApiCommit, ApiFile, ApiIssueComment, ApiPullRequest, ApiReview};
use crate::pull::{
    Branches, Comment, Commit, Context, ContextError, File, MembershipContext, PullRequestRef,
    Review,
};

/// Size of the recent-history window returned by `target_commits`.
const TARGET_COMMIT_WINDOW: &str = "100";

/// A [`Context`] bound to one pull request on a GitHub-style host.
///
/// Every accessor performs the API calls it needs when invoked; listings
/// follow pagination to the end, so a result is either complete or an
/// error. Construct one instance per pull request.
pub struct GithubContext {
    client: Octocrab,
    pull_request: PullRequestRef,
}

impl GithubContext {
    /// Creates a context from an Octocrab client and a pull request
    /// reference.
    #[must_use]
    pub const fn new(client: Octocrab, pull_request: PullRequestRef) -> Self {
        Self {
            client,
            pull_request,
        }
    }

    /// Builds a context for the given token, API base URL, and pull
    /// request.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::Api` when the client cannot be constructed.
    pub fn for_token(
        token: &PersonalAccessToken,
        api_base: &Url,
        pull_request: PullRequestRef,
    ) -> Result<Self, ContextError> {
        Ok(Self::new(build_octocrab_client(token, api_base)?, pull_request))
    }

    fn repo_path(&self) -> String {
        format!(
            "/repos/{}/{}",
            self.pull_request.owner().as_str(),
            self.pull_request.repository().as_str()
        )
    }

    fn pull_request_path(&self) -> String {
        format!("{}/pulls/{}", self.repo_path(), self.pull_request.number().get())
    }

    async fn fetch_pull_request(&self) -> Result<ApiPullRequest, ContextError> {
        debug!(pull_request = %self.pull_request, "fetching pull request");
        self.client
            .get::<ApiPullRequest, _, _>(self.pull_request_path(), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("pull request", &error))
    }

    async fn fetch_all<T>(&self, path: String, operation: &str) -> Result<Vec<T>, ContextError>
    where
        T: serde::de::DeserializeOwned,
    {
        debug!(pull_request = %self.pull_request, operation, "fetching listing");
        let page = self
            .client
            .get::<Page<T>, _, _>(path, None::<&()>)
            .await
            .map_err(|error| map_octocrab_error(operation, &error))?;

        self.client
            .all_pages(page)
            .await
            .map_err(|error| map_octocrab_error(operation, &error))
    }
}

#[async_trait]
impl MembershipContext for GithubContext {
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

#[async_trait]
impl Context for GithubContext {
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
        let api = self.fetch_pull_request().await?;
        api.user
            .and_then(|user| user.login)
            .ok_or_else(|| ContextError::ContractViolation {
                message: "pull request has no author login".to_owned(),
            })
    }

    async fn changed_files(&self) -> Result<Vec<File>, ContextError> {
        let files: Vec<ApiFile> = self
            .fetch_all(format!("{}/files", self.pull_request_path()), "changed files")
            .await?;
        files.into_iter().map(File::try_from).collect()
    }

    async fn commits(&self) -> Result<Vec<Commit>, ContextError> {
        let commits: Vec<ApiCommit> = self
            .fetch_all(format!("{}/commits", self.pull_request_path()), "commits")
            .await?;
        commits.into_iter().map(Commit::try_from).collect()
    }

    async fn comments(&self) -> Result<Vec<Comment>, ContextError> {
        let comments: Vec<ApiIssueComment> = self
            .fetch_all(
                format!(
                    "{}/issues/{}/comments",
                    self.repo_path(),
                    self.pull_request.number().get()
                ),
                "comments",
            )
            .await?;
        Ok(comments.into_iter().map(Comment::from).collect())
    }

    async fn reviews(&self) -> Result<Vec<Review>, ContextError> {
        let reviews: Vec<ApiReview> = self
            .fetch_all(format!("{}/reviews", self.pull_request_path()), "reviews")
            .await?;
        reviews.into_iter().map(Review::try_from).collect()
    }

    async fn branches(&self) -> Result<Branches, ContextError> {
        let api = self.fetch_pull_request().await?;

        let same_repository = match (&api.head.repo, &api.base.repo) {
            (Some(head_repo), Some(base_repo)) => head_repo.id == base_repo.id,
            // A missing head repo means the fork was deleted; the label
            // still carries the fork owner.
            _ => false,
        };

        if same_repository {
            return Branches::same_repository(&api.base.ref_name, &api.head.ref_name);
        }

        let label =
            api.head
                .label
                .as_deref()
                .ok_or_else(|| ContextError::ContractViolation {
                    message: "forked pull request has no head label".to_owned(),
                })?;
        let (fork_owner, branch) =
            label
                .split_once(':')
                .ok_or_else(|| ContextError::ContractViolation {
                    message: format!("head label is not owner:branch, got {label:?}"),
                })?;
        Branches::from_fork(&api.base.ref_name, fork_owner, branch)
    }

    async fn target_commits(&self) -> Result<Vec<Commit>, ContextError> {
        let branches = self.branches().await?;

        debug!(
            pull_request = %self.pull_request,
            base = branches.base(),
            "fetching target branch history"
        );
        let params = [("sha", branches.base()), ("per_page", TARGET_COMMIT_WINDOW)];
        let page: Page<ApiCommit> = self
            .client
            .get(format!("{}/commits", self.repo_path()), Some(&params))
            .await
            .map_err(|error| map_octocrab_error("target commits", &error))?;

        // One page only: the contract promises a bounded recent window,
        // not the full branch history.
        page.items.into_iter().map(Commit::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::expect_used, reason = "Tests panic on failure")]

    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::GithubContext;
    use crate::github::client::PersonalAccessToken;
    use crate::pull::{Context, ContextError, FileStatus, PullRequestRef, ReviewState};

    fn pull_request_json(head_repo_id: u64, head_label: &str, head_ref: &str) -> serde_json::Value {
        serde_json::json!({
            "user": { "login": "dana" },
            "base": {
                "ref": "main",
                "label": "acme:main",
                "repo": { "id": 1 }
            },
            "head": {
                "ref": head_ref,
                "label": head_label,
                "repo": { "id": head_repo_id }
            }
        })
    }

    fn context_for(server: &MockServer) -> GithubContext {
        let token = PersonalAccessToken::new("valid-token").expect("token should be valid");
        let api_base = url::Url::parse(&server.uri()).expect("server URI should parse");
        let pull_request =
            PullRequestRef::new("acme", "widgets", 42).expect("reference should build");
        GithubContext::for_token(&token, &api_base, pull_request).expect("context should build")
    }

    #[tokio::test]
    async fn locator_formats_owner_repository_and_number() {
        let pull_request =
            PullRequestRef::new("acme", "widgets", 42).expect("reference should build");
        let context = GithubContext::new(octocrab::Octocrab::default(), pull_request);
        assert_eq!(context.locator(), "acme/widgets#42");
        assert_eq!(context.repository_owner(), "acme");
        assert_eq!(context.repository_name(), "widgets");
        assert_eq!(context.number(), 42);
    }

    #[tokio::test]
    async fn author_returns_the_opener_login() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/42"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(pull_request_json(1, "acme:feature-x", "feature-x")),
            )
            .mount(&server)
            .await;

        let context = context_for(&server);
        let author = context.author().await.expect("author should load");
        assert_eq!(author, "dana");
    }

    #[tokio::test]
    async fn changed_files_map_statuses_onto_the_domain_enum() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/42/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "filename": "src/lib.rs", "status": "modified", "additions": 10, "deletions": 2 },
                { "filename": "docs/new.md", "status": "added", "additions": 40, "deletions": 0 },
                { "filename": "old.cfg", "status": "removed", "additions": 0, "deletions": 12 }
            ])))
            .mount(&server)
            .await;

        let context = context_for(&server);
        let files = context.changed_files().await.expect("files should load");

        let statuses: Vec<FileStatus> = files.iter().map(|file| file.status).collect();
        assert_eq!(
            statuses,
            vec![FileStatus::Modified, FileStatus::Added, FileStatus::Deleted]
        );
    }

    #[tokio::test]
    async fn branches_on_a_same_repository_pull_request_stay_unprefixed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/42"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(pull_request_json(1, "acme:feature-x", "feature-x")),
            )
            .mount(&server)
            .await;

        let context = context_for(&server);
        let branches = context.branches().await.expect("branches should load");
        assert_eq!(branches.base(), "main");
        assert_eq!(branches.head(), "feature-x");
    }

    #[tokio::test]
    async fn branches_on_a_forked_pull_request_prefix_the_fork_owner() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/42"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(pull_request_json(2, "alice:fix-1", "fix-1")),
            )
            .mount(&server)
            .await;

        let context = context_for(&server);
        let branches = context.branches().await.expect("branches should load");
        assert_eq!(branches.base(), "main");
        assert_eq!(branches.head(), "alice:fix-1");
    }

    #[tokio::test]
    async fn commits_convert_identities_and_web_flag() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/42/commits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "sha": "c1",
                    "parents": [{ "sha": "c0" }],
                    "commit": { "committer": { "date": "2025-01-01T00:00:00Z" } },
                    "author": { "login": "alice" },
                    "committer": { "login": "web-flow" }
                },
                {
                    "sha": "c2",
                    "parents": [{ "sha": "c1" }],
                    "commit": { "committer": { "date": "2025-01-02T00:00:00Z" } },
                    "author": null,
                    "committer": null
                }
            ])))
            .mount(&server)
            .await;

        let context = context_for(&server);
        let commits = context.commits().await.expect("commits should load");

        assert_eq!(commits.len(), 2);
        let first = commits.first().expect("first commit should exist");
        assert!(first.committed_via_web);
        assert_eq!(first.users(), vec!["alice", "web-flow"]);
        let second = commits.last().expect("second commit should exist");
        assert!(second.users().is_empty(), "unlinked identities are omitted");
    }

    #[tokio::test]
    async fn reviews_carry_current_states_and_node_ids() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/42/reviews"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": 10,
                    "node_id": "MDEx",
                    "user": { "login": "carol" },
                    "body": "",
                    "state": "DISMISSED",
                    "submitted_at": "2025-01-03T00:00:00Z"
                }
            ])))
            .mount(&server)
            .await;

        let context = context_for(&server);
        let reviews = context.reviews().await.expect("reviews should load");
        let review = reviews.first().expect("review should exist");
        assert_eq!(review.id, "MDEx");
        assert_eq!(review.state, ReviewState::Dismissed);
    }

    #[tokio::test]
    async fn target_commits_request_a_bounded_window_of_the_base_branch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/42"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(pull_request_json(1, "acme:feature-x", "feature-x")),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/commits"))
            .and(query_param("sha", "main"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "sha": "t1",
                    "parents": [],
                    "commit": { "committer": { "date": "2025-01-01T00:00:00Z" } },
                    "author": { "login": "dana" },
                    "committer": { "login": "dana" }
                }
            ])))
            .mount(&server)
            .await;

        let context = context_for(&server);
        let commits = context
            .target_commits()
            .await
            .expect("target commits should load");
        assert_eq!(commits.len(), 1);
        assert_eq!(
            commits.first().expect("commit should exist").sha,
            "t1"
        );
    }

    #[tokio::test]
    async fn accessor_failures_surface_as_errors_not_empty_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/pulls/42/files"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({ "message": "boom" })),
            )
            .mount(&server)
            .await;

        let context = context_for(&server);
        let result = context.changed_files().await;
        assert!(
            matches!(result, Err(ContextError::Api { .. })),
            "expected Api error, got {result:?}"
        );
    }
}
