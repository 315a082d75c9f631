//! Octocrab client construction for the GitHub adapter.

use http::Uri;
use octocrab::Octocrab;
use url::Url;

use super::error_mapping::map_octocrab_error;
use crate::pull::ContextError;

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ContextError::Authentication` when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, ContextError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ContextError::Authentication {
                message: "personal access token is required".to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Derives the GitHub API base URL for a host.
///
/// `github.com` maps to the public REST endpoint; any other host is
/// treated as a GitHub Enterprise instance with the API under `/api/v3`.
///
/// # Errors
///
/// Returns `ContextError::Api` when the host does not form a valid URL.
pub fn api_base_for_host(host: &str) -> Result<Url, ContextError> {
    if host.eq_ignore_ascii_case("github.com") {
        Url::parse("https://api.github.com").map_err(|error| ContextError::Api {
            message: format!("invalid API base: {error}"),
        })
    } else {
        let mut api_url =
            Url::parse(&format!("https://{host}")).map_err(|error| ContextError::Api {
                message: format!("invalid API base: {error}"),
            })?;
        api_url.set_path("api/v3");
        Ok(api_url)
    }
}

/// Builds an Octocrab client for the given token and API base URL.
///
/// # Errors
///
/// Returns `ContextError::Api` when the base URI cannot be parsed or when
/// Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &Url,
) -> Result<Octocrab, ContextError> {
    let base_uri: Uri = api_base
        .as_str()
        .parse::<Uri>()
        .map_err(|error| ContextError::Api {
            message: format!("invalid API base: {error}"),
        })?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| ContextError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
