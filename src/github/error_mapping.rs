//! Mapping from Octocrab failures onto the context error taxonomy.

use http::StatusCode;

use crate::pull::ContextError;

/// Checks if a GitHub error status indicates an authentication failure.
const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether the GitHub error represents a rate limit rejection based
/// on the HTTP status and message / documentation URL content.
fn is_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    let is_rate_limit_status = matches!(
        source.status_code,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = source.message.to_lowercase().contains("rate limit")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> ContextError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return map_github_status(
            operation,
            source.status_code,
            &source.message,
            is_rate_limit_error(source),
        );
    }

    if is_network_error(error) {
        return ContextError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    ContextError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

/// Maps a raw HTTP status and message onto a [`ContextError`], used where
/// the adapter inspects responses directly instead of going through
/// Octocrab's typed path.
pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> ContextError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    let rate_limited = message.to_lowercase().contains("rate limit");
    map_github_status(operation, status, &message, rate_limited)
}

fn map_github_status(
    operation: &str,
    status: StatusCode,
    message: &str,
    rate_limited: bool,
) -> ContextError {
    if rate_limited {
        return ContextError::RateLimitExceeded {
            message: format!("{operation} failed: {message}"),
        };
    }

    if status == StatusCode::NOT_FOUND {
        return ContextError::Lookup {
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        };
    }

    if is_auth_failure(status) {
        return ContextError::Authentication {
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        };
    }

    ContextError::Api {
        message: format!("{operation} failed with status {status}: {message}"),
    }
}

pub(super) fn extract_github_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}
