//! Error types surfaced by pull request context implementations.

use thiserror::Error;

/// Errors surfaced while answering membership queries or loading pull
/// request state from a hosting backend.
///
/// Variants stay close to the failure as the adapter observed it; the
/// broader taxonomy consumers branch on is exposed through
/// [`ContextError::kind`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContextError {
    /// A team identifier did not match the `org-name/team-name` format.
    #[error("team must be formatted as \"org-name/team-name\", got {slug:?}")]
    MalformedTeamSlug {
        /// The identifier that failed to parse.
        slug: String,
    },

    /// A permission token was not part of the adapter's documented scale.
    #[error("unknown permission level: {permission:?}")]
    UnknownPermission {
        /// The token that could not be resolved.
        permission: String,
    },

    /// An identity, organization, team, or repository could not be resolved.
    #[error("lookup failed: {message}")]
    Lookup {
        /// Description of the entity that failed to resolve.
        message: String,
    },

    /// The hosting service rejected the adapter's credentials.
    #[error("authentication failed: {message}")]
    Authentication {
        /// Error detail returned with the rejection.
        message: String,
    },

    /// Networking failed while calling the hosting service.
    #[error("network error talking to the host: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The hosting service returned a non-authentication API error.
    #[error("host API error: {message}")]
    Api {
        /// Response detail describing the failure.
        message: String,
    },

    /// The hosting service refused the request due to rate limiting.
    #[error("host API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Error detail from the hosting service.
        message: String,
    },

    /// An adapter produced data that breaks the core contract, such as an
    /// empty base branch or a blank filename.
    #[error("adapter returned malformed data: {message}")]
    ContractViolation {
        /// Description of the malformed data.
        message: String,
    },
}

/// Coarse classification of a [`ContextError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An identity, org, team, repo, or permission token failed to resolve.
    Lookup,
    /// Transport, authentication, or rate-limit failure at the backend.
    Backend,
    /// The adapter produced data that violates the core contract.
    ContractViolation,
}

impl ContextError {
    /// Classifies this error within the Lookup / Backend / ContractViolation
    /// taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedTeamSlug { .. }
            | Self::UnknownPermission { .. }
            | Self::Lookup { .. } => ErrorKind::Lookup,
            Self::Authentication { .. }
            | Self::Network { .. }
            | Self::Api { .. }
            | Self::RateLimitExceeded { .. } => ErrorKind::Backend,
            Self::ContractViolation { .. } => ErrorKind::ContractViolation,
        }
    }
}
