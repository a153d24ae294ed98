use thiserror::Error;

/// Outcome of a failed authorization decision.
///
/// `TokenInvalid` deliberately carries no detail: decryption, signature, and
/// shape failures all look the same to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing token")]
    AuthenticationMissing,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Permission denied")]
    AuthorizationDenied,

    #[error("Authorization backend unavailable: {0}")]
    UpstreamFailure(String),
}

impl AuthError {
    /// Whether the caller presented a credential that decoded but was not sufficient.
    ///
    /// Upstream failures count as denials so infrastructure state never
    /// reaches the caller.
    pub fn is_denied(&self) -> bool {
        matches!(
            self,
            AuthError::AuthorizationDenied | AuthError::UpstreamFailure(_)
        )
    }

    /// Message safe to return to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::AuthenticationMissing => "Missing token",
            AuthError::TokenInvalid => "Invalid token",
            AuthError::AuthorizationDenied | AuthError::UpstreamFailure(_) => "Permission denied",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_failure_reads_as_denial() {
        let error = AuthError::UpstreamFailure("connection refused".to_string());

        assert!(error.is_denied());
        assert_eq!(error.public_message(), "Permission denied");
        assert!(!error.public_message().contains("connection"));
    }

    #[test]
    fn test_authentication_failures_are_not_denials() {
        assert!(!AuthError::AuthenticationMissing.is_denied());
        assert!(!AuthError::TokenInvalid.is_denied());
        assert!(AuthError::AuthorizationDenied.is_denied());
    }
}
