use auth::TokenError;
use thiserror::Error;

/// Error issuing an account session.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Session issuance failed: {0}")]
    Issuance(#[from] TokenError),
}

/// Error logging in the administrator.
#[derive(Debug, Clone, Error)]
pub enum AdminSessionError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Admin session issuance failed: {0}")]
    Issuance(#[from] TokenError),
}

/// Error parsing the configured `username:password-hash` pair.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdminCredentialsError {
    #[error("Admin credentials must have the form username:password-hash")]
    MissingSeparator,

    #[error("Admin username is empty")]
    EmptyUsername,

    #[error("Admin password hash is empty")]
    EmptyPasswordHash,
}
