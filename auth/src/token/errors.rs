use thiserror::Error;

/// Error type for token construction and decoding.
///
/// The variants are diagnostic detail for server-side logs. Callers at the
/// transport boundary collapse every decoding variant into a single
/// "invalid token" answer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid key material: {0}")]
    Key(String),

    #[error("Failed to serialize claims: {0}")]
    Serialization(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Failed to encrypt token: {0}")]
    Encryption(String),

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token decryption failed")]
    Decryption,

    #[error("Token signature is invalid")]
    Signature,

    #[error("Token claims do not match the expected shape: {0}")]
    Claims(String),
}
