use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::TokenCodec;
use crate::token::TokenError;

/// Pairs password verification with the shared token codec.
///
/// Suited to identities that live outside the account store, such as a
/// configured administrator whose hash comes from configuration.
#[derive(Clone)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    codec: Arc<TokenCodec>,
}

impl Authenticator {
    /// # Arguments
    /// * `codec` - Shared token codec used to issue and validate tokens
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            codec,
        }
    }

    /// Verify a password against a stored PHC hash.
    ///
    /// # Errors
    /// * `PasswordError` - Stored hash is unparseable
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Sign and encrypt `claims` into a token.
    ///
    /// # Errors
    /// * `TokenError` - Token construction failed
    pub fn issue_token<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        self.codec.construct(claims)
    }

    /// Decrypt, verify, and decode a token.
    ///
    /// # Errors
    /// * `TokenError` - Token validation or decoding failed
    pub fn validate_token<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        self.codec.decode(token)
    }
}
