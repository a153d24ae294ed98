use std::fmt;

use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::TokenError;
use super::jwe;
use super::keys::KeyPair;

/// Sign-then-encrypt codec for arbitrary claims payloads.
///
/// Claims are serialized to JSON and signed as a compact JWS (ES256), and the
/// signed envelope is then encrypted to the codec's own public key as a
/// compact JWE. Decoding reverses both layers and only yields a value when
/// every step succeeds.
///
/// A codec trusts exactly one key pair. Tokens carry no key identifier, so
/// rotating the key invalidates every outstanding token.
#[derive(Clone)]
pub struct TokenCodec {
    keys: KeyPair,
    compress: bool,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec bound to a key pair, with compression disabled.
    pub fn new(keys: KeyPair) -> Self {
        let mut validation = Validation::new(Algorithm::ES256);
        // Expiry and audience belong to the claims owner, not the codec
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            keys,
            compress: false,
            validation,
        }
    }

    /// Enable or disable DEFLATE compression of the signed envelope before encryption.
    ///
    /// Compressing attacker-influenced data before encryption leaks length
    /// information, so this stays off unless explicitly configured.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Serialize, sign, and encrypt claims into a compact token.
    ///
    /// # Arguments
    /// * `claims` - Any serializable claims value
    ///
    /// # Returns
    /// Opaque compact JWE string
    ///
    /// # Errors
    /// * `Serialization` - Claims could not be serialized
    /// * `Signing` - The JWS could not be produced
    /// * `Encryption` - The JWE could not be produced
    pub fn construct<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        let header = Header::new(Algorithm::ES256);

        let signed = encode(&header, claims, self.keys.signing_key()).map_err(|e| {
            match e.kind() {
                ErrorKind::Json(_) => TokenError::Serialization(e.to_string()),
                _ => TokenError::Signing(e.to_string()),
            }
        })?;

        jwe::encrypt(self.keys.public_key(), signed.as_bytes(), self.compress)
    }

    /// Decrypt, verify, and deserialize a token into claims of type `T`.
    ///
    /// # Arguments
    /// * `token` - Compact token produced by [`TokenCodec::construct`]
    ///
    /// # Returns
    /// Fully populated claims; nothing is returned on any failure
    ///
    /// # Errors
    /// * `Malformed` - Token structure or encoding is invalid
    /// * `Decryption` - Token was not encrypted for this key or was altered
    /// * `Signature` - Signed envelope was not produced by this key
    /// * `Claims` - Payload does not match the shape of `T`
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        let envelope = jwe::decrypt(self.keys.secret_key(), token)?;
        let envelope = std::str::from_utf8(&envelope)
            .map_err(|_| TokenError::Malformed("signed envelope is not UTF-8".to_string()))?;

        let token_data = decode::<T>(envelope, self.keys.verifying_key(), &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::Signature,
                ErrorKind::Json(_) => TokenError::Claims(e.to_string()),
                _ => TokenError::Malformed(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("keys", &self.keys)
            .field("compress", &self.compress)
            .finish()
    }
}
