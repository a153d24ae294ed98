//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for services:
//! - Password hashing (Argon2id)
//! - Sign-then-encrypt tokens (ES256 JWS inside an ECDH-ES/A256GCM JWE)
//! - Bearer token authorization of inbound calls against a method whitelist
//! - Password checks and token issuance for configured identities
//!
//! Each service defines its own claims types and adapts these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{KeyPair, TokenCodec};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Claims {
//!     sub: String,
//! }
//!
//! let codec = TokenCodec::new(KeyPair::generate().unwrap());
//! let token = codec.construct(&Claims { sub: "user123".to_string() }).unwrap();
//! let decoded: Claims = codec.decode(&token).unwrap();
//! assert_eq!(decoded.sub, "user123");
//! ```
//!
//! ## Call Authorization
//! ```
//! use std::sync::Arc;
//! use auth::{AuthError, CallAuthorizer, KeyPair, TokenCodec};
//!
//! let codec = Arc::new(TokenCodec::new(KeyPair::generate().unwrap()));
//! let authorizer = CallAuthorizer::new(codec, ["/pkg.Service/Login"]);
//!
//! assert!(authorizer.authorize::<serde_json::Value>("/pkg.Service/Login", None).is_ok());
//! assert_eq!(
//!     authorizer.authorize::<serde_json::Value>("/pkg.Service/Private", None),
//!     Err(AuthError::AuthenticationMissing)
//! );
//! ```

pub mod authenticator;
pub mod errors;
pub mod interceptor;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use errors::AuthError;
pub use interceptor::bearer_token;
pub use interceptor::CallAuthorization;
pub use interceptor::CallAuthorizer;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::KeyPair;
pub use token::TokenCodec;
pub use token::TokenError;
