//! Transport independent authorization decision for inbound calls.
//!
//! A call is either whitelisted by its fully qualified method name, or it
//! must carry a bearer token that the [`TokenCodec`] can decode. The decision
//! is made before any handler runs; finer grained checks happen later.

use std::collections::HashSet;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::errors::AuthError;
use crate::token::TokenCodec;

const BEARER_SCHEME: &str = "bearer";

/// Result of a successful authorization decision.
#[derive(Debug, Clone, PartialEq)]
pub enum CallAuthorization<T> {
    /// Method is whitelisted; no claims are attached.
    Whitelisted,
    /// Token decoded into claims.
    Authorized(T),
}

/// Decides whether an inbound call may proceed.
#[derive(Debug, Clone)]
pub struct CallAuthorizer {
    codec: Arc<TokenCodec>,
    whitelist: Arc<HashSet<String>>,
}

impl CallAuthorizer {
    /// Create an authorizer.
    ///
    /// # Arguments
    /// * `codec` - Codec used to decode bearer tokens
    /// * `whitelist` - Exact method names (e.g. `/pkg.Service/Method`) that skip authentication
    pub fn new<I, S>(codec: Arc<TokenCodec>, whitelist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codec,
            whitelist: Arc::new(whitelist.into_iter().map(Into::into).collect()),
        }
    }

    pub fn is_whitelisted(&self, method: &str) -> bool {
        self.whitelist.contains(method)
    }

    /// Authorize a call.
    ///
    /// # Arguments
    /// * `method` - Fully qualified method name of the call
    /// * `authorization` - Raw `authorization` header value, if any
    ///
    /// # Errors
    /// * `AuthenticationMissing` - No bearer token on a non-whitelisted call
    /// * `TokenInvalid` - Token present but could not be decoded into `T`
    pub fn authorize<T: DeserializeOwned>(
        &self,
        method: &str,
        authorization: Option<&str>,
    ) -> Result<CallAuthorization<T>, AuthError> {
        if self.is_whitelisted(method) {
            return Ok(CallAuthorization::Whitelisted);
        }

        let token = authorization
            .and_then(bearer_token)
            .ok_or(AuthError::AuthenticationMissing)?;

        let claims = self.codec.decode::<T>(token).map_err(|e| {
            tracing::debug!(method = %method, error = %e, "Token rejected");
            AuthError::TokenInvalid
        })?;

        Ok(CallAuthorization::Authorized(claims))
    }
}

/// Extract the token from a `Bearer <token>` header value.
///
/// The scheme is matched case-insensitively. Returns `None` for any other
/// scheme or an empty token.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde::Serialize;

    use super::*;
    use crate::token::KeyPair;

    const CREATE: &str = "/app.v1.AppService/CreateSession";
    const GET: &str = "/app.v1.AppService/GetBusinessUser";

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestClaims {
        account_id: i64,
    }

    fn authorizer() -> (CallAuthorizer, Arc<TokenCodec>) {
        let codec = Arc::new(TokenCodec::new(KeyPair::generate().unwrap()));
        (CallAuthorizer::new(codec.clone(), [CREATE]), codec)
    }

    #[test]
    fn test_whitelisted_call_needs_no_token() {
        let (authorizer, _) = authorizer();

        let result = authorizer.authorize::<TestClaims>(CREATE, None);
        assert_eq!(result, Ok(CallAuthorization::Whitelisted));
    }

    #[test]
    fn test_whitelist_is_exact_match() {
        let (authorizer, _) = authorizer();

        assert!(!authorizer.is_whitelisted("/app.v1.AppService/CreateSessionX"));
        assert!(!authorizer.is_whitelisted("/app.v1.AppService/"));
        assert!(!authorizer.is_whitelisted("app.v1.AppService/CreateSession"));
    }

    #[test]
    fn test_missing_token() {
        let (authorizer, _) = authorizer();

        assert_eq!(
            authorizer.authorize::<TestClaims>(GET, None),
            Err(AuthError::AuthenticationMissing)
        );
        assert_eq!(
            authorizer.authorize::<TestClaims>(GET, Some("Basic dXNlcjpwdw==")),
            Err(AuthError::AuthenticationMissing)
        );
    }

    #[test]
    fn test_invalid_token() {
        let (authorizer, _) = authorizer();

        assert_eq!(
            authorizer.authorize::<TestClaims>(GET, Some("Bearer garbage")),
            Err(AuthError::TokenInvalid)
        );
    }

    #[test]
    fn test_valid_token_yields_claims() {
        let (authorizer, codec) = authorizer();
        let token = codec.construct(&TestClaims { account_id: 7 }).unwrap();

        let header = format!("Bearer {}", token);
        let result = authorizer.authorize::<TestClaims>(GET, Some(&header));

        assert_eq!(
            result,
            Ok(CallAuthorization::Authorized(TestClaims { account_id: 7 }))
        );
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER  abc "), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Token abc"), None);
        assert_eq!(bearer_token(""), None);
    }
}
