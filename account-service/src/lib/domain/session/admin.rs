use auth::AuthError;
use auth::Authenticator;
use chrono::Duration;
use chrono::Utc;
use subtle::ConstantTimeEq;

use crate::session::errors::AdminSessionError;
use crate::session::models::AdminCredentials;
use crate::session::models::AdminSession;

/// Administrator sessions carried in an HTTP cookie.
///
/// The administrator is a single configured identity rather than a store
/// row, so authorization checks the embedded expiry and username only.
pub struct AdminSessionManager {
    authenticator: Authenticator,
    credentials: AdminCredentials,
    ttl: Duration,
}

impl AdminSessionManager {
    pub const DEFAULT_TTL_SECONDS: i64 = 60 * 60;

    pub fn new(authenticator: Authenticator, credentials: AdminCredentials) -> Self {
        Self {
            authenticator,
            credentials,
            ttl: Duration::seconds(Self::DEFAULT_TTL_SECONDS),
        }
    }

    /// Lifetime of a session, also used as the cookie max-age.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Check the administrator's credentials and issue a session token.
    ///
    /// Both the username comparison and the password verification always run.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Username or password does not match
    /// * `Issuance` - Token construction failed
    pub fn login(&self, username: &str, password: &str) -> Result<String, AdminSessionError> {
        let username_matches: bool = username
            .as_bytes()
            .ct_eq(self.credentials.username.as_bytes())
            .into();

        let password_matches = self
            .authenticator
            .verify_password(password, &self.credentials.password_hash)
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Configured admin password hash is unreadable");
                false
            });

        if !(username_matches && password_matches) {
            tracing::warn!("Admin login rejected");
            return Err(AdminSessionError::InvalidCredentials);
        }

        let session = AdminSession::new(self.credentials.username.clone(), self.ttl, Utc::now());
        let token = self.authenticator.issue_token(&session).map_err(|e| {
            tracing::error!(error = %e, "Failed to construct admin session token");
            AdminSessionError::from(e)
        })?;

        tracing::info!(username = %session.username, "Admin logged in");

        Ok(token)
    }

    /// Authorize a request from the value of its session cookie.
    ///
    /// # Errors
    /// * `AuthenticationMissing` - No cookie was sent
    /// * `TokenInvalid` - Cookie could not be decoded
    /// * `AuthorizationDenied` - Session expired or names another user
    pub fn authorize(&self, cookie: Option<&str>) -> Result<AdminSession, AuthError> {
        let cookie = cookie.ok_or(AuthError::AuthenticationMissing)?;

        let session: AdminSession = self.authenticator.validate_token(cookie).map_err(|e| {
            tracing::debug!(error = %e, "Admin session cookie rejected");
            AuthError::TokenInvalid
        })?;

        if session.is_expired(Utc::now()) {
            tracing::debug!(exp = session.exp, "Admin session expired");
            return Err(AuthError::AuthorizationDenied);
        }

        if session.username != self.credentials.username {
            tracing::warn!(username = %session.username, "Admin session names unknown user");
            return Err(AuthError::AuthorizationDenied);
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use auth::KeyPair;
    use auth::PasswordHasher;
    use auth::TokenCodec;

    use super::*;

    fn manager() -> (AdminSessionManager, Arc<TokenCodec>) {
        let codec = Arc::new(TokenCodec::new(KeyPair::generate().unwrap()));
        let hash = PasswordHasher::new().hash("hunter22").unwrap();
        let credentials: AdminCredentials = format!("admin:{}", hash).parse().unwrap();

        (
            AdminSessionManager::new(Authenticator::new(codec.clone()), credentials),
            codec,
        )
    }

    #[test]
    fn test_login_and_authorize() {
        let (manager, _) = manager();

        let cookie = manager.login("admin", "hunter22").expect("Login failed");
        let session = manager.authorize(Some(&cookie)).expect("Authorize failed");

        assert_eq!(session.username, "admin");
        assert!(!session.is_expired(Utc::now()));
        assert_eq!(manager.ttl(), Duration::hours(1));
    }

    #[test]
    fn test_login_wrong_username() {
        let (manager, _) = manager();

        let result = manager.login("root", "hunter22");
        assert!(matches!(result, Err(AdminSessionError::InvalidCredentials)));
    }

    #[test]
    fn test_login_wrong_password() {
        let (manager, _) = manager();

        let result = manager.login("admin", "hunter2");
        assert!(matches!(result, Err(AdminSessionError::InvalidCredentials)));
    }

    #[test]
    fn test_authorize_without_cookie() {
        let (manager, _) = manager();
        assert_eq!(manager.authorize(None), Err(AuthError::AuthenticationMissing));
    }

    #[test]
    fn test_authorize_garbage_cookie() {
        let (manager, _) = manager();
        assert_eq!(
            manager.authorize(Some("garbage")),
            Err(AuthError::TokenInvalid)
        );
    }

    #[test]
    fn test_expired_cookie_is_denied() {
        let (manager, codec) = manager();

        // Validly encoded, but issued two hours ago with a one hour lifetime
        let session = AdminSession::new(
            "admin".to_string(),
            Duration::hours(1),
            Utc::now() - Duration::hours(2),
        );
        let cookie = codec.construct(&session).unwrap();

        assert_eq!(
            manager.authorize(Some(&cookie)),
            Err(AuthError::AuthorizationDenied)
        );
    }

    #[test]
    fn test_foreign_username_is_denied() {
        let (manager, codec) = manager();

        let session = AdminSession::new("mallory".to_string(), Duration::hours(1), Utc::now());
        let cookie = codec.construct(&session).unwrap();

        assert_eq!(
            manager.authorize(Some(&cookie)),
            Err(AuthError::AuthorizationDenied)
        );
    }

    #[test]
    fn test_account_session_is_not_an_admin_session() {
        let (manager, codec) = manager();

        let cookie = codec
            .construct(&serde_json::json!({ "account_id": 1, "account_type": "business" }))
            .unwrap();

        assert_eq!(
            manager.authorize(Some(&cookie)),
            Err(AuthError::TokenInvalid)
        );
    }
}
