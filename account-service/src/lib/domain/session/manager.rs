use std::sync::Arc;

use auth::AuthError;
use auth::TokenCodec;

use crate::account::models::AccountId;
use crate::account::models::AccountType;
use crate::account::ports::AccountRepository;
use crate::session::errors::SessionError;
use crate::session::models::IssuancePolicy;
use crate::session::models::Session;
use crate::session::models::SessionToken;

/// Issues account sessions and authorizes requests that carry them.
///
/// Authorization never trusts the decoded claims alone: every request is
/// revalidated against the account store, so deleting an account revokes
/// its outstanding tokens immediately.
pub struct SessionManager<AR>
where
    AR: AccountRepository,
{
    codec: Arc<TokenCodec>,
    repository: Arc<AR>,
    policy: IssuancePolicy,
}

impl<AR> SessionManager<AR>
where
    AR: AccountRepository,
{
    pub fn new(codec: Arc<TokenCodec>, repository: Arc<AR>) -> Self {
        Self {
            codec,
            repository,
            policy: IssuancePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: IssuancePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build session claims for an account and encode them into a token.
    ///
    /// # Arguments
    /// * `account_id` - Account the session belongs to
    /// * `account_type` - Class the caller authenticated as (subject to the issuance policy)
    ///
    /// # Errors
    /// * `Issuance` - Token construction failed; no fallback session is produced
    pub fn issue_session(
        &self,
        account_id: AccountId,
        account_type: AccountType,
    ) -> Result<SessionToken, SessionError> {
        let session = Session::new(account_id, self.policy.resolve(account_type));

        let token = self.codec.construct(&session).map_err(|e| {
            tracing::error!(
                account_id = %account_id,
                account_type = %session.account_type,
                error = %e,
                "Failed to construct session token"
            );
            SessionError::from(e)
        })?;

        Ok(SessionToken::new(token))
    }

    /// Authorize a request carrying decoded session claims.
    ///
    /// The class check runs first and never touches the store. Store errors
    /// are logged here and surface only as a denial.
    ///
    /// # Arguments
    /// * `session` - Claims resolved by the call interceptor, if any
    /// * `required` - Class the operation is restricted to, if any
    ///
    /// # Errors
    /// * `AuthenticationMissing` - No claims were attached to the request
    /// * `AuthorizationDenied` - Class mismatch or the account no longer exists
    /// * `UpstreamFailure` - The store could not answer
    pub async fn authorize_request(
        &self,
        session: Option<&Session>,
        required: Option<AccountType>,
    ) -> Result<Session, AuthError> {
        let session = session.ok_or(AuthError::AuthenticationMissing)?;

        if let Some(required) = required {
            if session.account_type != required {
                tracing::debug!(
                    account_id = %session.account_id,
                    account_type = %session.account_type,
                    required = %required,
                    "Session class does not match"
                );
                return Err(AuthError::AuthorizationDenied);
            }
        }

        let exists = self
            .repository
            .account_exists(session.account_id, session.account_type)
            .await
            .map_err(|e| {
                tracing::error!(
                    account_id = %session.account_id,
                    account_type = %session.account_type,
                    error = %e,
                    "Failed to revalidate session account"
                );
                AuthError::UpstreamFailure(e.to_string())
            })?;

        if !exists {
            tracing::info!(
                account_id = %session.account_id,
                account_type = %session.account_type,
                "Session account no longer exists"
            );
            return Err(AuthError::AuthorizationDenied);
        }

        Ok(*session)
    }
}
