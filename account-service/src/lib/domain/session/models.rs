use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::account::models::AccountId;
use crate::account::models::AccountType;
use crate::session::errors::AdminCredentialsError;

/// Claims embedded in an account holder's session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub account_id: AccountId,
    pub account_type: AccountType,
}

impl Session {
    pub fn new(account_id: AccountId, account_type: AccountType) -> Self {
        Self {
            account_id,
            account_type,
        }
    }
}

/// Opaque encrypted session token handed to a caller.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Which account class a freshly issued session carries.
///
/// `Fixed` stamps every session with one class regardless of how the caller
/// authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IssuancePolicy {
    #[default]
    AsRequested,
    Fixed(AccountType),
}

impl IssuancePolicy {
    pub fn resolve(&self, requested: AccountType) -> AccountType {
        match self {
            IssuancePolicy::AsRequested => requested,
            IssuancePolicy::Fixed(account_type) => *account_type,
        }
    }
}

/// Claims embedded in the administrator's session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    pub username: String,
    /// Expiry as Unix seconds
    pub exp: i64,
}

impl AdminSession {
    pub fn new(username: String, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            username,
            exp: (now + ttl).timestamp(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// A session is valid strictly before its expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

/// The single configured administrator identity.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password_hash: String,
}

impl FromStr for AdminCredentials {
    type Err = AdminCredentialsError;

    /// Parse `username:password-hash`, splitting at the first colon.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (username, password_hash) = s
            .split_once(':')
            .ok_or(AdminCredentialsError::MissingSeparator)?;

        if username.is_empty() {
            return Err(AdminCredentialsError::EmptyUsername);
        }
        if password_hash.is_empty() {
            return Err(AdminCredentialsError::EmptyPasswordHash);
        }

        Ok(Self {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        })
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
