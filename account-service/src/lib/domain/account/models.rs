use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::account::errors::AccountTypeError;
use crate::account::errors::EmailError;
use crate::account::errors::PasswordPolicyError;
use crate::account::errors::ProfileError;

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Class of an account holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Business,
    Authority,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Business => "business",
            AccountType::Authority => "authority",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = AccountTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "business" => Ok(AccountType::Business),
            "authority" => Ok(AccountType::Authority),
            other => Err(AccountTypeError::Unknown(other.to_string())),
        }
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted at registration.
///
/// Length is counted in characters, not bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 50;

    /// # Errors
    /// * `TooShort` / `TooLong` - Length outside 3..=50 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(PasswordPolicyError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(password))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(..)")
    }
}

/// Personal and business details of a business account holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessProfile {
    pub first_name: String,
    pub patronymic_name: String,
    pub last_name: String,
    pub business_name: String,
}

impl BusinessProfile {
    /// Create a profile, requiring every field except the patronymic.
    ///
    /// # Errors
    /// * `MissingField` - A required field is empty
    pub fn new(
        first_name: String,
        patronymic_name: String,
        last_name: String,
        business_name: String,
    ) -> Result<Self, ProfileError> {
        require("first_name", &first_name)?;
        require("last_name", &last_name)?;
        require("business_name", &business_name)?;

        Ok(Self {
            first_name,
            patronymic_name,
            last_name,
            business_name,
        })
    }
}

/// Details of an inspector working for an authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorProfile {
    pub first_name: String,
    pub last_name: String,
}

impl InspectorProfile {
    /// # Errors
    /// * `MissingField` - A required field is empty
    pub fn new(first_name: String, last_name: String) -> Result<Self, ProfileError> {
        require("first_name", &first_name)?;
        require("last_name", &last_name)?;

        Ok(Self {
            first_name,
            last_name,
        })
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ProfileError> {
    if value.trim().is_empty() {
        Err(ProfileError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Business account holder as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessUser {
    pub account_id: AccountId,
    pub email: EmailAddress,
    pub profile: BusinessProfile,
}

/// Authority account holder as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorUser {
    pub account_id: AccountId,
    pub email: EmailAddress,
    pub profile: InspectorProfile,
}

/// Login record of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account_id: AccountId,
    pub password_hash: String,
}

/// Command to register a new business account with domain types
#[derive(Debug)]
pub struct CreateBusinessUserCommand {
    pub email: EmailAddress,
    pub password: Password,
    pub profile: BusinessProfile,
}

/// Command to register a new inspector account with domain types
#[derive(Debug)]
pub struct CreateInspectorCommand {
    pub email: EmailAddress,
    pub password: Password,
    pub profile: InspectorProfile,
}
