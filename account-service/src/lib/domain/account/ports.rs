use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::models::AccountId;
use crate::account::models::AccountType;
use crate::account::models::BusinessProfile;
use crate::account::models::BusinessUser;
use crate::account::models::CreateBusinessUserCommand;
use crate::account::models::CreateInspectorCommand;
use crate::account::models::Credentials;
use crate::account::models::EmailAddress;
use crate::account::models::InspectorProfile;
use crate::account::models::InspectorUser;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new business account with its profile.
    ///
    /// # Arguments
    /// * `command` - Validated command containing email, password, and profile
    ///
    /// # Returns
    /// Identifier of the created account
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - A business account with this email exists
    /// * `PasswordHashing` - Password could not be hashed
    /// * `DatabaseError` - Database operation failed
    async fn create_business_user(
        &self,
        command: CreateBusinessUserCommand,
    ) -> Result<AccountId, AccountError>;

    /// Check a login attempt against the stored credentials.
    ///
    /// # Arguments
    /// * `email` - Email the caller logs in with
    /// * `password` - Plaintext password
    /// * `account_type` - Class the caller logs in as
    ///
    /// # Returns
    /// Identifier of the matching account
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `DatabaseError` - Database operation failed
    async fn verify_credentials(
        &self,
        email: &EmailAddress,
        password: &str,
        account_type: AccountType,
    ) -> Result<AccountId, AccountError>;

    /// # Errors
    /// * `NotFound` - No business profile is attached to this account
    /// * `DatabaseError` - Database operation failed
    async fn get_business_user(&self, id: AccountId) -> Result<BusinessUser, AccountError>;

    /// Replace the profile of a business account.
    ///
    /// # Errors
    /// * `NotFound` - No business profile is attached to this account
    /// * `DatabaseError` - Database operation failed
    async fn update_business_user(
        &self,
        id: AccountId,
        profile: BusinessProfile,
    ) -> Result<(), AccountError>;

    /// Delete a business account, keeping its detached profile.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_business_user(&self, id: AccountId) -> Result<(), AccountError>;

    /// Register a new authority account for an inspector.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - An authority account with this email exists
    /// * `PasswordHashing` - Password could not be hashed
    /// * `DatabaseError` - Database operation failed
    async fn create_inspector_user(
        &self,
        command: CreateInspectorCommand,
    ) -> Result<AccountId, AccountError>;

    /// # Errors
    /// * `NotFound` - No inspector profile is attached to this account
    /// * `DatabaseError` - Database operation failed
    async fn get_inspector_user(&self, id: AccountId) -> Result<InspectorUser, AccountError>;

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> Result<(), AccountError>;
}

/// Persistence operations for accounts and their profiles.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Whether an account with this identifier and class exists right now.
    ///
    /// Never cached; every call reaches the store.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn account_exists(
        &self,
        id: AccountId,
        account_type: AccountType,
    ) -> Result<bool, AccountError>;

    /// Retrieve the login record for an email within one account class.
    ///
    /// # Returns
    /// Optional credentials (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_credentials(
        &self,
        email: &EmailAddress,
        account_type: AccountType,
    ) -> Result<Option<Credentials>, AccountError>;

    /// Create a business account and its profile atomically.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered for this class
    /// * `DatabaseError` - Database operation failed
    async fn create_business_user(
        &self,
        email: &EmailAddress,
        password_hash: &str,
        profile: &BusinessProfile,
    ) -> Result<AccountId, AccountError>;

    /// # Returns
    /// Optional business user (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn get_business_user(&self, id: AccountId)
        -> Result<Option<BusinessUser>, AccountError>;

    /// Overwrite the profile attached to an account.
    ///
    /// # Errors
    /// * `NotFound` - No profile references this account
    /// * `DatabaseError` - Database operation failed
    async fn update_business_user(
        &self,
        id: AccountId,
        profile: &BusinessProfile,
    ) -> Result<(), AccountError>;

    /// Create an authority account and its inspector profile atomically.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered for this class
    /// * `DatabaseError` - Database operation failed
    async fn create_inspector_user(
        &self,
        email: &EmailAddress,
        password_hash: &str,
        profile: &InspectorProfile,
    ) -> Result<AccountId, AccountError>;

    /// # Returns
    /// Optional inspector user (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn get_inspector_user(
        &self,
        id: AccountId,
    ) -> Result<Option<InspectorUser>, AccountError>;

    /// Remove an account, detaching any profile that references it.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_account(&self, id: AccountId) -> Result<(), AccountError>;

    /// # Errors
    /// * `DatabaseError` - Store is unreachable
    async fn ping(&self) -> Result<(), AccountError>;
}
