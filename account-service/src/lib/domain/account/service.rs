use std::sync::Arc;

use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::models::AccountId;
use crate::account::models::AccountType;
use crate::account::models::BusinessProfile;
use crate::account::models::BusinessUser;
use crate::account::models::CreateBusinessUserCommand;
use crate::account::models::CreateInspectorCommand;
use crate::account::models::EmailAddress;
use crate::account::models::InspectorUser;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;

/// Domain service implementation for account operations.
///
/// Concrete implementation of AccountServicePort with dependency injection.
pub struct AccountService<AR>
where
    AR: AccountRepository,
{
    repository: Arc<AR>,
    password_hasher: auth::PasswordHasher,
    /// Verified against when the email is unknown, so both login failures cost one hash.
    decoy_hash: Option<String>,
}

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

impl<AR> AccountService<AR>
where
    AR: AccountRepository,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `password_hasher` - Hasher used for new passwords and login checks
    pub fn new(repository: Arc<AR>, password_hasher: auth::PasswordHasher) -> Self {
        let decoy_hash = password_hasher
            .hash(DECOY_PASSWORD)
            .map_err(|e| tracing::error!(error = %e, "Failed to prepare decoy password hash"))
            .ok();

        Self {
            repository,
            password_hasher,
            decoy_hash,
        }
    }

    fn hash_password(&self, password: &str) -> Result<String, AccountError> {
        self.password_hasher
            .hash(password)
            .map_err(|e| AccountError::PasswordHashing(e.to_string()))
    }
}

#[async_trait]
impl<AR> AccountServicePort for AccountService<AR>
where
    AR: AccountRepository,
{
    async fn create_business_user(
        &self,
        command: CreateBusinessUserCommand,
    ) -> Result<AccountId, AccountError> {
        let password_hash = self.hash_password(command.password.as_str())?;

        let account_id = self
            .repository
            .create_business_user(&command.email, &password_hash, &command.profile)
            .await?;

        tracing::info!(account_id = %account_id, "Business user created");

        Ok(account_id)
    }

    async fn verify_credentials(
        &self,
        email: &EmailAddress,
        password: &str,
        account_type: AccountType,
    ) -> Result<AccountId, AccountError> {
        let Some(credentials) = self.repository.find_credentials(email, account_type).await? else {
            if let Some(decoy_hash) = &self.decoy_hash {
                let _ = self.password_hasher.verify(password, decoy_hash);
            }
            return Err(AccountError::InvalidCredentials);
        };

        let is_valid = self
            .password_hasher
            .verify(password, &credentials.password_hash)
            .unwrap_or_else(|e| {
                tracing::error!(
                    account_id = %credentials.account_id,
                    error = %e,
                    "Stored password hash is unreadable"
                );
                false
            });

        if !is_valid {
            return Err(AccountError::InvalidCredentials);
        }

        Ok(credentials.account_id)
    }

    async fn get_business_user(&self, id: AccountId) -> Result<BusinessUser, AccountError> {
        self.repository
            .get_business_user(id)
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))
    }

    async fn update_business_user(
        &self,
        id: AccountId,
        profile: BusinessProfile,
    ) -> Result<(), AccountError> {
        self.repository.update_business_user(id, &profile).await?;

        tracing::info!(account_id = %id, "Business user updated");

        Ok(())
    }

    async fn delete_business_user(&self, id: AccountId) -> Result<(), AccountError> {
        self.repository.delete_account(id).await?;

        tracing::info!(account_id = %id, "Business user account deleted");

        Ok(())
    }

    async fn create_inspector_user(
        &self,
        command: CreateInspectorCommand,
    ) -> Result<AccountId, AccountError> {
        let password_hash = self.hash_password(command.password.as_str())?;

        let account_id = self
            .repository
            .create_inspector_user(&command.email, &password_hash, &command.profile)
            .await?;

        tracing::info!(account_id = %account_id, "Inspector user created");

        Ok(account_id)
    }

    async fn get_inspector_user(&self, id: AccountId) -> Result<InspectorUser, AccountError> {
        self.repository
            .get_inspector_user(id)
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))
    }

    async fn health_check(&self) -> Result<(), AccountError> {
        self.repository.ping().await
    }
}
