use tonic::Status;

use crate::account::errors::AccountError;
use crate::account::models::BusinessProfile;
use crate::account::models::BusinessUser;
use crate::account::models::InspectorUser;
use crate::session::errors::SessionError;
use crate::session::models::SessionToken;

pub mod create_business_user;
pub mod create_session;
pub mod delete_business_user;
pub mod get_business_user;
pub mod get_inspector_user;
pub mod update_business_user;

impl From<AccountError> for Status {
    fn from(error: AccountError) -> Self {
        match error {
            AccountError::InvalidEmail(_)
            | AccountError::InvalidPassword(_)
            | AccountError::InvalidProfile(_)
            | AccountError::InvalidAccountType(_) => Status::invalid_argument(error.to_string()),
            AccountError::EmailAlreadyExists(_) => Status::already_exists(error.to_string()),
            AccountError::InvalidCredentials => Status::unauthenticated("invalid credentials"),
            AccountError::NotFound(_) => Status::not_found(error.to_string()),
            AccountError::PasswordHashing(_) | AccountError::DatabaseError(_) => {
                tracing::error!(error = %error, "Account operation failed");
                Status::internal("internal error")
            }
        }
    }
}

impl From<SessionError> for Status {
    fn from(_: SessionError) -> Self {
        Status::internal("failed to issue session")
    }
}

impl From<SessionToken> for crate::proto::SessionToken {
    fn from(token: SessionToken) -> Self {
        Self {
            token: token.into_inner(),
        }
    }
}

impl From<BusinessProfile> for crate::proto::BusinessUser {
    fn from(profile: BusinessProfile) -> Self {
        Self {
            first_name: profile.first_name,
            patronymic_name: profile.patronymic_name,
            last_name: profile.last_name,
            business_name: profile.business_name,
        }
    }
}

impl TryFrom<crate::proto::BusinessUser> for BusinessProfile {
    type Error = Status;

    fn try_from(user: crate::proto::BusinessUser) -> Result<Self, Self::Error> {
        BusinessProfile::new(
            user.first_name,
            user.patronymic_name,
            user.last_name,
            user.business_name,
        )
        .map_err(|e| Status::invalid_argument(e.to_string()))
    }
}

impl From<BusinessUser> for crate::proto::GetBusinessUserResponse {
    fn from(user: BusinessUser) -> Self {
        Self {
            account_id: user.account_id.0,
            email: user.email.as_str().to_string(),
            user: Some(user.profile.into()),
        }
    }
}

impl From<InspectorUser> for crate::proto::GetInspectorUserResponse {
    fn from(user: InspectorUser) -> Self {
        Self {
            account_id: user.account_id.0,
            email: user.email.as_str().to_string(),
            first_name: user.profile.first_name,
            last_name: user.profile.last_name,
        }
    }
}
