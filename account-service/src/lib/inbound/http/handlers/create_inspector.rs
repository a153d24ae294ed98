use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::EmailError;
use crate::account::errors::PasswordPolicyError;
use crate::account::errors::ProfileError;
use crate::account::models::CreateInspectorCommand;
use crate::account::models::EmailAddress;
use crate::account::models::InspectorProfile;
use crate::account::models::Password;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;
use crate::session::models::AdminSession;

pub async fn create_inspector<AR>(
    State(state): State<AppState<AR>>,
    Extension(admin): Extension<AdminSession>,
    Json(body): Json<CreateInspectorRequest>,
) -> Result<ApiSuccess<CreateInspectorResponseData>, ApiError>
where
    AR: AccountRepository,
{
    let account_id = state
        .accounts
        .create_inspector_user(body.try_into_command()?)
        .await?;

    tracing::info!(account_id = %account_id, admin = %admin.username, "Inspector created");

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        CreateInspectorResponseData {
            account_id: account_id.0,
        },
    ))
}

/// HTTP request body for creating an inspector (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateInspectorRequest {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateInspectorRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),

    #[error("Invalid profile: {0}")]
    Profile(#[from] ProfileError),
}

impl CreateInspectorRequest {
    fn try_into_command(self) -> Result<CreateInspectorCommand, ParseCreateInspectorRequestError> {
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        let profile = InspectorProfile::new(self.first_name, self.last_name)?;
        Ok(CreateInspectorCommand {
            email,
            password,
            profile,
        })
    }
}

impl From<ParseCreateInspectorRequestError> for ApiError {
    fn from(err: ParseCreateInspectorRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateInspectorResponseData {
    pub account_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateInspectorRequest {
        CreateInspectorRequest {
            email: "inspector@authority.gov".to_string(),
            password: "pa55word".to_string(),
            first_name: "Ivan".to_string(),
            last_name: "Sidorov".to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        let command = request().try_into_command().unwrap();
        assert_eq!(command.profile.last_name, "Sidorov");
    }

    #[test]
    fn test_missing_last_name() {
        let mut request = request();
        request.last_name = "  ".to_string();
        let err = request.try_into_command().unwrap_err();
        assert!(matches!(
            err,
            ParseCreateInspectorRequestError::Profile(ProfileError::MissingField("last_name"))
        ));
    }
}
