use auth::AuthError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::account::errors::AccountError;
use crate::session::errors::AdminSessionError;

pub mod admin_login;
pub mod admin_session;
pub mod create_inspector;
pub mod health;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(_) => ApiError::NotFound(err.to_string()),
            AccountError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            AccountError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AccountError::InvalidEmail(_)
            | AccountError::InvalidPassword(_)
            | AccountError::InvalidProfile(_)
            | AccountError::InvalidAccountType(_) => ApiError::UnprocessableEntity(err.to_string()),
            AccountError::PasswordHashing(_) | AccountError::DatabaseError(_) => {
                tracing::error!(error = %err, "Account operation failed");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.is_denied() {
            ApiError::Forbidden(err.public_message().to_string())
        } else {
            ApiError::Unauthorized(err.public_message().to_string())
        }
    }
}

impl From<AdminSessionError> for ApiError {
    fn from(err: AdminSessionError) -> Self {
        match err {
            AdminSessionError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AdminSessionError::Issuance(_) => {
                ApiError::InternalServerError("Failed to issue session".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_status() {
        let cases = [
            (AuthError::AuthenticationMissing, StatusCode::UNAUTHORIZED),
            (AuthError::TokenInvalid, StatusCode::UNAUTHORIZED),
            (AuthError::AuthorizationDenied, StatusCode::FORBIDDEN),
            (
                AuthError::UpstreamFailure("pool timed out".to_string()),
                StatusCode::FORBIDDEN,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).into_response().status(), status);
        }
    }

    #[test]
    fn test_account_error_status() {
        assert_eq!(
            ApiError::from(AccountError::EmailAlreadyExists("a@b.c".to_string())),
            ApiError::Conflict("Email already exists: a@b.c".to_string())
        );
        assert_eq!(
            ApiError::from(AccountError::DatabaseError("secret dsn".to_string())),
            ApiError::InternalServerError("Internal server error".to_string())
        );
    }

    #[test]
    fn test_admin_login_error_status() {
        assert_eq!(
            ApiError::from(AdminSessionError::InvalidCredentials)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
