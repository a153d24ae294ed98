use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

/// Report whether the account store is reachable.
pub async fn health<AR>(
    State(state): State<AppState<AR>>,
) -> Result<ApiSuccess<HealthResponseData>, ApiError>
where
    AR: AccountRepository,
{
    state.accounts.health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "Health check failed");
        ApiError::ServiceUnavailable("Account store unreachable".to_string())
    })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        HealthResponseData {
            status: "ok".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponseData {
    pub status: String,
}
