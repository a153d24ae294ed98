use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiSuccess;
use crate::session::models::AdminSession;

pub async fn admin_session(
    Extension(session): Extension<AdminSession>,
) -> ApiSuccess<AdminSessionResponseData> {
    ApiSuccess::new(StatusCode::OK, (&session).into())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminSessionResponseData {
    pub username: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&AdminSession> for AdminSessionResponseData {
    fn from(session: &AdminSession) -> Self {
        Self {
            username: session.username.clone(),
            expires_at: session.expires_at(),
        }
    }
}
