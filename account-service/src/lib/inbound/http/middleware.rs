use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::CookieJar;

use super::handlers::ApiError;
use crate::account::ports::AccountRepository;
use crate::inbound::http::router::AppState;

/// Name of the administrator session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Route prefix the session cookie is scoped to.
pub const ADMIN_PATH: &str = "/admin";

/// Middleware that admits only requests carrying a live administrator session.
///
/// The decoded session is added to request extensions for the handlers.
pub async fn require_admin_session<AR>(
    State(state): State<AppState<AR>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    AR: AccountRepository,
{
    let cookie = jar.get(SESSION_COOKIE).map(|cookie| cookie.value());

    let session = state.admin_sessions.authorize(cookie).map_err(|e| {
        tracing::warn!(uri = %req.uri(), error = %e, "Admin request rejected");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}
