use axum::extract::State;
use axum::http::StatusCode;
use axum::Form;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::ports::AccountRepository;
use crate::inbound::http::middleware::ADMIN_PATH;
use crate::inbound::http::middleware::SESSION_COOKIE;
use crate::inbound::http::router::AppState;

pub async fn admin_login<AR>(
    State(state): State<AppState<AR>>,
    jar: CookieJar,
    Form(form): Form<AdminLoginForm>,
) -> Result<(CookieJar, ApiSuccess<AdminLoginResponseData>), ApiError>
where
    AR: AccountRepository,
{
    let token = state
        .admin_sessions
        .login(&form.username, &form.password)?;

    let ttl = state.admin_sessions.ttl();
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path(ADMIN_PATH)
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .build();

    Ok((
        jar.add(cookie),
        ApiSuccess::new(
            StatusCode::OK,
            AdminLoginResponseData {
                username: form.username,
                expires_in: ttl.num_seconds(),
            },
        ),
    ))
}

/// Form body of the admin login page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminLoginForm {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminLoginResponseData {
    pub username: String,
    /// Seconds until the session cookie expires
    pub expires_in: i64,
}
