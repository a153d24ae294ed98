use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::admin_login::admin_login;
use super::handlers::admin_session::admin_session;
use super::handlers::create_inspector::create_inspector;
use super::handlers::health::health;
use super::middleware::require_admin_session;
use crate::account::ports::AccountRepository;
use crate::account::service::AccountService;
use crate::session::AdminSessionManager;

pub struct AppState<AR>
where
    AR: AccountRepository,
{
    pub accounts: Arc<AccountService<AR>>,
    pub admin_sessions: Arc<AdminSessionManager>,
}

impl<AR> Clone for AppState<AR>
where
    AR: AccountRepository,
{
    fn clone(&self) -> Self {
        Self {
            accounts: self.accounts.clone(),
            admin_sessions: self.admin_sessions.clone(),
        }
    }
}

pub fn create_router<AR>(
    accounts: Arc<AccountService<AR>>,
    admin_sessions: Arc<AdminSessionManager>,
) -> Router
where
    AR: AccountRepository,
{
    let state = AppState {
        accounts,
        admin_sessions,
    };

    let public_routes = Router::new()
        .route("/health", get(health::<AR>))
        .route("/admin/login", post(admin_login::<AR>));

    let protected_routes = Router::new()
        .route("/admin/session", get(admin_session))
        .route("/admin/inspectors", post(create_inspector::<AR>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_session::<AR>,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
