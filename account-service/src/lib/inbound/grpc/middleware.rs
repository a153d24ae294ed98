use std::marker::PhantomData;
use std::task::Context;
use std::task::Poll;

use auth::AuthError;
use auth::CallAuthorization;
use auth::CallAuthorizer;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use tonic::body::BoxBody;
use tonic::codegen::http;
use tonic::Status;
use tower::Layer;
use tower::Service;

use super::claims;

/// Map an authorization failure onto a gRPC status.
///
/// Decoding failures share one message so the caller learns nothing about
/// which layer of the token was rejected.
pub fn auth_status(error: AuthError) -> Status {
    match error {
        AuthError::AuthenticationMissing | AuthError::TokenInvalid => {
            Status::unauthenticated(error.public_message())
        }
        AuthError::AuthorizationDenied | AuthError::UpstreamFailure(_) => {
            Status::permission_denied(error.public_message())
        }
    }
}

/// Tower layer that authorizes every gRPC call before it reaches a handler.
///
/// Whitelisted methods pass through untouched. Any other call must carry a
/// bearer token decodable into `C`; the claims are then attached to the
/// request for the handler. Rejected calls are answered here and never
/// reach the inner service.
pub struct AuthorizationLayer<C> {
    authorizer: CallAuthorizer,
    _claims: PhantomData<fn() -> C>,
}

impl<C> AuthorizationLayer<C> {
    pub fn new(authorizer: CallAuthorizer) -> Self {
        Self {
            authorizer,
            _claims: PhantomData,
        }
    }
}

impl<C> Clone for AuthorizationLayer<C> {
    fn clone(&self) -> Self {
        Self::new(self.authorizer.clone())
    }
}

impl<S, C> Layer<S> for AuthorizationLayer<C> {
    type Service = AuthorizationService<S, C>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthorizationService {
            inner,
            authorizer: self.authorizer.clone(),
            _claims: PhantomData,
        }
    }
}

pub struct AuthorizationService<S, C> {
    inner: S,
    authorizer: CallAuthorizer,
    _claims: PhantomData<fn() -> C>,
}

impl<S: Clone, C> Clone for AuthorizationService<S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            authorizer: self.authorizer.clone(),
            _claims: PhantomData,
        }
    }
}

impl<S, C> AuthorizationService<S, C>
where
    C: DeserializeOwned,
{
    fn authorize(
        &self,
        method: &str,
        headers: &http::HeaderMap,
    ) -> Result<CallAuthorization<C>, AuthError> {
        match headers.get(http::header::AUTHORIZATION).map(|value| value.to_str()) {
            // A credential that is not even visible ASCII cannot be a token
            Some(Err(_)) if !self.authorizer.is_whitelisted(method) => {
                Err(AuthError::TokenInvalid)
            }
            header => self.authorizer.authorize::<C>(method, header.and_then(Result::ok)),
        }
    }
}

impl<S, C, B> Service<http::Request<B>> for AuthorizationService<S, C>
where
    S: Service<http::Request<B>, Response = http::Response<BoxBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    C: DeserializeOwned + Send + Sync + 'static,
    B: Send + 'static,
{
    type Response = http::Response<BoxBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: http::Request<B>) -> Self::Future {
        let method = request.uri().path().to_string();

        match self.authorize(&method, request.headers()) {
            Ok(CallAuthorization::Whitelisted) => {
                tracing::debug!(method = %method, "Whitelisted call");
            }
            Ok(CallAuthorization::Authorized(decoded)) => {
                claims::attach(request.extensions_mut(), decoded);
            }
            Err(error) => {
                tracing::warn!(method = %method, error = %error, "Call rejected");
                let response = auth_status(error).to_http();
                return Box::pin(async move { Ok(response) });
            }
        }

        // The ready service is the one that must handle this call
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(request).await })
    }
}
