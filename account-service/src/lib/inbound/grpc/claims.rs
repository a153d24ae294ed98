//! Request-scoped carrier for decoded claims.
//!
//! Claims ride in the per-request extension map, keyed by their type. Each
//! request owns its own map, so concurrent calls never see each other's
//! claims. Values are wrapped in a private newtype so a bare claims value
//! inserted by unrelated code is never mistaken for an authenticated one.

use tonic::codegen::http::Extensions;
use tonic::Request;

#[derive(Clone)]
struct Carried<C>(C);

/// Attach claims to the extensions of an inbound HTTP/2 request.
pub fn attach<C>(extensions: &mut Extensions, claims: C)
where
    C: Send + Sync + 'static,
{
    extensions.insert(Carried(claims));
}

/// Attach claims to a tonic request directly.
pub fn attach_to_request<C, R>(request: &mut Request<R>, claims: C)
where
    C: Send + Sync + 'static,
{
    request.extensions_mut().insert(Carried(claims));
}

/// Retrieve claims of type `C`; absent or differently typed claims yield `None`.
pub fn retrieve<C, R>(request: &Request<R>) -> Option<&C>
where
    C: Send + Sync + 'static,
{
    request.extensions().get::<Carried<C>>().map(|carried| &carried.0)
}

/// Convenience accessor for handlers.
pub trait ClaimsExt {
    fn claims<C: Send + Sync + 'static>(&self) -> Option<&C>;
}

impl<R> ClaimsExt for Request<R> {
    fn claims<C: Send + Sync + 'static>(&self) -> Option<&C> {
        retrieve::<C, R>(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::models::AccountId;
    use crate::account::models::AccountType;
    use crate::session::models::Session;

    #[derive(Debug, PartialEq)]
    struct OtherClaims(u8);

    #[test]
    fn test_attach_and_retrieve() {
        let session = Session::new(AccountId(9), AccountType::Business);
        let mut request = Request::new(());
        attach_to_request(&mut request, session);

        assert_eq!(request.claims::<Session>(), Some(&session));
    }

    #[test]
    fn test_absent_claims() {
        let request = Request::new(());
        assert_eq!(retrieve::<Session, _>(&request), None);
    }

    #[test]
    fn test_type_mismatch_is_absent() {
        let mut request = Request::new(());
        attach_to_request(&mut request, OtherClaims(1));

        assert_eq!(request.claims::<Session>(), None);
        assert_eq!(request.claims::<OtherClaims>(), Some(&OtherClaims(1)));
    }

    #[test]
    fn test_bare_value_is_not_carried_claims() {
        let mut request = Request::new(());
        request
            .extensions_mut()
            .insert(Session::new(AccountId(1), AccountType::Business));

        assert_eq!(request.claims::<Session>(), None);
    }

    #[test]
    fn test_http_extensions_reach_tonic_request() {
        let session = Session::new(AccountId(3), AccountType::Authority);
        let mut http_request = tonic::codegen::http::Request::new(());
        attach(http_request.extensions_mut(), session);

        let request = Request::from_http(http_request);
        assert_eq!(request.claims::<Session>(), Some(&session));
    }
}
