use std::sync::Arc;

use tonic::Request;
use tonic::Response;
use tonic::Status;

use super::claims::ClaimsExt;
use super::handlers::create_business_user;
use super::handlers::create_session;
use super::handlers::delete_business_user;
use super::handlers::get_business_user;
use super::handlers::get_inspector_user;
use super::handlers::update_business_user;
use crate::account::ports::AccountRepository;
use crate::account::service::AccountService;
use crate::proto::app_service_server::AppService;
use crate::proto::CreateBusinessUserRequest;
use crate::proto::CreateSessionRequest;
use crate::proto::DeleteBusinessUserRequest;
use crate::proto::DeleteBusinessUserResponse;
use crate::proto::GetBusinessUserRequest;
use crate::proto::GetBusinessUserResponse;
use crate::proto::GetInspectorUserRequest;
use crate::proto::GetInspectorUserResponse;
use crate::proto::SessionToken;
use crate::proto::UpdateBusinessUserRequest;
use crate::proto::UpdateBusinessUserResponse;
use crate::session::models::Session;
use crate::session::SessionManager;

/// Methods callable without a session: registration and login.
pub const PUBLIC_METHODS: [&str; 2] = [
    "/app.v1.AppService/CreateBusinessUser",
    "/app.v1.AppService/CreateSession",
];

pub struct AppGrpcService<AR>
where
    AR: AccountRepository,
{
    accounts: Arc<AccountService<AR>>,
    sessions: Arc<SessionManager<AR>>,
}

impl<AR> AppGrpcService<AR>
where
    AR: AccountRepository,
{
    pub fn new(accounts: Arc<AccountService<AR>>, sessions: Arc<SessionManager<AR>>) -> Self {
        Self { accounts, sessions }
    }
}

#[tonic::async_trait]
impl<AR> AppService for AppGrpcService<AR>
where
    AR: AccountRepository,
{
    async fn create_business_user(
        &self,
        request: Request<CreateBusinessUserRequest>,
    ) -> Result<Response<SessionToken>, Status> {
        let response = create_business_user::create_business_user(
            &self.accounts,
            &self.sessions,
            request.into_inner(),
        )
        .await?;
        Ok(Response::new(response))
    }

    async fn create_session(
        &self,
        request: Request<CreateSessionRequest>,
    ) -> Result<Response<SessionToken>, Status> {
        let response =
            create_session::create_session(&self.accounts, &self.sessions, request.into_inner())
                .await?;
        Ok(Response::new(response))
    }

    async fn get_business_user(
        &self,
        request: Request<GetBusinessUserRequest>,
    ) -> Result<Response<GetBusinessUserResponse>, Status> {
        let response = get_business_user::get_business_user(
            &self.accounts,
            &self.sessions,
            request.claims::<Session>(),
        )
        .await?;
        Ok(Response::new(response))
    }

    async fn update_business_user(
        &self,
        request: Request<UpdateBusinessUserRequest>,
    ) -> Result<Response<UpdateBusinessUserResponse>, Status> {
        let session = request.claims::<Session>().copied();
        let response = update_business_user::update_business_user(
            &self.accounts,
            &self.sessions,
            session.as_ref(),
            request.into_inner(),
        )
        .await?;
        Ok(Response::new(response))
    }

    async fn delete_business_user(
        &self,
        request: Request<DeleteBusinessUserRequest>,
    ) -> Result<Response<DeleteBusinessUserResponse>, Status> {
        let response = delete_business_user::delete_business_user(
            &self.accounts,
            &self.sessions,
            request.claims::<Session>(),
        )
        .await?;
        Ok(Response::new(response))
    }

    async fn get_inspector_user(
        &self,
        request: Request<GetInspectorUserRequest>,
    ) -> Result<Response<GetInspectorUserResponse>, Status> {
        let response = get_inspector_user::get_inspector_user(
            &self.accounts,
            &self.sessions,
            request.claims::<Session>(),
        )
        .await?;
        Ok(Response::new(response))
    }
}
