use tonic::Status;

use crate::account::models::AccountType;
use crate::account::models::BusinessProfile;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;
use crate::account::service::AccountService;
use crate::inbound::grpc::middleware::auth_status;
use crate::proto::UpdateBusinessUserRequest;
use crate::proto::UpdateBusinessUserResponse;
use crate::session::models::Session;
use crate::session::SessionManager;

pub async fn update_business_user<AR>(
    accounts: &AccountService<AR>,
    sessions: &SessionManager<AR>,
    session: Option<&Session>,
    request: UpdateBusinessUserRequest,
) -> Result<UpdateBusinessUserResponse, Status>
where
    AR: AccountRepository,
{
    let session = sessions
        .authorize_request(session, Some(AccountType::Business))
        .await
        .map_err(auth_status)?;

    let profile = request.try_into_domain()?;
    accounts
        .update_business_user(session.account_id, profile)
        .await?;

    Ok(UpdateBusinessUserResponse {})
}

impl UpdateBusinessUserRequest {
    fn try_into_domain(self) -> Result<BusinessProfile, Status> {
        self.user
            .ok_or_else(|| Status::invalid_argument("user is required"))
            .and_then(BusinessProfile::try_from)
    }
}
