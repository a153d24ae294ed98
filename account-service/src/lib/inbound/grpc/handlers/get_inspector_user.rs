use tonic::Status;

use crate::account::models::AccountType;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;
use crate::account::service::AccountService;
use crate::inbound::grpc::middleware::auth_status;
use crate::proto::GetInspectorUserResponse;
use crate::session::models::Session;
use crate::session::SessionManager;

pub async fn get_inspector_user<AR>(
    accounts: &AccountService<AR>,
    sessions: &SessionManager<AR>,
    session: Option<&Session>,
) -> Result<GetInspectorUserResponse, Status>
where
    AR: AccountRepository,
{
    let session = sessions
        .authorize_request(session, Some(AccountType::Authority))
        .await
        .map_err(auth_status)?;

    let user = accounts.get_inspector_user(session.account_id).await?;

    Ok(user.into())
}
