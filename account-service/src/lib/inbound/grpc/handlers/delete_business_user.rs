use tonic::Status;

use crate::account::models::AccountType;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;
use crate::account::service::AccountService;
use crate::inbound::grpc::middleware::auth_status;
use crate::proto::DeleteBusinessUserResponse;
use crate::session::models::Session;
use crate::session::SessionManager;

pub async fn delete_business_user<AR>(
    accounts: &AccountService<AR>,
    sessions: &SessionManager<AR>,
    session: Option<&Session>,
) -> Result<DeleteBusinessUserResponse, Status>
where
    AR: AccountRepository,
{
    let session = sessions
        .authorize_request(session, Some(AccountType::Business))
        .await
        .map_err(auth_status)?;

    accounts.delete_business_user(session.account_id).await?;

    Ok(DeleteBusinessUserResponse {})
}
