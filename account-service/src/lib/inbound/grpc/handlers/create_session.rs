use tonic::Status;

use crate::account::models::AccountType;
use crate::account::models::EmailAddress;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;
use crate::account::service::AccountService;
use crate::proto::create_session_request::SessionUser;
use crate::proto::CreateSessionRequest;
use crate::proto::SessionToken as ProtoSessionToken;
use crate::session::SessionManager;

pub async fn create_session<AR>(
    accounts: &AccountService<AR>,
    sessions: &SessionManager<AR>,
    request: CreateSessionRequest,
) -> Result<ProtoSessionToken, Status>
where
    AR: AccountRepository,
{
    let account_type = session_account_type(request.session_user)?;

    // A malformed email can never match a stored account
    let email = EmailAddress::new(request.email)
        .map_err(|_| Status::unauthenticated("invalid credentials"))?;

    let account_id = accounts
        .verify_credentials(&email, &request.password, account_type)
        .await?;

    let token = sessions.issue_session(account_id, account_type)?;

    tracing::info!(account_id = %account_id, account_type = %account_type, "Session created");

    Ok(token.into())
}

fn session_account_type(value: i32) -> Result<AccountType, Status> {
    match SessionUser::try_from(value) {
        Ok(SessionUser::Business) => Ok(AccountType::Business),
        Ok(SessionUser::Authority) => Ok(AccountType::Authority),
        Ok(SessionUser::Unspecified) | Err(_) => {
            Err(Status::invalid_argument("unknown session user"))
        }
    }
}
