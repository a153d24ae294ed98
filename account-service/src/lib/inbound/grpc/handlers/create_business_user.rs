use tonic::Status;

use crate::account::models::AccountType;
use crate::account::models::BusinessProfile;
use crate::account::models::CreateBusinessUserCommand;
use crate::account::models::EmailAddress;
use crate::account::models::Password;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;
use crate::account::service::AccountService;
use crate::proto::CreateBusinessUserRequest;
use crate::proto::SessionToken as ProtoSessionToken;
use crate::session::SessionManager;

pub async fn create_business_user<AR>(
    accounts: &AccountService<AR>,
    sessions: &SessionManager<AR>,
    request: CreateBusinessUserRequest,
) -> Result<ProtoSessionToken, Status>
where
    AR: AccountRepository,
{
    let command = request.try_into_domain()?;
    let account_id = accounts.create_business_user(command).await?;
    let token = sessions.issue_session(account_id, AccountType::Business)?;

    Ok(token.into())
}

impl CreateBusinessUserRequest {
    fn try_into_domain(self) -> Result<CreateBusinessUserCommand, Status> {
        let user = self
            .user
            .ok_or_else(|| Status::invalid_argument("user is required"))?;

        let email = EmailAddress::new(self.email)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;
        let password =
            Password::new(self.password).map_err(|e| Status::invalid_argument(e.to_string()))?;
        let profile = BusinessProfile::try_from(user)?;

        Ok(CreateBusinessUserCommand {
            email,
            password,
            profile,
        })
    }
}
