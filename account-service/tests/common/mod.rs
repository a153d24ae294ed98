#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::account::errors::AccountError;
use account_service::account::models::AccountId;
use account_service::account::models::AccountType;
use account_service::account::models::BusinessProfile;
use account_service::account::models::BusinessUser;
use account_service::account::models::Credentials;
use account_service::account::models::EmailAddress;
use account_service::account::models::InspectorProfile;
use account_service::account::models::InspectorUser;
use account_service::account::ports::AccountRepository;
use account_service::account::service::AccountService;
use account_service::inbound::grpc::AppGrpcService;
use account_service::inbound::grpc::AuthorizationLayer;
use account_service::inbound::grpc::PUBLIC_METHODS;
use account_service::inbound::http::create_router;
use account_service::proto::app_service_client::AppServiceClient;
use account_service::proto::app_service_server::AppServiceServer;
use account_service::session::models::Session;
use account_service::session::AdminSessionManager;
use account_service::session::SessionManager;
use async_trait::async_trait;
use auth::Authenticator;
use auth::CallAuthorizer;
use auth::KeyPair;
use auth::PasswordHasher;
use auth::TokenCodec;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Channel;
use tonic::transport::Server;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct-horse";

/// Test application that spawns the real gRPC and HTTP servers
pub struct TestApp {
    pub http_address: String,
    pub api_client: reqwest::Client,
    pub grpc: AppServiceClient<Channel>,
    pub repository: Arc<InMemoryAccountRepository>,
    pub codec: Arc<TokenCodec>,
}

impl TestApp {
    /// Spawn both servers in background tasks and return TestApp
    pub async fn spawn() -> Self {
        let repository = Arc::new(InMemoryAccountRepository::default());
        let codec = Arc::new(TokenCodec::new(
            KeyPair::generate().expect("Failed to generate key pair"),
        ));
        // Cheap parameters keep the suite fast
        let hasher = PasswordHasher::with_params(1024, 1, 1).expect("Invalid Argon2 params");

        let admin_hash = hasher.hash(ADMIN_PASSWORD).expect("Failed to hash");
        let admin_credentials = format!("{}:{}", ADMIN_USERNAME, admin_hash)
            .parse()
            .expect("Failed to parse admin credentials");

        let authenticator = Authenticator::new(Arc::clone(&codec));
        let account_service = Arc::new(AccountService::new(Arc::clone(&repository), hasher));
        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&codec),
            Arc::clone(&repository),
        ));
        let admin_sessions = Arc::new(AdminSessionManager::new(authenticator, admin_credentials));

        // Use random ports (0 = OS assigns)
        let http_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let http_port = http_listener.local_addr().unwrap().port();

        let router = create_router(Arc::clone(&account_service), admin_sessions);
        tokio::spawn(async move {
            axum::serve(http_listener, router).await.expect("Server error");
        });

        let grpc_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let grpc_port = grpc_listener.local_addr().unwrap().port();

        let grpc_service = AppGrpcService::new(account_service, session_manager);
        let authorizer = CallAuthorizer::new(Arc::clone(&codec), PUBLIC_METHODS);
        tokio::spawn(async move {
            Server::builder()
                .layer(AuthorizationLayer::<Session>::new(authorizer))
                .add_service(AppServiceServer::new(grpc_service))
                .serve_with_incoming(TcpListenerStream::new(grpc_listener))
                .await
                .expect("Server error");
        });

        let grpc = AppServiceClient::connect(format!("http://127.0.0.1:{}", grpc_port))
            .await
            .expect("Failed to connect gRPC client");

        Self {
            http_address: format!("http://127.0.0.1:{}", http_port),
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
            grpc,
            repository,
            codec,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.http_address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.http_address, path))
    }

    /// Log the administrator in; the session cookie lands in the client's store
    pub async fn admin_login(&self) -> reqwest::Response {
        self.post("/admin/login")
            .form(&[("username", ADMIN_USERNAME), ("password", ADMIN_PASSWORD)])
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Wrap a message in a request carrying a bearer token
pub fn with_token<T>(message: T, token: &str) -> tonic::Request<T> {
    let mut request = tonic::Request::new(message);
    request.metadata_mut().insert(
        "authorization",
        format!("Bearer {}", token).parse().unwrap(),
    );
    request
}

struct StoredAccount {
    account_type: AccountType,
    email: EmailAddress,
    password_hash: String,
}

#[derive(Default)]
struct Store {
    next_id: i64,
    accounts: HashMap<i64, StoredAccount>,
    business_users: HashMap<i64, BusinessProfile>,
    inspector_users: HashMap<i64, InspectorProfile>,
}

impl Store {
    fn insert(
        &mut self,
        email: &EmailAddress,
        password_hash: &str,
        account_type: AccountType,
    ) -> Result<i64, AccountError> {
        let taken = self
            .accounts
            .values()
            .any(|a| a.account_type == account_type && a.email == *email);
        if taken {
            return Err(AccountError::EmailAlreadyExists(email.to_string()));
        }

        self.next_id += 1;
        self.accounts.insert(
            self.next_id,
            StoredAccount {
                account_type,
                email: email.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(self.next_id)
    }
}

/// Account store kept in memory, with the same uniqueness rules as the database
#[derive(Default)]
pub struct InMemoryAccountRepository {
    store: Mutex<Store>,
}

impl InMemoryAccountRepository {
    pub fn contains(&self, id: AccountId) -> bool {
        self.store.lock().unwrap().accounts.contains_key(&id.0)
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn account_exists(
        &self,
        id: AccountId,
        account_type: AccountType,
    ) -> Result<bool, AccountError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .accounts
            .get(&id.0)
            .is_some_and(|a| a.account_type == account_type))
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
        account_type: AccountType,
    ) -> Result<Option<Credentials>, AccountError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .accounts
            .iter()
            .find(|(_, a)| a.account_type == account_type && a.email == *email)
            .map(|(id, a)| Credentials {
                account_id: AccountId(*id),
                password_hash: a.password_hash.clone(),
            }))
    }

    async fn create_business_user(
        &self,
        email: &EmailAddress,
        password_hash: &str,
        profile: &BusinessProfile,
    ) -> Result<AccountId, AccountError> {
        let mut store = self.store.lock().unwrap();
        let id = store.insert(email, password_hash, AccountType::Business)?;
        store.business_users.insert(id, profile.clone());
        Ok(AccountId(id))
    }

    async fn get_business_user(
        &self,
        id: AccountId,
    ) -> Result<Option<BusinessUser>, AccountError> {
        let store = self.store.lock().unwrap();
        let (Some(account), Some(profile)) =
            (store.accounts.get(&id.0), store.business_users.get(&id.0))
        else {
            return Ok(None);
        };
        Ok(Some(BusinessUser {
            account_id: id,
            email: account.email.clone(),
            profile: profile.clone(),
        }))
    }

    async fn update_business_user(
        &self,
        id: AccountId,
        profile: &BusinessProfile,
    ) -> Result<(), AccountError> {
        let mut store = self.store.lock().unwrap();
        let stored = store
            .business_users
            .get_mut(&id.0)
            .ok_or_else(|| AccountError::NotFound(id.to_string()))?;
        *stored = profile.clone();
        Ok(())
    }

    async fn create_inspector_user(
        &self,
        email: &EmailAddress,
        password_hash: &str,
        profile: &InspectorProfile,
    ) -> Result<AccountId, AccountError> {
        let mut store = self.store.lock().unwrap();
        let id = store.insert(email, password_hash, AccountType::Authority)?;
        store.inspector_users.insert(id, profile.clone());
        Ok(AccountId(id))
    }

    async fn get_inspector_user(
        &self,
        id: AccountId,
    ) -> Result<Option<InspectorUser>, AccountError> {
        let store = self.store.lock().unwrap();
        let (Some(account), Some(profile)) =
            (store.accounts.get(&id.0), store.inspector_users.get(&id.0))
        else {
            return Ok(None);
        };
        Ok(Some(InspectorUser {
            account_id: id,
            email: account.email.clone(),
            profile: profile.clone(),
        }))
    }

    async fn delete_account(&self, id: AccountId) -> Result<(), AccountError> {
        let mut store = self.store.lock().unwrap();
        store.business_users.remove(&id.0);
        store.inspector_users.remove(&id.0);
        store
            .accounts
            .remove(&id.0)
            .map(|_| ())
            .ok_or_else(|| AccountError::NotFound(id.to_string()))
    }

    async fn ping(&self) -> Result<(), AccountError> {
        Ok(())
    }
}
