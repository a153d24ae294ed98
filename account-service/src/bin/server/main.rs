use std::sync::Arc;

use account_service::account::service::AccountService;
use account_service::config::Config;
use account_service::inbound::grpc::AppGrpcService;
use account_service::inbound::grpc::AuthorizationLayer;
use account_service::inbound::grpc::PUBLIC_METHODS;
use account_service::inbound::http::create_router;
use account_service::proto::app_service_server::AppServiceServer;
use account_service::repositories::PostgresAccountRepository;
use account_service::session::models::Session;
use account_service::session::AdminSessionManager;
use account_service::session::SessionManager;
use auth::Authenticator;
use auth::CallAuthorizer;
use auth::KeyPair;
use auth::PasswordHasher;
use auth::TokenCodec;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tonic::codegen::http;
use tonic::transport::Server;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod shutdown;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "account_service=debug,auth=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    let admin_credentials = config.admin.credentials()?;
    let issuance_policy = config.session.issuance_policy();

    tracing::info!(
        http_port = config.server.http_port,
        grpc_port = config.server.grpc_port,
        private_key_path = %config.token.private_key_path,
        compression = config.token.compression,
        issuance_policy = ?issuance_policy,
        "Configuration loaded"
    );

    let keys = KeyPair::from_pem_file(&config.token.private_key_path)?;
    let codec = Arc::new(TokenCodec::new(keys).with_compression(config.token.compression));
    tracing::info!(algorithm = "ES256+ECDH-ES/A256GCM", "Token key pair loaded");

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let account_repository = Arc::new(PostgresAccountRepository::new(pg_pool));
    let account_service = Arc::new(AccountService::new(
        Arc::clone(&account_repository),
        PasswordHasher::new(),
    ));
    let session_manager = Arc::new(
        SessionManager::new(Arc::clone(&codec), Arc::clone(&account_repository))
            .with_policy(issuance_policy),
    );
    let admin_sessions = Arc::new(AdminSessionManager::new(
        Authenticator::new(Arc::clone(&codec)),
        admin_credentials,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown::shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(Arc::clone(&account_service), admin_sessions);
    let http_shutdown = shutdown::wait(shutdown_rx.clone());
    let http_server = tokio::spawn(async move {
        axum::serve(http_listener, http_application)
            .with_graceful_shutdown(http_shutdown)
            .await
    });

    let grpc_address = format!("0.0.0.0:{}", config.server.grpc_port).parse()?;
    let grpc_service = AppGrpcService::new(Arc::clone(&account_service), session_manager);
    let authorizer = CallAuthorizer::new(Arc::clone(&codec), PUBLIC_METHODS);
    tracing::info!(
        address = %grpc_address,
        port = config.server.grpc_port,
        protocol = "grpc",
        public_methods = ?PUBLIC_METHODS,
        "gRpc server listening"
    );

    let grpc_shutdown = shutdown::wait(shutdown_rx);
    let grpc_server = tokio::spawn(async move {
        Server::builder()
            .trace_fn(|request: &http::Request<()>| {
                tracing::info_span!("grpc_request", method = %request.uri().path())
            })
            .layer(AuthorizationLayer::<Session>::new(authorizer))
            .add_service(AppServiceServer::new(grpc_service))
            .serve_with_shutdown(grpc_address, grpc_shutdown)
            .await
    });

    match tokio::try_join!(http_server, grpc_server) {
        Ok((http_result, grpc_result)) => {
            http_result?;
            grpc_result?;
            tracing::info!("Servers exited successfully");
        }
        Err(e) => tracing::error!(error = %e, "Server task failed"),
    };

    Ok(())
}
