pub mod claims;
pub mod handlers;
pub mod middleware;
pub mod server;

pub use middleware::AuthorizationLayer;
pub use server::AppGrpcService;
pub use server::PUBLIC_METHODS;
