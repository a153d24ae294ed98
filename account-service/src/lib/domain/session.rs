//! Session issuance and secondary authorization.
//!
//! Account sessions travel as bearer tokens on the gRPC surface and are
//! revalidated against the account store on every use. The administrator
//! session travels as an HTTP cookie and is checked locally.

pub mod admin;
pub mod errors;
pub mod manager;
pub mod models;

pub use admin::AdminSessionManager;
pub use manager::SessionManager;
