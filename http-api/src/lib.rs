//! HTTP surface for the taskboard API
//!
//! - [`server`] - axum router and listener
//! - [`handlers`] - one handler per service operation
//! - [`error`] - uniform failure shape with trace identifiers
//! - [`request_logger`] - per-request logging middleware

pub mod error;
pub mod handlers;
pub mod request_logger;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use server::ApiServer;
