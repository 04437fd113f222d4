pub mod applications;
pub mod auth;
pub mod crud;
pub mod error;
pub mod extract;
pub mod gigs;
pub mod messages;
pub mod middleware;
pub mod notifications;
pub mod ratings;
pub mod routes;
pub mod transactions;

pub use auth::{AppState, AppStateInner};
pub use error::ApiError;
pub use routes::router;
