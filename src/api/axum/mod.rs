mod context;
mod cors;
mod error;
mod handlers;
mod routes;

pub use context::{API_TOKEN_HEADER, AuthContext};
pub use cors::{dashboard as dashboard_cors, permissive as permissive_cors};
pub use error::AppError;
pub use routes::{AppState, api_routes, auth_routes, user_routes};
