mod types;

pub use types::*;

#[cfg(feature = "axum_api")]
pub mod axum;
