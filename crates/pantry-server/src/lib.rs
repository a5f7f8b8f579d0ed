//! Pantry Server - Axum proxy in front of the recipe API.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
