use serde_json::Value;
use thiserror::Error;

use pantry_core::{RecipeDetail, RecipeSummary, SearchParams};

/// Failure of a request made on behalf of the session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Request timed out")]
    Timeout,

    #[error("Server returned HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        details: Value,
    },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Where the session gets recipes from.
pub trait RecipeSource: Send + Sync {
    fn search(
        &self,
        params: &SearchParams,
    ) -> impl std::future::Future<Output = Result<Vec<RecipeSummary>, FetchError>> + Send;

    fn random(
        &self,
        count: u32,
    ) -> impl std::future::Future<Output = Result<Vec<RecipeSummary>, FetchError>> + Send;

    fn recipe(
        &self,
        id: u64,
    ) -> impl std::future::Future<Output = Result<RecipeDetail, FetchError>> + Send;
}
