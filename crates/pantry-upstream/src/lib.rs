//! Pantry Upstream - HTTP adapter for the third-party recipe API.

pub mod client;
pub mod error;

pub use client::{
    search_query, SpoonacularClient, DEFAULT_BASE_URL, DEFAULT_RANDOM_COUNT, PAGE_SIZE,
    RANDOM_TIMEOUT, SEARCH_TIMEOUT,
};
pub use error::UpstreamError;
