//! Pantry Core - Recipe models, normalization, ordering and storage traits.
//!
//! This crate has no network or database dependencies. Upstream JSON enters
//! through [`upstream`] and leaves [`normalize`] as application records.

pub mod error;
pub mod filter;
pub mod normalize;
pub mod ordering;
pub mod recipe;
pub mod storage;
pub mod upstream;

// Re-exports for convenience
pub use error::StorageError;
pub use filter::{FilterSelection, SearchParams, SortBy, SortDirection, SortKey};
pub use normalize::{flatten_instructions, to_detail, to_summary};
pub use ordering::{apply_local_filters, sort};
pub use recipe::{
    IngredientLine, InstructionBlock, NamedRef, Nutrient, RecipeDetail, RecipeSummary, Step,
    DEFAULT_SERVINGS,
};
pub use storage::{KeyValueStore, StorageKey};
pub use upstream::{RandomResponse, SearchResponse, UpstreamRecipe};

#[cfg(any(test, feature = "test-utils"))]
pub use storage::memory::InMemoryStore;
