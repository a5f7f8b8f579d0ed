//! Pantry Session - Per-client application state.
//!
//! A [`Session`] holds favorites, recent searches, the meal plan and the
//! current result view for one client, persisting the durable parts through
//! a [`pantry_core::KeyValueStore`]. Recipes are fetched through a
//! [`RecipeSource`], normally the [`ProxyClient`].

pub mod history;
pub mod lifecycle;
pub mod meal_plan;
pub mod proxy;
pub mod session;
pub mod source;

pub use history::{RecentSearches, SearchHistory, SearchRecord, RECENT_SEARCH_LIMIT};
pub use lifecycle::{Outcome, RequestKind, RequestStatus, RequestTicket};
pub use meal_plan::{MealPlan, MealSlot};
pub use proxy::ProxyClient;
pub use session::{ActiveSearch, Session, RANDOM_BATCH_SIZE};
pub use source::{FetchError, RecipeSource};
