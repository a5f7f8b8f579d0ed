use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use pantry_core::{sort, RecipeDetail, RecipeSummary, SearchParams, SortBy, SortDirection};
use pantry_upstream::DEFAULT_RANDOM_COUNT;

use crate::error::ApiError;
use crate::state::AppState;

/// Upper bound accepted by upstream for one random batch.
const MAX_RANDOM_COUNT: u32 = 100;

const CUISINES: &[&str] = &[
    "italian",
    "mexican",
    "asian",
    "american",
    "mediterranean",
    "indian",
];
const DIETS: &[&str] = &["vegetarian", "vegan", "gluten-free", "keto", "paleo"];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/recipes/search", get(search))
        .route("/api/recipes/random", get(random))
        .route("/api/recipes/available-filters", get(available_filters))
        .route("/api/recipes/information/{id}", get(recipe))
        .route("/api/recipes/{id}", get(recipe))
}

/// Query string of `/api/recipes/search`. Values are kept as strings so a
/// malformed number is ignored rather than rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub query: Option<String>,
    pub ingredients: Option<String>,
    pub cuisine: Option<String>,
    pub diet: Option<String>,
    pub max_time: Option<String>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
}

impl SearchQuery {
    pub fn into_params(self) -> SearchParams {
        SearchParams {
            query: self.query.filter(|q| !q.trim().is_empty()),
            ingredients: self.ingredients.filter(|i| !i.trim().is_empty()),
            cuisine: self.cuisine,
            diet: self.diet,
            max_time: self
                .max_time
                .and_then(|m| m.trim().parse::<u32>().ok())
                .filter(|m| *m > 0),
            sort_by: self
                .sort_by
                .as_deref()
                .map(SortBy::parse)
                .unwrap_or_default(),
            sort_direction: self
                .sort_direction
                .as_deref()
                .map(SortDirection::parse)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RandomQuery {
    pub number: Option<String>,
}

/// GET /api/recipes/search - Search upstream, sorted locally when `sortBy` is given.
async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<RecipeSummary>>, ApiError> {
    let params = query.into_params();

    let recipes = state
        .upstream
        .search(&params)
        .await
        .map_err(|e| ApiError::upstream("Failed to search recipes", e))?;

    tracing::debug!("Search returned {} recipes", recipes.len());

    if params.sort_by.is_none() {
        return Ok(Json(recipes));
    }
    Ok(Json(sort(&recipes, params.sort_by, params.sort_direction)))
}

/// GET /api/recipes/random?number=<n> - Random batch, 12 by default.
async fn random(
    State(state): State<AppState>,
    Query(query): Query<RandomQuery>,
) -> Result<Json<Vec<RecipeSummary>>, ApiError> {
    let count = query
        .number
        .and_then(|n| n.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_RANDOM_COUNT)
        .min(MAX_RANDOM_COUNT);

    let recipes = state
        .upstream
        .random(Some(count))
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch random recipes", e))?;

    Ok(Json(recipes))
}

/// GET /api/recipes/:id - Full recipe record.
async fn recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeDetail>, ApiError> {
    const CONTEXT: &str = "Failed to fetch recipe details";

    let id: u64 = id
        .trim()
        .parse()
        .map_err(|_| ApiError::InvalidId { context: CONTEXT, id })?;

    let detail = state
        .upstream
        .by_id(id)
        .await
        .map_err(|e| ApiError::upstream(CONTEXT, e))?;

    Ok(Json(detail))
}

#[derive(Serialize)]
struct AvailableFilters {
    cuisines: &'static [&'static str],
    diets: &'static [&'static str],
}

/// GET /api/recipes/available-filters - Cuisine and diet choices offered to clients.
async fn available_filters() -> Json<AvailableFilters> {
    Json(AvailableFilters {
        cuisines: CUISINES,
        diets: DIETS,
    })
}
