use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use pantry_core::{
    to_detail, to_summary, RandomResponse, RecipeDetail, RecipeSummary, SearchParams,
    SearchResponse, UpstreamRecipe,
};

use crate::error::UpstreamError;

pub const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com/recipes";

/// Timeout for search and single-recipe lookups.
pub const SEARCH_TIMEOUT: Duration = Duration::from_millis(5000);
/// Timeout for random batches.
pub const RANDOM_TIMEOUT: Duration = Duration::from_millis(10000);

/// Results per search; there is no pagination.
pub const PAGE_SIZE: u32 = 12;
pub const DEFAULT_RANDOM_COUNT: u32 = 12;

const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client for the Spoonacular recipe API.
///
/// Holds the API key; callers never see it.
pub struct SpoonacularClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SpoonacularClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Search recipes with the given filters.
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<RecipeSummary>, UpstreamError> {
        let query = search_query(params);
        let response: SearchResponse = self
            .get_json("/complexSearch", &query, SEARCH_TIMEOUT)
            .await?;

        Ok(response.results.into_iter().map(to_summary).collect())
    }

    /// Fetch a random batch. `count` defaults to [`DEFAULT_RANDOM_COUNT`].
    pub async fn random(&self, count: Option<u32>) -> Result<Vec<RecipeSummary>, UpstreamError> {
        let count = count.filter(|c| *c > 0).unwrap_or(DEFAULT_RANDOM_COUNT);
        let query = vec![
            ("number", count.to_string()),
            ("addRecipeInformation", "true".to_string()),
            ("fillIngredients", "true".to_string()),
        ];
        let response: RandomResponse = self.get_json("/random", &query, RANDOM_TIMEOUT).await?;

        Ok(response.recipes.into_iter().map(to_summary).collect())
    }

    /// Fetch the full record of one recipe.
    pub async fn by_id(&self, id: u64) -> Result<RecipeDetail, UpstreamError> {
        let path = format!("/{}/information", id);
        let query = vec![("addRecipeNutrition", "true".to_string())];
        let recipe: UpstreamRecipe = self.get_json(&path, &query, SEARCH_TIMEOUT).await?;

        Ok(to_detail(recipe))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {} ({} params)", url, query.len());

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, timeout))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, timeout))?;

        if !status.is_success() {
            return Err(UpstreamError::Http {
                status: status.as_u16(),
                body: error_body(&bytes),
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

/// Upstream query parameters for a search, excluding the API key.
pub fn search_query(params: &SearchParams) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("addRecipeInformation", "true".to_string()),
        ("fillIngredients", "true".to_string()),
        ("addRecipeNutrition", "true".to_string()),
        ("number", PAGE_SIZE.to_string()),
    ];

    if let Some(q) = params.query.as_deref().filter(|q| !q.trim().is_empty()) {
        query.push(("query", q.to_string()));
    }
    if let Some(ingredients) = params.ingredients.as_deref().filter(|i| !i.trim().is_empty()) {
        query.push(("includeIngredients", ingredients.to_string()));
    }
    if let Some(cuisine) = params.cuisine_constraint() {
        query.push(("cuisine", cuisine.to_string()));
    }
    if let Some(diet) = params.diet_constraint() {
        query.push(("diet", diet.to_string()));
    }
    if let Some(max_time) = params.max_time.filter(|m| *m > 0) {
        query.push(("maxReadyInMinutes", max_time.to_string()));
    }
    if let Some(sort) = params.sort_by.upstream_param() {
        query.push(("sort", sort.to_string()));
    }

    query
}

fn error_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
