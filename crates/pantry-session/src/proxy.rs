use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use pantry_core::{RecipeDetail, RecipeSummary, SearchParams};

use crate::source::{FetchError, RecipeSource};

/// Client side timeout; longer than any upstream timeout of the proxy.
pub const PROXY_TIMEOUT: Duration = Duration::from_secs(15);

/// Error body returned by the proxy endpoints.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Value,
}

/// HTTP client for the proxy's `/recipes` endpoints.
pub struct ProxyClient {
    client: reqwest::Client,
    api_url: String,
}

impl ProxyClient {
    /// `api_url` is the proxy's API root, e.g. `http://localhost:5001/api`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .timeout(PROXY_TIMEOUT)
            .send()
            .await
            .map_err(map_reqwest)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest)?;

        if !status.is_success() {
            let (message, details) = match serde_json::from_slice::<ErrorBody>(&bytes) {
                Ok(body) => (body.error, body.details),
                Err(_) => (
                    status.canonical_reason().unwrap_or("Request failed").to_string(),
                    Value::String(String::from_utf8_lossy(&bytes).into_owned()),
                ),
            };
            return Err(FetchError::Http {
                status: status.as_u16(),
                message,
                details,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl RecipeSource for ProxyClient {
    async fn search(&self, params: &SearchParams) -> Result<Vec<RecipeSummary>, FetchError> {
        self.get_json("/recipes/search", &proxy_search_query(params))
            .await
    }

    async fn random(&self, count: u32) -> Result<Vec<RecipeSummary>, FetchError> {
        self.get_json("/recipes/random", &[("number", count.to_string())])
            .await
    }

    async fn recipe(&self, id: u64) -> Result<RecipeDetail, FetchError> {
        self.get_json(&format!("/recipes/{}", id), &[]).await
    }
}

/// Query string for `GET /recipes/search`.
pub fn proxy_search_query(params: &SearchParams) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(q) = &params.query {
        query.push(("query", q.clone()));
    }
    if let Some(ingredients) = &params.ingredients {
        query.push(("ingredients", ingredients.clone()));
    }
    if let Some(cuisine) = params.cuisine_constraint() {
        query.push(("cuisine", cuisine.to_string()));
    }
    if let Some(diet) = params.diet_constraint() {
        query.push(("diet", diet.to_string()));
    }
    if let Some(max_time) = params.max_time.filter(|m| *m > 0) {
        query.push(("maxTime", max_time.to_string()));
    }
    if !params.sort_by.is_none() {
        query.push(("sortBy", params.sort_by.as_str().to_string()));
        query.push(("sortDirection", params.sort_direction.as_str().to_string()));
    }
    query
}

fn map_reqwest(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_decode() {
        FetchError::Decode(e.to_string())
    } else {
        FetchError::Transport(e.to_string())
    }
}
