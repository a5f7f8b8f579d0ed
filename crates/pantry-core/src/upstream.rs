//! Wire shapes of the third-party recipe API.
//!
//! Every field except `id` and `title` is optional here, and `null` is
//! accepted wherever upstream is known to send it. These records are only
//! read by [`crate::normalize`]; nothing downstream of normalization sees them.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamRecipe {
    pub id: u64,
    pub title: String,
    pub image: Option<String>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub cuisines: Option<Vec<String>>,
    pub diets: Option<Vec<String>>,
    pub dish_types: Option<Vec<String>>,
    pub aggregate_likes: Option<u64>,
    pub spoonacular_score: Option<f64>,
    pub source_url: Option<String>,
    pub summary: Option<String>,
    pub extended_ingredients: Option<Vec<UpstreamIngredient>>,
    pub analyzed_instructions: Option<Vec<UpstreamInstructionBlock>>,
    pub nutrition: Option<UpstreamNutrition>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamIngredient {
    pub id: Option<u64>,
    pub original: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamInstructionBlock {
    pub name: Option<String>,
    pub steps: Option<Vec<UpstreamStep>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamStep {
    pub number: Option<u32>,
    pub step: Option<String>,
    pub ingredients: Option<Vec<UpstreamRef>>,
    pub equipment: Option<Vec<UpstreamRef>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamRef {
    pub id: Option<u64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamNutrition {
    pub nutrients: Option<Vec<UpstreamNutrient>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamNutrient {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

/// Body of `/complexSearch`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<UpstreamRecipe>,
}

/// Body of `/random`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RandomResponse {
    #[serde(default)]
    pub recipes: Vec<UpstreamRecipe>,
}
