use serde::{Deserialize, Serialize};

/// Card summary of a recipe, used in list and grid views.
///
/// Built fresh from every search or random response and never mutated
/// afterwards. `id` is the only identity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub ready_in_minutes: u32,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub diets: Vec<String>,
    #[serde(default)]
    pub dish_types: Vec<String>,
    #[serde(default)]
    pub aggregate_likes: u64,
    /// Upstream relevance score, only meaningful for ingredient searches.
    #[serde(default)]
    pub match_score: f64,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub extended_ingredients: Vec<IngredientLine>,
}

/// Servings used when upstream omits the field or reports zero.
pub const DEFAULT_SERVINGS: u32 = 1;

fn default_servings() -> u32 {
    DEFAULT_SERVINGS
}

impl RecipeSummary {
    /// Minimal summary with every optional field at its default.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            image: String::new(),
            ready_in_minutes: 0,
            servings: DEFAULT_SERVINGS,
            cuisines: Vec::new(),
            diets: Vec::new(),
            dish_types: Vec::new(),
            aggregate_likes: 0,
            match_score: 0.0,
            source_url: String::new(),
            extended_ingredients: Vec::new(),
        }
    }
}

/// Full recipe record shown when a single recipe is opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: RecipeSummary,
    /// HTML blurb from upstream.
    #[serde(default)]
    pub summary: String,
    /// Steps of the first instruction block, one per line.
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub analyzed_instructions: Vec<InstructionBlock>,
    #[serde(default)]
    pub nutrients: Vec<Nutrient>,
}

impl RecipeDetail {
    /// Card view of this recipe, e.g. for saving it as a favorite.
    pub fn to_summary(&self) -> RecipeSummary {
        self.recipe.clone()
    }
}

/// One ingredient as written in the recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLine {
    #[serde(default)]
    pub id: u64,
    /// Free text, may carry quantity and unit inline.
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionBlock {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// 1-based position within the block.
    pub number: u32,
    pub step: String,
    #[serde(default)]
    pub ingredients: Vec<NamedRef>,
    #[serde(default)]
    pub equipment: Vec<NamedRef>,
}

/// Ingredient or equipment referenced by a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrient {
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
}
