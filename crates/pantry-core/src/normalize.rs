//! Conversion from upstream wire shapes to [`RecipeSummary`] and [`RecipeDetail`].
//!
//! Both conversions are total: absent or `null` fields become empty strings,
//! empty lists or zero.

use crate::recipe::{
    IngredientLine, InstructionBlock, NamedRef, Nutrient, RecipeDetail, RecipeSummary, Step,
    DEFAULT_SERVINGS,
};
use crate::upstream::{
    UpstreamIngredient, UpstreamInstructionBlock, UpstreamRecipe, UpstreamRef, UpstreamStep,
};

/// Normalize an upstream recipe into a card summary.
pub fn to_summary(raw: UpstreamRecipe) -> RecipeSummary {
    RecipeSummary {
        id: raw.id,
        title: raw.title,
        image: raw.image.unwrap_or_default(),
        ready_in_minutes: raw.ready_in_minutes.unwrap_or(0),
        servings: raw
            .servings
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_SERVINGS),
        cuisines: raw.cuisines.unwrap_or_default(),
        diets: raw.diets.unwrap_or_default(),
        dish_types: raw.dish_types.unwrap_or_default(),
        aggregate_likes: raw.aggregate_likes.unwrap_or(0),
        match_score: raw.spoonacular_score.unwrap_or(0.0),
        source_url: raw.source_url.unwrap_or_default(),
        extended_ingredients: raw
            .extended_ingredients
            .unwrap_or_default()
            .into_iter()
            .map(to_ingredient)
            .collect(),
    }
}

/// Normalize an upstream recipe into the full detail record.
pub fn to_detail(mut raw: UpstreamRecipe) -> RecipeDetail {
    let summary = raw.summary.take().unwrap_or_default();
    let nutrients = raw
        .nutrition
        .take()
        .and_then(|n| n.nutrients)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|n| {
            Some(Nutrient {
                name: n.name?,
                amount: n.amount.unwrap_or(0.0),
                unit: n.unit.unwrap_or_default(),
            })
        })
        .collect();
    let analyzed_instructions: Vec<InstructionBlock> = raw
        .analyzed_instructions
        .take()
        .unwrap_or_default()
        .into_iter()
        .map(to_block)
        .collect();
    let instructions = flatten_instructions(&analyzed_instructions);

    RecipeDetail {
        recipe: to_summary(raw),
        summary,
        instructions,
        analyzed_instructions,
        nutrients,
    }
}

/// Join the steps of the first instruction block with newlines.
pub fn flatten_instructions(blocks: &[InstructionBlock]) -> String {
    match blocks.first() {
        Some(block) => block
            .steps
            .iter()
            .map(|s| s.step.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        None => String::new(),
    }
}

fn to_ingredient(raw: UpstreamIngredient) -> IngredientLine {
    IngredientLine {
        id: raw.id.unwrap_or(0),
        original: raw.original.unwrap_or_default(),
        amount: raw.amount.unwrap_or(0.0),
        unit: raw.unit.unwrap_or_default(),
    }
}

fn to_block(raw: UpstreamInstructionBlock) -> InstructionBlock {
    InstructionBlock {
        name: raw.name.unwrap_or_default(),
        steps: raw
            .steps
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, s)| to_step(i, s))
            .collect(),
    }
}

// Steps without a usable number take their 1-based position.
fn to_step(index: usize, raw: UpstreamStep) -> Step {
    Step {
        number: raw
            .number
            .filter(|n| *n > 0)
            .unwrap_or(index as u32 + 1),
        step: raw.step.unwrap_or_default(),
        ingredients: to_refs(raw.ingredients),
        equipment: to_refs(raw.equipment),
    }
}

fn to_refs(raw: Option<Vec<UpstreamRef>>) -> Vec<NamedRef> {
    raw.unwrap_or_default()
        .into_iter()
        .map(|r| NamedRef {
            id: r.id.unwrap_or(0),
            name: r.name.unwrap_or_default(),
        })
        .collect()
}
