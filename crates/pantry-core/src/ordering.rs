//! Stable ordering and local filtering of recipe summaries.

use std::cmp::Ordering;

use crate::filter::{FilterSelection, SortBy, SortDirection, SortKey};
use crate::recipe::RecipeSummary;

/// Return a sorted copy of `recipes`.
///
/// Equal keys keep their input order in both directions. `SortBy::None`
/// returns the input order unchanged.
pub fn sort(
    recipes: &[RecipeSummary],
    sort_by: SortBy,
    direction: SortDirection,
) -> Vec<RecipeSummary> {
    let mut sorted = recipes.to_vec();
    let Some(key) = sort_by.key() else {
        return sorted;
    };
    let direction = sort_by.implied_direction().unwrap_or(direction);

    // slice::sort_by is stable; reversing the comparator keeps ties in place.
    sorted.sort_by(|a, b| {
        let ord = compare_by(key, a, b);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    sorted
}

fn compare_by(key: SortKey, a: &RecipeSummary, b: &RecipeSummary) -> Ordering {
    match key {
        SortKey::Popularity => a.aggregate_likes.cmp(&b.aggregate_likes),
        SortKey::Time => a.ready_in_minutes.cmp(&b.ready_in_minutes),
        SortKey::Match => a.match_score.total_cmp(&b.match_score),
    }
}

/// Filter and sort an already fetched batch without asking upstream.
///
/// Cuisine and diet match case-insensitively as substrings of any of the
/// recipe's values; `all` matches everything. Sorting defaults to descending.
pub fn apply_local_filters(
    batch: &[RecipeSummary],
    filters: &FilterSelection,
) -> Vec<RecipeSummary> {
    let cuisine = filters.cuisine_constraint().map(str::to_lowercase);
    let diet = filters.diet_constraint().map(str::to_lowercase);

    let filtered: Vec<RecipeSummary> = batch
        .iter()
        .filter(|r| cuisine.as_deref().is_none_or(|c| any_contains(&r.cuisines, c)))
        .filter(|r| diet.as_deref().is_none_or(|d| any_contains(&r.diets, d)))
        .filter(|r| filters.max_time == 0 || r.ready_in_minutes <= filters.max_time)
        .cloned()
        .collect();

    sort(&filtered, filters.sort_by, SortDirection::Desc)
}

fn any_contains(values: &[String], needle: &str) -> bool {
    values.iter().any(|v| v.to_lowercase().contains(needle))
}
