use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use pantry_core::RecipeSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

/// Recipes planned per day and meal. Serialized as
/// `{"2024-05-01": {"lunch": {...}}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealPlan {
    days: BTreeMap<NaiveDate, BTreeMap<MealSlot, RecipeSummary>>,
}

impl MealPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan `recipe` for a slot, replacing whatever was there.
    pub fn add(&mut self, date: NaiveDate, slot: MealSlot, recipe: RecipeSummary) {
        self.days.entry(date).or_default().insert(slot, recipe);
    }

    /// Clear a slot. A day without any planned meal is dropped.
    pub fn remove(&mut self, date: NaiveDate, slot: MealSlot) -> Option<RecipeSummary> {
        let meals = self.days.get_mut(&date)?;
        let removed = meals.remove(&slot);
        if meals.is_empty() {
            self.days.remove(&date);
        }
        removed
    }

    pub fn get(&self, date: NaiveDate, slot: MealSlot) -> Option<&RecipeSummary> {
        self.days.get(&date)?.get(&slot)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&BTreeMap<MealSlot, RecipeSummary>> {
        self.days.get(&date)
    }

    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.days.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
