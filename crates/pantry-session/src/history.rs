use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use pantry_core::RecipeSummary;

/// Maximum number of recent searches kept.
pub const RECENT_SEARCH_LIMIT: usize = 5;
/// Maximum number of search history records kept.
pub const SEARCH_HISTORY_LIMIT: usize = 100;

/// Distinct recent queries, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RecentSearches(Vec<String>);

impl From<Vec<String>> for RecentSearches {
    /// Drops blanks and later duplicates, keeping at most [`RECENT_SEARCH_LIMIT`].
    fn from(queries: Vec<String>) -> Self {
        let mut recent: Vec<String> = Vec::with_capacity(RECENT_SEARCH_LIMIT);
        for query in queries {
            if recent.len() == RECENT_SEARCH_LIMIT {
                break;
            }
            if !query.trim().is_empty() && !recent.contains(&query) {
                recent.push(query);
            }
        }
        Self(recent)
    }
}

impl From<RecentSearches> for Vec<String> {
    fn from(recent: RecentSearches) -> Self {
        recent.0
    }
}

impl RecentSearches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `query` to the front. Blank queries are ignored.
    /// Returns false when nothing changed.
    pub fn record(&mut self, query: &str) -> bool {
        if query.trim().is_empty() {
            return false;
        }
        if self.0.first().map(String::as_str) == Some(query) {
            return false;
        }
        self.0.retain(|q| q != query);
        self.0.insert(0, query.to_string());
        self.0.truncate(RECENT_SEARCH_LIMIT);
        true
    }

    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        if index < self.0.len() {
            Some(self.0.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One completed search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub query: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub result_count: usize,
}

/// Append-only log of searches, oldest first, capped at [`SEARCH_HISTORY_LIMIT`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchHistory(Vec<SearchRecord>);

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: SearchRecord) {
        self.0.push(record);
        if self.0.len() > SEARCH_HISTORY_LIMIT {
            let excess = self.0.len() - SEARCH_HISTORY_LIMIT;
            self.0.drain(..excess);
        }
    }

    pub fn records(&self) -> &[SearchRecord] {
        &self.0
    }

    /// Most frequent queries with their counts, highest first.
    /// Equal counts keep the order in which the query first appeared.
    pub fn popular_queries(&self, limit: usize) -> Vec<(String, usize)> {
        count_ordered(self.0.iter().map(|r| r.query.as_str()), limit)
    }
}

/// Cuisines most common among `recipes`, highest first.
pub fn top_cuisines(recipes: &[RecipeSummary], limit: usize) -> Vec<(String, usize)> {
    count_ordered(
        recipes
            .iter()
            .flat_map(|r| r.cuisines.iter().map(String::as_str)),
        limit,
    )
}

fn count_ordered<'a>(items: impl Iterator<Item = &'a str>, limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for item in items {
        let count = counts.entry(item).or_insert(0);
        if *count == 0 {
            order.push(item);
        }
        *count += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|item| (item.to_string(), counts[item]))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}
