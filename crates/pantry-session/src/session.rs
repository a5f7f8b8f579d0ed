use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use pantry_core::{
    apply_local_filters, FilterSelection, KeyValueStore, RecipeDetail, RecipeSummary,
    SearchParams, StorageError, StorageKey,
};

use crate::history::{top_cuisines, RecentSearches, SearchHistory, SearchRecord};
use crate::lifecycle::{Outcome, RequestKind, RequestStatus, RequestTicket, RequestTracker};
use crate::meal_plan::{MealPlan, MealSlot};
use crate::source::{FetchError, RecipeSource};

/// Number of recipes requested when browsing without a query.
pub const RANDOM_BATCH_SIZE: u32 = 20;

/// The search that produced the current results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveSearch {
    Text(String),
    Ingredients(Vec<String>),
}

impl ActiveSearch {
    /// Query string as shown in recent searches.
    pub fn label(&self) -> String {
        match self {
            ActiveSearch::Text(q) => q.clone(),
            ActiveSearch::Ingredients(items) => items.join(", "),
        }
    }

    fn params(&self, filters: &FilterSelection) -> SearchParams {
        match self {
            ActiveSearch::Text(q) => SearchParams::from_filters(q, filters),
            ActiveSearch::Ingredients(items) => {
                SearchParams::from_filters("", filters).with_ingredients(items)
            }
        }
    }
}

/// Per-client application state.
///
/// Owns the durable collections (favorites, recent searches, meal plan,
/// search history) and the transient view state (filters, results, open
/// recipe). Every mutation of a durable collection is written to the store
/// before the call returns; if the write fails the in-memory change is
/// undone and the error returned.
pub struct Session<K: KeyValueStore> {
    store: K,
    favorites: Vec<RecipeSummary>,
    recent: RecentSearches,
    meal_plan: MealPlan,
    history: SearchHistory,
    filters: FilterSelection,
    active_search: Option<ActiveSearch>,
    results: Vec<RecipeSummary>,
    random_batch: Vec<RecipeSummary>,
    selected: Option<RecipeDetail>,
    tracker: RequestTracker,
    last_outcome: Option<Outcome>,
}

impl<K: KeyValueStore> Session<K> {
    /// Start a session, loading whatever was persisted in `store`.
    /// Unreadable or malformed collections start empty.
    pub fn open(store: K) -> Self {
        let mut favorites: Vec<RecipeSummary> = load_or_default(&store, StorageKey::Favorites);
        let mut seen = std::collections::HashSet::new();
        favorites.retain(|r| seen.insert(r.id));

        let session = Self {
            recent: load_or_default(&store, StorageKey::RecentSearches),
            meal_plan: load_or_default(&store, StorageKey::MealPlan),
            history: load_or_default(&store, StorageKey::SearchHistory),
            favorites,
            store,
            filters: FilterSelection::default(),
            active_search: None,
            results: Vec::new(),
            random_batch: Vec::new(),
            selected: None,
            tracker: RequestTracker::new(),
            last_outcome: None,
        };

        tracing::debug!(
            "Session opened: {} favorites, {} recent searches",
            session.favorites.len(),
            session.recent.len()
        );
        session
    }

    /// End the session and hand back the store.
    pub fn close(self) -> K {
        tracing::debug!("Session closed");
        self.store
    }

    // ------------------------------------------------------------------
    // Favorites
    // ------------------------------------------------------------------

    pub fn favorites(&self) -> &[RecipeSummary] {
        &self.favorites
    }

    pub fn contains(&self, id: u64) -> bool {
        self.favorites.iter().any(|r| r.id == id)
    }

    /// Add a favorite. Returns false if the id was already present.
    pub fn add(&mut self, recipe: RecipeSummary) -> Result<bool, StorageError> {
        if self.contains(recipe.id) {
            return Ok(false);
        }
        self.favorites.push(recipe);
        if let Err(e) = persist(&self.store, StorageKey::Favorites, &self.favorites) {
            self.favorites.pop();
            return Err(e);
        }
        Ok(true)
    }

    /// Remove a favorite. Returns false if the id was not present.
    pub fn remove(&mut self, id: u64) -> Result<bool, StorageError> {
        let Some(pos) = self.favorites.iter().position(|r| r.id == id) else {
            return Ok(false);
        };
        let removed = self.favorites.remove(pos);
        if let Err(e) = persist(&self.store, StorageKey::Favorites, &self.favorites) {
            self.favorites.insert(pos, removed);
            return Err(e);
        }
        Ok(true)
    }

    /// Add or remove. Returns true if the recipe is a favorite afterwards.
    pub fn toggle_favorite(&mut self, recipe: RecipeSummary) -> Result<bool, StorageError> {
        if self.contains(recipe.id) {
            self.remove(recipe.id)?;
            Ok(false)
        } else {
            self.add(recipe)?;
            Ok(true)
        }
    }

    // ------------------------------------------------------------------
    // Recent searches and history
    // ------------------------------------------------------------------

    pub fn recent_searches(&self) -> &[String] {
        self.recent.as_slice()
    }

    /// Record a query as most recent. Blank queries are ignored.
    pub fn record(&mut self, query: &str) -> Result<(), StorageError> {
        let backup = self.recent.clone();
        if !self.recent.record(query) {
            return Ok(());
        }
        if let Err(e) = persist(&self.store, StorageKey::RecentSearches, &self.recent) {
            self.recent = backup;
            return Err(e);
        }
        Ok(())
    }

    pub fn remove_recent_at(&mut self, index: usize) -> Result<Option<String>, StorageError> {
        let backup = self.recent.clone();
        let removed = self.recent.remove_at(index);
        if removed.is_none() {
            return Ok(None);
        }
        if let Err(e) = persist(&self.store, StorageKey::RecentSearches, &self.recent) {
            self.recent = backup;
            return Err(e);
        }
        Ok(removed)
    }

    pub fn clear_recent(&mut self) -> Result<(), StorageError> {
        self.store.remove(StorageKey::RecentSearches)?;
        self.recent.clear();
        Ok(())
    }

    pub fn search_history(&self) -> &SearchHistory {
        &self.history
    }

    /// Most frequent searches, highest count first.
    pub fn popular_searches(&self, limit: usize) -> Vec<(String, usize)> {
        self.history.popular_queries(limit)
    }

    /// Most common cuisines among favorites.
    pub fn favorite_cuisines(&self, limit: usize) -> Vec<(String, usize)> {
        top_cuisines(&self.favorites, limit)
    }

    fn append_history(&mut self, query: &str, result_count: usize) -> Result<(), StorageError> {
        let backup = self.history.clone();
        self.history.push(SearchRecord {
            query: query.to_string(),
            timestamp: Utc::now().timestamp_millis(),
            result_count,
        });
        if let Err(e) = persist(&self.store, StorageKey::SearchHistory, &self.history) {
            self.history = backup;
            return Err(e);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Meal plan
    // ------------------------------------------------------------------

    pub fn meal_plan(&self) -> &MealPlan {
        &self.meal_plan
    }

    pub fn meal_for(&self, date: NaiveDate, slot: MealSlot) -> Option<&RecipeSummary> {
        self.meal_plan.get(date, slot)
    }

    pub fn add_meal(
        &mut self,
        date: NaiveDate,
        slot: MealSlot,
        recipe: RecipeSummary,
    ) -> Result<(), StorageError> {
        let backup = self.meal_plan.clone();
        self.meal_plan.add(date, slot, recipe);
        if let Err(e) = persist(&self.store, StorageKey::MealPlan, &self.meal_plan) {
            self.meal_plan = backup;
            return Err(e);
        }
        Ok(())
    }

    pub fn remove_meal(
        &mut self,
        date: NaiveDate,
        slot: MealSlot,
    ) -> Result<Option<RecipeSummary>, StorageError> {
        let backup = self.meal_plan.clone();
        let removed = self.meal_plan.remove(date, slot);
        if removed.is_none() {
            return Ok(None);
        }
        if let Err(e) = persist(&self.store, StorageKey::MealPlan, &self.meal_plan) {
            self.meal_plan = backup;
            return Err(e);
        }
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // View state
    // ------------------------------------------------------------------

    pub fn current_results(&self) -> &[RecipeSummary] {
        &self.results
    }

    pub fn set_results(&mut self, results: Vec<RecipeSummary>) {
        self.results = results;
    }

    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: FilterSelection) {
        self.filters = filters;
    }

    pub fn active_search(&self) -> Option<&ActiveSearch> {
        self.active_search.as_ref()
    }

    pub fn selected_recipe(&self) -> Option<&RecipeDetail> {
        self.selected.as_ref()
    }

    pub fn close_recipe(&mut self) {
        self.selected = None;
    }

    pub fn status(&self) -> RequestStatus {
        self.tracker.status()
    }

    pub fn is_loading(&self) -> bool {
        self.tracker.is_loading()
    }

    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    /// Message of the last failed interaction, if the last one failed.
    pub fn error(&self) -> Option<&str> {
        self.last_outcome.as_ref().and_then(Outcome::message)
    }

    // ------------------------------------------------------------------
    // Request lifecycle
    // ------------------------------------------------------------------

    /// Enter `Loading` for a new request, superseding any request in flight.
    pub fn begin_request(&mut self, kind: RequestKind) -> RequestTicket {
        self.last_outcome = None;
        self.tracker.begin(kind)
    }

    /// Apply the result of a request and return to `Idle`.
    ///
    /// Returns `None` without touching state when `ticket` was superseded.
    /// Errors and empty result sets become a failure with a user-facing
    /// message, and clear the current results.
    pub fn complete_request(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<RecipeSummary>, FetchError>,
    ) -> Option<Outcome> {
        if !self.tracker.finish(ticket) {
            tracing::warn!(
                "Discarding stale {:?} response (request #{})",
                ticket.kind,
                ticket.seq
            );
            return None;
        }

        let outcome = match result {
            Ok(recipes) if recipes.is_empty() => {
                self.results.clear();
                Outcome::Failure {
                    message: ticket.kind.empty_message().to_string(),
                }
            }
            Ok(recipes) => {
                let count = recipes.len();
                self.results = recipes;
                Outcome::Success { count }
            }
            Err(e) => {
                tracing::warn!("{:?} request #{} failed: {}", ticket.kind, ticket.seq, e);
                self.results.clear();
                Outcome::Failure {
                    message: ticket.kind.failure_message().to_string(),
                }
            }
        };

        self.last_outcome = Some(outcome.clone());
        Some(outcome)
    }

    fn fail_without_request(&mut self, message: &str) -> Outcome {
        self.results.clear();
        let outcome = Outcome::Failure {
            message: message.to_string(),
        };
        self.last_outcome = Some(outcome.clone());
        outcome
    }

    // ------------------------------------------------------------------
    // Interactions
    // ------------------------------------------------------------------

    /// Fetch a fresh random batch and show it. Leaves search mode.
    pub async fn load_random<S: RecipeSource>(&mut self, source: &S) -> Option<Outcome> {
        self.active_search = None;
        let ticket = self.begin_request(RequestKind::Random);
        let result = source.random(RANDOM_BATCH_SIZE).await;
        let batch = result.as_ref().ok().cloned();

        let outcome = self.complete_request(ticket, result)?;
        if let Some(batch) = batch {
            self.random_batch = batch;
        }
        Some(outcome)
    }

    /// Search recipes containing the given ingredients.
    pub async fn search_ingredients<S: RecipeSource>(
        &mut self,
        source: &S,
        ingredients: &[String],
    ) -> Option<Outcome> {
        let cleaned: Vec<String> = ingredients
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if cleaned.is_empty() {
            return Some(self.fail_without_request("Please enter at least one ingredient"));
        }
        self.run_search(source, ActiveSearch::Ingredients(cleaned), RequestKind::Search)
            .await
    }

    /// Free-text recipe search.
    pub async fn search_text<S: RecipeSource>(
        &mut self,
        source: &S,
        query: &str,
    ) -> Option<Outcome> {
        let query = query.trim();
        if query.is_empty() {
            return Some(self.fail_without_request("Please enter a search term"));
        }
        self.run_search(source, ActiveSearch::Text(query.to_string()), RequestKind::Search)
            .await
    }

    /// Change filters and refresh results.
    ///
    /// With an active search the search is re-issued upstream; otherwise the
    /// last random batch is filtered locally, fetching one first if needed.
    pub async fn apply_filters<S: RecipeSource>(
        &mut self,
        source: &S,
        filters: FilterSelection,
    ) -> Option<Outcome> {
        self.filters = filters;

        if let Some(search) = self.active_search.clone() {
            return self.run_search(source, search, RequestKind::Filter).await;
        }

        let ticket = self.begin_request(RequestKind::Filter);
        if self.random_batch.is_empty() {
            match source.random(RANDOM_BATCH_SIZE).await {
                Ok(batch) => self.random_batch = batch,
                Err(e) => return self.complete_request(ticket, Err(e)),
            }
        }
        let filtered = apply_local_filters(&self.random_batch, &self.filters);
        self.complete_request(ticket, Ok(filtered))
    }

    /// Load the full record of a recipe into the detail view.
    pub async fn open_recipe<S: RecipeSource>(
        &mut self,
        source: &S,
        id: u64,
    ) -> Option<&RecipeDetail> {
        self.last_outcome = None;
        match source.recipe(id).await {
            Ok(detail) => {
                self.selected = Some(detail);
                self.selected.as_ref()
            }
            Err(e) => {
                tracing::warn!("Failed to load recipe {}: {}", id, e);
                self.selected = None;
                self.fail_without_request(RequestKind::Detail.failure_message());
                None
            }
        }
    }

    async fn run_search<S: RecipeSource>(
        &mut self,
        source: &S,
        search: ActiveSearch,
        kind: RequestKind,
    ) -> Option<Outcome> {
        let label = search.label();
        let params = search.params(&self.filters);
        self.active_search = Some(search);

        let ticket = self.begin_request(kind);
        let result = source.search(&params).await;
        let answered = result.as_ref().map(Vec::len).ok();

        let outcome = self.complete_request(ticket, result)?;
        if let (RequestKind::Search, Some(count)) = (kind, answered) {
            if let Err(e) = self.record(&label) {
                tracing::warn!("Failed to save recent search: {}", e);
            }
            if let Err(e) = self.append_history(&label, count) {
                tracing::warn!("Failed to save search history: {}", e);
            }
        }
        Some(outcome)
    }
}

fn load_or_default<K, T>(store: &K, key: StorageKey) -> T
where
    K: KeyValueStore,
    T: DeserializeOwned + Default,
{
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Malformed persisted {}, starting empty: {}", key.as_str(), e);
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!("Failed to read persisted {}, starting empty: {}", key.as_str(), e);
            T::default()
        }
    }
}

fn persist<K, T>(store: &K, key: StorageKey, value: &T) -> Result<(), StorageError>
where
    K: KeyValueStore,
    T: Serialize,
{
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_core::{InMemoryStore, SortBy};
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    type Batch = Result<Vec<RecipeSummary>, FetchError>;

    #[derive(Default)]
    struct MockSource {
        search_results: Mutex<VecDeque<Batch>>,
        random_results: Mutex<VecDeque<Batch>>,
        details: Mutex<HashMap<u64, RecipeDetail>>,
        searches: Mutex<Vec<SearchParams>>,
        random_calls: AtomicUsize,
    }

    impl MockSource {
        fn with_search(self, batch: Batch) -> Self {
            self.search_results.lock().unwrap().push_back(batch);
            self
        }

        fn with_random(self, batch: Batch) -> Self {
            self.random_results.lock().unwrap().push_back(batch);
            self
        }

        fn last_search(&self) -> SearchParams {
            self.searches.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl RecipeSource for MockSource {
        async fn search(&self, params: &SearchParams) -> Result<Vec<RecipeSummary>, FetchError> {
            self.searches.lock().unwrap().push(params.clone());
            self.search_results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(Vec::new()))
        }

        async fn random(&self, _count: u32) -> Result<Vec<RecipeSummary>, FetchError> {
            self.random_calls.fetch_add(1, Ordering::SeqCst);
            self.random_results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(Vec::new()))
        }

        async fn recipe(&self, id: u64) -> Result<RecipeDetail, FetchError> {
            self.details
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(FetchError::Http {
                    status: 500,
                    message: "Failed to fetch recipe details".to_string(),
                    details: serde_json::Value::Null,
                })
        }
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: StorageKey) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: StorageKey, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Database("read-only".to_string()))
        }

        fn remove(&self, _key: StorageKey) -> Result<bool, StorageError> {
            Err(StorageError::Database("read-only".to_string()))
        }
    }

    fn recipe(id: u64, minutes: u32, cuisine: &str) -> RecipeSummary {
        let mut r = RecipeSummary::new(id, format!("Recipe {}", id));
        r.ready_in_minutes = minutes;
        if !cuisine.is_empty() {
            r.cuisines = vec![cuisine.to_string()];
        }
        r
    }

    fn ids(recipes: &[RecipeSummary]) -> Vec<u64> {
        recipes.iter().map(|r| r.id).collect()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_add_is_idempotent_and_remove_restores() {
        let mut session = Session::open(InMemoryStore::new());
        session.add(recipe(1, 10, "")).unwrap();
        let before = session.favorites().to_vec();

        assert!(session.add(recipe(2, 20, "")).unwrap());
        assert!(!session.add(recipe(2, 20, "")).unwrap());
        assert_eq!(session.favorites().len(), 2);
        assert!(session.contains(2));

        assert!(session.remove(2).unwrap());
        assert_eq!(session.favorites(), before.as_slice());
        assert!(!session.remove(2).unwrap());
    }

    #[test]
    fn test_writes_are_visible_after_reopen() {
        let mut session = Session::open(InMemoryStore::new());
        session.add(recipe(7, 15, "Thai")).unwrap();
        session.record("noodles").unwrap();
        session
            .add_meal(date("2024-06-01"), MealSlot::Dinner, recipe(7, 15, "Thai"))
            .unwrap();

        let session = Session::open(session.close());

        assert!(session.contains(7));
        assert_eq!(session.recent_searches(), &["noodles"]);
        assert_eq!(
            session.meal_for(date("2024-06-01"), MealSlot::Dinner).unwrap().id,
            7
        );
    }

    #[test]
    fn test_malformed_persisted_state_starts_empty() {
        let store = InMemoryStore::with_values([
            (StorageKey::Favorites, "{not json".to_string()),
            (StorageKey::MealPlan, "[1, 2]".to_string()),
            (StorageKey::RecentSearches, r#"["egg"]"#.to_string()),
        ]);

        let session = Session::open(store);

        assert!(session.favorites().is_empty());
        assert!(session.meal_plan().is_empty());
        assert_eq!(session.recent_searches(), &["egg"]);
    }

    #[test]
    fn test_duplicate_persisted_favorites_are_dropped() {
        let store = InMemoryStore::with_values([(
            StorageKey::Favorites,
            r#"[{"id": 1, "title": "A"}, {"id": 1, "title": "A again"}, {"id": 2, "title": "B"}]"#
                .to_string(),
        )]);

        let session = Session::open(store);

        assert_eq!(ids(session.favorites()), vec![1, 2]);
        assert_eq!(session.favorites()[0].title, "A");
    }

    #[test]
    fn test_oversized_persisted_recent_searches_are_trimmed() {
        let store = InMemoryStore::with_values([(
            StorageKey::RecentSearches,
            r#"["egg", "rice", "egg", "tofu", "kale", "beans", "leek"]"#.to_string(),
        )]);

        let session = Session::open(store);

        assert_eq!(
            session.recent_searches(),
            &["egg", "rice", "tofu", "kale", "beans"]
        );
    }

    #[test]
    fn test_failed_write_is_rolled_back() {
        let mut session = Session::open(ReadOnlyStore);

        assert!(session.add(recipe(1, 10, "")).is_err());
        assert!(session.favorites().is_empty());

        assert!(session.record("soup").is_err());
        assert!(session.recent_searches().is_empty());

        assert!(session
            .add_meal(date("2024-06-01"), MealSlot::Lunch, recipe(1, 10, ""))
            .is_err());
        assert!(session.meal_plan().is_empty());
    }

    #[test]
    fn test_recent_search_removal_persists() {
        let mut session = Session::open(InMemoryStore::new());
        session.record("a").unwrap();
        session.record("b").unwrap();
        session.record("   ").unwrap();

        assert_eq!(session.remove_recent_at(1).unwrap().as_deref(), Some("a"));
        assert_eq!(session.remove_recent_at(9).unwrap(), None);

        let mut session = Session::open(session.close());
        assert_eq!(session.recent_searches(), &["b"]);

        session.clear_recent().unwrap();
        let session = Session::open(session.close());
        assert!(session.recent_searches().is_empty());
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut session = Session::open(InMemoryStore::new());
        let first = session.begin_request(RequestKind::Search);
        let second = session.begin_request(RequestKind::Filter);

        assert_eq!(session.complete_request(first, Ok(vec![recipe(1, 5, "")])), None);
        assert!(session.current_results().is_empty());
        assert!(session.is_loading());

        let outcome = session
            .complete_request(second, Ok(vec![recipe(2, 5, "")]))
            .unwrap();
        assert_eq!(outcome, Outcome::Success { count: 1 });
        assert_eq!(ids(session.current_results()), vec![2]);
        assert_eq!(session.status(), RequestStatus::Idle);
    }

    #[tokio::test]
    async fn test_ingredient_search_success() {
        let source = MockSource::default().with_search(Ok(vec![recipe(1, 10, ""), recipe(2, 25, "")]));
        let mut session = Session::open(InMemoryStore::new());
        session.set_filters(FilterSelection {
            max_time: 30,
            ..Default::default()
        });

        let outcome = session
            .search_ingredients(&source, &["egg".to_string(), "flour".to_string()])
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Success { count: 2 });
        assert_eq!(session.status(), RequestStatus::Idle);
        assert_eq!(session.error(), None);

        let params = source.last_search();
        assert_eq!(params.ingredients.as_deref(), Some("egg,flour"));
        assert_eq!(params.max_time, Some(30));
        assert_eq!(params.cuisine, None);

        assert_eq!(session.recent_searches(), &["egg, flour"]);
        let history = session.search_history().records();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].query, "egg, flour");
        assert_eq!(history[0].result_count, 2);
    }

    #[tokio::test]
    async fn test_empty_search_is_failure() {
        let source = MockSource::default().with_search(Ok(Vec::new()));
        let mut session = Session::open(InMemoryStore::new());
        session.set_results(vec![recipe(9, 5, "")]);

        let outcome = session.search_text(&source, "unobtainium").await.unwrap();

        assert!(!outcome.is_success());
        assert_eq!(
            session.error(),
            Some("No recipes found. Try different ingredients or filters.")
        );
        assert!(session.current_results().is_empty());
        // The search itself was answered, so it still counts as recent.
        assert_eq!(session.recent_searches(), &["unobtainium"]);
    }

    #[tokio::test]
    async fn test_failed_search_clears_results() {
        let source = MockSource::default().with_search(Err(FetchError::Timeout));
        let mut session = Session::open(InMemoryStore::new());
        session.set_results(vec![recipe(9, 5, "")]);

        session.search_text(&source, "pasta").await;

        assert_eq!(session.error(), Some("Failed to fetch recipes. Please try again."));
        assert!(session.current_results().is_empty());
        assert!(session.recent_searches().is_empty());
        assert!(session.search_history().records().is_empty());
    }

    #[tokio::test]
    async fn test_blank_ingredients_never_hit_source() {
        let source = MockSource::default();
        let mut session = Session::open(InMemoryStore::new());

        session
            .search_ingredients(&source, &[" ".to_string()])
            .await;

        assert_eq!(session.error(), Some("Please enter at least one ingredient"));
        assert!(source.searches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filters_without_query_apply_to_random_batch() {
        let source = MockSource::default().with_random(Ok(vec![
            recipe(1, 40, "Italian"),
            recipe(2, 15, "Mexican"),
            recipe(3, 20, "Italian"),
        ]));
        let mut session = Session::open(InMemoryStore::new());
        session.load_random(&source).await;
        assert_eq!(session.current_results().len(), 3);

        let outcome = session
            .apply_filters(
                &source,
                FilterSelection {
                    cuisine: "ital".to_string(),
                    sort_by: SortBy::TimeAsc,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Success { count: 2 });
        assert_eq!(ids(session.current_results()), vec![3, 1]);
        assert_eq!(source.random_calls.load(Ordering::SeqCst), 1);

        session
            .apply_filters(
                &source,
                FilterSelection {
                    max_time: 10,
                    ..Default::default()
                },
            )
            .await;
        assert_eq!(session.error(), Some("No recipes found matching your criteria."));
        assert!(session.current_results().is_empty());
    }

    #[tokio::test]
    async fn test_filters_fetch_batch_when_missing() {
        let source = MockSource::default().with_random(Ok(vec![recipe(1, 10, "")]));
        let mut session = Session::open(InMemoryStore::new());

        session
            .apply_filters(&source, FilterSelection::default())
            .await;

        assert_eq!(source.random_calls.load(Ordering::SeqCst), 1);
        assert_eq!(ids(session.current_results()), vec![1]);
    }

    #[tokio::test]
    async fn test_filters_with_query_search_again() {
        let source = MockSource::default()
            .with_search(Ok(vec![recipe(1, 10, "")]))
            .with_search(Ok(vec![recipe(2, 10, "")]));
        let mut session = Session::open(InMemoryStore::new());
        session.search_text(&source, "curry").await;

        session
            .apply_filters(
                &source,
                FilterSelection {
                    diet: "Vegan".to_string(),
                    ..Default::default()
                },
            )
            .await;

        let params = source.last_search();
        assert_eq!(params.query.as_deref(), Some("curry"));
        assert_eq!(params.diet.as_deref(), Some("vegan"));
        assert_eq!(ids(session.current_results()), vec![2]);
        // Only the explicit search is logged.
        assert_eq!(session.search_history().records().len(), 1);
    }

    #[tokio::test]
    async fn test_random_failure_message() {
        let source = MockSource::default().with_random(Err(FetchError::Transport(
            "connection refused".to_string(),
        )));
        let mut session = Session::open(InMemoryStore::new());

        session.load_random(&source).await;

        assert_eq!(session.error(), Some("Failed to load recipes. Please try again."));
    }

    #[tokio::test]
    async fn test_open_recipe() {
        let source = MockSource::default();
        let detail = RecipeDetail {
            recipe: recipe(5, 30, "Indian"),
            summary: String::new(),
            instructions: "Fry\nServe".to_string(),
            analyzed_instructions: Vec::new(),
            nutrients: Vec::new(),
        };
        source.details.lock().unwrap().insert(5, detail);
        let mut session = Session::open(InMemoryStore::new());

        let opened = session.open_recipe(&source, 5).await.unwrap();
        assert_eq!(opened.instructions, "Fry\nServe");

        session.close_recipe();
        assert!(session.selected_recipe().is_none());

        assert!(session.open_recipe(&source, 6).await.is_none());
        assert_eq!(
            session.error(),
            Some("Failed to load recipe details. Please try again.")
        );
    }

    #[test]
    fn test_analytics() {
        let mut session = Session::open(InMemoryStore::new());
        session.add(recipe(1, 10, "Italian")).unwrap();
        session.add(recipe(2, 10, "Italian")).unwrap();
        session.add(recipe(3, 10, "Greek")).unwrap();
        session.append_history("egg", 3).unwrap();
        session.append_history("rice", 1).unwrap();
        session.append_history("egg", 2).unwrap();

        assert_eq!(session.favorite_cuisines(1), vec![("Italian".to_string(), 2)]);
        assert_eq!(session.popular_searches(5)[0], ("egg".to_string(), 2));
    }

    #[test]
    fn test_toggle_favorite() {
        let mut session = Session::open(InMemoryStore::new());

        assert!(session.toggle_favorite(recipe(4, 10, "")).unwrap());
        assert!(!session.toggle_favorite(recipe(4, 10, "")).unwrap());
        assert!(session.favorites().is_empty());
    }
}
