use serde::{Deserialize, Serialize};

/// Requested result ordering.
///
/// `TimeAsc` and `TimeDesc` carry their own direction; the other keys take
/// it from a separate [`SortDirection`]. Unrecognized strings parse to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortBy {
    #[default]
    None,
    Popularity,
    Time,
    Match,
    TimeAsc,
    TimeDesc,
}

/// Key extracted from a recipe for ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Popularity,
    Time,
    Match,
}

impl SortBy {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "popularity" => SortBy::Popularity,
            "time" => SortBy::Time,
            "match" => SortBy::Match,
            "time-asc" => SortBy::TimeAsc,
            "time-desc" => SortBy::TimeDesc,
            _ => SortBy::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::None => "",
            SortBy::Popularity => "popularity",
            SortBy::Time => "time",
            SortBy::Match => "match",
            SortBy::TimeAsc => "time-asc",
            SortBy::TimeDesc => "time-desc",
        }
    }

    pub fn is_none(&self) -> bool {
        *self == SortBy::None
    }

    pub fn key(&self) -> Option<SortKey> {
        match self {
            SortBy::None => None,
            SortBy::Popularity => Some(SortKey::Popularity),
            SortBy::Time | SortBy::TimeAsc | SortBy::TimeDesc => Some(SortKey::Time),
            SortBy::Match => Some(SortKey::Match),
        }
    }

    /// Direction fixed by the variant itself, if any.
    pub fn implied_direction(&self) -> Option<SortDirection> {
        match self {
            SortBy::TimeAsc => Some(SortDirection::Asc),
            SortBy::TimeDesc => Some(SortDirection::Desc),
            _ => None,
        }
    }

    /// Value of the upstream `sort` query parameter.
    pub fn upstream_param(&self) -> Option<&'static str> {
        match self {
            SortBy::Popularity => Some("popularity"),
            SortBy::Time => Some("time"),
            SortBy::Match => Some("max-used-ingredients"),
            _ => None,
        }
    }
}

impl From<String> for SortBy {
    fn from(s: String) -> Self {
        SortBy::parse(&s)
    }
}

impl From<SortBy> for String {
    fn from(s: SortBy) -> Self {
        s.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Anything other than `asc` is descending.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl From<String> for SortDirection {
    fn from(s: String) -> Self {
        SortDirection::parse(&s)
    }
}

impl From<SortDirection> for String {
    fn from(d: SortDirection) -> Self {
        d.as_str().to_string()
    }
}

/// Filter choices of the current session. Empty strings and zero mean unconstrained.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSelection {
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub diet: String,
    #[serde(default)]
    pub max_time: u32,
    #[serde(default)]
    pub sort_by: SortBy,
}

impl FilterSelection {
    /// Selected cuisine; empty and `all` mean no constraint.
    pub fn cuisine_constraint(&self) -> Option<&str> {
        constraint(Some(&self.cuisine))
    }

    /// Selected diet; empty and `all` mean no constraint.
    pub fn diet_constraint(&self) -> Option<&str> {
        constraint(Some(&self.diet))
    }
}

/// Parameters of a recipe search as seen by the proxy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchParams {
    pub query: Option<String>,
    /// Comma separated ingredient names.
    pub ingredients: Option<String>,
    pub cuisine: Option<String>,
    pub diet: Option<String>,
    pub max_time: Option<u32>,
    pub sort_by: SortBy,
    pub sort_direction: SortDirection,
}

impl SearchParams {
    /// Search for free text combined with the session filters.
    pub fn from_filters(query: &str, filters: &FilterSelection) -> Self {
        Self {
            query: non_empty(query),
            ingredients: None,
            cuisine: non_empty(&filters.cuisine.to_lowercase()),
            diet: non_empty(&filters.diet.to_lowercase()),
            max_time: Some(filters.max_time).filter(|m| *m > 0),
            sort_by: filters.sort_by,
            sort_direction: SortDirection::default(),
        }
    }

    pub fn with_ingredients(mut self, ingredients: &[String]) -> Self {
        let csv = ingredients
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        self.ingredients = non_empty(&csv);
        self
    }

    /// Cuisine to send upstream; empty and `all` mean no constraint.
    pub fn cuisine_constraint(&self) -> Option<&str> {
        constraint(self.cuisine.as_deref())
    }

    /// Diet to send upstream; empty and `all` mean no constraint.
    pub fn diet_constraint(&self) -> Option<&str> {
        constraint(self.diet.as_deref())
    }
}

fn constraint(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
