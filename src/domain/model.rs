use crate::domain::error::MenuError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

// 营养成分: 名称 -> 数值 (如 "Calories" -> "250")
pub type NutritionFacts = BTreeMap<String, String>;

// hall -> period -> category -> food
pub type CategoryMenu = BTreeMap<String, Arc<ItemRecord>>;
pub type PeriodMenu = BTreeMap<String, CategoryMenu>;
pub type HallMenu = BTreeMap<String, Arc<PeriodMenu>>;
pub type MenuStore = BTreeMap<String, Arc<HallMenu>>;

/// Opaque identifiers the upstream site hands out per menu entry.
///
/// They carry no meaning here beyond being echoed back to the nutrition
/// endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTokens {
    pub recipe_id: String,
    pub menu_id: String,
    pub location: String,
}

impl ItemTokens {
    pub fn new(
        recipe_id: impl Into<String>,
        menu_id: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            recipe_id: recipe_id.into(),
            menu_id: menu_id.into(),
            location: location.into(),
        }
    }

    /// All three tokens are present, so a nutrition lookup can be attempted.
    pub fn is_complete(&self) -> bool {
        !self.recipe_id.is_empty() && !self.menu_id.is_empty() && !self.location.is_empty()
    }
}

/// One food item inside a menu snapshot.
///
/// Nutrition facts are written at most once. Every reader holding the same
/// snapshot shares the record, so a lookup done for one caller is seen by all
/// of them. A new snapshot carries new records with empty nutrition.
#[derive(Debug)]
pub struct ItemRecord {
    tokens: ItemTokens,
    nutrition: OnceCell<NutritionFacts>,
}

impl ItemRecord {
    pub fn new(tokens: ItemTokens) -> Self {
        Self {
            tokens,
            nutrition: OnceCell::new(),
        }
    }

    pub fn tokens(&self) -> &ItemTokens {
        &self.tokens
    }

    pub fn nutrition_fetched(&self) -> bool {
        self.nutrition.initialized()
    }

    pub fn nutrition(&self) -> Option<&NutritionFacts> {
        self.nutrition.get()
    }

    /// Returns the stored facts, running `fetch` first if none are stored.
    ///
    /// Concurrent callers wait on the same fetch. An error leaves the record
    /// unfetched so the next caller tries again.
    pub async fn nutrition_or_fetch<F, Fut>(&self, fetch: F) -> Result<&NutritionFacts, MenuError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<NutritionFacts, MenuError>>,
    {
        self.nutrition.get_or_try_init(fetch).await
    }
}

/// Cookies captured from the session handshake, replayed on nutrition requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookies(Vec<(String, String)>);

impl SessionCookies {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// Collects `name=value` pairs from raw `Set-Cookie` header values,
    /// dropping attributes such as `Path` or `HttpOnly`.
    pub fn from_set_cookie<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let pairs = headers
            .into_iter()
            .filter_map(|raw| {
                let pair = raw.split(';').next()?;
                let (name, value) = pair.split_once('=')?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some((name.to_string(), value.trim().to_string()))
            })
            .collect();
        Self(pairs)
    }

    /// Parses a `Cookie` request header value (`a=1; b=2`).
    pub fn from_cookie_header(header: &str) -> Self {
        Self::from_set_cookie(header.split(';').filter(|pair| !pair.trim().is_empty()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Value for a `Cookie` request header.
    pub fn header_value(&self) -> String {
        self.0
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// 扁平化的菜品条目 (用于 foods 列表)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub name: String,
    pub category: String,
    pub hall: String,
    pub period: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub halls: usize,
    pub items: usize,
    pub scraped_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStatus {
    pub cached: bool,
    pub scraped_at: Option<DateTime<Utc>>,
    pub age_secs: Option<u64>,
    pub ttl_secs: u64,
    pub generation: u64,
    pub halls: usize,
    pub items: usize,
    pub enriched_items: usize,
    pub has_session: bool,
}

pub fn find_hall<'a>(store: &'a MenuStore, hall: &str) -> Result<&'a Arc<HallMenu>, MenuError> {
    store
        .get(hall)
        .ok_or_else(|| MenuError::not_found("hall", &[hall]))
}

pub fn find_period<'a>(
    store: &'a MenuStore,
    hall: &str,
    period: &str,
) -> Result<&'a Arc<PeriodMenu>, MenuError> {
    find_hall(store, hall)?
        .get(period)
        .ok_or_else(|| MenuError::not_found("period", &[hall, period]))
}

pub fn find_category<'a>(
    store: &'a MenuStore,
    hall: &str,
    period: &str,
    category: &str,
) -> Result<&'a CategoryMenu, MenuError> {
    find_period(store, hall, period)?
        .get(category)
        .ok_or_else(|| MenuError::not_found("category", &[hall, period, category]))
}

pub fn find_item<'a>(
    store: &'a MenuStore,
    hall: &str,
    period: &str,
    category: &str,
    food: &str,
) -> Result<&'a Arc<ItemRecord>, MenuError> {
    find_category(store, hall, period, category)?
        .get(food)
        .ok_or_else(|| MenuError::not_found("food item", &[hall, period, category, food]))
}

/// Iterates every item record in the store.
pub fn all_items(store: &MenuStore) -> impl Iterator<Item = &Arc<ItemRecord>> {
    store
        .values()
        .flat_map(|hall| hall.values())
        .flat_map(|period| period.values())
        .flat_map(|category| category.values())
}
