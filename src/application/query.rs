use crate::domain::error::MenuError;
use crate::domain::model::{
    find_category, find_hall, find_period, CacheStatus, FoodEntry, NutritionFacts,
    RefreshSummary,
};
use crate::state::AppState;

// Every lookup below reports a missing hall, period or category as NotFound.

pub async fn list_halls(state: &AppState) -> Result<Vec<String>, MenuError> {
    let menu = state.cache.menu(false).await?;
    Ok(menu.into_keys().collect())
}

pub async fn list_periods(state: &AppState, hall: &str) -> Result<Vec<String>, MenuError> {
    let menu = state.cache.menu(false).await?;
    Ok(find_hall(&menu, hall)?.keys().cloned().collect())
}

pub async fn list_categories(
    state: &AppState,
    hall: &str,
    period: &str,
) -> Result<Vec<String>, MenuError> {
    let menu = state.cache.menu(false).await?;
    Ok(find_period(&menu, hall, period)?.keys().cloned().collect())
}

pub async fn list_items(
    state: &AppState,
    hall: &str,
    period: &str,
    category: &str,
) -> Result<Vec<String>, MenuError> {
    let menu = state.cache.menu(false).await?;
    Ok(find_category(&menu, hall, period, category)?
        .keys()
        .cloned()
        .collect())
}

/// Every item served in a period, tagged with its category
pub async fn list_foods(
    state: &AppState,
    hall: &str,
    period: &str,
) -> Result<Vec<FoodEntry>, MenuError> {
    let menu = state.cache.menu(false).await?;
    let categories = find_period(&menu, hall, period)?;

    Ok(categories
        .iter()
        .flat_map(|(category, items)| {
            items.keys().map(move |name| FoodEntry {
                name: name.clone(),
                category: category.clone(),
                hall: hall.to_string(),
                period: period.to_string(),
            })
        })
        .collect())
}

pub async fn nutrition(
    state: &AppState,
    hall: &str,
    period: &str,
    category: &str,
    food: &str,
) -> Result<NutritionFacts, MenuError> {
    state.cache.nutrition(hall, period, category, food).await
}

pub async fn refresh(state: &AppState) -> Result<RefreshSummary, MenuError> {
    state.cache.refresh().await
}

pub async fn status(state: &AppState) -> CacheStatus {
    state.cache.status().await
}
