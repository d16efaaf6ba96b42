//! Item tokens, session cookies and path lookups

use dining_menu::domain::model::{find_item, ItemRecord, ItemTokens, MenuStore, SessionCookies};
use std::sync::Arc;

#[test]
fn test_tokens_completeness() {
    assert!(ItemTokens::new("1", "2", "a").is_complete());
    assert!(!ItemTokens::new("1", "", "a").is_complete());
    assert!(!ItemTokens::default().is_complete());
}

#[test]
fn test_cookies_from_set_cookie_headers() {
    let cookies = SessionCookies::from_set_cookie([
        "PHPSESSID=abc123; path=/; HttpOnly",
        "wp_lang=en_US; Secure",
        "=orphan",
        "no-equals-sign",
    ]);

    assert_eq!(
        cookies.pairs(),
        &[
            ("PHPSESSID".to_string(), "abc123".to_string()),
            ("wp_lang".to_string(), "en_US".to_string()),
        ]
    );
    assert_eq!(cookies.header_value(), "PHPSESSID=abc123; wp_lang=en_US");
    assert!(SessionCookies::default().is_empty());
}

#[test]
fn test_cookies_from_cookie_header() {
    let cookies = SessionCookies::from_cookie_header("PHPSESSID=abc123; wp_lang=en_US;");
    assert_eq!(cookies.header_value(), "PHPSESSID=abc123; wp_lang=en_US");
    assert!(SessionCookies::from_cookie_header("").is_empty());
}

#[tokio::test]
async fn test_record_fetch_error_leaves_cell_empty() {
    use dining_menu::domain::error::MenuError;
    use dining_menu::domain::model::NutritionFacts;

    let record = ItemRecord::new(ItemTokens::new("1", "2", "a"));

    let err = record
        .nutrition_or_fetch(|| async {
            Err::<NutritionFacts, _>(MenuError::UpstreamRejected { status: 403 })
        })
        .await
        .unwrap_err();
    assert!(matches!(err, MenuError::UpstreamRejected { status: 403 }));
    assert!(!record.nutrition_fetched());

    let facts = record
        .nutrition_or_fetch(|| async {
            let mut facts = NutritionFacts::new();
            facts.insert("Calories".to_string(), "90".to_string());
            Ok::<_, MenuError>(facts)
        })
        .await
        .unwrap();
    assert_eq!(facts.get("Calories").map(String::as_str), Some("90"));

    // Written once; later fetches are never run
    let again = record
        .nutrition_or_fetch(|| async {
            Err::<NutritionFacts, _>(MenuError::Config("fetch ran twice".to_string()))
        })
        .await
        .unwrap();
    assert_eq!(again.len(), 1);
}

#[test]
fn test_not_found_path() {
    let mut grill = std::collections::BTreeMap::new();
    grill.insert(
        "Burger".to_string(),
        Arc::new(ItemRecord::new(ItemTokens::default())),
    );
    let mut period = std::collections::BTreeMap::new();
    period.insert("Grill".to_string(), grill);
    let mut hall = std::collections::BTreeMap::new();
    hall.insert("Lunch".to_string(), Arc::new(period));
    let mut store = MenuStore::new();
    store.insert("Cafe 3".to_string(), Arc::new(hall));

    assert!(find_item(&store, "Cafe 3", "Lunch", "Grill", "Burger").is_ok());
    let err = find_item(&store, "Cafe 3", "Lunch", "Grill", "Tofu").unwrap_err();
    assert_eq!(err.to_string(), "food item not found: Cafe 3 > Lunch > Grill > Tofu");
    let err = find_item(&store, "Cafe 4", "Lunch", "Grill", "Burger").unwrap_err();
    assert_eq!(err.to_string(), "hall not found: Cafe 4");
}
