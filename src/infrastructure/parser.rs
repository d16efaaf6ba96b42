//! Markup parsing for the dining site.
//!
//! Page layout as served upstream:
//!
//! ```text
//! li.location-name                      hall
//!   div.location-title span.cafe-title  hall name
//!   li.preiod-name > span               period name (sic, upstream spelling)
//!     div.cat-name > span               category name
//!       ul.recipe-name li.recip > span  food name, tokens in data-* attributes
//! ```
//!
//! Every level is optional. A block that cannot be named is skipped and a
//! block without children becomes an empty map, so one broken hall never
//! blanks the rest of the menu.

use crate::domain::model::{ItemRecord, ItemTokens, MenuStore, NutritionFacts, PeriodMenu};
use crate::domain::traits::MenuParser;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

static HALL: Lazy<Selector> = Lazy::new(|| selector("li.location-name"));
static HALL_TITLE: Lazy<Selector> = Lazy::new(|| selector("div.location-title span.cafe-title"));
static PERIOD: Lazy<Selector> = Lazy::new(|| selector("li.preiod-name"));
static CATEGORY: Lazy<Selector> = Lazy::new(|| selector("div.cat-name"));
static RECIPE_LIST: Lazy<Selector> = Lazy::new(|| selector("ul.recipe-name"));
static RECIPE: Lazy<Selector> = Lazy::new(|| selector("li.recip"));

static SERVING_SIZE: Lazy<Selector> = Lazy::new(|| selector("span.serving-size"));
static NUTRITION_DETAILS: Lazy<Selector> = Lazy::new(|| selector("div.nutration-details"));
static ALLERGENS: Lazy<Selector> = Lazy::new(|| selector("div.allergens"));
static LIST_ITEM: Lazy<Selector> = Lazy::new(|| selector("li"));
static SPAN: Lazy<Selector> = Lazy::new(|| selector("span"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Parser for the HTML served by the campus dining site
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlMenuParser;

impl MenuParser for HtmlMenuParser {
    fn parse_menu_document(&self, html: &str) -> MenuStore {
        let document = Html::parse_document(html);
        let mut halls: BTreeMap<String, BTreeMap<String, PeriodMenu>> = BTreeMap::new();

        for hall_el in document.select(&HALL) {
            let Some(hall_name) = hall_el
                .select(&HALL_TITLE)
                .next()
                .map(|title| clean_name(&stripped_text(title)))
                .filter(|name| !name.is_empty())
            else {
                debug!("skipping hall block without a title");
                continue;
            };

            let periods = halls.entry(hall_name).or_default();

            for period_el in hall_el.select(&PERIOD) {
                let Some(period_name) = child_span_name(period_el) else {
                    continue;
                };
                let categories = periods.entry(period_name).or_default();

                for category_el in period_el.select(&CATEGORY) {
                    let Some(category_name) = child_span_name(category_el) else {
                        continue;
                    };
                    let items = categories.entry(category_name).or_default();

                    let Some(recipe_list) = category_el.select(&RECIPE_LIST).next() else {
                        continue;
                    };

                    for item_el in recipe_list.select(&RECIPE) {
                        let Some(food_name) = child_span_name(item_el) else {
                            continue;
                        };
                        let attr = |name: &str| -> String {
                            item_el
                                .value()
                                .attr(name)
                                .unwrap_or_default()
                                .trim()
                                .to_string()
                        };
                        let tokens = ItemTokens::new(
                            attr("data-id"),
                            attr("data-menuid"),
                            attr("data-location"),
                        );
                        items.insert(food_name, Arc::new(ItemRecord::new(tokens)));
                    }
                }
            }
        }

        halls
            .into_iter()
            .map(|(hall, periods)| {
                let periods = periods
                    .into_iter()
                    .map(|(period, categories)| (period, Arc::new(categories)))
                    .collect();
                (hall, Arc::new(periods))
            })
            .collect()
    }

    fn parse_nutrition_fragment(&self, html: &str) -> NutritionFacts {
        let fragment = Html::parse_fragment(html);
        let mut facts = NutritionFacts::new();

        if let Some(serving) = fragment.select(&SERVING_SIZE).next() {
            let text = stripped_text(serving);
            facts.insert(
                "serving_size".to_string(),
                text.replace("Serving Size:", "").trim().to_string(),
            );
        }

        if let Some(details) = fragment.select(&NUTRITION_DETAILS).next() {
            for entry in details.select(&LIST_ITEM) {
                let text = stripped_text(entry);
                if let Some((key, value)) = text.split_once(':') {
                    let key = key.trim();
                    if !key.is_empty() {
                        facts.insert(key.to_string(), value.trim().to_string());
                    }
                }
            }
        }

        if let Some(span) = fragment
            .select(&ALLERGENS)
            .next()
            .and_then(|allergens| allergens.select(&SPAN).next())
        {
            facts.insert("allergens".to_string(), stripped_text(span));
        }

        facts
    }
}

/// Collapse whitespace runs and title-case each word.
///
/// A letter is upper-cased when it starts an alphabetic run, so
/// `"mac &  CHEESE"` becomes `"Mac & Cheese"`.
pub fn clean_name(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(collapsed.len());
    let mut in_word = false;

    for c in collapsed.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

// Trimmed text nodes glued together without separators
fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

// Name taken from the first direct <span> child; blank names count as missing
fn child_span_name(element: ElementRef<'_>) -> Option<String> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == "span")
        .map(|span| clean_name(&stripped_text(span)))
        .filter(|name| !name.is_empty())
}
