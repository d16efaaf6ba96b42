// Terminal rendering for CLI output
use crate::domain::model::{CacheStatus, FoodEntry, NutritionFacts, RefreshSummary};
use crate::presentation::theme::Theme;
use std::fmt::Write;

/// Numbered list under a title
pub fn format_list(title: &str, names: &[String], theme: &Theme) -> String {
    let mut output = String::new();
    writeln!(output, "{}", (theme.title)(title)).ok();

    if names.is_empty() {
        writeln!(output, "  {}", (theme.muted)("(nothing listed)")).ok();
        return output;
    }

    for (i, name) in names.iter().enumerate() {
        writeln!(
            output,
            "  {}. {}",
            (theme.idx)(&(i + 1).to_string()),
            (theme.name)(name)
        )
        .ok();
    }
    output
}

/// Foods grouped under their category headers
pub fn format_foods(title: &str, foods: &[FoodEntry], theme: &Theme) -> String {
    let mut output = String::new();
    writeln!(output, "{}", (theme.title)(title)).ok();

    let mut current: Option<&str> = None;
    for food in foods {
        if current != Some(food.category.as_str()) {
            writeln!(output, "  {}", (theme.label)(&food.category)).ok();
            current = Some(food.category.as_str());
        }
        writeln!(output, "    {}", (theme.name)(&food.name)).ok();
    }

    if foods.is_empty() {
        writeln!(output, "  {}", (theme.muted)("(nothing listed)")).ok();
    }
    output
}

pub fn format_nutrition(food: &str, facts: &NutritionFacts, theme: &Theme) -> String {
    let mut output = String::new();
    writeln!(output, "{}", (theme.title)(food)).ok();

    if facts.is_empty() {
        writeln!(output, "  {}", (theme.muted)("No nutrition information available")).ok();
        return output;
    }

    let width = facts.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    let cutoff = "⸺".repeat(30);
    writeln!(output, "  {}", (theme.line)(&cutoff)).ok();

    for (key, value) in facts {
        let padded = format!("{:width$}", key, width = width);
        writeln!(output, "  {}  {}", (theme.label)(&padded), (theme.value)(value)).ok();
    }
    output
}

pub fn format_refresh(summary: &RefreshSummary, theme: &Theme) -> String {
    format!(
        "{} {} halls, {} items ({})\n",
        (theme.title)("Menu refreshed:"),
        summary.halls,
        summary.items,
        summary.scraped_at.to_rfc3339()
    )
}

pub fn format_status(status: &CacheStatus, theme: &Theme) -> String {
    let mut output = String::new();
    writeln!(output, "{}", (theme.title)("dining status")).ok();
    writeln!(output, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━").ok();

    match (status.cached, status.scraped_at, status.age_secs) {
        (true, Some(scraped_at), Some(age)) => {
            writeln!(
                output,
                "Menu: cached at {} ({}s old, ttl {}s, generation {})",
                scraped_at.to_rfc3339(),
                age,
                status.ttl_secs,
                status.generation
            )
            .ok();
            writeln!(
                output,
                "Contents: {} halls, {} items, {} with nutrition",
                status.halls, status.items, status.enriched_items
            )
            .ok();
        }
        _ => {
            writeln!(output, "Menu: not cached").ok();
        }
    }

    writeln!(
        output,
        "Session: {}",
        if status.has_session {
            "established"
        } else {
            "none"
        }
    )
    .ok();
    output
}
