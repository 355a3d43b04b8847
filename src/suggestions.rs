use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::AnalyticsResult;
use crate::models::{Category, CategoryAmounts, Impact, Suggestion};
use crate::period::{self, DateWindow};
use crate::store::WasteStore;

pub const MAX_SUGGESTIONS: usize = 3;
pub const SUGGESTION_WINDOW_DAYS: u32 = 7;

struct Rule {
    category: Category,
    threshold: f64,
    priority: u8,
    impact: Impact,
    text: &'static str,
}

const RULES: [Rule; 4] = [
    Rule {
        category: Category::Plastic,
        threshold: 2.0,
        priority: 1,
        impact: Impact::High,
        text: "Your plastic waste is high. Switch to reusable shopping bags and water bottles.",
    },
    Rule {
        category: Category::Organic,
        threshold: 5.0,
        priority: 1,
        impact: Impact::Medium,
        text: "Start composting to turn organic waste into garden nutrients.",
    },
    Rule {
        category: Category::Paper,
        threshold: 3.0,
        priority: 2,
        impact: Impact::Medium,
        text: "Go digital: use electronic documents and double-sided printing.",
    },
    Rule {
        category: Category::Glass,
        threshold: 2.0,
        priority: 2,
        impact: Impact::Low,
        text: "Reuse glass jars for storage and buy in bulk.",
    },
];

fn encouragement() -> Suggestion {
    Suggestion {
        category: None,
        text: "Great job! Keep tracking your waste to maintain awareness.".to_string(),
        priority: 3,
        impact: None,
    }
}

pub fn generate(totals: &CategoryAmounts) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = RULES
        .iter()
        .filter(|rule| totals.get(rule.category) > rule.threshold)
        .map(|rule| Suggestion {
            category: Some(rule.category),
            text: rule.text.to_string(),
            priority: rule.priority,
            impact: Some(rule.impact),
        })
        .collect();

    if suggestions.is_empty() {
        suggestions.push(encouragement());
    }

    // sort_by_key is stable, so equal priorities keep rule order.
    suggestions.sort_by_key(|s| s.priority);
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

pub async fn suggestions_for_user(
    store: &dyn WasteStore,
    user_id: Uuid,
    today: NaiveDate,
) -> AnalyticsResult<Vec<Suggestion>> {
    let window = DateWindow::trailing(today, SUGGESTION_WINDOW_DAYS)?;
    let totals = period::period_totals(store, user_id, window).await?;
    Ok(generate(&totals.amounts))
}
