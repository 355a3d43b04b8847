use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::models::{Achievement, WasteEntry};
use crate::store::WasteStore;

pub const STREAK_TARGET: usize = 7;
pub const CHAMPION_SCORE: i32 = 80;

/// Longest run of consecutive calendar days with an entry.
pub fn longest_streak(entries: &[WasteEntry]) -> usize {
    let mut dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
    dates.sort();
    dates.dedup();

    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in dates {
        current = match previous {
            Some(p) if date - p == Duration::days(1) => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        previous = Some(date);
    }

    longest
}

pub fn evaluate(entries: &[WasteEntry], score: i32) -> Vec<Achievement> {
    vec![
        Achievement {
            name: "First Step",
            description: "Logged your first waste entry",
            unlocked: !entries.is_empty(),
        },
        Achievement {
            name: "Week Warrior",
            description: "Logged waste for 7 consecutive days",
            unlocked: longest_streak(entries) >= STREAK_TARGET,
        },
        Achievement {
            name: "Eco Champion",
            description: "Achieved reduction score of 80+",
            unlocked: score >= CHAMPION_SCORE,
        },
    ]
}

pub async fn achievements_for_user(
    store: &dyn WasteStore,
    user_id: Uuid,
) -> AnalyticsResult<Vec<Achievement>> {
    let user = store
        .list_all_users()
        .await?
        .into_iter()
        .find(|u| u.id == user_id)
        .ok_or_else(|| AnalyticsError::NotFound(format!("user {user_id}")))?;

    let entries = store.find_all_entries(user_id).await?;
    Ok(evaluate(&entries, user.score))
}
