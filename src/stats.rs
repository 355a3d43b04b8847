use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::leaderboard;
use crate::models::{Category, CategoryAmounts, DailyPoint, StatsReport, WasteEntry};
use crate::period::{self, DateWindow};
use crate::reduction::{category_reductions, reduction};
use crate::store::WasteStore;

/// Trailing window lengths accepted by the stats report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsWindow {
    #[default]
    Week,
    Month,
    Quarter,
}

impl StatsWindow {
    pub fn days(self) -> u32 {
        match self {
            StatsWindow::Week => 7,
            StatsWindow::Month => 30,
            StatsWindow::Quarter => 90,
        }
    }
}

impl TryFrom<u32> for StatsWindow {
    type Error = AnalyticsError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            7 => Ok(StatsWindow::Week),
            30 => Ok(StatsWindow::Month),
            90 => Ok(StatsWindow::Quarter),
            other => Err(AnalyticsError::InvalidRange(format!(
                "window must be 7, 30 or 90 days, got {other}"
            ))),
        }
    }
}

/// First category with the highest reduction and first with the lowest,
/// scanning in `Category::ALL` order.
pub fn best_and_worst(reductions: &CategoryAmounts) -> (Category, Category) {
    let mut best = Category::ALL[0];
    let mut worst = Category::ALL[0];

    for &category in &Category::ALL[1..] {
        let value = reductions.get(category);
        if value > reductions.get(best) {
            best = category;
        }
        if value < reductions.get(worst) {
            worst = category;
        }
    }

    (best, worst)
}

pub fn daily_series(entries: &[WasteEntry]) -> Vec<DailyPoint> {
    let mut points: Vec<DailyPoint> = entries
        .iter()
        .map(|entry| DailyPoint {
            date: entry.date,
            amounts: entry.amounts,
            total: entry.amounts.total(),
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

pub async fn build_stats(
    store: &dyn WasteStore,
    user_id: Uuid,
    window: StatsWindow,
    caller: Option<Uuid>,
    today: NaiveDate,
) -> AnalyticsResult<StatsReport> {
    let current_window = DateWindow::trailing(today, window.days())?;
    let previous_window = current_window.preceding();

    let current_entries = store.find_entries(user_id, current_window).await?;
    let current = period::aggregate(&current_entries, current_window);
    let previous = period::period_totals(store, user_id, previous_window).await?;

    let comparison = category_reductions(&previous, &current);
    let (best_category, worst_category) = best_and_worst(&comparison);
    let reduction_percent = reduction(previous.amounts.total(), current.amounts.total());

    let user_rank = match caller {
        Some(caller_id) => {
            let ordering = store.ranked_users().await?;
            leaderboard::locate(&ordering, caller_id)
        }
        None => None,
    };

    tracing::debug!(
        %user_id,
        window_days = window.days(),
        entries = current.entry_count,
        "built stats report"
    );

    Ok(StatsReport {
        window_days: window.days(),
        start: current_window.start,
        end: current_window.end,
        totals: current.amounts,
        comparison,
        reduction_percent,
        best_category,
        worst_category,
        daily: daily_series(&current_entries),
        total_waste: current.amounts.total(),
        // Both are the entry count in the window, not a consecutive-day run.
        streak: current.entry_count,
        active_days: current.entry_count,
        user_rank,
    })
}
