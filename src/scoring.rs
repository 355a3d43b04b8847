use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::AnalyticsResult;
use crate::models::{Category, PeriodTotals};
use crate::period::{self, DateWindow};
use crate::reduction::category_reductions;
use crate::store::WasteStore;

/// Score for users without two populated weeks of history.
pub const DEFAULT_SCORE: i32 = 50;
pub const SCORE_WINDOW_DAYS: u32 = 7;

pub fn category_weight(category: Category) -> f64 {
    match category {
        Category::Plastic => 0.4,
        Category::Organic | Category::Paper | Category::Glass => 0.2,
    }
}

/// Maps two periods to a 0..=100 score. Either period being empty yields
/// `DEFAULT_SCORE`.
pub fn score_periods(previous: &PeriodTotals, current: &PeriodTotals) -> i32 {
    if previous.entry_count == 0 || current.entry_count == 0 {
        return DEFAULT_SCORE;
    }

    let reductions = category_reductions(previous, current);
    let weighted: f64 = Category::ALL
        .iter()
        .map(|&c| category_weight(c) * reductions.get(c))
        .sum();

    (50.0 + weighted / 2.0).clamp(0.0, 100.0).round() as i32
}

pub async fn try_calculate_user_score(
    store: &dyn WasteStore,
    user_id: Uuid,
    today: NaiveDate,
) -> AnalyticsResult<i32> {
    let current_window = DateWindow::trailing(today, SCORE_WINDOW_DAYS)?;
    let previous_window = current_window.preceding();

    let current = period::period_totals(store, user_id, current_window).await?;
    let previous = period::period_totals(store, user_id, previous_window).await?;

    Ok(score_periods(&previous, &current))
}

/// Never fails: any fault while scoring is logged and reported as 0.
pub async fn calculate_user_score(store: &dyn WasteStore, user_id: Uuid, today: NaiveDate) -> i32 {
    match try_calculate_user_score(store, user_id, today).await {
        Ok(score) => score,
        Err(err) => {
            tracing::error!(%user_id, error = %err, "failed to calculate user score");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryAmounts;
    use crate::store::memory::MemoryStore;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn totals(plastic: f64, organic: f64, paper: f64, glass: f64) -> PeriodTotals {
        PeriodTotals {
            amounts: CategoryAmounts::new(plastic, organic, paper, glass),
            entry_count: 1,
        }
    }

    async fn log(store: &MemoryStore, user: Uuid, days_ago: i64, amounts: CategoryAmounts) {
        store
            .upsert_entry(user, today() - Duration::days(days_ago), amounts)
            .await
            .unwrap();
    }

    #[test]
    fn weights_follow_expected_split() {
        let sum: f64 = Category::ALL.iter().map(|&c| category_weight(c)).sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(category_weight(Category::Plastic), 0.4);
        assert_eq!(category_weight(Category::Glass), 0.2);
    }

    #[test]
    fn empty_period_yields_default() {
        let empty = PeriodTotals::default();
        assert_eq!(score_periods(&empty, &totals(1.0, 1.0, 1.0, 1.0)), DEFAULT_SCORE);
        assert_eq!(score_periods(&totals(1.0, 1.0, 1.0, 1.0), &empty), DEFAULT_SCORE);
    }

    #[test]
    fn unchanged_waste_scores_fifty() {
        let same = totals(2.0, 3.0, 1.0, 1.0);
        assert_eq!(score_periods(&same, &same), 50);
    }

    #[test]
    fn halving_plastic_adds_ten_points() {
        let previous = totals(10.0, 2.0, 2.0, 2.0);
        let current = totals(5.0, 2.0, 2.0, 2.0);
        assert_eq!(score_periods(&previous, &current), 60);
    }

    #[test]
    fn score_stays_within_bounds() {
        let tiny = totals(0.1, 0.1, 0.1, 0.1);
        let huge = totals(500.0, 500.0, 500.0, 500.0);
        assert_eq!(score_periods(&tiny, &huge), 0);
        assert_eq!(score_periods(&huge, &PeriodTotals { entry_count: 1, ..Default::default() }), 100);

        let emerging = totals(0.0, 0.0, 0.0, 0.0);
        let score = score_periods(&emerging, &totals(1.0, 0.0, 0.0, 0.0));
        assert!((0..=100).contains(&score));
        assert_eq!(score, 30);
    }

    #[tokio::test]
    async fn user_without_history_gets_default() {
        let store = MemoryStore::new();
        let user = store.add_new_user("Kiara");
        log(&store, user, 1, CategoryAmounts::new(1.0, 1.0, 1.0, 1.0)).await;

        assert_eq!(calculate_user_score(&store, user, today()).await, DEFAULT_SCORE);
    }

    #[tokio::test]
    async fn uses_adjacent_seven_day_windows() {
        let store = MemoryStore::new();
        let user = store.add_new_user("Avery");
        // Day 6 is the oldest day of the current window, day 7 the newest of the previous.
        log(&store, user, 6, CategoryAmounts::new(5.0, 2.0, 2.0, 2.0)).await;
        log(&store, user, 7, CategoryAmounts::new(10.0, 2.0, 2.0, 2.0)).await;
        // Outside both windows.
        log(&store, user, 14, CategoryAmounts::new(99.0, 0.0, 0.0, 0.0)).await;

        assert_eq!(calculate_user_score(&store, user, today()).await, 60);
    }

    #[tokio::test]
    async fn identical_history_gives_identical_scores() {
        let store = MemoryStore::new();
        let a = store.add_new_user("A");
        let b = store.add_new_user("B");
        for user in [a, b] {
            log(&store, user, 2, CategoryAmounts::new(1.5, 3.0, 0.5, 0.0)).await;
            log(&store, user, 9, CategoryAmounts::new(2.5, 2.0, 1.0, 0.4)).await;
        }
        let score_a = calculate_user_score(&store, a, today()).await;
        let score_b = calculate_user_score(&store, b, today()).await;
        assert_eq!(score_a, score_b);
    }

    #[tokio::test]
    async fn storage_failure_scores_zero() {
        let store = MemoryStore::new();
        let user = store.add_new_user("Broken");
        store.fail_reads_for(user);

        assert!(try_calculate_user_score(&store, user, today()).await.is_err());
        assert_eq!(calculate_user_score(&store, user, today()).await, 0);
    }
}
