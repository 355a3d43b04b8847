use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::scoring;
use crate::store::WasteStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub updated: usize,
    pub failed: usize,
}

/// Rescores every user in turn. A failed write is logged and skipped. If the
/// users cannot be listed the run is logged and reports nothing updated.
pub async fn update_all_scores(store: &dyn WasteStore, today: NaiveDate) -> BatchSummary {
    let mut summary = BatchSummary::default();
    let users = match store.list_all_users().await {
        Ok(users) => users,
        Err(err) => {
            tracing::error!(error = %err, "failed to list users for score update");
            return summary;
        }
    };

    for user in &users {
        let score = scoring::calculate_user_score(store, user.id, today).await;
        match store.set_user_score(user.id, score).await {
            Ok(()) => {
                tracing::debug!(user_id = %user.id, score, "updated score");
                summary.updated += 1;
            }
            Err(err) => {
                tracing::warn!(user_id = %user.id, error = %err, "failed to persist score");
                summary.failed += 1;
            }
        }
    }

    tracing::info!(
        updated = summary.updated,
        failed = summary.failed,
        "score update finished for {} users",
        users.len()
    );
    summary
}

/// Next occurrence of `at` strictly after `now`.
pub fn next_run_after(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today_run = now.date().and_time(at);
    if today_run > now {
        today_run
    } else {
        today_run + Duration::days(1)
    }
}

/// Runs `update_all_scores` once a day at `at` (UTC) until the process exits.
/// Each run finishes before the next wait is computed, so runs never overlap.
pub async fn run_daily(store: &dyn WasteStore, at: NaiveTime) {
    loop {
        let now = Utc::now().naive_utc();
        let next = next_run_after(now, at);
        let wait = (next - now).to_std().unwrap_or_default();
        tracing::info!(next_run = %next, "waiting for next score update");
        tokio::time::sleep(wait).await;

        let today = Utc::now().date_naive();
        update_all_scores(store, today).await;
    }
}
