use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::models::{Category, CategoryAmounts, WasteEntry};
use crate::period::DateWindow;
use crate::store::WasteStore;

pub fn validate_amounts(amounts: &CategoryAmounts) -> AnalyticsResult<()> {
    for category in Category::ALL {
        let value = amounts.get(category);
        if !value.is_finite() || value < 0.0 {
            return Err(AnalyticsError::InvalidAmount(format!(
                "{category} must be a non-negative number, got {value}"
            )));
        }
    }
    Ok(())
}

/// Records the day's amounts, replacing anything already logged for that day.
pub async fn log_entry(
    store: &dyn WasteStore,
    user_id: Uuid,
    date: NaiveDate,
    amounts: CategoryAmounts,
) -> AnalyticsResult<WasteEntry> {
    validate_amounts(&amounts)?;
    let entry = store.upsert_entry(user_id, date, amounts).await?;
    tracing::debug!(%user_id, %date, entry_id = %entry.id, "logged waste entry");
    Ok(entry)
}

pub async fn log_entry_at(
    store: &dyn WasteStore,
    user_id: Uuid,
    at: DateTime<Utc>,
    amounts: CategoryAmounts,
) -> AnalyticsResult<WasteEntry> {
    log_entry(store, user_id, at.date_naive(), amounts).await
}

/// Entries in `[start, end]`, newest first.
pub async fn entries_between(
    store: &dyn WasteStore,
    user_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> AnalyticsResult<Vec<WasteEntry>> {
    let window = DateWindow::new(start, end)?;
    let mut entries = store.find_entries(user_id, window).await?;
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(entries)
}

/// Everything the user has logged, newest first, with no date bounds.
pub async fn full_history(
    store: &dyn WasteStore,
    user_id: Uuid,
) -> AnalyticsResult<Vec<WasteEntry>> {
    let mut entries = store.find_all_entries(user_id).await?;
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(entries)
}

pub async fn remove_entry(
    store: &dyn WasteStore,
    entry_id: Uuid,
    user_id: Uuid,
) -> AnalyticsResult<()> {
    if store.delete_entry(entry_id, user_id).await? {
        Ok(())
    } else {
        Err(AnalyticsError::NotFound(format!(
            "waste entry {entry_id} for user {user_id}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use chrono::TimeZone;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn rejects_negative_and_nan() {
        assert!(validate_amounts(&CategoryAmounts::new(1.0, 0.0, 0.0, 0.0)).is_ok());
        assert!(matches!(
            validate_amounts(&CategoryAmounts::new(0.0, -1.0, 0.0, 0.0)),
            Err(AnalyticsError::InvalidAmount(_))
        ));
        assert!(validate_amounts(&CategoryAmounts::new(0.0, 0.0, f64::NAN, 0.0)).is_err());
    }

    #[tokio::test]
    async fn timestamps_on_same_day_share_an_entry() {
        let store = MemoryStore::new();
        let user = store.add_new_user("Avery");
        let morning = Utc.with_ymd_and_hms(2026, 3, 4, 7, 15, 0).unwrap();
        let night = Utc.with_ymd_and_hms(2026, 3, 4, 23, 59, 59).unwrap();

        let first = log_entry_at(&store, user, morning, CategoryAmounts::new(1.0, 0.0, 0.0, 0.0))
            .await
            .unwrap();
        let second = log_entry_at(&store, user, night, CategoryAmounts::new(0.5, 0.0, 0.0, 0.0))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.date, day(4));
        let all = entries_between(&store, user, day(1), day(31)).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].amounts.plastic, 0.5);
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let store = MemoryStore::new();
        let user = store.add_new_user("Jules");
        for d in [2, 9, 5] {
            log_entry(&store, user, day(d), CategoryAmounts::default()).await.unwrap();
        }
        let dates: Vec<NaiveDate> = entries_between(&store, user, day(1), day(9))
            .await
            .unwrap()
            .iter()
            .map(|e| e.date)
            .collect();
        assert_eq!(dates, vec![day(9), day(5), day(2)]);

        assert!(matches!(
            entries_between(&store, user, day(9), day(1)).await,
            Err(AnalyticsError::InvalidRange(_))
        ));
    }

    #[tokio::test]
    async fn full_history_keeps_future_and_pre_epoch_entries() {
        let store = MemoryStore::new();
        let user = store.add_new_user("Avery");
        let today = day(14);
        let tomorrow = day(15);
        let long_ago = NaiveDate::from_ymd_opt(1965, 6, 1).unwrap();
        for date in [today, tomorrow, long_ago] {
            log_entry(&store, user, date, CategoryAmounts::new(1.0, 0.0, 0.0, 0.0))
                .await
                .unwrap();
        }

        let history = full_history(&store, user).await.unwrap();
        let dates: Vec<NaiveDate> = history.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![tomorrow, today, long_ago]);

        let mut buf = Vec::new();
        crate::report::export_csv(&history, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("2026-03-15,"));
        assert!(text.contains("1965-06-01,"));
    }

    #[tokio::test]
    async fn delete_checks_ownership() {
        let store = MemoryStore::new();
        let owner = store.add_new_user("Owner");
        let other = store.add_new_user("Other");
        let entry = log_entry(&store, owner, day(3), CategoryAmounts::default())
            .await
            .unwrap();

        assert!(matches!(
            remove_entry(&store, entry.id, other).await,
            Err(AnalyticsError::NotFound(_))
        ));
        remove_entry(&store, entry.id, owner).await.unwrap();
        assert!(remove_entry(&store, entry.id, owner).await.is_err());
    }
}
