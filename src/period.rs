use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::models::{PeriodTotals, WasteEntry};
use crate::store::WasteStore;

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AnalyticsResult<Self> {
        if start > end {
            return Err(AnalyticsError::InvalidRange(format!(
                "start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The `days`-long window ending on `today`, inclusive.
    pub fn trailing(today: NaiveDate, days: u32) -> AnalyticsResult<Self> {
        if days == 0 {
            return Err(AnalyticsError::InvalidRange(
                "window must span at least one day".into(),
            ));
        }
        Self::new(today - Duration::days(i64::from(days) - 1), today)
    }

    /// Same-length window ending the day before this one starts.
    pub fn preceding(&self) -> Self {
        let len = self.days();
        let end = self.start - Duration::days(1);
        Self {
            start: end - Duration::days(len - 1),
            end,
        }
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

pub fn aggregate(entries: &[WasteEntry], window: DateWindow) -> PeriodTotals {
    let mut totals = PeriodTotals::default();

    for entry in entries.iter().filter(|e| window.contains(e.date)) {
        totals.amounts.add(&entry.amounts);
        totals.entry_count += 1;
    }

    totals
}

pub async fn period_totals(
    store: &dyn WasteStore,
    user_id: Uuid,
    window: DateWindow,
) -> AnalyticsResult<PeriodTotals> {
    let entries = store.find_entries(user_id, window).await?;
    Ok(aggregate(&entries, window))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryAmounts;
    use crate::store::memory::MemoryStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn entry(date: NaiveDate, plastic: f64, glass: f64) -> WasteEntry {
        WasteEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            date,
            amounts: CategoryAmounts::new(plastic, 0.0, 0.0, glass),
        }
    }

    #[test]
    fn rejects_inverted_range() {
        assert!(matches!(
            DateWindow::new(day(5), day(4)),
            Err(AnalyticsError::InvalidRange(_))
        ));
    }

    #[test]
    fn trailing_and_preceding_are_adjacent() {
        let current = DateWindow::trailing(day(14), 7).unwrap();
        assert_eq!(current.start, day(8));
        assert_eq!(current.end, day(14));

        let previous = current.preceding();
        assert_eq!(previous.start, day(1));
        assert_eq!(previous.end, day(7));
        assert_eq!(previous.days(), 7);
    }

    #[test]
    fn zero_length_window_is_invalid() {
        assert!(DateWindow::trailing(day(14), 0).is_err());
    }

    #[test]
    fn sums_only_entries_inside_window() {
        let entries = vec![entry(day(1), 1.0, 0.5), entry(day(3), 2.0, 0.5), entry(day(9), 7.0, 7.0)];
        let totals = aggregate(&entries, DateWindow::new(day(1), day(3)).unwrap());
        assert_eq!(totals.entry_count, 2);
        assert_eq!(totals.amounts.plastic, 3.0);
        assert_eq!(totals.amounts.glass, 1.0);
    }

    #[tokio::test]
    async fn empty_period_is_all_zero() {
        let store = MemoryStore::new();
        let user = store.add_new_user("Jules");
        let totals = period_totals(&store, user, DateWindow::trailing(day(14), 7).unwrap())
            .await
            .unwrap();
        assert_eq!(totals, PeriodTotals::default());
        assert_eq!(totals.amounts.total(), 0.0);
        assert_eq!(totals.entry_count, 0);
    }
}
