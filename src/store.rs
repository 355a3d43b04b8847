//! Data-access capability consumed by the analytics core.
//!
//! `PgStore` in `db.rs` is the production backend; `memory::MemoryStore`
//! backs the unit tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::leaderboard;
use crate::models::{CategoryAmounts, UserRecord, WasteEntry};
use crate::period::DateWindow;

/// Implementations must be thread-safe for shared access across tasks.
#[async_trait]
pub trait WasteStore: Send + Sync {
    /// Entries for `user_id` dated inside `window`, ascending by date.
    async fn find_entries(
        &self,
        user_id: Uuid,
        window: DateWindow,
    ) -> anyhow::Result<Vec<WasteEntry>>;

    /// Every entry `user_id` has ever logged, ascending by date.
    async fn find_all_entries(&self, user_id: Uuid) -> anyhow::Result<Vec<WasteEntry>>;

    /// Insert or overwrite the entry for `(user_id, date)`.
    async fn upsert_entry(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        amounts: CategoryAmounts,
    ) -> anyhow::Result<WasteEntry>;

    /// Returns `false` when no entry with that id belongs to `user_id`.
    async fn delete_entry(&self, entry_id: Uuid, user_id: Uuid) -> anyhow::Result<bool>;

    async fn list_all_users(&self) -> anyhow::Result<Vec<UserRecord>>;

    async fn set_user_score(&self, user_id: Uuid, score: i32) -> anyhow::Result<()>;

    /// Every user in canonical leaderboard order. Backends with an index on
    /// score should override this and sort in the query.
    async fn ranked_users(&self) -> anyhow::Result<Vec<UserRecord>> {
        let mut users = self.list_all_users().await?;
        leaderboard::sort_by_score(&mut users);
        Ok(users)
    }
}
