use std::cmp::Reverse;

use uuid::Uuid;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::models::{LeaderboardEntry, LeaderboardPage, UserRank, UserRecord};
use crate::store::WasteStore;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Canonical ordering: score descending, then user id ascending.
pub fn sort_by_score(users: &mut [UserRecord]) {
    users.sort_by_key(|u| (Reverse(u.score), u.id));
}

/// 1-based position of `user_id` in an already ranked ordering.
pub fn locate(ordering: &[UserRecord], user_id: Uuid) -> Option<UserRank> {
    ordering
        .iter()
        .position(|u| u.id == user_id)
        .map(|index| UserRank {
            rank: index + 1,
            score: ordering[index].score,
            total_users: ordering.len(),
        })
}

pub fn paginate(
    ordering: &[UserRecord],
    page: usize,
    page_size: usize,
    caller: Option<Uuid>,
) -> AnalyticsResult<LeaderboardPage> {
    if page == 0 || page_size == 0 {
        return Err(AnalyticsError::InvalidRange(format!(
            "page and page size must be positive, got page {page} size {page_size}"
        )));
    }

    let total_users = ordering.len();
    let skip = (page - 1).saturating_mul(page_size);

    let entries = ordering
        .iter()
        .enumerate()
        .skip(skip)
        .take(page_size)
        .map(|(index, user)| LeaderboardEntry {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            score: user.score,
            rank: index + 1,
        })
        .collect();

    Ok(LeaderboardPage {
        entries,
        user_rank: caller.and_then(|id| locate(ordering, id)),
        current_page: page,
        total_pages: total_users.div_ceil(page_size),
        total_users,
    })
}

pub async fn leaderboard(
    store: &dyn WasteStore,
    page: usize,
    page_size: usize,
    caller: Option<Uuid>,
) -> AnalyticsResult<LeaderboardPage> {
    let ordering = store.ranked_users().await?;
    paginate(&ordering, page, page_size, caller)
}
