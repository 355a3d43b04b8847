use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Plastic,
    Organic,
    Paper,
    Glass,
}

impl Category {
    /// Fixed encounter order, also the tie-break order for best/worst picks.
    pub const ALL: [Category; 4] = [
        Category::Plastic,
        Category::Organic,
        Category::Paper,
        Category::Glass,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Plastic => "plastic",
            Category::Organic => "organic",
            Category::Paper => "paper",
            Category::Glass => "glass",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryAmounts {
    pub plastic: f64,
    pub organic: f64,
    pub paper: f64,
    pub glass: f64,
}

impl CategoryAmounts {
    pub fn new(plastic: f64, organic: f64, paper: f64, glass: f64) -> Self {
        Self {
            plastic,
            organic,
            paper,
            glass,
        }
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Plastic => self.plastic,
            Category::Organic => self.organic,
            Category::Paper => self.paper,
            Category::Glass => self.glass,
        }
    }

    pub fn total(&self) -> f64 {
        self.plastic + self.organic + self.paper + self.glass
    }

    pub fn add(&mut self, other: &CategoryAmounts) {
        self.plastic += other.plastic;
        self.organic += other.organic;
        self.paper += other.paper;
        self.glass += other.glass;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WasteEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub amounts: CategoryAmounts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodTotals {
    pub amounts: CategoryAmounts,
    pub entry_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub score: i32,
    pub rank: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UserRank {
    pub rank: usize,
    pub score: i32,
    pub total_users: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardPage {
    pub entries: Vec<LeaderboardEntry>,
    pub user_rank: Option<UserRank>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_users: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    /// `None` for the general encouragement tip.
    pub category: Option<Category>,
    pub text: String,
    pub priority: u8,
    pub impact: Option<Impact>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub amounts: CategoryAmounts,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub window_days: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub totals: CategoryAmounts,
    pub comparison: CategoryAmounts,
    pub reduction_percent: f64,
    pub best_category: Category,
    pub worst_category: Category,
    pub daily: Vec<DailyPoint>,
    pub total_waste: f64,
    /// Number of entries in the window, same value as `active_days`.
    pub streak: usize,
    pub active_days: usize,
    pub user_rank: Option<UserRank>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Achievement {
    pub name: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}
