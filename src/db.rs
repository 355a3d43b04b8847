use anyhow::Context;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{CategoryAmounts, UserRecord, WasteEntry};
use crate::period::DateWindow;
use crate::store::WasteStore;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn user_id_by_email(&self, email: &str) -> anyhow::Result<Option<Uuid>> {
        let row = sqlx::query("SELECT id FROM waste_tracker.users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get("id")))
    }

    pub async fn upsert_user(&self, full_name: &str, email: &str) -> anyhow::Result<Uuid> {
        let id: Uuid = sqlx::query(
            r#"
            INSERT INTO waste_tracker.users (id, full_name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE
            SET full_name = EXCLUDED.full_name
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(full_name)
        .bind(email)
        .fetch_one(&self.pool)
        .await?
        .get("id");
        Ok(id)
    }
}

fn entry_from_row(row: &PgRow) -> WasteEntry {
    WasteEntry {
        id: row.get("id"),
        user_id: row.get("user_id"),
        date: row.get("entry_date"),
        amounts: CategoryAmounts::new(
            row.get("plastic"),
            row.get("organic"),
            row.get("paper"),
            row.get("glass"),
        ),
    }
}

fn user_from_row(row: &PgRow) -> UserRecord {
    UserRecord {
        id: row.get("id"),
        name: row.get("full_name"),
        email: row.get("email"),
        score: row.get("reduction_score"),
    }
}

#[async_trait]
impl WasteStore for PgStore {
    async fn find_entries(
        &self,
        user_id: Uuid,
        window: DateWindow,
    ) -> anyhow::Result<Vec<WasteEntry>> {
        let rows = sqlx::query(
            "SELECT id, user_id, entry_date, plastic, organic, paper, glass \
             FROM waste_tracker.waste_entries \
             WHERE user_id = $1 AND entry_date BETWEEN $2 AND $3 \
             ORDER BY entry_date ASC",
        )
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("failed to load entries for user {user_id}"))?;

        Ok(rows.iter().map(entry_from_row).collect())
    }

    async fn find_all_entries(&self, user_id: Uuid) -> anyhow::Result<Vec<WasteEntry>> {
        let rows = sqlx::query(
            "SELECT id, user_id, entry_date, plastic, organic, paper, glass \
             FROM waste_tracker.waste_entries \
             WHERE user_id = $1 \
             ORDER BY entry_date ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("failed to load history for user {user_id}"))?;

        Ok(rows.iter().map(entry_from_row).collect())
    }

    async fn upsert_entry(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        amounts: CategoryAmounts,
    ) -> anyhow::Result<WasteEntry> {
        let row = sqlx::query(
            r#"
            INSERT INTO waste_tracker.waste_entries
            (id, user_id, entry_date, plastic, organic, paper, glass)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id, entry_date) DO UPDATE
            SET plastic = EXCLUDED.plastic,
                organic = EXCLUDED.organic,
                paper = EXCLUDED.paper,
                glass = EXCLUDED.glass,
                updated_at = now()
            RETURNING id, user_id, entry_date, plastic, organic, paper, glass
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(date)
        .bind(amounts.plastic)
        .bind(amounts.organic)
        .bind(amounts.paper)
        .bind(amounts.glass)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry_from_row(&row))
    }

    async fn delete_entry(&self, entry_id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "DELETE FROM waste_tracker.waste_entries WHERE id = $1 AND user_id = $2",
        )
        .bind(entry_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_all_users(&self) -> anyhow::Result<Vec<UserRecord>> {
        let rows = sqlx::query(
            "SELECT id, full_name, email, reduction_score FROM waste_tracker.users",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(user_from_row).collect())
    }

    async fn set_user_score(&self, user_id: Uuid, score: i32) -> anyhow::Result<()> {
        let result = sqlx::query(
            "UPDATE waste_tracker.users SET reduction_score = $2 WHERE id = $1",
        )
        .bind(user_id)
        .bind(score)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            anyhow::bail!("user {user_id} not found");
        }
        Ok(())
    }

    async fn ranked_users(&self) -> anyhow::Result<Vec<UserRecord>> {
        let rows = sqlx::query(
            "SELECT id, full_name, email, reduction_score FROM waste_tracker.users \
             ORDER BY reduction_score DESC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(user_from_row).collect())
    }
}

pub async fn seed(store: &PgStore, today: NaiveDate) -> anyhow::Result<()> {
    let users = vec![
        ("Avery Lee", "avery.lee@example.com", 0.8),
        ("Jules Moreno", "jules.moreno@example.com", 1.0),
        ("Kiara Patel", "kiara.patel@example.com", 1.25),
    ];

    for (name, email, trend) in users {
        let user_id = store.upsert_user(name, email).await?;

        // Two full weeks so both scoring windows are populated; `trend`
        // scales the recent week relative to the one before.
        for days_ago in 0..14i64 {
            let factor = if days_ago < 7 { trend } else { 1.0 };
            let wobble = (days_ago % 3) as f64 * 0.1;
            let amounts = CategoryAmounts::new(
                (0.4 + wobble) * factor,
                (0.9 + wobble) * factor,
                (0.5 + wobble) * factor,
                0.3 * factor,
            );
            store
                .upsert_entry(user_id, today - Duration::days(days_ago), amounts)
                .await?;
        }
    }

    Ok(())
}

pub async fn import_csv(store: &PgStore, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        full_name: String,
        email: String,
        date: NaiveDate,
        plastic: f64,
        organic: f64,
        paper: f64,
        glass: f64,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut written = 0usize;

    for (line, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("invalid CSV row {}", line + 1))?;
        let amounts = CategoryAmounts::new(row.plastic, row.organic, row.paper, row.glass);
        crate::entries::validate_amounts(&amounts)
            .with_context(|| format!("invalid amounts on CSV row {}", line + 1))?;

        let user_id = store.upsert_user(&row.full_name, &row.email).await?;
        store.upsert_entry(user_id, row.date, amounts).await?;
        written += 1;
    }

    Ok(written)
}
