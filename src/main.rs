use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

mod achievements;
mod batch;
mod config;
mod db;
mod entries;
mod error;
mod leaderboard;
mod models;
mod period;
mod reduction;
mod report;
mod scoring;
mod stats;
mod store;
mod suggestions;

use crate::db::PgStore;
use crate::error::AnalyticsError;
use crate::models::{Category, CategoryAmounts};
use crate::stats::StatsWindow;

#[derive(Parser)]
#[command(name = "waste-tracker")]
#[command(about = "Household waste logging, reduction scoring and leaderboards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load demo users with two weeks of entries
    Seed,
    /// Import entries from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Record (or overwrite) a day's waste amounts in kg
    Log {
        #[arg(long)]
        email: String,
        /// Defaults to today (UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value_t = 0.0)]
        plastic: f64,
        #[arg(long, default_value_t = 0.0)]
        organic: f64,
        #[arg(long, default_value_t = 0.0)]
        paper: f64,
        #[arg(long, default_value_t = 0.0)]
        glass: f64,
    },
    /// Delete one of a user's entries
    Delete {
        #[arg(long)]
        email: String,
        #[arg(long)]
        entry_id: Uuid,
    },
    /// List a user's entries in a date range
    Entries {
        #[arg(long)]
        email: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
    },
    /// Compare the trailing window against the one before it
    Stats {
        #[arg(long)]
        email: String,
        /// Window length in days: 7, 30 or 90
        #[arg(long, default_value_t = 7)]
        range: u32,
        /// Report this user's leaderboard position as well
        #[arg(long)]
        caller: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Tips based on the last seven days
    Suggest {
        #[arg(long)]
        email: String,
        #[arg(long)]
        json: bool,
    },
    /// Show a page of the score leaderboard
    Leaderboard {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = leaderboard::DEFAULT_PAGE_SIZE)]
        limit: usize,
        #[arg(long)]
        caller: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show which achievements a user has unlocked
    Achievements {
        #[arg(long)]
        email: String,
    },
    /// Recompute and persist every user's score once
    UpdateScores,
    /// Recompute scores daily at WASTE_TRACKER_SCORE_TIME (UTC)
    Schedule,
    /// Generate a markdown report
    Report {
        #[arg(long)]
        email: String,
        #[arg(long, default_value_t = 7)]
        range: u32,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Export a user's full history as CSV
    Export {
        #[arg(long)]
        email: String,
        /// Writes to stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

async fn resolve_user(store: &PgStore, email: &str) -> anyhow::Result<Uuid> {
    store
        .user_id_by_email(email)
        .await?
        .ok_or_else(|| AnalyticsError::NotFound(format!("user {email}")).into())
}

async fn resolve_caller(store: &PgStore, email: Option<&str>) -> anyhow::Result<Option<Uuid>> {
    match email {
        Some(email) => Ok(Some(resolve_user(store, email).await?)),
        None => Ok(None),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::Config::from_env()?;

    let env_filter = tracing_subscriber::EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;
    let store = PgStore::new(pool.clone());
    let today = Utc::now().date_naive();

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&store, today).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let written = db::import_csv(&store, &csv).await?;
            println!("Imported {written} entries from {}.", csv.display());
        }
        Commands::Log {
            email,
            date,
            plastic,
            organic,
            paper,
            glass,
        } => {
            let user_id = resolve_user(&store, &email).await?;
            let amounts = CategoryAmounts::new(plastic, organic, paper, glass);
            let entry = match date {
                Some(date) => entries::log_entry(&store, user_id, date, amounts).await?,
                None => entries::log_entry_at(&store, user_id, Utc::now(), amounts).await?,
            };
            println!(
                "Logged {:.2} kg for {} on {} (entry {}).",
                entry.amounts.total(),
                email,
                entry.date,
                entry.id
            );
        }
        Commands::Delete { email, entry_id } => {
            let user_id = resolve_user(&store, &email).await?;
            entries::remove_entry(&store, entry_id, user_id).await?;
            println!("Deleted entry {entry_id}.");
        }
        Commands::Entries { email, start, end } => {
            let user_id = resolve_user(&store, &email).await?;
            let found = entries::entries_between(&store, user_id, start, end).await?;
            if found.is_empty() {
                println!("No entries between {start} and {end}.");
                return Ok(());
            }
            for entry in &found {
                println!(
                    "- {} plastic {:.2} organic {:.2} paper {:.2} glass {:.2} ({})",
                    entry.date,
                    entry.amounts.plastic,
                    entry.amounts.organic,
                    entry.amounts.paper,
                    entry.amounts.glass,
                    entry.id
                );
            }
        }
        Commands::Stats {
            email,
            range,
            caller,
            json,
        } => {
            let window = StatsWindow::try_from(range)?;
            let user_id = resolve_user(&store, &email).await?;
            let caller = resolve_caller(&store, caller.as_deref()).await?;
            let report = stats::build_stats(&store, user_id, window, caller, today).await?;

            if json {
                return print_json(&report);
            }
            println!("Last {} days ({} to {}):", report.window_days, report.start, report.end);
            for category in Category::ALL {
                println!(
                    "- {}: {:.2} kg ({:+.1}%)",
                    category,
                    report.totals.get(category),
                    report.comparison.get(category)
                );
            }
            println!(
                "Total {:.2} kg, overall reduction {:+.1}%, best {}, worst {}, {} active days",
                report.total_waste,
                report.reduction_percent,
                report.best_category,
                report.worst_category,
                report.active_days
            );
            if let Some(rank) = report.user_rank {
                println!("Rank #{} of {} (score {})", rank.rank, rank.total_users, rank.score);
            }
        }
        Commands::Suggest { email, json } => {
            let user_id = resolve_user(&store, &email).await?;
            let tips = suggestions::suggestions_for_user(&store, user_id, today).await?;
            if json {
                return print_json(&tips);
            }
            for tip in &tips {
                let tag = tip.category.map(|c| c.as_str()).unwrap_or("general");
                println!("- [P{}] {}: {}", tip.priority, tag, tip.text);
            }
        }
        Commands::Leaderboard {
            page,
            limit,
            caller,
            json,
        } => {
            let caller = resolve_caller(&store, caller.as_deref()).await?;
            let board = leaderboard::leaderboard(&store, page, limit, caller).await?;
            if json {
                return print_json(&board);
            }
            if board.entries.is_empty() {
                println!("No users on page {}.", board.current_page);
            }
            for entry in &board.entries {
                println!("{:>3}. {} ({}) score {}", entry.rank, entry.name, entry.email, entry.score);
            }
            println!(
                "Page {} of {} ({} users)",
                board.current_page, board.total_pages, board.total_users
            );
            if let Some(rank) = board.user_rank {
                println!("Your rank: #{} with score {}", rank.rank, rank.score);
            }
        }
        Commands::Achievements { email } => {
            let user_id = resolve_user(&store, &email).await?;
            for achievement in achievements::achievements_for_user(&store, user_id).await? {
                let mark = if achievement.unlocked { "x" } else { " " };
                println!("[{mark}] {}: {}", achievement.name, achievement.description);
            }
        }
        Commands::UpdateScores => {
            let summary = batch::update_all_scores(&store, today).await;
            println!(
                "Updated scores for {} users ({} failed).",
                summary.updated, summary.failed
            );
        }
        Commands::Schedule => {
            tracing::info!(at = %config.score_time, "starting daily score scheduler");
            batch::run_daily(&store, config.score_time).await;
        }
        Commands::Report { email, range, out } => {
            let window = StatsWindow::try_from(range)?;
            let user_id = resolve_user(&store, &email).await?;
            let stats = stats::build_stats(&store, user_id, window, Some(user_id), today).await?;
            let tips = suggestions::suggestions_for_user(&store, user_id, today).await?;
            let unlocked = achievements::achievements_for_user(&store, user_id).await?;
            let report = report::build_report(&email, &stats, &tips, &unlocked);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export { email, out } => {
            let user_id = resolve_user(&store, &email).await?;
            let all = entries::full_history(&store, user_id).await?;
            match out {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    report::export_csv(&all, file)?;
                    println!("Exported {} entries to {}.", all.len(), path.display());
                }
                None => report::export_csv(&all, std::io::stdout().lock())?,
            }
        }
    }

    Ok(())
}
