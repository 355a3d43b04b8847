use std::fmt::Write;

use crate::models::{Achievement, Category, StatsReport, Suggestion, WasteEntry};

pub fn build_report(
    user_label: &str,
    stats: &StatsReport,
    suggestions: &[Suggestion],
    achievements: &[Achievement],
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Waste Reduction Report");
    let _ = writeln!(
        output,
        "Generated for {} ({} days, {} to {})",
        user_label, stats.window_days, stats.start, stats.end
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Totals");

    for category in Category::ALL {
        let _ = writeln!(
            output,
            "- {}: {:.2} kg ({:+.1}% vs previous period)",
            category,
            stats.totals.get(category),
            stats.comparison.get(category)
        );
    }
    let _ = writeln!(output, "- total: {:.2} kg", stats.total_waste);
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "Overall reduction {:+.1}%. Best category: {}. Needs attention: {}.",
        stats.reduction_percent, stats.best_category, stats.worst_category
    );
    let _ = writeln!(output, "Active days: {}", stats.active_days);

    if let Some(rank) = &stats.user_rank {
        let _ = writeln!(
            output,
            "Leaderboard: #{} of {} with score {}",
            rank.rank, rank.total_users, rank.score
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Daily Log");

    if stats.daily.is_empty() {
        let _ = writeln!(output, "No entries recorded for this window.");
    } else {
        for point in stats.daily.iter() {
            let _ = writeln!(
                output,
                "- {}: plastic {:.2}, organic {:.2}, paper {:.2}, glass {:.2} (total {:.2})",
                point.date,
                point.amounts.plastic,
                point.amounts.organic,
                point.amounts.paper,
                point.amounts.glass,
                point.total
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Suggestions");
    for suggestion in suggestions {
        let tag = suggestion
            .category
            .map(|c| c.as_str())
            .unwrap_or("general");
        let _ = writeln!(
            output,
            "- [P{}] {}: {}",
            suggestion.priority, tag, suggestion.text
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Achievements");
    for achievement in achievements {
        let mark = if achievement.unlocked { "x" } else { " " };
        let _ = writeln!(
            output,
            "- [{}] {}: {}",
            mark, achievement.name, achievement.description
        );
    }

    output
}

/// Writes `Date,Plastic,Organic,Paper,Glass,Total` rows, newest first.
pub fn export_csv<W: std::io::Write>(entries: &[WasteEntry], out: W) -> anyhow::Result<()> {
    let mut sorted: Vec<&WasteEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["Date", "Plastic", "Organic", "Paper", "Glass", "Total"])?;

    for entry in sorted {
        let a = &entry.amounts;
        writer.write_record([
            entry.date.to_string(),
            a.plastic.to_string(),
            a.organic.to_string(),
            a.paper.to_string(),
            a.glass.to_string(),
            a.total().to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
