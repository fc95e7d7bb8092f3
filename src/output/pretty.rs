use colored::Colorize;

use crate::cache::CacheStatus;
use crate::catalog::ApplicationRecord;
use crate::output::RefreshSummary;

/// Safely truncate a string to n characters, appending "..." if truncated.
/// Works correctly with multi-byte UTF-8 characters.
fn truncate_str(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > max_chars {
        let truncated: String = chars.iter().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Format age in human-readable form
pub fn format_age(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

fn systems_display(record: &ApplicationRecord) -> String {
    if record.systems.is_empty() {
        "-".to_string()
    } else {
        record.systems.join(", ")
    }
}

/// Format a list of records for pretty output
pub fn format_records(records: &[ApplicationRecord]) -> String {
    if records.is_empty() {
        return "No applications found.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!("{}\n", "Applications".bold()));
    output.push_str(&"─".repeat(70));
    output.push('\n');

    for record in records {
        output.push_str(&format!(
            "{} [{}]\n",
            record.title.bold(),
            systems_display(record).green()
        ));

        if let Some(author) = record.author() {
            output.push_str(&format!("  {} {}\n", "Author:".cyan(), author));
        }
        if let Some(version) = record.version() {
            output.push_str(&format!("  {} {}\n", "Version:".cyan(), version));
        }
        if let Some(description) = record.description() {
            output.push_str(&format!(
                "  {}\n",
                truncate_str(description, 66).dimmed()
            ));
        }
        output.push('\n');
    }

    output.trim_end().to_string()
}

/// Format a single record for pretty output
pub fn format_record(record: &ApplicationRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", record.title.bold()));
    output.push_str(&"─".repeat(50));
    output.push('\n');

    output.push_str(&format!("{} {}\n", "Systems:".cyan(), systems_display(record)));
    if let Some(author) = record.author() {
        output.push_str(&format!("{} {}\n", "Author:".cyan(), author));
    }
    if let Some(version) = record.version() {
        output.push_str(&format!("{} {}\n", "Version:".cyan(), version));
    }

    let categories = record.categories();
    if !categories.is_empty() {
        output.push_str(&format!("{} {}\n", "Categories:".cyan(), categories.join(", ")));
    }
    if let Some(source) = record.str_field("source") {
        output.push_str(&format!("{} {}\n", "Source:".cyan(), source));
    }
    if let Some(description) = record.description() {
        output.push_str(&format!("\n{}\n", description));
    }

    output.trim_end().to_string()
}

/// Format the result of a batch refresh
pub fn format_refresh(summary: &RefreshSummary) -> String {
    format!(
        "{} Cached {} applications from {}\n  {} {}\n  {} {}",
        "✓".green(),
        summary.records.to_string().bold(),
        summary.source,
        "Integrity:".cyan(),
        summary.fetched_at.to_rfc3339(),
        "Location:".cyan(),
        summary.cache_dir.display()
    )
}

/// Format shared cache status
pub fn format_cache_status(status: &CacheStatus, cache_dir: &str, interval_secs: u64) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", "Cache Status".bold()));
    output.push_str(&format!("Location: {}\n\n", cache_dir));

    output.push_str(&"Catalog:\n".dimmed().to_string());
    if status.catalog.exists {
        if let Some(count) = status.catalog.count {
            output.push_str(&format!("  Entries: {}\n", count));
        }
        if let Some(age) = status.catalog.age_secs {
            let age_str = format_age(age);
            if age < interval_secs {
                output.push_str(&format!("  Age: {} {}\n", age_str, "(fresh)".green()));
            } else {
                output.push_str(&format!("  Age: {} {}\n", age_str, "(stale)".yellow()));
            }
        } else {
            output.push_str(&format!("  {}\n", "Unreadable".red()));
        }
    } else {
        output.push_str(&format!("  {}\n", "Not cached".dimmed()));
    }

    output.trim_end().to_string()
}
