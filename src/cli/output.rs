use chrono::{DateTime, Utc};
use colored::Colorize;

/// Print a success message.
pub fn success(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

/// Print a warning message.
pub fn warning(msg: &str) {
    println!("  {} {}", "⚠".yellow(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Print a header line.
pub fn header(msg: &str) {
    println!("\n{}", msg.bold());
}

/// Print an indented list item.
pub fn bullet(msg: &str) {
    println!("    {} {}", "•".dimmed(), msg);
}

/// Print a dimmed follow-up suggestion.
pub fn hint(msg: &str) {
    println!("\n  {}", msg.dimmed());
}

/// Print one feed row: time, `project/task`, then the description.
pub fn activity_row(time: DateTime<Utc>, project_id: i64, task_id: i64, activity: &str) {
    let date = time.format("%Y-%m-%d %H:%M:%S").to_string();
    let location = format!("{project_id}/{task_id}");

    println!(
        "  {} {} {:<10} {}",
        date.dimmed(),
        "│".dimmed(),
        location.cyan(),
        activity,
    );
}
