//! Plain-text artifacts: the harvested posts and the diagnostic page dump.
use crate::timeline::item::TimelineItem;
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const RULE_WIDTH: usize = 80;

/// `tweets_<account>_<YYYYMMDD_HHMMSS>.txt`
pub fn default_file_name(account: &str, now: DateTime<Local>) -> String {
    format!("tweets_{account}_{}.txt", now.format("%Y%m%d_%H%M%S"))
}

/// Append `.txt` unless the name already ends with it.
pub fn ensure_txt_suffix(name: &str) -> String {
    if name.ends_with(".txt") {
        name.to_string()
    } else {
        format!("{name}.txt")
    }
}

/// Render the artifact body: a header, then one numbered block per item.
pub fn render(account: &str, items: &[TimelineItem], retrieved_at: DateTime<Local>) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "Tweets from @{account}");
    let _ = writeln!(out, "Retrieved on: {}", retrieved_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "{rule}\n");
    for (n, item) in items.iter().enumerate() {
        let _ = writeln!(out, "Tweet #{}:", n + 1);
        let _ = writeln!(out, "Time: {}", item.timestamp);
        let _ = writeln!(out, "Text: {}", item.text);
        let _ = writeln!(out, "\n{rule}\n");
    }
    out
}

/// Write the harvested items to `dir`, creating it if needed.
///
/// `file_name` overrides the default name; a `.txt` suffix is enforced.
pub fn write_items(
    dir: &Path,
    account: &str,
    file_name: Option<&str>,
    items: &[TimelineItem],
    now: DateTime<Local>,
) -> driftnet_common::Result<PathBuf> {
    let name = match file_name {
        Some(name) => ensure_txt_suffix(name),
        None => default_file_name(account, now),
    };
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    fs::write(&path, render(account, items, now))?;
    info!(
        target: "timeline.export",
        path = %path.display(),
        count = items.len(),
        "saved posts"
    );
    Ok(path)
}

/// Save raw page markup as `debug_<account>_page.html` for offline diagnosis.
pub fn write_diagnostic_dump(
    dir: &Path,
    account: &str,
    markup: &str,
) -> driftnet_common::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("debug_{account}_page.html"));
    fs::write(&path, markup)?;
    info!(target: "timeline.export", path = %path.display(), "saved page source for debugging");
    Ok(path)
}
