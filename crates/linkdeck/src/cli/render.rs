//! Terminal output for command results.
//!
//! Layout math (widths, truncation, padding) is Unicode-aware, since names and
//! language labels are often Thai.

use chrono::{DateTime, Utc};
use colored::Colorize;
use linkdeckapp::api::{CmdMessage, DisplayLink, MessageLevel};
use linkdeckapp::commands::LanguageCount;
use linkdeckapp::model::PreviewRow;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
pub const TIME_WIDTH: usize = 14;
pub const LANGUAGE_WIDTH: usize = 14;

/// Errors go to stderr, everything else to stdout.
pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

pub fn print_links(links: &[DisplayLink]) {
    for link in links {
        let (head, padding, tail) = link_line(link);
        println!(
            "{}{}{}{}",
            head.0.yellow(),
            head.1,
            " ".repeat(padding),
            tail.dimmed()
        );
        println!("      {}", link.record.url.dimmed());
    }
}

/// `((index, name), padding, language + time)` for one list line.
fn link_line(link: &DisplayLink) -> ((String, String), usize, String) {
    let index = format!("{:>4}. ", link.index);
    let language = pad_to_width(&truncate_to_width(&link.record.language, LANGUAGE_WIDTH), LANGUAGE_WIDTH);
    let time_ago = format_time_ago(link.record.created_at);

    let fixed = index.width() + LANGUAGE_WIDTH + TIME_WIDTH + 2;
    let available = LINE_WIDTH.saturating_sub(fixed);
    let name = truncate_to_width(link.record.display_name(), available);
    let padding = available.saturating_sub(name.width()) + 2;

    ((index, name), padding, format!("{}{}", language, time_ago))
}

pub fn print_preview_rows(rows: &[PreviewRow]) {
    for (i, row) in rows.iter().enumerate() {
        let label = match (row.name.is_empty(), row.language.is_empty()) {
            (true, _) => row.url_raw.clone(),
            (false, true) => row.name.clone(),
            (false, false) => format!("{} ({})", row.name, row.language),
        };
        match (&row.url_https, &row.reason) {
            (Some(url), _) => println!(
                "{} {:>3}. {}  {}",
                "✓".green(),
                i + 1,
                label,
                url.dimmed()
            ),
            (None, reason) => println!(
                "{} {:>3}. {}  {}",
                "✗".red(),
                i + 1,
                label,
                format!("{} ({})", row.url_raw, reason.as_deref().unwrap_or_default()).red()
            ),
        }
    }
}

pub fn print_languages(languages: &[LanguageCount]) {
    let width = languages
        .iter()
        .map(|l| l.language.width())
        .max()
        .unwrap_or(0)
        .max(1);
    for entry in languages {
        let label = if entry.language.is_empty() {
            "-".to_string()
        } else {
            entry.language.clone()
        };
        println!("{}  {}", pad_to_width(&label, width), entry.count.to_string().dimmed());
    }
}

pub fn print_entries(entries: &[(&str, String)]) {
    let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in entries {
        println!("{:<width$}  {}", key.bold(), value, width = width);
    }
}

fn pad_to_width(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(s.width())))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
