//! # Import Parsing
//!
//! Turns a pasted or uploaded blob into [`PreviewRow`]s. Nothing is written
//! anywhere; committing is `commands::import`'s job.
//!
//! ## Format Sniffing
//!
//! - With a filename: `*.json` is JSON, anything else is delimited text.
//! - Without one (paste, stdin): text whose first non-blank character is `{`
//!   or `[` is JSON, anything else is delimited text.
//!
//! ## JSON
//!
//! An array of objects, or a single object (treated as a one-element array).
//! Keys `name`, `language`, `url` are matched case-insensitively; missing keys
//! read as empty strings. A document that does not parse yields **no rows** and
//! an error message, never a partial list.
//!
//! ## Delimited Text (CSV/TSV)
//!
//! 1. Split into lines, trim them, drop blank ones.
//! 2. Delimiter: tab if the first line has at least as many tabs as commas,
//!    comma otherwise.
//! 3. If the first row's lowercased cells contain `name`, `language` or `url`,
//!    it is a header: it is consumed and the columns are found by name.
//!    Otherwise the column order is `name, language, url`.
//! 4. A cell that opens with a double quote runs to the matching closing
//!    quote, delimiters included, and `""` inside it is one literal quote.
//!    Cells are trimmed. This is the quoting our CSV export writes.

use serde_json::Value;
use tracing::debug;

use crate::model::PreviewRow;

const FIELDS: [&str; 3] = ["name", "language", "url"];

/// Result of parsing one blob: rows, or an error and no rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub rows: Vec<PreviewRow>,
    pub error: Option<String>,
}

impl ParseOutcome {
    fn failed(message: String) -> Self {
        Self {
            rows: Vec::new(),
            error: Some(message),
        }
    }

    pub fn valid_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_valid()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Delimited,
}

impl InputFormat {
    /// Picks the format from the filename when there is one, from the content otherwise.
    pub fn sniff(raw: &str, filename_hint: Option<&str>) -> Self {
        let is_json = match filename_hint {
            Some(name) => name.trim().to_lowercase().ends_with(".json"),
            None => {
                let trimmed = raw.trim_start();
                trimmed.starts_with('{') || trimmed.starts_with('[')
            }
        };
        if is_json {
            InputFormat::Json
        } else {
            InputFormat::Delimited
        }
    }
}

pub fn parse(raw: &str, filename_hint: Option<&str>) -> ParseOutcome {
    let format = InputFormat::sniff(raw, filename_hint);
    debug!(?format, hint = ?filename_hint, "parsing import input");
    match format {
        InputFormat::Json => parse_json(raw),
        InputFormat::Delimited => parse_delimited(raw),
    }
}

pub fn parse_json(raw: &str) -> ParseOutcome {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => return ParseOutcome::failed(format!("Invalid JSON: {}", e)),
    };

    let items = match value {
        Value::Array(items) => items,
        other => vec![other],
    };

    let rows = items
        .iter()
        .map(|item| {
            PreviewRow::new(
                json_field(item, "name"),
                json_field(item, "language"),
                json_field(item, "url"),
            )
        })
        .collect();

    ParseOutcome { rows, error: None }
}

fn json_field(item: &Value, field: &str) -> String {
    let Value::Object(map) = item else {
        return String::new();
    };
    let value = map
        .get(field)
        .or_else(|| {
            map.iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(field))
                .map(|(_, v)| v)
        })
        .unwrap_or(&Value::Null);

    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

pub fn parse_delimited(raw: &str) -> ParseOutcome {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let Some(first) = lines.first() else {
        return ParseOutcome::default();
    };

    let delimiter = sniff_delimiter(first);
    let table: Vec<Vec<String>> = lines
        .iter()
        .map(|line| split_cells(line, delimiter))
        .collect();

    let header: Vec<String> = table[0].iter().map(|c| c.to_lowercase()).collect();
    let has_header = header.iter().any(|cell| FIELDS.contains(&cell.as_str()));

    let (columns, data) = if has_header {
        let columns = FIELDS.map(|field| header.iter().position(|cell| cell == field));
        (columns, &table[1..])
    } else {
        ([Some(0), Some(1), Some(2)], &table[..])
    };
    debug!(
        delimiter = ?delimiter,
        has_header,
        rows = data.len(),
        "parsed delimited import"
    );

    let rows = data
        .iter()
        .map(|cells| {
            let cell = |column: Option<usize>| {
                column
                    .and_then(|i| cells.get(i))
                    .cloned()
                    .unwrap_or_default()
            };
            PreviewRow::new(cell(columns[0]), cell(columns[1]), cell(columns[2]))
        })
        .collect();

    ParseOutcome { rows, error: None }
}

/// Tab wins ties: a line with no tabs and no commas is one tab-delimited column.
fn sniff_delimiter(first_line: &str) -> char {
    let tabs = first_line.matches('\t').count();
    let commas = first_line.matches(',').count();
    if tabs >= commas {
        '\t'
    } else {
        ','
    }
}

fn split_cells(line: &str, delimiter: char) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    cell.push('"');
                }
                '"' => in_quotes = false,
                _ => cell.push(c),
            }
        } else if c == delimiter {
            cells.push(cell.trim().to_string());
            cell.clear();
        } else if c == '"' && cell.trim().is_empty() {
            cell.clear();
            in_quotes = true;
        } else {
            cell.push(c);
        }
    }
    cells.push(cell.trim().to_string());
    cells
}
