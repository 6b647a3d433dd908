//! Export views of a user's links: CSV, JSON and a printable text list.
//!
//! CSV and JSON read back through `parse` unchanged, apart from URLs that
//! were never canonical to begin with.

use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::commands::{CmdMessage, CmdResult, DisplayLink, LinkSelector};
use crate::error::{LinkDeckError, Result};
use crate::i18n::{keys, tf, Lang};
use crate::model::{RecordId, UserScope};
use crate::store::LinkStore;

use super::helpers::{indexed_links, resolve_selectors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Print,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Print => "txt",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = LinkDeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "print" | "txt" | "text" => Ok(ExportFormat::Print),
            other => Err(LinkDeckError::InvalidValue(format!(
                "unknown export format: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Print => "print",
        })
    }
}

#[derive(Serialize)]
struct ExportedLink<'a> {
    id: RecordId,
    name: &'a str,
    language: &'a str,
    url: &'a str,
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub fn to_csv(links: &[DisplayLink]) -> String {
    let mut out = String::from("name,language,url\n");
    for link in links {
        let r = &link.record;
        out.push_str(&format!(
            "{},{},{}\n",
            csv_field(&r.name),
            csv_field(&r.language),
            csv_field(&r.url)
        ));
    }
    out
}

pub fn to_json(links: &[DisplayLink]) -> Result<String> {
    let items: Vec<ExportedLink> = links
        .iter()
        .map(|link| ExportedLink {
            id: link.record.id,
            name: &link.record.name,
            language: &link.record.language,
            url: &link.record.url,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&items)?)
}

/// Numbered list, one link per block, for a print spooler such as `lp`.
pub fn to_print(links: &[DisplayLink]) -> String {
    let mut out = String::new();
    for link in links {
        let r = &link.record;
        out.push_str(&format!("{:>3}. {}\n", link.index, r.display_name()));
        if !r.language.is_empty() {
            out.push_str(&format!("     {}\n", r.language));
        }
        out.push_str(&format!("     {}\n\n", r.url));
    }
    out
}

/// Exports the selected links, or all of them when `selectors` is empty,
/// newest first. With `destination` the text is written there, otherwise it is
/// returned in `output`.
pub fn run<S: LinkStore>(
    store: &S,
    user: &UserScope,
    lang: Lang,
    format: ExportFormat,
    selectors: &[LinkSelector],
    destination: Option<&Path>,
) -> Result<CmdResult> {
    let links = if selectors.is_empty() {
        indexed_links(store, user)?
    } else {
        resolve_selectors(store, user, selectors)?
    };

    let text = match format {
        ExportFormat::Csv => to_csv(&links),
        ExportFormat::Json => to_json(&links)?,
        ExportFormat::Print => to_print(&links),
    };

    let mut result = CmdResult::default();
    match destination {
        Some(path) => {
            fs::write(path, &text)?;
            info!(path = %path.display(), %format, count = links.len(), "export written");
            result.add_message(CmdMessage::success(tf(
                lang,
                keys::EXPORT_WRITTEN,
                &[("count", &links.len()), ("file", &path.display())],
            )));
            result.written_paths.push(path.to_path_buf());
        }
        None => result.output = Some(text),
    }
    Ok(result)
}
