//! # Command Layer
//!
//! This module contains the **business logic** of linkdeck. Each command lives
//! in its own submodule as plain functions over a [`LinkStore`](crate::store::LinkStore).
//!
//! ## What Commands Do NOT Do
//!
//! - **Any terminal I/O**: no stdout, stderr, colors or prompts
//! - **Argument parsing**: that's the client's job
//! - **Exit codes**: return `Result` and messages, let the caller decide
//!
//! ## Structured Returns
//!
//! Commands return [`CmdResult`], not strings:
//! - `affected_links`: links created, changed or removed (with their index)
//! - `listed_links`: links to display
//! - `preview_rows`: import candidates with their validity
//! - `languages`: distinct language labels with counts
//! - `written_paths` / `exported_cards`: files produced and cards exported
//! - `output`: text payloads (CSV, JSON, print view)
//! - `messages`: leveled, already-translated messages
//!
//! Validation problems (a non-https URL, an empty import) are messages at
//! [`MessageLevel::Error`], not `Err`: the operation is refused and the store is
//! untouched. `Err` is for failures of the store or the platform.
//!
//! ## Indexes
//!
//! A link's display index is its 1-based position in the newest-first list of
//! all the user's links. It does not depend on search filters or sort order,
//! so `linkdeck list --search x` followed by `linkdeck delete 3` deletes the
//! link shown as 3.
//!
//! ## Command Modules
//!
//! - [`create`]: Add one link
//! - [`update`]: Edit links
//! - [`delete`]: Remove links
//! - [`list`]: List, search and filter; language counts
//! - [`import`]: Preview and commit imports
//! - [`export`]: CSV, JSON and print views
//! - [`cards`]: Render cards and run an export action on them
//! - [`helpers`]: Selector resolution

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{LinkDeckError, Result};
use crate::model::{LinkRecord, PreviewRow};

pub mod cards;
pub mod create;
pub mod delete;
pub mod export;
pub mod helpers;
pub mod import;
pub mod list;
pub mod update;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A record paired with its display index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayLink {
    pub index: usize,
    #[serde(flatten)]
    pub record: LinkRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageCount {
    pub language: String,
    pub count: usize,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_links: Vec<DisplayLink>,
    pub listed_links: Vec<DisplayLink>,
    pub preview_rows: Vec<PreviewRow>,
    pub languages: Vec<LanguageCount>,
    pub written_paths: Vec<PathBuf>,
    pub exported_cards: Vec<String>,
    pub output: Option<String>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_links(mut self, links: Vec<DisplayLink>) -> Self {
        self.listed_links = links;
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}

/// Addresses a link: by display index (`3`) or by id or id prefix (`5f2c`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSelector {
    Index(usize),
    Id(String),
}

impl FromStr for LinkSelector {
    type Err = LinkDeckError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(LinkDeckError::InvalidValue("empty selector".to_string()));
        }
        if s.chars().all(|c| c.is_ascii_digit()) {
            return match s.parse::<usize>() {
                Ok(0) | Err(_) => Err(LinkDeckError::InvalidValue(format!(
                    "index must be 1 or greater: {}",
                    s
                ))),
                Ok(n) => Ok(LinkSelector::Index(n)),
            };
        }
        if s.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
            return Ok(LinkSelector::Id(s.to_ascii_lowercase()));
        }
        Err(LinkDeckError::InvalidValue(format!(
            "not an index or id: {}",
            s
        )))
    }
}

impl fmt::Display for LinkSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkSelector::Index(n) => write!(f, "{}", n),
            LinkSelector::Id(id) => f.write_str(id),
        }
    }
}
