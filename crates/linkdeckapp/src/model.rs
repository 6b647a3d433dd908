//! # Domain Model
//!
//! Three shapes flow through linkdeck:
//!
//! - [`LinkRecord`]: a saved link. Created by the store (which assigns `id` and
//!   `created_at`), edited only through its `name`/`language`/`url` fields.
//! - [`PreviewRow`]: a candidate link extracted by the import parser. Transient,
//!   never persisted on its own, carries its own validity.
//! - [`UserScope`]: the namespace a record belongs to. Records never cross scopes.
//!
//! ## URL Invariant
//!
//! Every `LinkRecord::url` went through [`crate::normalize::strict_normalize`]
//! on its way into the store, so its scheme is always `https`.
//!
//! ## PreviewRow Invariant
//!
//! `url_https` is `Some` exactly when `reason` is `None`. The only constructor,
//! [`PreviewRow::new`], derives both from the raw URL so they cannot disagree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{LinkDeckError, Result};
use crate::i18n::{keys, t, Lang};
use crate::normalize::strict_normalize;

pub type RecordId = Uuid;

/// The scope name that means "no signed-in user": nothing is persisted.
pub const GUEST_USER: &str = "guest";

/// Namespace of one user's records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserScope(String);

impl UserScope {
    pub fn new(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
            return Err(LinkDeckError::Api(format!("Invalid user name: {:?}", name)));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn guest() -> Self {
        Self(GUEST_USER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_guest(&self) -> bool {
        self.0 == GUEST_USER
    }

    /// Filesystem-safe, collision-free directory name for this scope.
    pub fn dir_name(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl fmt::Display for UserScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: RecordId,
    pub name: String,
    pub language: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl LinkRecord {
    pub fn from_fields(fields: LinkFields) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            language: fields.language,
            url: fields.url,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, fields: LinkFields) {
        self.name = fields.name;
        self.language = fields.language;
        self.url = fields.url;
    }

    /// The name to show for this record; falls back to the URL.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.url
        } else {
            &self.name
        }
    }
}

/// The user-editable part of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkFields {
    pub name: String,
    pub language: String,
    pub url: String,
}

impl LinkFields {
    pub fn new(
        name: impl Into<String>,
        language: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            url: url.into(),
        }
    }
}

impl From<&LinkRecord> for LinkFields {
    fn from(record: &LinkRecord) -> Self {
        Self::new(
            record.name.clone(),
            record.language.clone(),
            record.url.clone(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderBy {
    #[default]
    CreatedDesc,
    CreatedAsc,
    Name,
}

impl OrderBy {
    /// Sorts records that are in insertion order. Ties on `created_at` keep
    /// insertion order for `CreatedAsc` and reverse it for `CreatedDesc`.
    pub fn sort(self, mut records: Vec<LinkRecord>) -> Vec<LinkRecord> {
        match self {
            OrderBy::CreatedAsc => records.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            OrderBy::CreatedDesc => {
                records.reverse();
                records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
            OrderBy::Name => records.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then(a.created_at.cmp(&b.created_at))
            }),
        }
        records
    }
}

impl std::str::FromStr for OrderBy {
    type Err = LinkDeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "newest" | "created-desc" => Ok(OrderBy::CreatedDesc),
            "oldest" | "created-asc" => Ok(OrderBy::CreatedAsc),
            "name" => Ok(OrderBy::Name),
            other => Err(LinkDeckError::InvalidValue(format!("unknown order: {}", other))),
        }
    }
}

/// A candidate link found by the import parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRow {
    pub name: String,
    pub language: String,
    pub url_raw: String,
    pub url_https: Option<String>,
    pub reason: Option<String>,
}

impl PreviewRow {
    /// Validates `url_raw`. An invalid row carries the English reason; see [`Self::localized`].
    pub fn new(name: String, language: String, url_raw: String) -> Self {
        let url_https = strict_normalize(&url_raw);
        Self {
            name,
            language,
            url_raw,
            url_https,
            reason: None,
        }
        .localized(Lang::BASE)
    }

    /// Rewrites the invalid-row reason in `lang`.
    pub fn localized(mut self, lang: Lang) -> Self {
        self.reason = match self.url_https {
            Some(_) => None,
            None => Some(t(lang, keys::URL_MUST_BE_HTTPS).to_string()),
        };
        self
    }

    pub fn is_valid(&self) -> bool {
        self.url_https.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record_at(name: &str, offset_secs: i64) -> LinkRecord {
        let mut record = LinkRecord::from_fields(LinkFields::new(name, "", "https://a.test/"));
        record.created_at = DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(offset_secs);
        record
    }

    #[test]
    fn test_preview_row_valid_has_no_reason() {
        let row = PreviewRow::new("A".into(), "Thai".into(), "example.com".into());
        assert_eq!(row.url_https.as_deref(), Some("https://example.com/"));
        assert!(row.reason.is_none());
        assert!(row.is_valid());
    }

    #[test]
    fn test_preview_row_invalid_has_reason() {
        let row = PreviewRow::new("A".into(), "".into(), "http://example.com".into());
        assert!(row.url_https.is_none());
        assert_eq!(row.reason.as_deref(), Some("URL must be https"));
        assert_eq!(row.url_raw, "http://example.com");
    }

    #[test]
    fn test_preview_row_reason_follows_language() {
        let row = PreviewRow::new("A".into(), "".into(), "http://example.com".into());
        let thai = row.clone().localized(Lang::Th);
        assert_eq!(thai.reason.as_deref(), Some(t(Lang::Th, keys::URL_MUST_BE_HTTPS)));
        assert_ne!(thai.reason, row.reason);

        let valid = PreviewRow::new("A".into(), "".into(), "a.test".into()).localized(Lang::Th);
        assert!(valid.reason.is_none());
    }

    #[test]
    fn test_user_scope_rejects_empty_and_dots() {
        assert!(UserScope::new("").is_err());
        assert!(UserScope::new("  ").is_err());
        assert!(UserScope::new("..").is_err());
        assert_eq!(UserScope::new(" alice ").unwrap().as_str(), "alice");
    }

    #[test]
    fn test_user_scope_dir_name_is_escaped() {
        let scope = UserScope::new("a/b c").unwrap();
        assert_eq!(scope.dir_name(), "a%2Fb%20c");
    }

    #[test]
    fn test_guest_scope() {
        assert!(UserScope::guest().is_guest());
        assert!(!UserScope::new("alice").unwrap().is_guest());
    }

    #[test]
    fn test_order_created_desc_breaks_ties_by_insertion() {
        let a = record_at("a", 10);
        let b = record_at("b", 10);
        let c = record_at("c", 5);
        let sorted = OrderBy::CreatedDesc.sort(vec![a, b, c]);
        let names: Vec<_> = sorted.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_order_by_name_is_case_insensitive() {
        let sorted = OrderBy::Name.sort(vec![
            record_at("beta", 1),
            record_at("Alpha", 2),
            record_at("gamma", 3),
        ]);
        let names: Vec<_> = sorted.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_display_name_falls_back_to_url() {
        let record = record_at("  ", 0);
        assert_eq!(record.display_name(), "https://a.test/");
    }
}
