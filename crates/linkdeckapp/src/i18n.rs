//! # Messages
//!
//! English and Thai strings for everything linkdeck says to a person.
//!
//! Lookups never fail. [`t`] walks a fixed chain:
//!
//! 1. the requested language,
//! 2. English (the base language),
//! 3. the key itself.
//!
//! So a key missing from the Thai table shows English, and a key missing
//! everywhere shows up verbatim, which is ugly but visible.
//!
//! Placeholders are written `{name}` and filled by [`tf`].

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{LinkDeckError, Result};

/// Message keys used across the crate and its clients.
pub mod keys {
    pub const URL_MUST_BE_HTTPS: &str = "url.must_be_https";
    pub const GUEST_MODE: &str = "guest.mode";
    pub const GUEST_NO_STORE: &str = "guest.no_store";
    pub const RECORD_ADDED: &str = "record.added";
    pub const RECORD_UPDATED: &str = "record.updated";
    pub const UPDATE_NOTHING: &str = "update.nothing";
    pub const RECORD_DELETED: &str = "record.deleted";
    pub const LIST_EMPTY: &str = "list.empty";
    pub const LIST_NO_MATCH: &str = "list.no_match";
    pub const IMPORT_SUMMARY: &str = "import.summary";
    pub const IMPORT_NONE_VALID: &str = "import.none_valid";
    pub const IMPORT_COMMITTED: &str = "import.committed";
    pub const IMPORT_PARSE_FAILED: &str = "import.parse_failed";
    pub const CARD_SAVED: &str = "card.saved";
    pub const CARD_COPIED: &str = "card.copied";
    pub const CARD_COPY_UNSUPPORTED: &str = "card.copy_unsupported";
    pub const CARD_SHARED: &str = "card.shared";
    pub const CARD_SHARE_FAILED: &str = "card.share_failed";
    pub const CARD_PREVIEW: &str = "card.preview";
    pub const CARD_SINGLE_ONLY: &str = "card.single_only";
    pub const EXPORT_WRITTEN: &str = "export.written";
    pub const UPDATE_AVAILABLE: &str = "update.available";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lang {
    #[default]
    En,
    Th,
}

impl Lang {
    /// The language every lookup falls back to.
    pub const BASE: Lang = Lang::En;

    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Th => "th",
        }
    }
}

impl FromStr for Lang {
    type Err = LinkDeckError;

    /// Accepts `en`/`th` and region or encoding variants such as `th_TH.UTF-8`.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        let primary = lower.split(['-', '_', '.']).next().unwrap_or_default();
        match primary {
            "en" | "english" => Ok(Lang::En),
            "th" | "thai" | "ไทย" => Ok(Lang::Th),
            _ => Err(LinkDeckError::InvalidValue(format!(
                "unsupported language '{}' (expected en or th)",
                s
            ))),
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

type Table = HashMap<&'static str, &'static str>;

static MESSAGES: Lazy<HashMap<Lang, Table>> = Lazy::new(|| {
    use keys::*;

    let en = [
        (URL_MUST_BE_HTTPS, "URL must be https"),
        (GUEST_MODE, "Guest mode: links are not saved"),
        (
            GUEST_NO_STORE,
            "Guest mode has no saved links. Set a user with --user or LINKDECK_USER.",
        ),
        (RECORD_ADDED, "Added {name}"),
        (RECORD_UPDATED, "Updated {name}"),
        (UPDATE_NOTHING, "Nothing to change"),
        (RECORD_DELETED, "Deleted {name}"),
        (LIST_EMPTY, "No links yet."),
        (LIST_NO_MATCH, "No links match."),
        (IMPORT_SUMMARY, "{valid} of {total} rows are valid"),
        (IMPORT_NONE_VALID, "Nothing to import: no row has a valid https URL"),
        (IMPORT_COMMITTED, "Imported {count} links"),
        (IMPORT_PARSE_FAILED, "Could not read the input: {error}"),
        (CARD_SAVED, "Saved {file}"),
        (CARD_COPIED, "Card copied to the clipboard"),
        (
            CARD_COPY_UNSUPPORTED,
            "Copying images is not supported here. Use download instead.",
        ),
        (CARD_SHARED, "Shared {file}"),
        (
            CARD_SHARE_FAILED,
            "Sharing did not complete. Use download instead.",
        ),
        (CARD_PREVIEW, "Opened preview {file}"),
        (CARD_SINGLE_ONLY, "This action works on exactly one link"),
        (EXPORT_WRITTEN, "Exported {count} links to {file}"),
        (UPDATE_AVAILABLE, "linkdeck {version} is available"),
    ];

    // Keys missing here fall back to English.
    let th = [
        (URL_MUST_BE_HTTPS, "URL ต้องขึ้นต้นด้วย https"),
        (GUEST_MODE, "โหมดผู้เยี่ยมชม: ลิงก์จะไม่ถูกบันทึก"),
        (
            GUEST_NO_STORE,
            "โหมดผู้เยี่ยมชมไม่มีลิงก์ที่บันทึกไว้ ตั้งชื่อผู้ใช้ด้วย --user หรือ LINKDECK_USER",
        ),
        (RECORD_ADDED, "เพิ่ม {name} แล้ว"),
        (RECORD_UPDATED, "แก้ไข {name} แล้ว"),
        (UPDATE_NOTHING, "ไม่มีอะไรให้แก้ไข"),
        (RECORD_DELETED, "ลบ {name} แล้ว"),
        (LIST_EMPTY, "ยังไม่มีลิงก์"),
        (LIST_NO_MATCH, "ไม่พบลิงก์ที่ตรงกัน"),
        (IMPORT_SUMMARY, "ใช้ได้ {valid} จาก {total} แถว"),
        (IMPORT_NONE_VALID, "ไม่มีแถวที่มี URL https ที่ถูกต้อง"),
        (IMPORT_COMMITTED, "นำเข้า {count} ลิงก์แล้ว"),
        (CARD_SAVED, "บันทึก {file} แล้ว"),
        (CARD_COPIED, "คัดลอกการ์ดแล้ว"),
        (CARD_SHARED, "แชร์ {file} แล้ว"),
        (CARD_PREVIEW, "เปิดตัวอย่าง {file} แล้ว"),
    ];

    HashMap::from([
        (Lang::En, en.into_iter().collect()),
        (Lang::Th, th.into_iter().collect()),
    ])
});

fn lookup(lang: Lang, key: &str) -> Option<&'static str> {
    MESSAGES.get(&lang).and_then(|table| table.get(key)).copied()
}

/// Looks up `key`: requested language, then English, then the key itself.
pub fn t(lang: Lang, key: &str) -> &str {
    lookup(lang, key)
        .or_else(|| lookup(Lang::BASE, key))
        .unwrap_or(key)
}

/// [`t`] with `{placeholder}` substitution.
pub fn tf(lang: Lang, key: &str, args: &[(&str, &dyn fmt::Display)]) -> String {
    let mut text = t(lang, key).to_string();
    for (name, value) in args {
        text = text.replace(&format!("{{{}}}", name), &value.to_string());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_language_wins() {
        assert_eq!(t(Lang::En, keys::LIST_EMPTY), "No links yet.");
        assert_eq!(t(Lang::Th, keys::LIST_EMPTY), "ยังไม่มีลิงก์");
    }

    #[test]
    fn test_missing_thai_falls_back_to_english() {
        assert_eq!(
            t(Lang::Th, keys::CARD_SINGLE_ONLY),
            t(Lang::En, keys::CARD_SINGLE_ONLY)
        );
    }

    #[test]
    fn test_unknown_key_is_returned_verbatim() {
        assert_eq!(t(Lang::Th, "no.such.key"), "no.such.key");
        assert_eq!(t(Lang::En, ""), "");
    }

    #[test]
    fn test_every_thai_key_exists_in_english() {
        for key in MESSAGES[&Lang::Th].keys() {
            assert!(lookup(Lang::En, key).is_some(), "{key}");
        }
    }

    #[test]
    fn test_placeholders_are_filled() {
        let text = tf(
            Lang::En,
            keys::IMPORT_SUMMARY,
            &[("valid", &2), ("total", &5)],
        );
        assert_eq!(text, "2 of 5 rows are valid");

        let text = tf(Lang::Th, keys::RECORD_ADDED, &[("name", &"ภาษา")]);
        assert_eq!(text, "เพิ่ม ภาษา แล้ว");
    }

    #[test]
    fn test_parse_lang() {
        assert_eq!("en".parse::<Lang>().unwrap(), Lang::En);
        assert_eq!("th_TH.UTF-8".parse::<Lang>().unwrap(), Lang::Th);
        assert_eq!("TH".parse::<Lang>().unwrap(), Lang::Th);
        assert!("fr".parse::<Lang>().is_err());
    }
}
