//! Import: parse into a preview first, commit the valid rows second.
//!
//! The two steps are separate calls so a client can show the preview and ask
//! before anything is written. A commit is not atomic: it stops at the first
//! store error and the links created before it stay.

use tracing::info;

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::i18n::{keys, t, tf, Lang};
use crate::model::{LinkFields, PreviewRow, UserScope};
use crate::parse::parse;
use crate::store::LinkStore;

use super::helpers::indexed_links;

/// Parses `raw` into preview rows. `filename_hint` is the source file name, if any.
pub fn preview(raw: &str, filename_hint: Option<&str>, lang: Lang) -> CmdResult {
    let outcome = parse(raw, filename_hint);
    let mut result = CmdResult::default();

    if let Some(error) = &outcome.error {
        result.add_message(CmdMessage::error(tf(
            lang,
            keys::IMPORT_PARSE_FAILED,
            &[("error", error)],
        )));
        return result;
    }

    let valid = outcome.valid_count();
    let summary = tf(
        lang,
        keys::IMPORT_SUMMARY,
        &[("valid", &valid), ("total", &outcome.rows.len())],
    );
    result.add_message(if valid == 0 {
        CmdMessage::warning(summary)
    } else {
        CmdMessage::info(summary)
    });
    result.preview_rows = outcome
        .rows
        .into_iter()
        .map(|row| row.localized(lang))
        .collect();
    result
}

/// Creates one link per valid row, in row order. Rows without a name are
/// named after their raw URL text.
pub fn commit<S: LinkStore>(
    store: &mut S,
    user: &UserScope,
    lang: Lang,
    rows: &[PreviewRow],
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let valid: Vec<(&PreviewRow, &str)> = rows
        .iter()
        .filter_map(|row| row.url_https.as_deref().map(|url| (row, url)))
        .collect();

    if valid.is_empty() {
        result.add_message(CmdMessage::error(t(lang, keys::IMPORT_NONE_VALID)));
        return Ok(result);
    }

    let mut created = Vec::with_capacity(valid.len());
    for (row, url) in valid {
        let name = match row.name.trim() {
            "" => row.url_raw.trim(),
            name => name,
        };
        let fields = LinkFields::new(name, row.language.trim(), url);
        created.push(store.create_record(user, fields)?);
    }
    info!(user = %user, created = created.len(), "import committed");

    result.affected_links = indexed_links(store, user)?
        .into_iter()
        .filter(|link| created.contains(&link.record.id))
        .collect();
    result.add_message(CmdMessage::success(tf(
        lang,
        keys::IMPORT_COMMITTED,
        &[("count", &created.len())],
    )));
    Ok(result)
}
