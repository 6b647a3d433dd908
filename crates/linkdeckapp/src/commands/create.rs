use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::i18n::{keys, tf, Lang};
use crate::model::{LinkFields, UserScope};
use crate::store::LinkStore;

use super::helpers::{indexed_links, validate_url};

/// Adds one link. A URL that is not https is refused with an error message and
/// nothing is written.
pub fn run<S: LinkStore>(
    store: &mut S,
    user: &UserScope,
    lang: Lang,
    name: &str,
    language: &str,
    url: &str,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let url = match validate_url(url, lang) {
        Ok(url) => url,
        Err(message) => {
            result.add_message(CmdMessage::error(message));
            return Ok(result);
        }
    };

    let fields = LinkFields::new(name.trim(), language.trim(), url);
    let id = store.create_record(user, fields)?;

    if let Some(link) = indexed_links(store, user)?
        .into_iter()
        .find(|l| l.record.id == id)
    {
        result.add_message(CmdMessage::success(tf(
            lang,
            keys::RECORD_ADDED,
            &[("name", &link.record.display_name())],
        )));
        result.affected_links.push(link);
    }
    Ok(result)
}
