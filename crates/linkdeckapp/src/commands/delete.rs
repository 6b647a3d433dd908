use crate::commands::{CmdMessage, CmdResult, LinkSelector};
use crate::error::Result;
use crate::i18n::{keys, tf, Lang};
use crate::model::UserScope;
use crate::store::LinkStore;

use super::helpers::resolve_selectors;

pub fn run<S: LinkStore>(
    store: &mut S,
    user: &UserScope,
    lang: Lang,
    selectors: &[LinkSelector],
) -> Result<CmdResult> {
    // Resolve everything first: deleting shifts the indexes of later links.
    let resolved = resolve_selectors(store, user, selectors)?;
    let mut result = CmdResult::default();

    for link in resolved {
        store.delete_record(user, link.record.id)?;
        result.add_message(CmdMessage::success(tf(
            lang,
            keys::RECORD_DELETED,
            &[("name", &link.record.display_name())],
        )));
        result.affected_links.push(link);
    }

    Ok(result)
}
