use crate::commands::{CmdMessage, CmdResult, LinkSelector};
use crate::error::Result;
use crate::i18n::{keys, t, tf, Lang};
use crate::model::{LinkFields, UserScope};
use crate::store::LinkStore;

use super::helpers::{resolve_selectors, validate_url};

/// Fields to change; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkUpdate {
    pub name: Option<String>,
    pub language: Option<String>,
    pub url: Option<String>,
}

impl LinkUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.language.is_none() && self.url.is_none()
    }
}

/// Applies the same update to every selected link. A new URL is validated once,
/// before anything is written.
pub fn run<S: LinkStore>(
    store: &mut S,
    user: &UserScope,
    lang: Lang,
    selectors: &[LinkSelector],
    update: &LinkUpdate,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if update.is_empty() {
        result.add_message(CmdMessage::warning(t(lang, keys::UPDATE_NOTHING)));
        return Ok(result);
    }

    let url = match update.url.as_deref().map(|raw| validate_url(raw, lang)) {
        Some(Err(message)) => {
            result.add_message(CmdMessage::error(message));
            return Ok(result);
        }
        Some(Ok(url)) => Some(url),
        None => None,
    };

    for mut link in resolve_selectors(store, user, selectors)? {
        let mut fields = LinkFields::from(&link.record);
        if let Some(name) = &update.name {
            fields.name = name.trim().to_string();
        }
        if let Some(language) = &update.language {
            fields.language = language.trim().to_string();
        }
        if let Some(url) = &url {
            fields.url = url.clone();
        }

        store.update_record(user, link.record.id, fields.clone())?;
        link.record.apply(fields);
        result.add_message(CmdMessage::success(tf(
            lang,
            keys::RECORD_UPDATED,
            &[("name", &link.record.display_name())],
        )));
        result.affected_links.push(link);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderBy;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let mut fixture = StoreFixture::new().with_link("Old", "Thai", "https://old.test/");
        let update = LinkUpdate {
            name: Some("New".to_string()),
            ..Default::default()
        };
        let result = run(
            &mut fixture.store,
            &fixture.user,
            Lang::En,
            &[LinkSelector::Index(1)],
            &update,
        )
        .unwrap();
        assert_eq!(result.messages[0].content, "Updated New");

        let records = fixture.store.list_records(&fixture.user, OrderBy::default()).unwrap();
        assert_eq!(records[0].name, "New");
        assert_eq!(records[0].language, "Thai");
        assert_eq!(records[0].url, "https://old.test/");
    }

    #[test]
    fn test_url_is_revalidated() {
        let mut fixture = StoreFixture::new().with_link("A", "", "https://a.test/");
        let update = LinkUpdate {
            url: Some("http://a.test".to_string()),
            ..Default::default()
        };
        let result = run(
            &mut fixture.store,
            &fixture.user,
            Lang::En,
            &[LinkSelector::Index(1)],
            &update,
        )
        .unwrap();
        assert!(result.has_errors());
        let records = fixture.store.list_records(&fixture.user, OrderBy::default()).unwrap();
        assert_eq!(records[0].url, "https://a.test/");

        let update = LinkUpdate {
            url: Some("b.test/path".to_string()),
            ..Default::default()
        };
        run(
            &mut fixture.store,
            &fixture.user,
            Lang::En,
            &[LinkSelector::Index(1)],
            &update,
        )
        .unwrap();
        let records = fixture.store.list_records(&fixture.user, OrderBy::default()).unwrap();
        assert_eq!(records[0].url, "https://b.test/path");
    }

    #[test]
    fn test_empty_update_is_a_warning() {
        let mut fixture = StoreFixture::new().with_links(1);
        let result = run(
            &mut fixture.store,
            &fixture.user,
            Lang::En,
            &[LinkSelector::Index(1)],
            &LinkUpdate::default(),
        )
        .unwrap();
        assert!(!result.has_errors());
        assert!(result.affected_links.is_empty());
        assert_eq!(result.messages[0].content, "Nothing to change");
    }

    #[test]
    fn test_empty_update_warning_is_translated() {
        let mut fixture = StoreFixture::new().with_links(1);
        let result = run(
            &mut fixture.store,
            &fixture.user,
            Lang::Th,
            &[LinkSelector::Index(1)],
            &LinkUpdate::default(),
        )
        .unwrap();
        assert_eq!(result.messages[0].content, "ไม่มีอะไรให้แก้ไข");
    }
}
