use std::collections::{BTreeMap, HashMap};

use crate::commands::{CmdMessage, CmdResult, DisplayLink, LanguageCount};
use crate::error::Result;
use crate::i18n::{keys, t, Lang};
use crate::model::{OrderBy, RecordId, UserScope};
use crate::store::LinkStore;

use super::helpers::indexed_links;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkFilter {
    /// Case-insensitive substring of name, language or url.
    pub search: Option<String>,
    /// Case-insensitive exact language label.
    pub language: Option<String>,
}

impl LinkFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.language.is_none()
    }

    pub fn matches(&self, link: &DisplayLink) -> bool {
        let record = &link.record;
        let language_ok = self
            .language
            .as_deref()
            .is_none_or(|lang| record.language.trim().to_lowercase() == lang.trim().to_lowercase());
        let search_ok = self.search.as_deref().is_none_or(|term| {
            let term = term.to_lowercase();
            [&record.name, &record.language, &record.url]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
        });
        language_ok && search_ok
    }
}

pub fn run<S: LinkStore>(
    store: &S,
    user: &UserScope,
    lang: Lang,
    order: OrderBy,
    filter: &LinkFilter,
) -> Result<CmdResult> {
    // Indexes come from the newest-first list; `order` only changes presentation.
    let index_of: HashMap<RecordId, usize> = indexed_links(store, user)?
        .into_iter()
        .map(|link| (link.record.id, link.index))
        .collect();
    let sorted: Vec<DisplayLink> = store
        .list_records(user, order)?
        .into_iter()
        .filter_map(|record| {
            index_of
                .get(&record.id)
                .map(|&index| DisplayLink { index, record })
        })
        .filter(|link| filter.matches(link))
        .collect();

    let mut result = CmdResult::default();
    if sorted.is_empty() {
        let key = if filter.is_empty() {
            keys::LIST_EMPTY
        } else {
            keys::LIST_NO_MATCH
        };
        result.add_message(CmdMessage::info(t(lang, key)));
    }
    Ok(result.with_listed_links(sorted))
}

/// Distinct language labels with their link counts, sorted by label.
/// Labels are grouped case-insensitively and shown as first written.
pub fn languages<S: LinkStore>(store: &S, user: &UserScope) -> Result<CmdResult> {
    let records = store.list_records(user, OrderBy::CreatedAsc)?;
    let mut groups: BTreeMap<String, LanguageCount> = BTreeMap::new();
    for record in records {
        let label = record.language.trim();
        groups
            .entry(label.to_lowercase())
            .or_insert_with(|| LanguageCount {
                language: label.to_string(),
                count: 0,
            })
            .count += 1;
    }

    Ok(CmdResult {
        languages: groups.into_values().collect(),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    fn names(result: &CmdResult) -> Vec<&str> {
        result
            .listed_links
            .iter()
            .map(|l| l.record.name.as_str())
            .collect()
    }

    #[test]
    fn test_lists_newest_first_by_default() {
        let fixture = StoreFixture::new().with_links(3);
        let result = run(
            &fixture.store,
            &fixture.user,
            Lang::En,
            OrderBy::default(),
            &LinkFilter::default(),
        )
        .unwrap();
        assert_eq!(names(&result), vec!["Link 3", "Link 2", "Link 1"]);
        assert!(result.messages.is_empty());
    }

    #[test]
    fn test_order_keeps_canonical_indexes() {
        let fixture = StoreFixture::new()
            .with_link("b", "", "https://b.test/")
            .with_link("a", "", "https://a.test/")
            .with_link("c", "", "https://c.test/");
        let result = run(
            &fixture.store,
            &fixture.user,
            Lang::En,
            OrderBy::Name,
            &LinkFilter::default(),
        )
        .unwrap();
        assert_eq!(names(&result), vec!["a", "b", "c"]);
        let indexes: Vec<usize> = result.listed_links.iter().map(|l| l.index).collect();
        assert_eq!(indexes, vec![2, 3, 1]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_all_fields() {
        let fixture = StoreFixture::new()
            .with_link("Thai Lessons", "Thai", "https://learn.test/")
            .with_link("News", "English", "https://news.test/THAI")
            .with_link("Other", "English", "https://other.test/");
        let filter = LinkFilter {
            search: Some("thai".to_string()),
            ..Default::default()
        };
        let result = run(&fixture.store, &fixture.user, Lang::En, OrderBy::CreatedAsc, &filter).unwrap();
        assert_eq!(names(&result), vec!["Thai Lessons", "News"]);
        assert_eq!(result.listed_links[1].index, 2);
    }

    #[test]
    fn test_language_filter_is_exact() {
        let fixture = StoreFixture::new()
            .with_link("A", "Thai", "https://a.test/")
            .with_link("B", "Thai (formal)", "https://b.test/");
        let filter = LinkFilter {
            language: Some("thai".to_string()),
            ..Default::default()
        };
        let result = run(&fixture.store, &fixture.user, Lang::En, OrderBy::default(), &filter).unwrap();
        assert_eq!(names(&result), vec!["A"]);
    }

    #[test]
    fn test_empty_messages() {
        let fixture = StoreFixture::new();
        let result = run(
            &fixture.store,
            &fixture.user,
            Lang::En,
            OrderBy::default(),
            &LinkFilter::default(),
        )
        .unwrap();
        assert_eq!(result.messages[0].content, "No links yet.");

        let fixture = fixture.with_links(1);
        let filter = LinkFilter {
            search: Some("zzz".to_string()),
            ..Default::default()
        };
        let result = run(&fixture.store, &fixture.user, Lang::En, OrderBy::default(), &filter).unwrap();
        assert_eq!(result.messages[0].content, "No links match.");
    }

    #[test]
    fn test_languages_group_case_insensitively() {
        let fixture = StoreFixture::new()
            .with_link("A", "Thai", "https://a.test/")
            .with_link("B", "thai", "https://b.test/")
            .with_link("C", "English", "https://c.test/");
        let result = languages(&fixture.store, &fixture.user).unwrap();
        assert_eq!(
            result.languages,
            vec![
                LanguageCount {
                    language: "English".to_string(),
                    count: 1
                },
                LanguageCount {
                    language: "Thai".to_string(),
                    count: 2
                },
            ]
        );
    }
}
