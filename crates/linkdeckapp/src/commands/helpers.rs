use super::{DisplayLink, LinkSelector};
use crate::error::{LinkDeckError, Result};
use crate::i18n::{t, Lang};
use crate::model::{LinkRecord, OrderBy, UserScope};
use crate::normalize::strict_normalize;
use crate::store::LinkStore;

/// Every link of `user`, newest first, with its display index.
pub fn indexed_links<S: LinkStore>(store: &S, user: &UserScope) -> Result<Vec<DisplayLink>> {
    let records = store.list_records(user, OrderBy::CreatedDesc)?;
    Ok(index_records(records))
}

pub fn index_records(records: Vec<LinkRecord>) -> Vec<DisplayLink> {
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| DisplayLink {
            index: i + 1,
            record,
        })
        .collect()
}

/// Resolves selectors in the order given. A link selected twice is returned once.
pub fn resolve_selectors<S: LinkStore>(
    store: &S,
    user: &UserScope,
    selectors: &[LinkSelector],
) -> Result<Vec<DisplayLink>> {
    let links = indexed_links(store, user)?;
    let mut resolved: Vec<DisplayLink> = Vec::new();

    for selector in selectors {
        let link = match selector {
            LinkSelector::Index(n) => links
                .iter()
                .find(|l| l.index == *n)
                .ok_or_else(|| LinkDeckError::Api(format!("Index {} not found", n)))?,
            LinkSelector::Id(prefix) => {
                let matches: Vec<&DisplayLink> = links
                    .iter()
                    .filter(|l| l.record.id.to_string().starts_with(prefix.as_str()))
                    .collect();
                match matches.as_slice() {
                    [one] => *one,
                    [] => {
                        return Err(LinkDeckError::Api(format!(
                            "No link with id {}",
                            prefix
                        )))
                    }
                    _ => {
                        return Err(LinkDeckError::Api(format!(
                            "Id {} matches {} links, use more characters",
                            prefix,
                            matches.len()
                        )))
                    }
                }
            }
        };
        if !resolved.iter().any(|r| r.record.id == link.record.id) {
            resolved.push(link.clone());
        }
    }

    Ok(resolved)
}

/// Runs a URL through strict normalization, or returns the translated refusal.
pub fn validate_url(raw: &str, lang: Lang) -> std::result::Result<String, String> {
    strict_normalize(raw)
        .ok_or_else(|| format!("{}: {}", t(lang, crate::i18n::keys::URL_MUST_BE_HTTPS), raw.trim()))
}
