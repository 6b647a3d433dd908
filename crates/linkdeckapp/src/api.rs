//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every linkdeck client.
//!
//! ## Role and Responsibilities
//!
//! - **Dispatches** to the command functions
//! - **Parses selectors** from the strings a client collected
//! - **Guards guest mode**: without a user there is no store, and every record
//!   operation fails with the translated "guest mode" message
//! - **Publishes events** on the [`EventBus`] it owns after mutations
//!
//! It does no terminal I/O and holds no business logic.
//!
//! ## Events
//!
//! The facade keeps a store subscription for its user. After each mutation it
//! drains the snapshots that arrived and publishes one
//! [`AppEvent::RecordsChanged`] with the newest count. Imports additionally
//! publish [`AppEvent::ImportCommitted`], card actions one
//! [`AppEvent::CardExported`] per card. Entering guest mode publishes
//! [`AppEvent::GuestModeEntered`] from [`LinkDeckApi::new`], so clients should
//! subscribe to the bus before handing it over.
//!
//! ## Generic Over LinkStore
//!
//! `LinkDeckApi<S: LinkStore>`: `FileStore` in the CLI, `MemStore` in tests.

use crossbeam_channel::Receiver;
use std::path::Path;

use crate::commands::{self, cards, export, list, update};
use crate::error::{LinkDeckError, Result};
use crate::events::{AppEvent, EventBus};
use crate::i18n::{keys, t, Lang};
use crate::model::{LinkRecord, OrderBy, PreviewRow, UserScope};
use crate::store::LinkStore;

pub use crate::commands::cards::{CardAction, CardSettings};
pub use crate::commands::export::ExportFormat;
pub use crate::commands::list::LinkFilter;
pub use crate::commands::update::LinkUpdate;
pub use crate::commands::{CmdMessage, CmdResult, DisplayLink, LinkSelector, MessageLevel};

pub struct LinkDeckApi<S: LinkStore> {
    store: Option<S>,
    user: UserScope,
    lang: Lang,
    bus: EventBus,
    snapshots: Option<Receiver<Vec<LinkRecord>>>,
}

impl<S: LinkStore> LinkDeckApi<S> {
    /// A guest user, or no store at all, starts the session in guest mode.
    pub fn new(store: Option<S>, user: UserScope, lang: Lang, mut bus: EventBus) -> Result<Self> {
        let mut store = if user.is_guest() { None } else { store };
        let snapshots = match store.as_mut() {
            Some(store) => Some(store.subscribe(&user, OrderBy::CreatedDesc)?),
            None => {
                bus.publish(AppEvent::GuestModeEntered);
                None
            }
        };
        let api = Self {
            store,
            user,
            lang,
            bus,
            snapshots,
        };
        // The subscription's first snapshot is the starting state, not a change.
        api.latest_snapshot();
        Ok(api)
    }

    pub fn is_guest(&self) -> bool {
        self.store.is_none()
    }

    pub fn user(&self) -> &UserScope {
        &self.user
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn notify_update_available(&mut self, version: &str) {
        self.bus.publish(AppEvent::UpdateAvailable {
            version: version.to_string(),
        });
    }

    pub fn add_link(&mut self, name: &str, language: &str, url: &str) -> Result<CmdResult> {
        let store = require(self.store.as_mut(), self.lang)?;
        let result = commands::create::run(store, &self.user, self.lang, name, language, url)?;
        self.publish_changes();
        Ok(result)
    }

    pub fn edit_links<I: AsRef<str>>(
        &mut self,
        selectors: &[I],
        changes: &LinkUpdate,
    ) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        let store = require(self.store.as_mut(), self.lang)?;
        let result = update::run(store, &self.user, self.lang, &selectors, changes)?;
        self.publish_changes();
        Ok(result)
    }

    pub fn delete_links<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        let store = require(self.store.as_mut(), self.lang)?;
        let result = commands::delete::run(store, &self.user, self.lang, &selectors)?;
        self.publish_changes();
        Ok(result)
    }

    pub fn list_links(&self, order: OrderBy, filter: &LinkFilter) -> Result<CmdResult> {
        let store = require(self.store.as_ref(), self.lang)?;
        list::run(store, &self.user, self.lang, order, filter)
    }

    pub fn languages(&self) -> Result<CmdResult> {
        let store = require(self.store.as_ref(), self.lang)?;
        list::languages(store, &self.user)
    }

    /// Parses import text. Needs no store, so it works in guest mode.
    pub fn import_preview(&self, raw: &str, filename_hint: Option<&str>) -> CmdResult {
        commands::import::preview(raw, filename_hint, self.lang)
    }

    pub fn import_commit(&mut self, rows: &[PreviewRow]) -> Result<CmdResult> {
        let store = require(self.store.as_mut(), self.lang)?;
        let committed = commands::import::commit(store, &self.user, self.lang, rows);
        // Rows written before a failure are still published.
        self.publish_changes();
        let result = committed?;
        if !result.affected_links.is_empty() {
            self.bus.publish(AppEvent::ImportCommitted {
                created: result.affected_links.len(),
            });
        }
        Ok(result)
    }

    pub fn export_links<I: AsRef<str>>(
        &self,
        format: ExportFormat,
        selectors: &[I],
        destination: Option<&Path>,
    ) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        let store = require(self.store.as_ref(), self.lang)?;
        export::run(store, &self.user, self.lang, format, &selectors, destination)
    }

    pub fn export_cards<I: AsRef<str>>(
        &mut self,
        settings: &CardSettings,
        selectors: &[I],
        action: CardAction,
    ) -> Result<CmdResult> {
        let selectors = parse_selectors(selectors)?;
        let store = require(self.store.as_ref(), self.lang)?;
        let result = cards::export(store, &self.user, self.lang, settings, &selectors, action)?;
        self.publish_cards(&result);
        Ok(result)
    }

    /// Renders a card for a title and URL that are not stored. Works in guest mode.
    pub fn render_card(
        &mut self,
        settings: &CardSettings,
        title: &str,
        url: &str,
        action: CardAction,
    ) -> Result<CmdResult> {
        let result = cards::render_adhoc(self.lang, settings, title, url, action)?;
        self.publish_cards(&result);
        Ok(result)
    }

    fn latest_snapshot(&self) -> Option<Vec<LinkRecord>> {
        self.snapshots.as_ref()?.try_iter().last()
    }

    fn publish_changes(&mut self) {
        if let Some(records) = self.latest_snapshot() {
            self.bus.publish(AppEvent::RecordsChanged {
                count: records.len(),
            });
        }
    }

    fn publish_cards(&mut self, result: &CmdResult) {
        for file_name in &result.exported_cards {
            self.bus.publish(AppEvent::CardExported {
                file_name: file_name.clone(),
            });
        }
    }
}

fn require<T>(store: Option<T>, lang: Lang) -> Result<T> {
    store.ok_or_else(|| LinkDeckError::Api(t(lang, keys::GUEST_NO_STORE).to_string()))
}

/// Parses every input as a selector. A selector given twice is kept once, in
/// first position.
pub fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<LinkSelector>> {
    let mut selectors: Vec<LinkSelector> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let selector: LinkSelector = input.as_ref().parse()?;
        if !selectors.contains(&selector) {
            selectors.push(selector);
        }
    }
    Ok(selectors)
}
