//! # Linkdeck Architecture
//!
//! Linkdeck keeps a user's links (a name, a free-text language label and an
//! HTTPS URL) and turns each of them into a printable QR **card**. This crate is
//! the UI-agnostic core; the `linkdeck` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client (the linkdeck CLI, or anything else)                │
//! │  - Parses arguments, prints, owns the EventBus receivers    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade, resolves selectors, publishes events        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic returning structured `CmdResult`s         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - `LinkStore` trait: FileStore, MemStore                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Two Pipelines
//!
//! Import: raw text → [`parse`] → `Vec<PreviewRow>` (each URL run through
//! [`normalize::strict_normalize`]) → user confirms → `commands::import::commit`
//! → store.
//!
//! Cards: a record → [`card::render`] (which calls [`qr::encode`]) → an owned
//! [`card::Surface`] → one of the four [`exporter`] actions.
//!
//! The pipelines share the `name`/`language`/`url` shape and nothing else.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade every client talks to
//! - [`commands`]: Business logic per operation
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: `LinkRecord`, `PreviewRow`, `UserScope`
//! - [`normalize`]: Strict and cosmetic URL normalization
//! - [`parse`]: CSV/TSV/JSON import parsing
//! - [`qr`]: QR matrix rendering
//! - [`card`]: Card layout and rendering
//! - [`exporter`]: Download, clipboard, share and preview of rendered cards
//! - [`capability`]: Platform helper probing
//! - [`clipboard`]: Image clipboard helpers per OS
//! - [`events`]: Typed event bus
//! - [`i18n`]: English/Thai message table
//! - [`config`]: Layered configuration
//! - [`error`]: Error types

pub mod api;
pub mod capability;
pub mod card;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod exporter;
pub mod i18n;
pub mod model;
pub mod normalize;
pub mod parse;
pub mod qr;
pub mod store;
