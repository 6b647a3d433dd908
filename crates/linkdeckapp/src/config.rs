//! # Configuration
//!
//! Linkdeck configuration is managed by [`confique`], layered in priority order:
//!
//! 1. **Environment variables**: `LINKDECK_USER`, `LINKDECK_LANG`, `LINKDECK_FONT`, ...
//! 2. **Config file**: `linkdeck.toml` in the data directory.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! The data directory itself is not a setting here: it is where the file
//! lives, so the client resolves it first (`LINKDECK_DATA_DIR` or the OS data
//! dir) and passes it to [`LinkDeckConfig::load`].
//!
//! ## Available Settings
//!
//! | Key | Env | Default |
//! |-----|-----|---------|
//! | `user` | `LINKDECK_USER` | `guest` (guest mode, nothing saved) |
//! | `lang` | `LINKDECK_LANG` | `en` |
//! | `output_dir` | `LINKDECK_OUTPUT_DIR` | `.` |
//! | `share_command` | `LINKDECK_SHARE_COMMAND` | unset |
//! | `card.size` | `LINKDECK_CARD_SIZE` | `medium` |
//! | `card.orientation` | `LINKDECK_CARD_ORIENTATION` | `portrait` |
//! | `card.font` | `LINKDECK_FONT` | `sans-serif` |
//! | `card.background` | `LINKDECK_CARD_BACKGROUND` | `#ffffff` |
//! | `card.title_color` | `LINKDECK_CARD_TITLE_COLOR` | `#111111` |
//! | `card.url_color` | `LINKDECK_CARD_URL_COLOR` | `#444444` |
//! | `card.pixel_ratio` | `LINKDECK_PIXEL_RATIO` | `1.0` |
//!
//! Values are kept as written and checked when used, so a typo in a color
//! only breaks card rendering, not `linkdeck list`.

use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::card::{CardRenderOptions, CardSize, CardTheme, Orientation, Rgb};
use crate::error::Result;
use crate::i18n::Lang;
use crate::model::UserScope;

pub const CONFIG_FILE: &str = "linkdeck.toml";

/// Configuration for linkdeck, stored in `linkdeck.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LinkDeckConfig {
    /// User whose links are used. "guest" keeps nothing.
    #[config(env = "LINKDECK_USER", default = "guest")]
    pub user: String,

    /// Message language: "en" or "th".
    #[config(env = "LINKDECK_LANG", default = "en")]
    pub lang: String,

    /// Directory that downloaded cards and exports are written to.
    #[config(env = "LINKDECK_OUTPUT_DIR", default = ".")]
    pub output_dir: PathBuf,

    /// Command used to share a card, e.g. "kdeconnect-cli --share {file}".
    #[config(env = "LINKDECK_SHARE_COMMAND")]
    pub share_command: Option<String>,

    #[config(nested)]
    pub card: CardConfig,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CardConfig {
    /// small (600x900), medium (900x1350) or large (1200x1800).
    #[config(env = "LINKDECK_CARD_SIZE", default = "medium")]
    pub size: String,

    /// portrait or landscape.
    #[config(env = "LINKDECK_CARD_ORIENTATION", default = "portrait")]
    pub orientation: String,

    /// Font family: a system family name, sans-serif, serif, monospace or builtin.
    #[config(env = "LINKDECK_FONT", default = "sans-serif")]
    pub font: String,

    #[config(env = "LINKDECK_CARD_BACKGROUND", default = "#ffffff")]
    pub background: String,

    #[config(env = "LINKDECK_CARD_TITLE_COLOR", default = "#111111")]
    pub title_color: String,

    #[config(env = "LINKDECK_CARD_URL_COLOR", default = "#444444")]
    pub url_color: String,

    /// Backing-image scale, clamped to 1.0..=2.0.
    #[config(env = "LINKDECK_PIXEL_RATIO", default = 1.0)]
    pub pixel_ratio: f32,
}

impl Default for LinkDeckConfig {
    fn default() -> Self {
        Self {
            user: crate::model::GUEST_USER.to_string(),
            lang: "en".to_string(),
            output_dir: PathBuf::from("."),
            share_command: None,
            card: CardConfig::default(),
        }
    }
}

impl Default for CardConfig {
    fn default() -> Self {
        let theme = CardTheme::default();
        Self {
            size: CardSize::default().to_string(),
            orientation: Orientation::default().to_string(),
            font: theme.font,
            background: theme.background.to_string(),
            title_color: theme.title_color.to_string(),
            url_color: theme.url_color.to_string(),
            pixel_ratio: 1.0,
        }
    }
}

impl LinkDeckConfig {
    /// Environment, then `<data_dir>/linkdeck.toml`, then defaults. A missing file is fine.
    pub fn load(data_dir: &Path) -> Result<Self> {
        Ok(Self::builder()
            .env()
            .file(data_dir.join(CONFIG_FILE))
            .load()?)
    }

    /// File and defaults only, ignoring the environment.
    pub fn load_file(path: &Path) -> Result<Self> {
        Ok(Self::builder().file(path).load()?)
    }

    /// A commented `linkdeck.toml` listing every setting with its default.
    pub fn template() -> String {
        confique::toml::template::<Self>(confique::toml::FormatOptions::default())
    }

    pub fn lang(&self) -> Result<Lang> {
        self.lang.parse()
    }

    pub fn user_scope(&self) -> Result<UserScope> {
        UserScope::new(&self.user)
    }

    pub fn card_theme(&self) -> Result<CardTheme> {
        Ok(CardTheme {
            background: self.card.background.parse::<Rgb>()?,
            title_color: self.card.title_color.parse::<Rgb>()?,
            url_color: self.card.url_color.parse::<Rgb>()?,
            font: self.card.font.clone(),
        })
    }

    /// Render options for one card, with every card setting applied.
    pub fn card_options(&self, title: &str, url: &str) -> Result<CardRenderOptions> {
        Ok(CardRenderOptions::new(title, url)
            .with_size(self.card.size.parse()?)
            .with_orientation(self.card.orientation.parse()?)
            .with_theme(self.card_theme()?)
            .with_pixel_ratio(self.card.pixel_ratio))
    }

    /// Every setting as `(key, value)`, in file order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("user", self.user.clone()),
            ("lang", self.lang.clone()),
            ("output_dir", self.output_dir.display().to_string()),
            (
                "share_command",
                self.share_command.clone().unwrap_or_default(),
            ),
            ("card.size", self.card.size.clone()),
            ("card.orientation", self.card.orientation.clone()),
            ("card.font", self.card.font.clone()),
            ("card.background", self.card.background.clone()),
            ("card.title_color", self.card.title_color.clone()),
            ("card.url_color", self.card.url_color.clone()),
            ("card.pixel_ratio", self.card.pixel_ratio.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LinkDeckError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_default_impl() {
        let dir = tempdir().unwrap();
        let config = LinkDeckConfig::load_file(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, LinkDeckConfig::default());
        assert!(config.user_scope().unwrap().is_guest());
        assert_eq!(config.lang().unwrap(), Lang::En);
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "user = \"alice\"\nlang = \"th\"\n\n[card]\nsize = \"large\"\norientation = \"landscape\"\npixel_ratio = 3.0\n",
        )
        .unwrap();

        let config = LinkDeckConfig::load_file(&path).unwrap();
        assert_eq!(config.user, "alice");
        assert_eq!(config.lang().unwrap(), Lang::Th);
        assert_eq!(config.card.font, "sans-serif");

        let opts = config.card_options("T", "a.test").unwrap();
        assert_eq!(opts.dimensions(), (1800, 1200));
        assert_eq!(opts.pixel_ratio(), 2.0);
    }

    #[test]
    fn test_bad_color_fails_only_card_options() {
        let config = LinkDeckConfig {
            card: CardConfig {
                background: "white".to_string(),
                ..CardConfig::default()
            },
            ..LinkDeckConfig::default()
        };
        assert!(config.user_scope().is_ok());
        assert!(matches!(
            config.card_options("", ""),
            Err(LinkDeckError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "user = [").unwrap();
        assert!(matches!(
            LinkDeckConfig::load_file(&path),
            Err(LinkDeckError::Config(_))
        ));
    }

    #[test]
    fn test_template_mentions_every_section() {
        let template = LinkDeckConfig::template();
        assert!(template.contains("[card]"));
        assert!(template.contains("share_command"));
        assert!(template.contains("pixel_ratio"));
    }

    #[test]
    fn test_entries_cover_all_settings() {
        let entries = LinkDeckConfig::default().entries();
        assert_eq!(entries.len(), 11);
        assert!(entries.contains(&("card.url_color", "#444444".to_string())));
    }
}
