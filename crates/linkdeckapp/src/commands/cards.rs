//! Card commands: render one card per link and run one export action on it.
//!
//! `download` accepts any number of links and saves them one after another.
//! `copy`, `share` and `preview` work on exactly one link. A failed copy or
//! share is reported as a message that points to `download`; only store and
//! file system failures become `Err`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

use crate::capability::{probe_opener, Capability};
use crate::card::font::FontFace;
use crate::card::{render_with_face, CardRenderOptions};
use crate::commands::{CmdMessage, CmdResult, LinkSelector};
use crate::config::LinkDeckConfig;
use crate::error::{LinkDeckError, Result};
use crate::exporter::{self, CardArtifact};
use crate::i18n::{keys, t, tf, Lang};
use crate::model::UserScope;
use crate::store::LinkStore;

use super::helpers::{resolve_selectors, validate_url};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardAction {
    #[default]
    Download,
    Copy,
    Share,
    Preview,
}

impl CardAction {
    pub fn allows_batch(self) -> bool {
        self == CardAction::Download
    }
}

impl FromStr for CardAction {
    type Err = LinkDeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "download" | "save" => Ok(CardAction::Download),
            "copy" | "clipboard" => Ok(CardAction::Copy),
            "share" => Ok(CardAction::Share),
            "preview" | "open" => Ok(CardAction::Preview),
            other => Err(LinkDeckError::InvalidValue(format!(
                "unknown card action: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for CardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CardAction::Download => "download",
            CardAction::Copy => "copy",
            CardAction::Share => "share",
            CardAction::Preview => "preview",
        })
    }
}

/// How cards look and where their files go. Title and url of `template` are
/// replaced per card.
#[derive(Debug, Clone)]
pub struct CardSettings {
    pub template: CardRenderOptions,
    pub output_dir: PathBuf,
    pub share_command: Option<String>,
    /// When false the preview page is written but no viewer is started.
    pub open_preview: bool,
}

impl CardSettings {
    pub fn from_config(config: &LinkDeckConfig) -> Result<Self> {
        Ok(Self {
            template: config.card_options("", "")?,
            output_dir: config.output_dir.clone(),
            share_command: config.share_command.clone(),
            open_preview: true,
        })
    }

    fn options_for(&self, title: &str, url: &str) -> CardRenderOptions {
        let mut opts = self.template.clone();
        opts.title = title.to_string();
        opts.url = url.to_string();
        opts
    }
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            template: CardRenderOptions::new("", ""),
            output_dir: PathBuf::from("."),
            share_command: None,
            open_preview: true,
        }
    }
}

struct CardSource {
    title: String,
    url: String,
}

/// Renders cards for the selected links and applies `action` to them.
pub fn export<S: LinkStore>(
    store: &S,
    user: &UserScope,
    lang: Lang,
    settings: &CardSettings,
    selectors: &[LinkSelector],
    action: CardAction,
) -> Result<CmdResult> {
    let links = resolve_selectors(store, user, selectors)?;
    let sources = links
        .into_iter()
        .map(|link| CardSource {
            title: link.record.name,
            url: link.record.url,
        })
        .collect();
    run(lang, settings, sources, action)
}

/// Renders a card for a title and URL that are not stored anywhere.
/// Works in guest mode. The URL must pass strict normalization.
pub fn render_adhoc(
    lang: Lang,
    settings: &CardSettings,
    title: &str,
    url: &str,
    action: CardAction,
) -> Result<CmdResult> {
    let url = match validate_url(url, lang) {
        Ok(url) => url,
        Err(message) => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::error(message));
            return Ok(result);
        }
    };
    let source = CardSource {
        title: title.trim().to_string(),
        url,
    };
    run(lang, settings, vec![source], action)
}

fn run(
    lang: Lang,
    settings: &CardSettings,
    sources: Vec<CardSource>,
    action: CardAction,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if !action.allows_batch() && sources.len() != 1 {
        result.add_message(CmdMessage::error(t(lang, keys::CARD_SINGLE_ONLY)));
        return Ok(result);
    }

    // One face for the whole batch; every card still gets its own surface.
    let face = FontFace::load(&settings.template.theme.font);
    for source in sources {
        let opts = settings.options_for(&source.title, &source.url);
        let surface = render_with_face(&opts, &face);
        let artifact = CardArtifact::from_surface(&surface, &source.title, &source.url)?;
        debug!(file = %artifact.file_name, %action, bytes = artifact.png.len(), "card rendered");
        apply(lang, settings, &artifact, action, &mut result)?;
    }
    Ok(result)
}

fn apply(
    lang: Lang,
    settings: &CardSettings,
    artifact: &CardArtifact,
    action: CardAction,
    result: &mut CmdResult,
) -> Result<()> {
    match action {
        CardAction::Download => {
            let path = exporter::download(artifact, &settings.output_dir)?;
            result.add_message(CmdMessage::success(tf(
                lang,
                keys::CARD_SAVED,
                &[("file", &path.display())],
            )));
            result.exported_cards.push(file_name_of(&path));
            result.written_paths.push(path);
        }
        CardAction::Copy => match exporter::copy_to_clipboard(artifact) {
            Ok(()) => {
                result.add_message(CmdMessage::success(t(lang, keys::CARD_COPIED)));
                result.exported_cards.push(artifact.file_name.clone());
            }
            Err(LinkDeckError::ClipboardUnsupported) => {
                result.add_message(CmdMessage::error(t(lang, keys::CARD_COPY_UNSUPPORTED)));
            }
            Err(e) => return Err(e),
        },
        CardAction::Share => {
            if exporter::share(artifact, settings.share_command.as_deref()) {
                result.add_message(CmdMessage::success(tf(
                    lang,
                    keys::CARD_SHARED,
                    &[("file", &artifact.file_name)],
                )));
                result.exported_cards.push(artifact.file_name.clone());
            } else {
                result.add_message(CmdMessage::warning(t(lang, keys::CARD_SHARE_FAILED)));
            }
        }
        CardAction::Preview => {
            let opener = if settings.open_preview {
                probe_opener()
            } else {
                Capability::Unsupported("opening previews is turned off".to_string())
            };
            let path = exporter::preview_with(artifact, &opener)?;
            result.add_message(CmdMessage::info(tf(
                lang,
                keys::CARD_PREVIEW,
                &[("file", &path.display())],
            )));
            result.written_paths.push(path);
        }
    }
    Ok(())
}

fn file_name_of(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::font::BUILTIN_FAMILY;
    use crate::card::{CardSize, CardTheme};
    use crate::commands::MessageLevel;
    use crate::store::memory::fixtures::StoreFixture;
    use tempfile::TempDir;

    fn settings(dir: &TempDir) -> CardSettings {
        CardSettings {
            template: CardRenderOptions::new("", "")
                .with_size(CardSize::Small)
                .with_theme(CardTheme {
                    font: BUILTIN_FAMILY.to_string(),
                    ..CardTheme::default()
                }),
            output_dir: dir.path().to_path_buf(),
            share_command: Some("linkdeck-no-such-helper-3b1f".to_string()),
            open_preview: false,
        }
    }

    fn png_size(path: &std::path::Path) -> (u32, u32) {
        let img = image::open(path).unwrap();
        (img.width(), img.height())
    }

    #[test]
    fn test_batch_download_writes_one_png_per_link() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = StoreFixture::new().with_links(3);
        let selectors = [LinkSelector::Index(1), LinkSelector::Index(3)];
        let result = export(
            &fixture.store,
            &fixture.user,
            Lang::En,
            &settings(&dir),
            &selectors,
            CardAction::Download,
        )
        .unwrap();

        assert!(!result.has_errors());
        assert_eq!(result.exported_cards, vec!["Link_3.png", "Link_1.png"]);
        assert_eq!(result.written_paths.len(), 2);
        for path in &result.written_paths {
            assert_eq!(png_size(path), (600, 900));
        }
    }

    #[test]
    fn test_single_only_actions_refuse_batches() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = StoreFixture::new().with_links(2);
        let selectors = [LinkSelector::Index(1), LinkSelector::Index(2)];
        for action in [CardAction::Copy, CardAction::Share, CardAction::Preview] {
            let result = export(
                &fixture.store,
                &fixture.user,
                Lang::En,
                &settings(&dir),
                &selectors,
                action,
            )
            .unwrap();
            assert!(result.has_errors(), "{action}");
            assert!(result.written_paths.is_empty());
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_share_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let result = render_adhoc(
            Lang::En,
            &settings(&dir),
            "Thai",
            "thai.test",
            CardAction::Share,
        )
        .unwrap();
        assert!(!result.has_errors());
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert!(result.exported_cards.is_empty());
    }

    #[test]
    fn test_preview_writes_page_without_opening() {
        let dir = tempfile::tempdir().unwrap();
        let result = render_adhoc(
            Lang::En,
            &settings(&dir),
            "Thai Lessons",
            "https://thai.test/lessons",
            CardAction::Preview,
        )
        .unwrap();
        let page = &result.written_paths[0];
        assert!(page.to_string_lossy().ends_with("Thai_Lessons.html"));
        assert!(std::fs::read_to_string(page)
            .unwrap()
            .contains("data:image/png;base64,"));
    }

    #[test]
    fn test_adhoc_refuses_http() {
        let dir = tempfile::tempdir().unwrap();
        let result = render_adhoc(
            Lang::En,
            &settings(&dir),
            "",
            "http://plain.test",
            CardAction::Download,
        )
        .unwrap();
        assert!(result.has_errors());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_adhoc_download_uses_template_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings(&dir);
        settings.template = settings
            .template
            .with_orientation(crate::card::Orientation::Landscape);
        let result = render_adhoc(
            Lang::En,
            &settings,
            "",
            "example.com/path",
            CardAction::Download,
        )
        .unwrap();
        assert_eq!(result.exported_cards, vec!["example_com_path.png"]);
        assert_eq!(png_size(&result.written_paths[0]), (900, 600));
    }

    #[test]
    fn test_parse_action() {
        assert_eq!("COPY".parse::<CardAction>().unwrap(), CardAction::Copy);
        assert_eq!(CardAction::default(), CardAction::Download);
        assert!("print".parse::<CardAction>().is_err());
    }
}
