//! # Card Export
//!
//! A rendered [`Surface`] becomes a [`CardArtifact`] (PNG bytes plus a file
//! name), which then goes through one of four independent actions:
//!
//! | action    | success                  | when the platform can't             |
//! |-----------|--------------------------|-------------------------------------|
//! | download  | PNG written to a dir     | `Err` (I/O)                         |
//! | clipboard | PNG on the clipboard     | `Err(ClipboardUnsupported)`         |
//! | share     | `true`                   | `false`, also when the user cancels |
//! | preview   | HTML page path, opened   | page is written, not opened         |
//!
//! Each action probes its helper once per call through [`crate::capability`].
//! The `*_with` variants take the probe result explicitly.
//!
//! ## File Names
//!
//! The stem comes from the record name, else the URL's host and path, else
//! `card`. Every run of characters outside `[A-Za-z0-9_-]` becomes one `_`, and
//! the stem is capped at 120 characters before `.png` is added.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::capability::{can_share_file, probe_opener, probe_share, Capability};
use crate::card::Surface;
use crate::clipboard::probe_clipboard_image;
use crate::error::{LinkDeckError, Result};
use crate::normalize::cosmetic_normalize;

pub const MAX_FILE_STEM: usize = 120;
pub const FALLBACK_STEM: &str = "card";

#[derive(Debug, Clone)]
pub struct CardArtifact {
    pub file_name: String,
    pub png: Vec<u8>,
}

impl CardArtifact {
    pub fn from_surface(surface: &Surface, name: &str, url: &str) -> Result<Self> {
        Ok(Self {
            file_name: card_file_name(name, url),
            png: surface.to_png()?,
        })
    }

    /// Writes the PNG under its own name into a fresh directory in the system temp dir.
    fn write_temp(&self) -> Result<PathBuf> {
        let dir = std::env::temp_dir().join(format!("linkdeck-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.png)?;
        Ok(path)
    }
}

pub fn card_file_name(name: &str, url: &str) -> String {
    let source = if !name.trim().is_empty() {
        name.trim().to_string()
    } else {
        host_and_path(url).unwrap_or_default()
    };
    let stem = sanitize_file_stem(&source);
    if stem.is_empty() {
        format!("{}.png", FALLBACK_STEM)
    } else {
        format!("{}.png", stem)
    }
}

fn host_and_path(url: &str) -> Option<String> {
    let parsed = Url::parse(&cosmetic_normalize(url)).ok()?;
    let host = parsed.host_str()?;
    let path = parsed.path().trim_end_matches('/');
    Some(format!("{}{}", host, path))
}

/// Collapses runs of non-word characters into `_` and caps the length.
/// Leading and trailing separators are dropped.
pub fn sanitize_file_stem(source: &str) -> String {
    let mut stem = String::new();
    let mut pending_separator = false;
    for c in source.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            if pending_separator && !stem.is_empty() {
                stem.push('_');
            }
            pending_separator = false;
            stem.push(c);
        } else {
            pending_separator = true;
        }
    }
    stem.truncate(MAX_FILE_STEM);
    stem
}

/// Saves the card into `dir`. An existing file is never overwritten: the name
/// gets a `-2`, `-3`, ... suffix instead.
pub fn download(artifact: &CardArtifact, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = free_path(dir, &artifact.file_name);
    fs::write(&path, &artifact.png)?;
    info!(path = %path.display(), bytes = artifact.png.len(), "card saved");
    Ok(path)
}

fn free_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }
    let stem = file_name.strip_suffix(".png").unwrap_or(file_name);
    (2..)
        .map(|n| dir.join(format!("{}-{}.png", stem, n)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

pub fn copy_to_clipboard(artifact: &CardArtifact) -> Result<()> {
    copy_to_clipboard_with(artifact, &probe_clipboard_image())
}

pub fn copy_to_clipboard_with(artifact: &CardArtifact, capability: &Capability) -> Result<()> {
    let tool = match capability {
        Capability::Supported(tool) => tool,
        Capability::Unsupported(reason) => {
            debug!(reason = %reason, "image clipboard unavailable");
            return Err(LinkDeckError::ClipboardUnsupported);
        }
    };

    let file = if tool.takes_file() {
        artifact.write_temp()?
    } else {
        PathBuf::new()
    };
    if tool.run(&file, &artifact.png)? {
        info!(file = %artifact.file_name, "card copied to clipboard");
        Ok(())
    } else {
        Err(LinkDeckError::Api(format!("{} exited with error", tool.program)))
    }
}

/// Shares the card. Never fails: `false` means it was not shared.
pub fn share(artifact: &CardArtifact, share_command: Option<&str>) -> bool {
    share_with(artifact, &probe_share(share_command))
}

pub fn share_with(artifact: &CardArtifact, capability: &Capability) -> bool {
    let tool = match capability {
        Capability::Supported(tool) => tool,
        Capability::Unsupported(reason) => {
            debug!(reason = %reason, "sharing unavailable");
            return false;
        }
    };

    let path = match artifact.write_temp() {
        Ok(path) => path,
        Err(e) => {
            warn!(error = %e, "could not stage card for sharing");
            return false;
        }
    };
    if !can_share_file(&path) {
        debug!(path = %path.display(), "file cannot be shared");
        return false;
    }

    match tool.run(&path, &artifact.png) {
        Ok(true) => {
            info!(file = %artifact.file_name, "card shared");
            true
        }
        Ok(false) => {
            debug!(program = %tool.program, "share helper exited non-zero");
            false
        }
        Err(e) => {
            warn!(error = %e, "share helper failed");
            false
        }
    }
}

/// A self-contained page showing the PNG inline as a data URL.
pub fn preview_html(artifact: &CardArtifact) -> String {
    format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title>\
         <style>body{{margin:0;background:#888;display:flex;justify-content:center}}\
         img{{max-width:100%;height:auto}}</style></head>\n\
         <body><img alt=\"{title}\" src=\"data:image/png;base64,{data}\"></body></html>\n",
        title = html_escape(&artifact.file_name),
        data = STANDARD.encode(&artifact.png),
    )
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Writes the preview page to the temp dir and opens it. Returns the page path.
pub fn preview(artifact: &CardArtifact) -> Result<PathBuf> {
    preview_with(artifact, &probe_opener())
}

pub fn preview_with(artifact: &CardArtifact, opener: &Capability) -> Result<PathBuf> {
    let dir = std::env::temp_dir().join(format!("linkdeck-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir)?;
    let stem = artifact.file_name.trim_end_matches(".png");
    let path = dir.join(format!("{}.html", stem));
    fs::write(&path, preview_html(artifact))?;

    match opener {
        Capability::Supported(tool) => tool.launch(&path)?,
        Capability::Unsupported(reason) => {
            debug!(reason = %reason, path = %path.display(), "preview written, not opened")
        }
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{HelperTool, FILE_PLACEHOLDER};

    fn artifact() -> CardArtifact {
        CardArtifact {
            file_name: "Thai_Lessons.png".to_string(),
            png: Surface::square(4).to_png().unwrap(),
        }
    }

    #[test]
    fn test_file_name_from_name() {
        assert_eq!(card_file_name("Thai Lessons!", "https://x.test/"), "Thai_Lessons.png");
        assert_eq!(card_file_name("  a / b  ", ""), "a_b.png");
    }

    #[test]
    fn test_file_name_from_url_when_name_is_empty() {
        assert_eq!(
            card_file_name("", "https://example.com/learn/thai/"),
            "example_com_learn_thai.png"
        );
        assert_eq!(card_file_name(" ", "example.com"), "example_com.png");
    }

    #[test]
    fn test_file_name_fallback() {
        assert_eq!(card_file_name("", ""), "card.png");
        assert_eq!(card_file_name("ภาษาไทย", ""), "card.png");
    }

    #[test]
    fn test_file_stem_is_capped() {
        let stem = sanitize_file_stem(&"a".repeat(500));
        assert_eq!(stem.len(), MAX_FILE_STEM);
    }

    #[test]
    fn test_download_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let first = download(&artifact(), dir.path()).unwrap();
        let second = download(&artifact(), dir.path()).unwrap();
        assert_eq!(first.file_name().unwrap(), "Thai_Lessons.png");
        assert_eq!(second.file_name().unwrap(), "Thai_Lessons-2.png");
        assert_eq!(fs::read(&first).unwrap(), artifact().png);
    }

    #[test]
    fn test_unsupported_clipboard_is_an_error() {
        let result = copy_to_clipboard_with(
            &artifact(),
            &Capability::Unsupported("no display".to_string()),
        );
        assert!(matches!(result, Err(LinkDeckError::ClipboardUnsupported)));
    }

    #[test]
    fn test_unsupported_share_is_false() {
        assert!(!share_with(
            &artifact(),
            &Capability::Unsupported("none".to_string())
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_share_follows_helper_exit_status() {
        let ok = Capability::Supported(HelperTool::new("true", [FILE_PLACEHOLDER]));
        assert!(share_with(&artifact(), &ok));
        let cancelled = Capability::Supported(HelperTool::new("false", [FILE_PLACEHOLDER]));
        assert!(!share_with(&artifact(), &cancelled));
    }

    #[cfg(unix)]
    #[test]
    fn test_clipboard_helper_receives_png() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("clip.png");
        let script = format!("cat > '{}'", out.display());
        let tool = Capability::Supported(HelperTool::new("sh", ["-c", script.as_str()]));
        copy_to_clipboard_with(&artifact(), &tool).unwrap();
        assert_eq!(fs::read(&out).unwrap(), artifact().png);
    }

    #[test]
    fn test_preview_page_embeds_png() {
        let path = preview_with(&artifact(), &Capability::Unsupported("test".to_string())).unwrap();
        let html = fs::read_to_string(&path).unwrap();
        assert!(path.to_string_lossy().ends_with("Thai_Lessons.html"));
        assert!(html.contains(&format!(
            "data:image/png;base64,{}",
            STANDARD.encode(artifact().png)
        )));
    }
}
