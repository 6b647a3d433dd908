//! # URL Normalization
//!
//! Two policies, each allowed in different places:
//!
//! - [`strict_normalize`] guards every write path (add, edit, import). It adds a
//!   missing `https://`, but an explicit `http://` is rejected rather than
//!   upgraded: the user has to retype it as https themselves.
//! - [`cosmetic_normalize`] is for displaying or rendering URLs that are already
//!   stored. It upgrades `http://` silently and never rejects.
//!
//! ```text
//! input                 strict                    cosmetic
//! "example.com"         "https://example.com/"    "https://example.com"
//! "http://example.com"  None                      "https://example.com"
//! "   "                 None                      ""
//! ```
//!
//! Strict results are the `url` crate's serialization, so trailing slashes and
//! percent-encoding follow the WHATWG URL standard.

use url::Url;

const HTTPS_PREFIX: &str = "https://";
const HTTP_PREFIX: &str = "http://";

/// Validates and canonicalizes user input into an `https` URL.
pub fn strict_normalize(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() || starts_with_ignore_case(trimmed, HTTP_PREFIX) {
        return None;
    }

    let candidate = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("{}{}", HTTPS_PREFIX, trimmed)
    };

    let parsed = Url::parse(&candidate).ok()?;
    if parsed.scheme() != "https" {
        return None;
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Some(parsed.to_string()),
        _ => None,
    }
}

/// Display-only normalization: upgrades `http://`, adds a missing scheme.
pub fn cosmetic_normalize(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if starts_with_ignore_case(trimmed, HTTP_PREFIX) {
        return format!("{}{}", HTTPS_PREFIX, &trimmed[HTTP_PREFIX.len()..]);
    }
    if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("{}{}", HTTPS_PREFIX, trimmed)
    }
}

/// The URL as printed under a card's QR code: no `https://`/`http://` prefix.
pub fn display_url(url: &str) -> &str {
    let trimmed = url.trim();
    for prefix in [HTTPS_PREFIX, HTTP_PREFIX] {
        if starts_with_ignore_case(trimmed, prefix) {
            return &trimmed[prefix.len()..];
        }
    }
    trimmed
}

/// `scheme://` at the start, where scheme is `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
fn has_scheme(s: &str) -> bool {
    let Some(end) = s.find("://") else {
        return false;
    };
    let scheme = &s[..end];
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}
