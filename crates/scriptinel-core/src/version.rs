//! Version discovery from served scripts and home pages.
//!
//! Markers are located with plain substring search; the text after a marker
//! is lexed into a version token that must look like a release tag, since it
//! is later interpolated into a canonical URL.

use crate::library::{Library, Variant, VersionKey};

/// Header of the non-minified jQuery build: `jQuery JavaScript Library v3.5.1`.
const JQUERY_FULL_MARKER: &str = "jQuery JavaScript Library v";
/// Header of the minified jQuery build: `/*! jQuery v3.5.1 | (c) ...`.
const JQUERY_MIN_MARKER: &str = "jQuery v";
/// Present in the banner of the WordPress-bundled jQuery.
const WORDPRESS_MARKER: &str = "| WordPress";
/// Generator tag emitted by WooCommerce on every page.
const WOOCOMMERCE_META_MARKER: &str = "<meta name=\"generator\" content=\"WooCommerce ";

const MAX_VERSION_LEN: usize = 32;

/// Version found in a served jQuery script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptVersion {
    pub version: String,
    /// Build flavour implied by the marker that matched, regardless of the file name.
    pub variant: Variant,
    pub platform_bundled: bool,
}

impl ScriptVersion {
    pub fn key(&self) -> VersionKey {
        if self.platform_bundled {
            VersionKey::platform(Library::Jquery, self.version.clone())
        } else {
            VersionKey::new(Library::Jquery, self.version.clone())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<T> {
    Found(T),
    NotFound,
}

impl<T> Resolved<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Resolved::Found(v) => Some(v),
            Resolved::NotFound => None,
        }
    }
}

/// Read the jQuery version from a served script.
///
/// The non-minified header wins; otherwise the minified header is used and
/// the script is treated as minified even when served under the full name.
pub fn resolve_jquery(script: &str) -> Resolved<ScriptVersion> {
    let platform_bundled = script.contains(WORDPRESS_MARKER);
    let found = version_after(script, JQUERY_FULL_MARKER, '\n')
        .map(|v| (v, Variant::Full))
        .or_else(|| version_after(script, JQUERY_MIN_MARKER, '|').map(|v| (v, Variant::Minified)));
    match found {
        Some((version, variant)) => Resolved::Found(ScriptVersion {
            version,
            variant,
            platform_bundled,
        }),
        None => Resolved::NotFound,
    }
}

/// Read the WooCommerce version from a home page's generator meta tag.
pub fn resolve_woocommerce(page: &str) -> Resolved<VersionKey> {
    match version_after(page, WOOCOMMERCE_META_MARKER, '"') {
        Some(version) => Resolved::Found(VersionKey::new(Library::Woocommerce, version)),
        None => Resolved::NotFound,
    }
}

/// Version token following the first occurrence of `marker`, ending at
/// `terminator` (or end of text). Surrounding whitespace is trimmed.
fn version_after(text: &str, marker: &str, terminator: char) -> Option<String> {
    let start = text.find(marker)? + marker.len();
    let rest = &text[start..];
    let end = rest.find(terminator).unwrap_or(rest.len());
    lex_version(&rest[..end])
}

fn lex_version(raw: &str) -> Option<String> {
    let token = raw.trim().trim_end_matches('"').trim();
    let valid = !token.is_empty()
        && token.len() <= MAX_VERSION_LEN
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '_'));
    valid.then(|| token.to_string())
}
