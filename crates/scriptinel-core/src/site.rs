//! Site base URLs and the delimited site list they are read from.

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::Path;

/// Base URL of a site under scan, always ending in `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Site {
    base: String,
}

impl Site {
    /// Parse a site base. Only `http`/`https` URLs with a host are accepted;
    /// query and fragment are dropped.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            anyhow::bail!("empty site URL");
        }
        let mut url =
            url::Url::parse(raw).with_context(|| format!("invalid site URL: {}", raw))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("unsupported scheme for site: {}", raw);
        }
        if url.host_str().map_or(true, str::is_empty) {
            anyhow::bail!("site URL missing host: {}", raw);
        }
        url.set_query(None);
        url.set_fragment(None);
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            base: url.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Absolute URL of a site-relative path.
    pub fn join(&self, relative: &str) -> String {
        format!("{}{}", self.base, relative.trim_start_matches('/'))
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}

/// Read the site list: header row skipped, first column used, blank and
/// invalid rows skipped (invalid ones logged).
pub fn read_sites(path: &Path) -> Result<Vec<Site>> {
    let bytes = fs::read(path).with_context(|| format!("read site list {}", path.display()))?;
    Ok(parse_sites(&String::from_utf8_lossy(&bytes)))
}

pub fn parse_sites(text: &str) -> Vec<Site> {
    let mut sites = Vec::new();
    for (idx, line) in text.lines().enumerate().skip(1) {
        let field = first_column(line);
        if field.trim().is_empty() {
            continue;
        }
        match Site::parse(&field) {
            Ok(site) => sites.push(site),
            Err(e) => tracing::warn!(line = idx + 1, "skipping site: {:#}", e),
        }
    }
    sites
}

/// First comma-delimited field, with RFC 4180 quoting undone.
fn first_column(line: &str) -> String {
    let line = line.trim_start_matches('\u{FEFF}').trim();
    let Some(quoted) = line.strip_prefix('"') else {
        return line.split(',').next().unwrap_or("").to_string();
    };
    let mut out = String::new();
    let mut chars = quoted.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '"' {
            if chars.peek() == Some(&'"') {
                out.push('"');
                chars.next();
            } else {
                break;
            }
        } else {
            out.push(c);
        }
    }
    out
}
