//! `scriptinel version` – run version discovery over a local file.

use anyhow::{Context, Result};
use scriptinel_core::library::Variant;
use scriptinel_core::version::{self, Resolved, ScriptVersion};
use std::fs;
use std::path::Path;

pub fn run_version(path: &Path) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    println!("{}", describe(&String::from_utf8_lossy(&bytes)));
    Ok(())
}

/// A served script is tried first, then a WooCommerce home page.
fn describe(text: &str) -> String {
    if let Resolved::Found(script) = version::resolve_jquery(text) {
        return describe_script(&script);
    }
    match version::resolve_woocommerce(text) {
        Resolved::Found(key) => key.to_string(),
        Resolved::NotFound => "no version found".to_string(),
    }
}

fn describe_script(script: &ScriptVersion) -> String {
    let build = match script.variant {
        Variant::Full => "full",
        Variant::Minified => "minified",
    };
    format!("{}, {} build", script.key(), build)
}
