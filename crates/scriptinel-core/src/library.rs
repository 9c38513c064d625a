//! Libraries under verification and their fixed asset sets.

use std::fmt;
use std::str::FromStr;

/// Served prefix of the WooCommerce plugin under a WordPress site.
pub const WOOCOMMERCE_PLUGIN_ROOT: &str = "wp-content/plugins/woocommerce/";

const WOOCOMMERCE_SCRIPTS: &[&str] = &[
    "assets/js/jquery-payment/jquery.payment.js",
    "assets/js/frontend/woocommerce.js",
    "assets/js/frontend/checkout.js",
    "assets/js/frontend/cart.js",
    "assets/js/frontend/credit-card-form.js",
];

const JQUERY_SERVED: &str = "wp-includes/js/jquery/jquery.js";
const JQUERY_CANONICAL: &str = "dist/jquery.js";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Library {
    /// jQuery as bundled by WordPress core; version read from the script header.
    Jquery,
    /// WooCommerce frontend scripts; version read from the home page generator tag.
    Woocommerce,
}

impl Library {
    pub fn name(self) -> &'static str {
        match self {
            Library::Jquery => "jquery",
            Library::Woocommerce => "woocommerce",
        }
    }

    /// Assets compared per site, in comparison order: each script full, then minified.
    pub fn assets(self) -> Vec<AssetSpec> {
        let scripts: Vec<(String, &'static str)> = match self {
            Library::Jquery => vec![(JQUERY_SERVED.to_string(), JQUERY_CANONICAL)],
            Library::Woocommerce => WOOCOMMERCE_SCRIPTS
                .iter()
                .map(|p| (format!("{}{}", WOOCOMMERCE_PLUGIN_ROOT, p), *p))
                .collect(),
        };
        scripts
            .into_iter()
            .flat_map(|(served, canonical)| {
                [Variant::Full, Variant::Minified].map(|variant| AssetSpec {
                    library: self,
                    served_path: served.clone(),
                    canonical_path: canonical.to_string(),
                    variant,
                })
            })
            .collect()
    }

    /// True when the version comes from the home page rather than each script.
    pub fn versioned_by_page(self) -> bool {
        matches!(self, Library::Woocommerce)
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Library {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jquery" => Ok(Library::Jquery),
            "woocommerce" => Ok(Library::Woocommerce),
            other => anyhow::bail!("unknown library: {} (expected jquery or woocommerce)", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    Full,
    Minified,
}

impl Variant {
    /// File suffix inserted before `.js`.
    pub fn suffix(self) -> &'static str {
        match self {
            Variant::Full => "",
            Variant::Minified => ".min",
        }
    }
}

/// One comparable script: where a site serves it, where the release keeps it,
/// and which build flavour is meant. Paths are stored in their non-minified form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetSpec {
    pub library: Library,
    pub served_path: String,
    pub canonical_path: String,
    pub variant: Variant,
}

impl AssetSpec {
    /// Site-relative path of this variant.
    pub fn served_file(&self) -> String {
        with_suffix(&self.served_path, self.variant)
    }

    /// Release-relative path of this variant.
    pub fn canonical_file(&self) -> String {
        with_suffix(&self.canonical_path, self.variant)
    }

    pub fn with_variant(&self, variant: Variant) -> AssetSpec {
        AssetSpec {
            variant,
            ..self.clone()
        }
    }
}

fn with_suffix(path: &str, variant: Variant) -> String {
    match path.strip_suffix(".js") {
        Some(stem) => format!("{}{}.js", stem, variant.suffix()),
        None => path.to_string(),
    }
}

/// Identifies one canonical reference release.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionKey {
    pub library: Library,
    pub version: String,
    /// Platform-bundled build: compare against the platform's copy, not the tag release.
    pub platform_bundled: bool,
}

impl VersionKey {
    pub fn new(library: Library, version: impl Into<String>) -> Self {
        Self {
            library,
            version: version.into(),
            platform_bundled: false,
        }
    }

    pub fn platform(library: Library, version: impl Into<String>) -> Self {
        Self {
            platform_bundled: true,
            ..Self::new(library, version)
        }
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.library, self.version)?;
        if self.platform_bundled {
            f.write_str(" (platform)")?;
        }
        Ok(())
    }
}
