//! Canonical reference URLs.

use crate::config::CanonicalConfig;
use crate::library::{AssetSpec, Library, VersionKey};

#[derive(Debug, Clone, Default)]
pub struct CanonicalSource {
    cfg: CanonicalConfig,
}

impl CanonicalSource {
    pub fn new(cfg: CanonicalConfig) -> Self {
        Self { cfg }
    }

    /// URL of the canonical copy of `asset` at `version`.
    pub fn url(&self, version: &VersionKey, asset: &AssetSpec) -> String {
        match version.library {
            Library::Jquery if version.platform_bundled => self.cfg.wordpress_jquery_url.clone(),
            Library::Jquery => tagged(&self.cfg.jquery_root, &version.version, &asset.canonical_file()),
            Library::Woocommerce => {
                tagged(&self.cfg.woocommerce_root, &version.version, &asset.canonical_file())
            }
        }
    }
}

fn tagged(root: &str, version: &str, path: &str) -> String {
    format!(
        "{}/{}/{}",
        root.trim_end_matches('/'),
        version,
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jquery_release_urls() {
        let src = CanonicalSource::default();
        let assets = Library::Jquery.assets();
        let v = VersionKey::new(Library::Jquery, "3.5.1");
        assert_eq!(
            src.url(&v, &assets[0]),
            "https://raw.githubusercontent.com/jquery/jquery/3.5.1/dist/jquery.js"
        );
        assert_eq!(
            src.url(&v, &assets[1]),
            "https://raw.githubusercontent.com/jquery/jquery/3.5.1/dist/jquery.min.js"
        );
    }

    #[test]
    fn platform_build_uses_fixed_url() {
        let src = CanonicalSource::default();
        let assets = Library::Jquery.assets();
        let v = VersionKey::platform(Library::Jquery, "1.12.4-wp");
        let expected = CanonicalConfig::default().wordpress_jquery_url;
        assert_eq!(src.url(&v, &assets[0]), expected);
        assert_eq!(src.url(&v, &assets[1]), expected);
    }

    #[test]
    fn woocommerce_release_url() {
        let src = CanonicalSource::default();
        let asset = &Library::Woocommerce.assets()[6];
        let v = VersionKey::new(Library::Woocommerce, "3.9.1");
        assert_eq!(
            src.url(&v, asset),
            "https://raw.githubusercontent.com/woocommerce/woocommerce/3.9.1/assets/js/frontend/cart.js"
        );
    }
}
