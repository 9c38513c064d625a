//! In-memory `Fetch` stand-in for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::config::{CanonicalConfig, ScanConfig};
use crate::fetch::{Fetch, FetchError};

pub const JQUERY_ROOT: &str = "https://upstream.test/jquery/";
pub const WP_JQUERY_URL: &str = "https://upstream.test/wordpress/jquery.js";
pub const WOO_ROOT: &str = "https://upstream.test/woocommerce/";

pub const JQUERY_351_FULL: &str = "/*!\n * jQuery JavaScript Library v3.5.1\n * https://jquery.com/\n */\n(function(global){\n  var version = \"3.5.1\";\n  global.jQuery = function(){ return version; };\n})(this);\n";

pub const JQUERY_351_MIN: &str = "/*! jQuery v3.5.1 | (c) JS Foundation and other contributors | jquery.org/license */\n!function(g){var v=\"3.5.1\";g.jQuery=function(){return v}}(this);\n//# sourceMappingURL=jquery.min.map\n";

pub const WOO_CART_FULL: &str = "/* global wc_cart_params */\njQuery( function( $ ) {\n  if ( typeof wc_cart_params === 'undefined' ) {\n    return false;\n  }\n  $( document.body ).on( 'click', '.remove', function() { return true; } );\n});\n";

pub const WOO_CART_MIN: &str = "jQuery(function(e){if(\"undefined\"==typeof wc_cart_params)return!1;e(document.body).on(\"click\",\".remove\",function(){return!0})});";

/// Config pointing canonical roots at the stub upstream with no pacing.
pub fn test_config() -> ScanConfig {
    ScanConfig {
        workers: 4,
        pacing_ms: 0,
        canonical: Some(CanonicalConfig {
            jquery_root: JQUERY_ROOT.to_string(),
            wordpress_jquery_url: WP_JQUERY_URL.to_string(),
            woocommerce_root: WOO_ROOT.to_string(),
        }),
        ..ScanConfig::default()
    }
}

#[derive(Debug, Clone)]
pub enum Stub {
    Body(String),
    Status(u32),
    Refused,
    Broken,
    Panic,
}

/// Serves canned responses by exact URL, or by URL prefix for whole hosts.
/// Unknown URLs answer 404. Every request is recorded.
#[derive(Debug, Default)]
pub struct StubFetcher {
    exact: Mutex<HashMap<String, Stub>>,
    prefixes: Mutex<Vec<(String, Stub)>>,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(self, url: &str, body: &str) -> Self {
        self.set(url, Stub::Body(body.to_string()));
        self
    }

    pub fn set(&self, url: &str, stub: Stub) {
        self.exact.lock().unwrap().insert(url.to_string(), stub);
    }

    pub fn host(self, prefix: &str, stub: Stub) -> Self {
        self.prefixes.lock().unwrap().push((prefix.to_string(), stub));
        self
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    pub fn calls_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.starts_with(prefix))
            .cloned()
            .collect()
    }

    fn lookup(&self, url: &str) -> Stub {
        if let Some(stub) = self.exact.lock().unwrap().get(url) {
            return stub.clone();
        }
        self.prefixes
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, stub)| stub.clone())
            .unwrap_or(Stub::Status(404))
    }
}

impl Fetch for StubFetcher {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        let url_owned = url.to_string();
        match self.lookup(url) {
            Stub::Body(body) => Ok(body),
            Stub::Status(status) => Err(FetchError::Status {
                url: url_owned,
                status,
            }),
            Stub::Refused => Err(FetchError::Connection {
                url: url_owned,
                detail: "Couldn't connect to server".to_string(),
            }),
            Stub::Broken => Err(FetchError::Other {
                url: url_owned,
                detail: "unexpected failure".to_string(),
            }),
            Stub::Panic => panic!("stub fetcher asked to panic for {}", url),
        }
    }
}
