pub mod cache;
pub mod compare;
pub mod config;
pub mod fetch;
pub mod fingerprint;
pub mod library;
pub mod logging;
pub mod normalize;
pub mod scan;
pub mod sink;
pub mod site;
pub mod version;

#[cfg(test)]
pub(crate) mod test_support;
