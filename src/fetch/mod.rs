// Sun Oct 18 2026 - Alex

pub mod catalog;
pub mod error;
pub mod shell;
pub mod stub;

pub use catalog::{SourceCatalog, SourceSpec};
pub use error::{FetchError, FetchResult};
pub use shell::ShellFetcher;
pub use stub::StaticFetcher;

use std::collections::HashMap;

/// Produces the raw text output of one source.
///
/// Calls block until the producer is done. Implementations must not touch
/// any shared state beyond their own output.
pub trait SourceFetcher: Send + Sync {
    fn fetch(&self, source_id: &str) -> FetchResult<String>;
}

/// Looks up the secret a source needs, such as an API key.
pub trait KeyProvider: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

pub struct EnvKeyProvider;

impl KeyProvider for EnvKeyProvider {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapKeyProvider {
    keys: HashMap<String, String>,
}

impl MapKeyProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, name: &str, value: &str) -> Self {
        self.keys.insert(name.to_string(), value.to_string());
        self
    }
}

impl KeyProvider for MapKeyProvider {
    fn get(&self, name: &str) -> Option<String> {
        self.keys.get(name).cloned()
    }
}
