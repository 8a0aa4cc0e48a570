// Sun Oct 18 2026 - Alex

use super::error::{FetchError, FetchResult};
use super::SourceFetcher;
use std::collections::HashMap;

/// In-memory fetcher serving canned output per source.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    responses: HashMap<String, Result<String, String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, source_id: &str, output: &str) -> Self {
        self.responses.insert(source_id.to_string(), Ok(output.to_string()));
        self
    }

    pub fn with_failure(mut self, source_id: &str, reason: &str) -> Self {
        self.responses.insert(source_id.to_string(), Err(reason.to_string()));
        self
    }
}

impl SourceFetcher for StaticFetcher {
    fn fetch(&self, source_id: &str) -> FetchResult<String> {
        match self.responses.get(source_id) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(reason)) => Err(FetchError::Producer {
                source_id: source_id.to_string(),
                reason: reason.clone(),
            }),
            None => Err(FetchError::UnknownSource {
                source_id: source_id.to_string(),
            }),
        }
    }
}
