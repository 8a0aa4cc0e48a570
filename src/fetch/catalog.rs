// Sun Oct 18 2026 - Alex

use super::error::{FetchError, FetchResult};
use super::KeyProvider;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DOMAIN_PLACEHOLDER: &str = "{domain}";
const KEY_PLACEHOLDER: &str = "{key}";
const NO_MATCH_OK: &str = " || true";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read sources file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid sources file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Source {0} has an empty command")]
    EmptyCommand(String),
}

/// Shell command template for one source.
///
/// `{domain}` is replaced by the target and `{key}` by the value of the
/// `key_env` secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_env: Option<String>,
}

impl SourceSpec {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            key_env: None,
        }
    }

    /// For pipelines ending in a filter such as `grep`, where no match means
    /// an empty result rather than a failed source.
    pub fn filtered(pipeline: &str) -> Self {
        Self::new(&format!("{}{}", pipeline, NO_MATCH_OK))
    }

    pub fn with_key_env(mut self, env_var: &str) -> Self {
        self.key_env = Some(env_var.to_string());
        self
    }
}

/// Known sources keyed by identifier, iterated in lexicographic order.
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
    sources: BTreeMap<String, SourceSpec>,
}

impl SourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut catalog = Self::new();

        catalog.insert("subfinder", SourceSpec::filtered(
            "subfinder -d {domain} -all -silent | grep -i {domain}",
        ));
        catalog.insert("subdominator", SourceSpec::filtered(
            "subdominator -d {domain} -s | grep -i {domain}",
        ));
        catalog.insert("assetfinder", SourceSpec::filtered(
            "assetfinder {domain} | grep -i {domain}",
        ));
        catalog.insert("findomain", SourceSpec::filtered(
            "findomain --target {domain} -q | grep -i {domain}",
        ));
        catalog.insert("chaos", SourceSpec::filtered(
            "chaos -d {domain} -silent -key {key} | grep -i {domain}",
        ).with_key_env("CHAOS"));
        catalog.insert("virustotal", SourceSpec::filtered(concat!(
            "bash -c 'url=\"https://www.virustotal.com/api/v3/domains/{domain}/subdomains?limit=40\"; ",
            "while [ -n \"$url\" ]; do response=$(curl -s \"$url\" -H \"x-apikey: {key}\"); ",
            "echo \"$response\" | jq -r \".data[].id\"; ",
            "url=$(echo \"$response\" | jq -r \".links.next // empty\"); done' | grep -i {domain}",
        )).with_key_env("VT_API_KEY"));
        catalog.insert("shrewdeye", SourceSpec::filtered(
            "curl -s 'https://shrewdeye.app/domains/{domain}.txt' | grep -i {domain} | egrep -v '<|>'",
        ));
        catalog.insert("shodan", SourceSpec::filtered(concat!(
            "curl -s 'https://www.shodan.io/domain/{domain}' | egrep -i '<li>.+</li>' ",
            "| awk -F '<li>' '{print $2}' | awk -F '</li>' '{print $1}' ",
            "| sed 's/$/.{domain}/' | grep -i {domain}",
        )));
        catalog.insert("crtsh", SourceSpec::filtered(concat!(
            "curl -s 'https://crt.sh/?q=%25.{domain}&output=json' ",
            "| jq -r 'map(select(.name_value != null)) | .[].name_value' ",
            "| sed 's/\\*\\.//g' | tr '[:upper:]' '[:lower:]' | sort -u | grep -i {domain}",
        )));
        catalog.insert("certspotter", SourceSpec::filtered(concat!(
            "curl -s 'https://api.certspotter.com/v1/issuances?domain={domain}&include_subdomains=true&expand=dns_names' ",
            "| jq -r '.[].dns_names[]' | sort -u | grep -i {domain}",
        )));

        catalog
    }

    pub fn insert(&mut self, id: &str, spec: SourceSpec) {
        self.sources.insert(id.to_string(), spec);
    }

    pub fn get(&self, id: &str) -> Option<&SourceSpec> {
        self.sources.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Adds or replaces entries from a JSON object of `id -> SourceSpec`.
    pub fn merge_file(&mut self, path: &Path) -> Result<usize, CatalogError> {
        let content = fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let entries: BTreeMap<String, SourceSpec> =
            serde_json::from_str(&content).map_err(|e| CatalogError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;

        for (id, spec) in &entries {
            if spec.command.trim().is_empty() {
                return Err(CatalogError::EmptyCommand(id.clone()));
            }
        }

        let count = entries.len();
        for (id, spec) in entries {
            log::debug!("Loaded source {} from {}", id, path.display());
            self.sources.insert(id, spec);
        }
        Ok(count)
    }

    /// Builds the shell command for `id` against `domain`.
    pub fn render(&self, id: &str, domain: &str, keys: &dyn KeyProvider) -> FetchResult<String> {
        let spec = self.get(id).ok_or_else(|| FetchError::UnknownSource {
            source_id: id.to_string(),
        })?;

        let mut command = spec.command.replace(DOMAIN_PLACEHOLDER, domain);
        if let Some(env_var) = &spec.key_env {
            let key = keys.get(env_var).ok_or_else(|| FetchError::MissingKey {
                source_id: id.to_string(),
                env_var: env_var.clone(),
            })?;
            command = command.replace(KEY_PLACEHOLDER, &key);
        }
        Ok(command)
    }
}

/// Targets are spliced into shell commands unquoted, so only hostname
/// characters are accepted.
pub fn is_valid_target(domain: &str) -> bool {
    !domain.is_empty()
        && !domain.starts_with('-')
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
}
