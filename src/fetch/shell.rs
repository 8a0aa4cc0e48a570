// Sun Oct 18 2026 - Alex

use super::catalog::SourceCatalog;
use super::error::{FetchError, FetchResult};
use super::{KeyProvider, SourceFetcher};
use std::process::{Command, Stdio};

/// Runs a source's catalog command through `bash -c` and captures stdout.
pub struct ShellFetcher {
    catalog: SourceCatalog,
    domain: String,
    keys: Box<dyn KeyProvider>,
    shell: String,
}

impl ShellFetcher {
    pub fn new(catalog: SourceCatalog, domain: &str, keys: Box<dyn KeyProvider>) -> Self {
        Self {
            catalog,
            domain: domain.to_string(),
            keys,
            shell: "bash".to_string(),
        }
    }

    pub fn with_shell(mut self, shell: &str) -> Self {
        self.shell = shell.to_string();
        self
    }

}

impl SourceFetcher for ShellFetcher {
    fn fetch(&self, source_id: &str) -> FetchResult<String> {
        let command = self.catalog.render(source_id, &self.domain, self.keys.as_ref())?;
        log::debug!("[{}] running: {}", source_id, command);

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(&command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| FetchError::Spawn {
                source_id: source_id.to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(FetchError::CommandFailed {
                source_id: source_id.to_string(),
                status: output.status.to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::fetch::{MapKeyProvider, SourceSpec};

    fn fetcher_with(id: &str, spec: SourceSpec) -> ShellFetcher {
        let mut catalog = SourceCatalog::new();
        catalog.insert(id, spec);
        ShellFetcher::new(catalog, "example.com", Box::new(MapKeyProvider::new()))
            .with_shell("sh")
    }

    #[test]
    fn test_captures_stdout() {
        let fetcher = fetcher_with("echo", SourceSpec::new("printf 'a.{domain}\\nb.{domain}\\n'"));
        let out = fetcher.fetch("echo").unwrap();
        assert_eq!(out, "a.example.com\nb.example.com\n");
    }

    #[test]
    fn test_nonzero_exit_is_failure() {
        let fetcher = fetcher_with("broken", SourceSpec::new("echo partial.example.com; exit 3"));
        let err = fetcher.fetch("broken").unwrap_err();
        assert!(matches!(err, FetchError::CommandFailed { .. }));
    }

    #[test]
    fn test_filter_without_matches_is_empty_success() {
        let fetcher = fetcher_with(
            "af",
            SourceSpec::filtered("printf 'unrelated.org\\n' | grep -i {domain}"),
        );
        assert_eq!(fetcher.fetch("af").unwrap(), "");
    }

    #[test]
    fn test_builtin_template_without_matches_is_empty_success() {
        let mut catalog = SourceCatalog::new();
        let shrewdeye = SourceCatalog::builtin().get("shrewdeye").cloned().unwrap();
        let offline = shrewdeye.command.replace("curl -s 'https://shrewdeye.app/domains/{domain}.txt'", "printf 'x.other.org\\n'");
        catalog.insert("shrewdeye", SourceSpec::new(&offline));
        let fetcher = ShellFetcher::new(catalog, "example.com", Box::new(MapKeyProvider::new()))
            .with_shell("sh");

        assert_eq!(fetcher.fetch("shrewdeye").unwrap(), "");
    }

    #[test]
    fn test_missing_key_is_failure() {
        let fetcher = fetcher_with("keyed", SourceSpec::new("echo {key}").with_key_env("SOME_KEY"));
        let err = fetcher.fetch("keyed").unwrap_err();
        assert!(matches!(err, FetchError::MissingKey { .. }));
    }
}
