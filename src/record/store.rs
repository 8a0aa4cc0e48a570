// Sun Oct 18 2026 - Alex

use super::error::{RecordError, RecordResult};
use super::set::RecordSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const RECORDS_DIR: &str = "subdomains";
const MASTER_FILE: &str = "subdomains.txt";

/// File-backed persistence for record sets.
pub struct RecordStore;

impl RecordStore {
    /// Missing file yields the empty set.
    pub fn load(path: &Path) -> RecordResult<RecordSet> {
        Ok(Self::load_existing(path)?.unwrap_or_default())
    }

    /// Like `load`, but reports an absent file as `None`. Invalid UTF-8 is
    /// replaced rather than rejected, so one bad line never hides the rest.
    pub fn load_existing(path: &Path) -> RecordResult<Option<RecordSet>> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(RecordSet::from_lines(&String::from_utf8_lossy(&bytes)))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RecordError::Read {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Writes the canonical form to `<path>.tmp` and renames it into place,
    /// so readers only ever see a complete file.
    pub fn save(path: &Path, set: &RecordSet) -> RecordResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| RecordError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let tmp = temp_path(path);
        let write_err = |e| RecordError::Write {
            path: path.to_path_buf(),
            source: e,
        };

        fs::write(&tmp, set.to_canonical_string()).map_err(write_err)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(write_err(e));
        }

        log::debug!("Saved {} records to {}", set.len(), path.display());
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Paths of every file a run reads or writes, relative to the run directory.
#[derive(Debug, Clone)]
pub struct RunLayout {
    records_dir: PathBuf,
}

impl RunLayout {
    pub fn new(run_dir: &Path) -> Self {
        Self {
            records_dir: run_dir.join(RECORDS_DIR),
        }
    }

    pub fn ensure(&self) -> RecordResult<()> {
        fs::create_dir_all(&self.records_dir).map_err(|e| RecordError::CreateDir {
            path: self.records_dir.clone(),
            source: e,
        })
    }

    pub fn records_dir(&self) -> &Path {
        &self.records_dir
    }

    pub fn master(&self) -> PathBuf {
        self.records_dir.join(MASTER_FILE)
    }

    /// Current output of a source, later filtered down to its exclusive records.
    pub fn output(&self, source: &str) -> PathBuf {
        self.records_dir.join(format!("{}.txt", source))
    }

    /// Everything the source saw on its last successful fetch.
    pub fn baseline(&self, source: &str) -> PathBuf {
        self.records_dir.join(format!("{}.txt.raw", source))
    }

    /// Records first seen by the source on its last successful fetch.
    pub fn last_found(&self, source: &str) -> PathBuf {
        self.records_dir.join(format!("last_{}.txt", source))
    }
}
