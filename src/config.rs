// Tue Mar 10 2026 - Alex

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for one batch import run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    pub dump_path: PathBuf,
    /// Previous-snapshot cache; defaults to `<dump>.imported`.
    pub cache_path: Option<PathBuf>,
    /// Skip list, one record name per line; defaults to `<dump>.skip`.
    pub skip_path: Option<PathBuf>,
    /// Names to import. Empty means everything in the dump.
    pub selection: Vec<String>,
    /// Optional JSON export of the resulting registry.
    pub output_path: Option<PathBuf>,
    pub verbose: bool,
}

impl ImportConfig {
    pub fn new(dump_path: PathBuf) -> Self {
        Self {
            dump_path,
            cache_path: None,
            skip_path: None,
            selection: Vec::new(),
            output_path: None,
            verbose: false,
        }
    }

    pub fn with_cache_path(mut self, path: PathBuf) -> Self {
        self.cache_path = Some(path);
        self
    }

    pub fn with_skip_path(mut self, path: PathBuf) -> Self {
        self.skip_path = Some(path);
        self
    }

    pub fn with_selection(mut self, selection: Vec<String>) -> Self {
        self.selection = selection;
        self
    }

    pub fn cache_file(&self) -> PathBuf {
        self.cache_path
            .clone()
            .unwrap_or_else(|| append_extension(&self.dump_path, ".imported"))
    }

    pub fn skip_file(&self) -> PathBuf {
        self.skip_path
            .clone()
            .unwrap_or_else(|| append_extension(&self.dump_path, ".skip"))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.dump_path.as_os_str().is_empty() {
            return Err("dump_path must be set".to_string());
        }
        if self.cache_file() == self.dump_path {
            return Err("cache file must not overwrite the dump".to_string());
        }
        if let Some(output) = &self.output_path {
            if *output == self.dump_path {
                return Err("output file must not overwrite the dump".to_string());
            }
        }
        Ok(())
    }
}

fn append_extension(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

/// Load the skip list: one record name per line, blank lines ignored.
/// A missing file means nothing is skipped.
pub fn load_skip_list(path: &Path) -> HashSet<String> {
    let Ok(contents) = fs::read_to_string(path) else {
        return HashSet::new();
    };
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
