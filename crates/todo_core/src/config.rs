//! Storage and export locations.
//!
//! # Responsibility
//! - Carry the task file and export directory as explicit values.
//!
//! # Invariants
//! - Core code never reads a process-wide storage path; callers construct a
//!   `StoreConfig` and hand it to the repository.

use std::path::{Path, PathBuf};

/// Default task collection file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "data/tasks.json";
/// Default directory for exported files.
pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// File-system locations used by one task collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// JSON file holding the whole collection.
    pub data_file: PathBuf,
    /// Directory receiving export output.
    pub export_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(data_file: impl Into<PathBuf>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            export_dir: export_dir.into(),
        }
    }

    /// Resolves an export file name inside `export_dir`.
    ///
    /// Absolute names are returned unchanged.
    pub fn export_path(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.export_dir.join(file_name)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE, DEFAULT_EXPORT_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::StoreConfig;
    use std::path::PathBuf;

    #[test]
    fn default_points_at_relative_data_and_exports() {
        let config = StoreConfig::default();
        assert_eq!(config.data_file, PathBuf::from("data/tasks.json"));
        assert_eq!(config.export_path("tasks.md"), PathBuf::from("exports/tasks.md"));
    }
}
