use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Settings for opening a [`Pollbook`](crate::Pollbook).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollbookConfig {
    /// Location of the file-backed store.
    pub store_path: PathBuf,
    /// Theme used until the user picks one explicitly.
    pub prefer_dark: bool,
}

impl Default for PollbookConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("pollbook.json"),
            prefer_dark: false,
        }
    }
}

impl PollbookConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml(raw: &str) -> SdkResult<Self> {
        toml::from_str(raw).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> SdkResult<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&raw)
    }

    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = PollbookConfig::default();
        assert_eq!(c.store_path, PathBuf::from("pollbook.json"));
        assert!(!c.prefer_dark);
    }

    #[test]
    fn parse_partial_toml() {
        let c = PollbookConfig::from_toml("prefer_dark = true").unwrap();
        assert!(c.prefer_dark);
        assert_eq!(c.store_path, PathBuf::from("pollbook.json"));
    }

    #[test]
    fn parse_full_toml() {
        let c = PollbookConfig::from_toml(
            "store_path = \"/var/lib/pollbook/state.json\"\nprefer_dark = false\n",
        )
        .unwrap();
        assert_eq!(c.store_path, PathBuf::from("/var/lib/pollbook/state.json"));
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = PollbookConfig::from_toml("prefer_dark = \"maybe\"").unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn load_missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PollbookConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pollbook.toml");
        fs::write(&path, "prefer_dark = true\n").unwrap();
        assert!(PollbookConfig::load(&path).unwrap().prefer_dark);
    }

    #[test]
    fn with_store_path_overrides() {
        let c = PollbookConfig::default().with_store_path("x.json");
        assert_eq!(c.store_path, PathBuf::from("x.json"));
    }
}
