//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Model used for `mt day --ai` when none is configured.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the `YYYY-MM-DD.md` notes.
    pub notes_dir: PathBuf,
    /// Count `Break` blocks towards the total time.
    pub include_breaks: bool,
    /// Claude API key for the AI analysis.
    pub api_key: Option<String>,
    /// Claude model name for the AI analysis.
    pub model: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("notes_dir", &self.notes_dir)
            .field("include_breaks", &self.include_breaks)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notes_dir: PathBuf::from("."),
            include_breaks: false,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // MT_NOTES_DIR, MT_API_KEY, ...
        figment = figment.merge(Env::prefixed("MT_"));

        figment.extract()
    }

    /// The notes directory, with `--path` taking precedence.
    pub fn notes_dir_or<'a>(&'a self, path: Option<&'a Path>) -> &'a Path {
        path.unwrap_or(&self.notes_dir)
    }

    /// The configured API key, if it is not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Returns the platform-specific config directory for mt.
///
/// On Linux: `~/.config/mt`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("mt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.notes_dir, PathBuf::from("."));
        assert!(!config.include_breaks);
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "notes_dir = \"/notes\"\ninclude_breaks = true\n").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.notes_dir, PathBuf::from("/notes"));
        assert!(config.include_breaks);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = Config {
            api_key: Some("sk-secret".to_string()),
            ..Config::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let config = Config {
            api_key: Some("  ".to_string()),
            ..Config::default()
        };
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_path_flag_overrides_notes_dir() {
        let config = Config::default();
        let flag = PathBuf::from("/elsewhere");
        assert_eq!(config.notes_dir_or(Some(&flag)), Path::new("/elsewhere"));
        assert_eq!(config.notes_dir_or(None), Path::new("."));
    }
}
