//! Configuration file loading.
//!
//! An optional `tether.toml` is looked up in the working directory, then in
//! the platform config directory. CLI flags override file values; every
//! field has a default, so a missing file is not an error.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use tether_core::{DEFAULT_ENDPOINT, DEFAULT_MAX_LINES, DEFAULT_PROMPT};

/// User-facing configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Backend endpoint URL.
    pub url: String,
    /// Prompt label shown before the input line.
    pub prompt: String,
    /// History retention cap in lines.
    pub max_lines: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            max_lines: DEFAULT_MAX_LINES,
        }
    }
}

impl Config {
    /// Loads the first config file found, or defaults when there is none.
    pub fn load() -> Result<Self> {
        match Self::find_file() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parses an explicit config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    fn find_file() -> Option<PathBuf> {
        let local = PathBuf::from("tether.toml");
        if local.is_file() {
            return Some(local);
        }
        let global = dirs::config_dir()?.join("tether").join("tether.toml");
        global.is_file().then_some(global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_points_at_the_well_known_endpoint() {
        let config = Config::default();
        assert_eq!(config.url, DEFAULT_ENDPOINT);
        assert_eq!(config.prompt, DEFAULT_PROMPT);
        assert_eq!(config.max_lines, DEFAULT_MAX_LINES);
    }

    #[test]
    fn partial_file_fills_the_rest_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tether.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "url = \"ws://example.test:9999/ws\"").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.url, "ws://example.test:9999/ws");
        assert_eq!(config.prompt, DEFAULT_PROMPT);
    }

    #[test]
    fn full_file_overrides_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tether.toml");
        fs::write(
            &path,
            "url = \"ws://host:1/ws\"\nprompt = \"% \"\nmax_lines = 42\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.url, "ws://host:1/ws");
        assert_eq!(config.prompt, "% ");
        assert_eq!(config.max_lines, 42);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tether.toml");
        fs::write(&path, "uri = \"typo\"\n").unwrap();

        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error_when_named_explicitly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(Config::from_file(&path).is_err());
    }
}
