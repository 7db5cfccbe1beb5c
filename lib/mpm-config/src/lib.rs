//! Settings management for the mpm project bookmark manager
//!
//! Settings are merged from three sources, later ones winning:
//!
//! 1. Default values
//! 2. A YAML settings file
//! 3. Environment variables
//!
//! # Settings File Format
//!
//! ```yaml
//! store_path: ~/.mpm/config.json
//! scan_max_depth: 3
//! exclude_patterns:
//!   - "*.log"
//!   - fixtures
//! ```
//!
//! # Environment Variables
//!
//! - `MPM_STORE_PATH`: location of the project file
//! - `MPM_SCAN_DEPTH`: detail view scan depth (integer, 0 for unbounded)
//! - `MPM_EXCLUDE_PATTERNS`: comma-separated extra exclude patterns
//!
//! # Settings File Locations
//!
//! 1. `./.mpm.yaml`
//! 2. `~/.config/mpm/settings.yaml`
//! 3. `~/.mpm/settings.yaml`

use mpm_types::Settings;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_STORE_PATH: &str = "MPM_STORE_PATH";
pub const ENV_SCAN_DEPTH: &str = "MPM_SCAN_DEPTH";
pub const ENV_EXCLUDE_PATTERNS: &str = "MPM_EXCLUDE_PATTERNS";

const MAX_SCAN_DEPTH: usize = 64;

/// Settings file structure, every field optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    pub store_path: Option<String>,
    pub scan_max_depth: Option<usize>,
    pub exclude_patterns: Option<Vec<String>>,
}

/// Loads and merges settings
pub struct SettingsManager;

impl SettingsManager {
    /// Load settings from the first settings file found, then the environment
    ///
    /// ```no_run
    /// use mpm_config::SettingsManager;
    ///
    /// let settings = SettingsManager::load_settings().unwrap();
    /// println!("Scan depth: {}", settings.scan_max_depth);
    /// ```
    pub fn load_settings() -> anyhow::Result<Settings> {
        let mut settings = Settings::default();

        if let Some(file) = Self::load_from_file()? {
            Self::merge_settings_file(&mut settings, file);
        }

        Self::apply_env(&mut settings, |key| env::var(key).ok());
        Self::validate_settings(&settings)?;

        Ok(settings)
    }

    /// Load settings from a specific file, still applying environment overrides
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Settings> {
        let path = path.as_ref();
        let mut settings = Settings::default();

        match Self::load_settings_file(path)? {
            Some(file) => Self::merge_settings_file(&mut settings, file),
            None => {
                return Err(anyhow::anyhow!(
                    "Settings file not found: {}",
                    path.display()
                ))
            }
        }

        Self::apply_env(&mut settings, |key| env::var(key).ok());
        Self::validate_settings(&settings)?;

        Ok(settings)
    }

    /// Candidate settings file paths, in search order
    pub fn get_settings_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".mpm.yaml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("mpm").join("settings.yaml"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".mpm").join("settings.yaml"));
        }

        paths
    }

    fn load_from_file() -> anyhow::Result<Option<SettingsFile>> {
        for path in Self::get_settings_paths() {
            if path.exists() {
                log::debug!("Loading settings from {}", path.display());
                return Self::load_settings_file(&path);
            }
        }
        Ok(None)
    }

    fn load_settings_file(path: &Path) -> anyhow::Result<Option<SettingsFile>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read settings file {}: {}", path.display(), e)
        })?;

        // An empty document is a valid, empty settings file
        if contents.trim().is_empty() {
            return Ok(Some(SettingsFile::default()));
        }

        let file: SettingsFile = serde_yaml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse settings file {}: {}", path.display(), e)
        })?;

        Ok(Some(file))
    }

    fn merge_settings_file(settings: &mut Settings, file: SettingsFile) {
        if let Some(store_path) = file.store_path {
            let trimmed = store_path.trim();
            if !trimmed.is_empty() {
                settings.store_path = Some(Self::expand_home(trimmed));
            }
        }
        if let Some(depth) = file.scan_max_depth {
            settings.scan_max_depth = depth;
        }
        if let Some(patterns) = file.exclude_patterns {
            settings.exclude_patterns = patterns
                .into_iter()
                .filter(|s| !s.trim().is_empty())
                .collect();
        }
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn apply_env<F>(settings: &mut Settings, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(store_path) = lookup(ENV_STORE_PATH) {
            let trimmed = store_path.trim();
            if !trimmed.is_empty() {
                settings.store_path = Some(Self::expand_home(trimmed));
            }
        }

        if let Some(depth) = lookup(ENV_SCAN_DEPTH) {
            match depth.trim().parse::<usize>() {
                Ok(depth) => settings.scan_max_depth = depth,
                Err(_) => log::warn!("Ignoring invalid {}: {}", ENV_SCAN_DEPTH, depth),
            }
        }

        if let Some(patterns) = lookup(ENV_EXCLUDE_PATTERNS) {
            let patterns = patterns
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>();
            if !patterns.is_empty() {
                settings.exclude_patterns = patterns;
            }
        }
    }

    /// Validate settings values
    pub fn validate_settings(settings: &Settings) -> anyhow::Result<()> {
        if settings.scan_max_depth > MAX_SCAN_DEPTH {
            return Err(anyhow::anyhow!(
                "scan_max_depth must be less than or equal to {}",
                MAX_SCAN_DEPTH
            ));
        }
        mpm_utils::validate_exclude_patterns(&settings.exclude_patterns)?;
        Ok(())
    }

    fn expand_home(path: &str) -> PathBuf {
        match dirs::home_dir() {
            Some(home) => mpm_utils::expand_tilde(path, &home),
            None => PathBuf::from(path),
        }
    }
}
