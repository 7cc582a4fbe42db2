use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::VersionPattern;
use crate::error::{CiError, Result};

/// Default location of the pipeline settings file
pub const SETTINGS_FILE: &str = "run-ci.toml";

/// Default location of the version-bump configuration
pub const TBUMP_FILE: &str = "tbump.toml";

/// Pipeline settings: which package to build and publish, and how.
///
/// Every field has a default, so an absent or partial `run-ci.toml` is valid.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_package")]
    pub package: String,

    #[serde(default = "default_build_script")]
    pub build_script: String,

    /// Publish from this directory instead of the one derived from `package`
    #[serde(default)]
    pub package_dir: Option<PathBuf>,

    #[serde(default = "default_access")]
    pub access: String,

    #[serde(default = "default_lint_scripts")]
    pub lint_scripts: Vec<String>,

    #[serde(default = "default_test_script")]
    pub test_script: String,

    #[serde(default = "default_installer")]
    pub installer: String,

    #[serde(default = "default_registry_client")]
    pub registry_client: String,
}

fn default_package() -> String {
    "@tanker/identity".to_string()
}

fn default_build_script() -> String {
    "build:identity".to_string()
}

fn default_access() -> String {
    "public".to_string()
}

fn default_lint_scripts() -> Vec<String> {
    vec!["lint".to_string()]
}

fn default_test_script() -> String {
    "test".to_string()
}

fn default_installer() -> String {
    "yarn".to_string()
}

fn default_registry_client() -> String {
    "npm".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            package: default_package(),
            build_script: default_build_script(),
            package_dir: None,
            access: default_access(),
            lint_scripts: default_lint_scripts(),
            test_script: default_test_script(),
            installer: default_installer(),
            registry_client: default_registry_client(),
        }
    }
}

/// The parts of `tbump.toml` run-ci relies on.
///
/// Sections it does not know about (`[git]`, hooks) are ignored.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TbumpConfig {
    pub version: VersionSection,

    #[serde(default, rename = "file")]
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct VersionSection {
    pub current: String,
    pub regex: String,
}

/// A file whose version string gets rewritten on bump
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FileEntry {
    pub src: String,

    /// Template locating the version in the file, `{current_version}` by default
    #[serde(default)]
    pub search: Option<String>,
}

impl TbumpConfig {
    /// Parse `tbump.toml` content
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CiError::config(format!("Invalid {}: {}", TBUMP_FILE, e)))
    }

    /// Compile the configured version regex
    pub fn version_pattern(&self) -> Result<VersionPattern> {
        VersionPattern::new(&self.version.regex)
    }
}

/// Loads pipeline settings from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `run-ci.toml` in current directory
/// 3. Default settings if no file found
///
/// # Returns
/// * `Ok(Settings)` - Loaded or default settings
/// * `Err` - If a file exists but cannot be read or parsed, or if an
///   explicitly given path does not exist
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    let settings_str = if let Some(path) = config_path {
        fs::read_to_string(path).map_err(|e| {
            CiError::config(format!("Cannot read {}: {}", path.display(), e))
        })?
    } else if Path::new(SETTINGS_FILE).exists() {
        fs::read_to_string(SETTINGS_FILE)?
    } else {
        log::debug!("no {} found, using default settings", SETTINGS_FILE);
        return Ok(Settings::default());
    };

    toml::from_str(&settings_str)
        .map_err(|e| CiError::config(format!("Invalid {}: {}", SETTINGS_FILE, e)))
}

/// Loads the version-bump configuration.
///
/// Unlike the pipeline settings there is no fallback: a release cannot be
/// validated without the version regex.
pub fn load_tbump(path: &Path) -> Result<TbumpConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        CiError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    TbumpConfig::parse(&content)
}
