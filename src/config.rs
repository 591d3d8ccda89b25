use crate::error::{ProvisionError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE_URL: &str = "https://wordpress.org/latest.tar.gz";

/// Everything the install pipeline needs to know about where things live.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvisionConfig {
    /// URL of the gzip-compressed tarball
    pub source_url: String,
    /// Scratch directory holding the download and its extracted tree
    pub scratch_dir: PathBuf,
    /// File name of the downloaded archive inside the scratch directory
    pub archive_name: String,
    /// Subdirectory to keep, relative to the scratch directory
    pub relocate_from: PathBuf,
    /// Final location of the kept subdirectory
    pub relocate_to: PathBuf,
    pub compose: ComposeConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeConfig {
    pub program: String,
    pub files: Vec<String>,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            scratch_dir: PathBuf::from("./set-up"),
            archive_name: "wordpress.tar.gz".to_string(),
            relocate_from: PathBuf::from("wordpress/wp-admin"),
            relocate_to: PathBuf::from("./wp-admin"),
            compose: ComposeConfig::default(),
        }
    }
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            program: "/usr/local/bin/docker-compose".to_string(),
            files: vec![
                "docker-compose.yml".to_string(),
                "docker-compose-dev.yml".to_string(),
            ],
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub source_url: Option<String>,
    pub scratch_dir: Option<PathBuf>,
    pub archive_name: Option<String>,
    pub relocate_from: Option<PathBuf>,
    pub relocate_to: Option<PathBuf>,
}

impl ProvisionConfig {
    /// Read a JSON config file. Keys left out fall back to the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ProvisionError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ProvisionError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load from `path` if given, otherwise start from the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(url) = overrides.source_url {
            self.source_url = url;
        }
        if let Some(dir) = overrides.scratch_dir {
            self.scratch_dir = dir;
        }
        if let Some(name) = overrides.archive_name {
            self.archive_name = name;
        }
        if let Some(from) = overrides.relocate_from {
            self.relocate_from = from;
        }
        if let Some(to) = overrides.relocate_to {
            self.relocate_to = to;
        }
        self
    }

    pub fn archive_path(&self) -> PathBuf {
        self.scratch_dir.join(&self.archive_name)
    }

    pub fn relocate_source(&self) -> PathBuf {
        self.scratch_dir.join(&self.relocate_from)
    }
}
