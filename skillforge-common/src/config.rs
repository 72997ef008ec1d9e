//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// TOML configuration file contents shared by SkillForge services
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root data folder override
    pub root_folder: Option<String>,
    /// Generative advisor endpoint base URL override
    pub advisor_base_url: Option<String>,
    /// Generative advisor API key
    pub advisor_api_key: Option<String>,
}

/// Root folder resolution following the priority order:
/// 1. Command-line argument (highest priority)
/// 2. SKILLFORGE_ROOT environment variable
/// 3. TOML config file (`root_folder` key)
/// 4. OS-dependent compiled default (fallback)
pub struct RootFolderResolver {
    service_name: String,
}

impl RootFolderResolver {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Resolve the root folder without touching the filesystem beyond a
    /// config file read.
    pub fn resolve(&self) -> PathBuf {
        // Priority 1: first positional command-line argument
        if let Some(path) = std::env::args().nth(1) {
            return PathBuf::from(path);
        }

        // Priority 2: environment variable
        if let Ok(path) = std::env::var("SKILLFORGE_ROOT") {
            return PathBuf::from(path);
        }

        // Priority 3: TOML config file
        if let Ok(config) = load_toml_config(&self.service_name) {
            if let Some(root) = config.root_folder {
                return PathBuf::from(root);
            }
        }

        // Priority 4: OS-dependent compiled default
        default_root_folder()
    }
}

/// Prepares the resolved root folder for use by a service
pub struct RootFolderInitializer {
    root: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root folder if it is missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Path of the shared SQLite database inside the root folder
    pub fn database_path(&self) -> PathBuf {
        self.root.join("skillforge.db")
    }

    /// Path of the index alert log inside the root folder
    pub fn alert_log_path(&self) -> PathBuf {
        self.root.join("index_alerts.json")
    }
}

/// Configuration file path for a service: `~/.config/skillforge/<service>.toml`
pub fn config_file_path(service_name: &str) -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("skillforge").join(format!("{}.toml", service_name)))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// Load the TOML configuration for a service; missing file is an error the
/// caller typically downgrades to defaults.
pub fn load_toml_config(service_name: &str) -> Result<TomlConfig> {
    let path = config_file_path(service_name)?;
    load_toml_from_path(&path)
}

/// Load a TOML configuration from an explicit path
pub fn load_toml_from_path(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Write a TOML configuration, creating parent directories as needed.
/// Writes to a temporary sibling first, then renames over the target.
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/skillforge (or /var/lib/skillforge for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("skillforge"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/skillforge"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("skillforge"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/skillforge"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("skillforge"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\skillforge"))
    } else {
        PathBuf::from("./skillforge_data")
    }
}
