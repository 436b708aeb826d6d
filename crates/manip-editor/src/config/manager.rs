//! Configuration manager for loading, saving, and managing manipulator configuration

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use super::ManipulatorConfig;

/// Shared configuration manager type
pub type SharedConfig = Arc<RwLock<ConfigManager>>;

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    Serialize(String),
    /// Error during deserialization
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

/// Configuration manager handles loading, saving, and accessing manipulator configuration
pub struct ConfigManager {
    config: ManipulatorConfig,
    config_path: PathBuf,
    dirty: bool,
}

impl ConfigManager {
    /// Create a new configuration manager, loading from disk if available
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    /// Create a configuration manager backed by a specific file
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        let config_path = config_path.into();
        let config = match Self::load_from_path(&config_path) {
            Ok(config) => config,
            Err(ConfigError::Io(_)) => {
                tracing::info!("No config file found, using defaults");
                ManipulatorConfig::new()
            }
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {}", e);
                ManipulatorConfig::new()
            }
        };

        Self {
            config,
            config_path,
            dirty: false,
        }
    }

    /// Get the OS-standard configuration directory
    fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scene-manipulator")
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> PathBuf {
        Self::config_dir().join("config.ron")
    }

    /// Load configuration from a file path
    pub fn load_from_path(path: &Path) -> Result<ManipulatorConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let mut config: ManipulatorConfig =
            ron::from_str(&content).map_err(|e| ConfigError::Deserialize(e.to_string()))?;

        if config.version != ManipulatorConfig::CURRENT_VERSION {
            tracing::warn!(
                "Config version {} differs from {}, missing fields use defaults",
                config.version,
                ManipulatorConfig::CURRENT_VERSION
            );
            config.version = ManipulatorConfig::CURRENT_VERSION;
        }

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get a reference to the current configuration
    pub fn config(&self) -> &ManipulatorConfig {
        &self.config
    }

    /// Get a mutable reference to the configuration (marks as dirty)
    pub fn config_mut(&mut self) -> &mut ManipulatorConfig {
        self.dirty = true;
        &mut self.config
    }

    /// Check if the configuration has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Save the configuration to disk
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if !self.dirty {
            return Ok(());
        }

        save_to_path(&self.config, &self.config_path)?;
        self.dirty = false;
        Ok(())
    }

    /// Reset configuration to defaults
    pub fn reset_to_defaults(&mut self) {
        self.config = ManipulatorConfig::new();
        self.dirty = true;
    }

    /// Get the config file path (for display purposes)
    pub fn config_file_path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a configuration as pretty RON, creating parent directories
pub fn save_to_path(config: &ManipulatorConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
    }

    let content = ron::ser::to_string_pretty(config, ron::ser::PrettyConfig::default())
        .map_err(|e| ConfigError::Serialize(e.to_string()))?;

    std::fs::write(path, &content).map_err(|e| ConfigError::Io(e.to_string()))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

/// Create a new shared configuration manager
pub fn create_shared_config() -> SharedConfig {
    Arc::new(RwLock::new(ConfigManager::new()))
}
