//! Configuration loading and root folder resolution
//!
//! Root folder priority, highest first:
//! 1. Command-line argument
//! 2. `WVM_ROOT_FOLDER` environment variable
//! 3. `root_folder` in the TOML config file
//! 4. OS-dependent compiled default

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "WVM_ROOT_FOLDER";

/// Catalog document filename inside the root folder
pub const DATA_FILE: &str = "data.json";

/// Upload area, relative to the root folder. Every stored image path starts with it.
pub const UPLOAD_DIR: &str = "uploads";

/// Map images, inside the upload area
pub const MAP_UPLOAD_DIR: &str = "maps";

/// Visitor photo-request submissions, inside the upload area
pub const PHOTO_REQUEST_UPLOAD_DIR: &str = "photo-requests";

/// Page template used by the static export
pub const TEMPLATE_FILE: &str = "templates/map-template.html";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the catalog document, uploads and templates
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTTP bind address
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Hex SHA-256 of the admin password. Auth is disabled when absent.
    #[serde(default)]
    pub admin_password_hash: Option<String>,

    /// Admin session lifetime
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,

    /// Directory receiving exported pages (defaults to the root folder)
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            port: default_port(),
            bind: default_bind(),
            admin_password_hash: None,
            session_ttl_hours: default_session_ttl_hours(),
            export_dir: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_session_ttl_hours() -> i64 {
    24
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Load the platform config file, or defaults when none exists
    ///
    /// A missing file is normal. An unparsable one is logged and ignored.
    pub fn load_or_default() -> Self {
        let Some(path) = config_file_path() else {
            debug!("No config file found, using defaults");
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file: {}", e);
                Self::default()
            }
        }
    }
}

/// Locate the TOML config file for the platform, if one exists
///
/// Linux checks `~/.config/wvm/config.toml` then `/etc/wvm/config.toml`.
pub fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("wvm").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc/wvm/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Resolves the root folder from CLI, environment, TOML and compiled default
#[derive(Debug, Clone, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>, toml: &TomlConfig) -> Self {
        Self {
            cli_arg,
            toml_root: toml.root_folder.clone(),
        }
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_root {
            return path.clone();
        }

        default_root_folder()
    }
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("wvm"))
        .unwrap_or_else(|| PathBuf::from("./wvm_data"))
}

/// Every path the service uses, derived from one root folder
#[derive(Debug, Clone)]
pub struct RootLayout {
    root: PathBuf,
    export_dir: PathBuf,
}

impl RootLayout {
    pub fn new(root: PathBuf) -> Self {
        Self {
            export_dir: root.clone(),
            root,
        }
    }

    /// Write exported pages somewhere other than the root folder
    pub fn with_export_dir(mut self, export_dir: PathBuf) -> Self {
        self.export_dir = export_dir;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_file(&self) -> PathBuf {
        self.root.join(DATA_FILE)
    }

    pub fn upload_root(&self) -> PathBuf {
        self.root.join(UPLOAD_DIR)
    }

    pub fn template_file(&self) -> PathBuf {
        self.root.join(TEMPLATE_FILE)
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Create the root folder and upload areas (idempotent)
    pub fn ensure_directories(&self) -> Result<()> {
        let upload_root = self.upload_root();
        std::fs::create_dir_all(upload_root.join(MAP_UPLOAD_DIR))?;
        std::fs::create_dir_all(upload_root.join(PHOTO_REQUEST_UPLOAD_DIR))?;
        std::fs::create_dir_all(&self.export_dir)?;
        Ok(())
    }
}
