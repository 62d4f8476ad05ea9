//! TOML-based configuration system.
//!
//! Loads settings from a `config.toml` file, falling back to defaults. Every
//! struct implements `Default` so a missing or partial config file still
//! yields a usable configuration.
//!
//! ## Config file search order
//!
//! 1. `GLCONTEXT_CONFIG` environment variable (explicit override)
//! 2. Next to the executable (`<exe_dir>/config.toml`)
//! 3. Platform config directory (`%APPDATA%\glcontext\config.toml` on Windows)
//! 4. Current working directory (`./config.toml`)
//! 5. No file found → `Config::default()`

use std::fs;
use std::io;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::context::ContextOptions;
use crate::diagnostics::TracingSink;
use crate::format::{FormatRequest, SurfaceType};
use crate::platform::FatalPolicy;

const CONFIG_ENV: &str = "GLCONTEXT_CONFIG";
const CONFIG_FILE: &str = "config.toml";

// ─────────────────────────────────────────────────────────────────────────────
// Config structs
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Requested surface format.
    pub format: FormatRequest,
    pub context: ContextConfig,
    pub diagnostics: DiagnosticsConfig,
    pub window: WindowConfig,
}

/// Native context settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Surface capability required from the chosen config.
    pub surface_type: SurfaceType,
    /// Path to libEGL. Unset = system default.
    pub library: Option<PathBuf>,
}

/// Tracing and failure handling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Trace every context call.
    pub verbose: bool,
    pub on_fatal: FatalPolicy,
}

/// Size of the smoke-test window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: i32,
    pub height: i32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Default impls
// ─────────────────────────────────────────────────────────────────────────────

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

impl Config {
    /// Context options built from the `[context]` and `[diagnostics]`
    /// sections.
    pub fn context_options(&self) -> ContextOptions {
        ContextOptions {
            surface_type: self.context.surface_type,
            diagnostics: Box::new(TracingSink::new(self.diagnostics.verbose)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Config loading and saving
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Loads configuration from the first config file found. A missing,
    /// unreadable or malformed file yields the defaults.
    pub fn load() -> Self {
        let Some(path) = find_config_path() else {
            info!("No config file found, using defaults");
            return Config::default();
        };
        match read_config(&path) {
            Ok(config) => {
                info!(path = %path.display(), "Configuration loaded");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unusable config, using defaults");
                Config::default()
            }
        }
    }

    /// Saves configuration to the platform config directory.
    /// Creates the directory if it doesn't exist.
    pub fn save(&self) -> io::Result<PathBuf> {
        let path = save_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(&path, content)?;
        info!(path = %path.display(), "Configuration saved");
        Ok(path)
    }
}

fn read_config(path: &Path) -> io::Result<Config> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Config file locations in lookup order: the `GLCONTEXT_CONFIG` override,
/// next to the executable, the platform config directory, then the working
/// directory.
fn config_candidates(override_path: Option<OsString>) -> Vec<PathBuf> {
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    override_path
        .map(PathBuf::from)
        .into_iter()
        .chain(
            [beside_exe, platform_config_dir(), Some(PathBuf::new())]
                .into_iter()
                .flatten()
                .map(|dir| dir.join(CONFIG_FILE)),
        )
        .collect()
}

fn find_config_path() -> Option<PathBuf> {
    config_candidates(std::env::var_os(CONFIG_ENV))
        .into_iter()
        .find(|path| path.is_file())
}

/// Returns the platform-specific save path for the config file.
fn save_path() -> PathBuf {
    platform_config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_FILE)
}

/// Returns the platform config directory without adding a dependency.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join("glcontext"))
    }
    #[cfg(not(windows))]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .or_else(|| std::env::var("HOME").ok().map(|h| format!("{h}/.config")))
            .map(|dir| PathBuf::from(dir).join("glcontext"))
    }
}
