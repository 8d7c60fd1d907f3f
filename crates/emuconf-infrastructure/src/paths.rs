//! Unified path management for emuconf files.
//!
//! Every file the infrastructure touches is resolved here, under one root.

use emuconf_core::{EmuconfError, is_valid_file_stem};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the default root directory.
pub const ROOT_ENV_VAR: &str = "EMUCONF_ROOT";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
    /// A store, game or profile name that would resolve outside its directory.
    InvalidName(String),
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
            PathError::InvalidName(name) => write!(f, "Invalid file name: {:?}", name),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for EmuconfError {
    fn from(e: PathError) -> Self {
        match e {
            PathError::ConfigDirNotFound => EmuconfError::io(e.to_string()),
            PathError::InvalidName(_) => EmuconfError::contract(e.to_string()),
        }
    }
}

fn named_file(dir: &Path, name: &str) -> Result<PathBuf, PathError> {
    if !is_valid_file_stem(name) {
        return Err(PathError::InvalidName(name.to_string()));
    }
    Ok(dir.join(format!("{name}.toml")))
}

/// Unified path management for emuconf.
///
/// # Directory Structure
///
/// ```text
/// <root>/                          # ~/.config/emuconf by default
/// ├── Config/
/// │   ├── Dolphin.toml             # Global stores, one file per store
/// │   ├── GFX.toml
/// │   ├── Logger.toml
/// │   ├── WiimoteNew.toml
/// │   ├── Layers/
/// │   │   └── BaseOrCurrent.toml   # Base layer of the layer store
/// │   └── Profiles/
/// │       └── Wiimote/<name>.toml  # Controller profiles
/// └── GameSettings/
///     ├── <id>.toml                # Per-game override stores
///     └── Layers/<id>.toml         # Per-game layers
/// ```
///
/// Methods taking a store name, game id or profile name refuse names that
/// would resolve outside their directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmuconfPaths {
    root: PathBuf,
}

impl EmuconfPaths {
    /// Creates a path resolver under `root`.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolves the root from `EMUCONF_ROOT`, falling back to the platform
    /// config directory (e.g. `~/.config/emuconf`).
    pub fn from_env() -> Result<Self, PathError> {
        if let Some(root) = std::env::var_os(ROOT_ENV_VAR).filter(|v| !v.is_empty()) {
            return Ok(Self::new(PathBuf::from(root)));
        }
        Self::default_location()
    }

    /// The platform config directory with `emuconf` appended.
    pub fn default_location() -> Result<Self, PathError> {
        dirs::config_dir()
            .map(|dir| Self::new(dir.join("emuconf")))
            .ok_or(PathError::ConfigDirNotFound)
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Directory holding the global stores.
    pub fn config_dir(&self) -> PathBuf {
        self.root.join("Config")
    }

    /// File of one global store.
    pub fn store_file(&self, store_name: &str) -> Result<PathBuf, PathError> {
        named_file(&self.config_dir(), store_name)
    }

    /// Directory holding the per-game override stores.
    pub fn game_settings_dir(&self) -> PathBuf {
        self.root.join("GameSettings")
    }

    pub fn scoped_store_file(&self, entity_id: &str) -> Result<PathBuf, PathError> {
        named_file(&self.game_settings_dir(), entity_id)
    }

    pub fn controller_profile_file(&self, profile_name: &str) -> Result<PathBuf, PathError> {
        named_file(
            &self.config_dir().join("Profiles").join("Wiimote"),
            profile_name,
        )
    }

    pub fn base_layer_file(&self) -> PathBuf {
        self.config_dir().join("Layers").join("BaseOrCurrent.toml")
    }

    pub fn scoped_layer_file(&self, entity_id: &str) -> Result<PathBuf, PathError> {
        named_file(&self.game_settings_dir().join("Layers"), entity_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> EmuconfPaths {
        EmuconfPaths::new(PathBuf::from("/tmp/emuconf-test"))
    }

    #[test]
    fn test_store_file() {
        let file = paths().store_file("GFX").unwrap();
        assert!(file.ends_with("Config/GFX.toml"));
        assert!(file.starts_with(paths().config_dir()));
    }

    #[test]
    fn test_scoped_files_live_under_game_settings() {
        let paths = paths();
        let store = paths.scoped_store_file("GALE01").unwrap();
        let layer = paths.scoped_layer_file("GALE01").unwrap();

        assert!(store.ends_with("GameSettings/GALE01.toml"));
        assert!(layer.ends_with("GameSettings/Layers/GALE01.toml"));
        assert_ne!(store, layer);
    }

    #[test]
    fn test_controller_profile_file() {
        let file = paths().controller_profile_file("RMCE01_Wiimote1").unwrap();
        assert!(file.ends_with("Config/Profiles/Wiimote/RMCE01_Wiimote1.toml"));
    }

    #[test]
    fn test_names_escaping_their_directory_are_refused() {
        let paths = paths();

        for name in ["../Config/GFX", "..", "", "Layers/GALE01"] {
            assert!(matches!(
                paths.scoped_store_file(name),
                Err(PathError::InvalidName(_))
            ));
            assert!(paths.scoped_layer_file(name).is_err());
            assert!(paths.store_file(name).is_err());
            assert!(paths.controller_profile_file(name).is_err());
        }

        let err: EmuconfError = PathError::InvalidName("../Config/GFX".to_string()).into();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_default_location() {
        if let Ok(paths) = EmuconfPaths::default_location() {
            assert!(paths.root().ends_with("emuconf"));
        }
    }
}
