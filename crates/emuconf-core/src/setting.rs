//! Store names, section names and the few settings the session reads itself.

use crate::error::Result;
use crate::session::SettingsSession;

pub const FILE_DOLPHIN: &str = "Dolphin";
pub const FILE_SYSCONF: &str = "SYSCONF";
pub const FILE_GFX: &str = "GFX";
pub const FILE_LOGGER: &str = "Logger";
pub const FILE_GCPAD: &str = "GCPadNew";
pub const FILE_WIIMOTE: &str = "WiimoteNew";

/// The stores a global session loads and saves.
pub const GLOBAL_STORE_NAMES: [&str; 4] = [FILE_DOLPHIN, FILE_GFX, FILE_LOGGER, FILE_WIIMOTE];

/// In-memory key of the single store of a scoped session. Never a file name.
pub const SCOPED_PLACEHOLDER_KEY: &str = "";

pub const SECTION_INI_GENERAL: &str = "General";
pub const SECTION_INI_CORE: &str = "Core";
pub const SECTION_INI_INTERFACE: &str = "Interface";

pub const SECTION_LOGGER_LOGS: &str = "Logs";

pub const SECTION_GFX_SETTINGS: &str = "Settings";
pub const SECTION_GFX_HACKS: &str = "Hacks";

pub const SECTION_WIIMOTE: &str = "Wiimote";
pub const SECTION_PROFILE: &str = "Profile";

/// Only ever written to the global `Dolphin` store. Its presence in a per-game
/// file marks a file produced by the old save routine that copied everything.
pub const LEGACY_GLOBAL_ONLY_KEY: &str = "ThemeName";

/// A boolean stored at a fixed `(file, section, key)` location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BooleanSetting {
    pub file: &'static str,
    pub section: &'static str,
    pub key: &'static str,
    pub default: bool,
}

impl BooleanSetting {
    pub const fn new(
        file: &'static str,
        section: &'static str,
        key: &'static str,
        default: bool,
    ) -> Self {
        Self {
            file,
            section,
            key,
            default,
        }
    }

    /// Reads the value without creating the section.
    pub fn get(&self, settings: &SettingsSession) -> Result<bool> {
        Ok(settings
            .find_section(self.file, self.section)?
            .map_or(self.default, |section| section.get_bool(self.key, self.default)))
    }

    pub fn set(&self, settings: &mut SettingsSession, value: bool) -> Result<()> {
        settings
            .get_section(self.file, self.section)?
            .set_bool(self.key, value);
        Ok(())
    }
}

/// Whether game folders are scanned recursively. Flipping it requires a
/// library rescan after saving.
pub const MAIN_RECURSIVE_ISO_PATHS: BooleanSetting =
    BooleanSetting::new(FILE_DOLPHIN, SECTION_INI_GENERAL, "RecursiveISOPaths", false);
