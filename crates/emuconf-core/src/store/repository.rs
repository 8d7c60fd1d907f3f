//! Store repository trait.
//!
//! Defines the interface for reading and writing configuration files. The
//! on-disk text format is entirely the implementation's business.

use super::model::IniStore;
use crate::error::Result;

/// Whether `name` can be used as a file name stem for a store, a game id or
/// a profile.
///
/// Names reach the file system as `<dir>/<name>.<ext>`, so anything that
/// could leave `<dir>` is rejected: path separators, drive prefixes, `..`
/// and the empty name.
pub fn is_valid_file_stem(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains(['/', '\\', ':', '\0'])
}

/// An abstract repository for configuration file persistence.
///
/// # Implementation Notes
///
/// - A file that does not exist yet reads as an empty store.
/// - Names failing [`is_valid_file_stem`] must be refused, never resolved.
/// - The scoped placeholder key is an in-memory detail of the session and is
///   never passed here; scoped stores are addressed by entity id only.
pub trait StoreRepository: Send + Sync {
    /// Reads one of the global stores by its fixed name.
    fn read(&self, store_name: &str) -> Result<IniStore>;

    /// Writes one of the global stores by its fixed name.
    fn write(&self, store_name: &str, store: &IniStore) -> Result<()>;

    /// Reads the user override file of one entity (e.g. a game id).
    fn read_scoped(&self, entity_id: &str) -> Result<IniStore>;

    /// Writes the user override file of one entity.
    fn write_scoped(&self, entity_id: &str, store: &IniStore) -> Result<()>;

    /// Reads a named controller profile.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(IniStore))`: Profile found
    /// - `Ok(None)`: No profile with that name
    /// - `Err(_)`: Error occurred during retrieval
    fn read_controller_profile(&self, profile_name: &str) -> Result<Option<IniStore>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_ids_and_store_names_are_valid_stems() {
        for name in ["GALE01", "RMCE01_Wiimote1", "GFX", "WiimoteNew", "R8P.E01"] {
            assert!(is_valid_file_stem(name), "{name} rejected");
        }
    }

    #[test]
    fn test_names_leaving_the_directory_are_rejected() {
        for name in [
            "",
            ".",
            "..",
            "../Config/GFX",
            "Config/GFX",
            "..\\Config\\GFX",
            "C:GFX",
            "/etc/passwd",
            "GALE01\0",
        ] {
            assert!(!is_valid_file_stem(name), "{name:?} accepted");
        }
    }
}
