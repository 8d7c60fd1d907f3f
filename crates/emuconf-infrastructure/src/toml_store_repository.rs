//! TOML-based StoreRepository implementation.

use crate::paths::EmuconfPaths;
use crate::storage::StoreFile;
use emuconf_core::{IniStore, Result, StoreRepository};
use tracing::debug;

/// A repository that keeps every store in its own TOML file.
#[derive(Debug, Clone)]
pub struct TomlStoreRepository {
    paths: EmuconfPaths,
}

impl TomlStoreRepository {
    pub fn new(paths: EmuconfPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &EmuconfPaths {
        &self.paths
    }
}

impl StoreRepository for TomlStoreRepository {
    fn read(&self, store_name: &str) -> Result<IniStore> {
        let file = StoreFile::new(self.paths.store_file(store_name)?);
        debug!(path = %file.path().display(), "Reading store file");
        Ok(file.load()?)
    }

    fn write(&self, store_name: &str, store: &IniStore) -> Result<()> {
        let file = StoreFile::new(self.paths.store_file(store_name)?);
        debug!(path = %file.path().display(), "Writing store file");
        Ok(file.save(store)?)
    }

    fn read_scoped(&self, entity_id: &str) -> Result<IniStore> {
        Ok(StoreFile::new(self.paths.scoped_store_file(entity_id)?).load()?)
    }

    fn write_scoped(&self, entity_id: &str, store: &IniStore) -> Result<()> {
        Ok(StoreFile::new(self.paths.scoped_store_file(entity_id)?).save(store)?)
    }

    fn read_controller_profile(&self, profile_name: &str) -> Result<Option<IniStore>> {
        let file = StoreFile::new(self.paths.controller_profile_file(profile_name)?);
        if !file.exists() {
            return Ok(None);
        }
        Ok(Some(file.load()?))
    }
}
