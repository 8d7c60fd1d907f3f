//! File-backed layered config engine.
//!
//! Holds the base layer and at most one per-game layer. Lookups walk the
//! layers from highest precedence down, so a per-game value hides the base
//! value for as long as that game's layer is loaded.

use crate::paths::EmuconfPaths;
use crate::storage::StoreFile;
use emuconf_core::{EmuconfError, IniStore, LayerId, LayerStore, Result};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

#[derive(Debug)]
struct ScopedLayer {
    entity_id: String,
    revision: u16,
    values: IniStore,
}

#[derive(Debug)]
struct LayerState {
    base: IniStore,
    scoped: Option<ScopedLayer>,
}

/// A [`LayerStore`] persisting each layer to its own TOML file.
#[derive(Debug)]
pub struct FileLayerStore {
    paths: EmuconfPaths,
    state: Mutex<LayerState>,
}

impl FileLayerStore {
    /// Opens the layer store, reading the base layer from disk.
    pub fn open(paths: EmuconfPaths) -> Result<Self> {
        let base = StoreFile::new(paths.base_layer_file()).load()?;
        Ok(Self {
            paths,
            state: Mutex::new(LayerState { base, scoped: None }),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, LayerState>> {
        self.state
            .lock()
            .map_err(|_| EmuconfError::internal("layer store lock poisoned"))
    }

    /// Resolves a value across the loaded layers.
    pub fn get(&self, section: &str, key: &str) -> Result<Option<String>> {
        let state = self.lock()?;
        let scoped = state.scoped.as_ref().map(|layer| &layer.values);

        Ok([scoped, Some(&state.base)]
            .into_iter()
            .flatten()
            .find_map(|layer| layer.section(section).and_then(|s| s.get(key)))
            .map(str::to_string))
    }

    /// Writes a value into one layer. Nothing reaches disk until [`LayerStore::persist`].
    pub fn set(&self, layer: LayerId, section: &str, key: &str, value: &str) -> Result<()> {
        let mut state = self.lock()?;
        let values = match layer {
            LayerId::BaseOrCurrent => &mut state.base,
            LayerId::LocalScoped => {
                &mut state
                    .scoped
                    .as_mut()
                    .ok_or_else(|| EmuconfError::layer("no scoped layer is loaded"))?
                    .values
            }
        };
        values.get_or_create_section(section).set(key, value);
        Ok(())
    }

    /// The `(entity_id, revision)` of the loaded per-game layer.
    pub fn scoped_identity(&self) -> Result<Option<(String, u16)>> {
        let state = self.lock()?;
        Ok(state
            .scoped
            .as_ref()
            .map(|layer| (layer.entity_id.clone(), layer.revision)))
    }
}

impl LayerStore for FileLayerStore {
    fn load_scoped_layer(&self, entity_id: &str, revision: u16) -> Result<()> {
        let values = StoreFile::new(self.paths.scoped_layer_file(entity_id)?).load()?;

        let mut state = self.lock()?;
        if let Some(previous) = &state.scoped {
            warn!(
                "[Layers] Replacing scoped layer for {} with {}",
                previous.entity_id, entity_id
            );
        }
        state.scoped = Some(ScopedLayer {
            entity_id: entity_id.to_string(),
            revision,
            values,
        });

        info!("[Layers] Loaded scoped layer for {} (revision {})", entity_id, revision);
        Ok(())
    }

    fn unload_scoped_layer(&self) -> Result<()> {
        let mut state = self.lock()?;
        if let Some(layer) = state.scoped.take() {
            info!("[Layers] Unloaded scoped layer for {}", layer.entity_id);
        }
        Ok(())
    }

    fn persist(&self, layer: LayerId) -> Result<()> {
        let state = self.lock()?;
        match layer {
            LayerId::BaseOrCurrent => {
                StoreFile::new(self.paths.base_layer_file()).save(&state.base)?;
            }
            LayerId::LocalScoped => {
                let scoped = state
                    .scoped
                    .as_ref()
                    .ok_or_else(|| EmuconfError::layer("no scoped layer is loaded"))?;
                StoreFile::new(self.paths.scoped_layer_file(&scoped.entity_id)?)
                    .save(&scoped.values)?;
            }
        }

        debug!(layer = %layer, "Persisted layer");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(temp_dir: &TempDir) -> FileLayerStore {
        FileLayerStore::open(EmuconfPaths::new(temp_dir.path().to_path_buf())).unwrap()
    }

    #[test]
    fn test_scoped_layer_takes_precedence() {
        let temp_dir = TempDir::new().unwrap();
        let layers = open(&temp_dir);

        layers
            .set(LayerId::BaseOrCurrent, "Core", "GFXBackend", "OGL")
            .unwrap();
        layers.load_scoped_layer("GALE01", 0).unwrap();
        layers
            .set(LayerId::LocalScoped, "Core", "GFXBackend", "Vulkan")
            .unwrap();

        assert_eq!(
            layers.get("Core", "GFXBackend").unwrap(),
            Some("Vulkan".to_string())
        );

        layers.unload_scoped_layer().unwrap();
        assert_eq!(
            layers.get("Core", "GFXBackend").unwrap(),
            Some("OGL".to_string())
        );
        assert_eq!(layers.get("Core", "Missing").unwrap(), None);
    }

    #[test]
    fn test_scoped_write_requires_loaded_layer() {
        let temp_dir = TempDir::new().unwrap();
        let layers = open(&temp_dir);

        let err = layers
            .set(LayerId::LocalScoped, "Core", "CPUThread", "False")
            .unwrap_err();
        assert!(matches!(err, EmuconfError::Layer(_)));
        assert!(layers.persist(LayerId::LocalScoped).is_err());
    }

    #[test]
    fn test_unload_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let layers = open(&temp_dir);

        layers.load_scoped_layer("GALE01", 1).unwrap();
        assert_eq!(
            layers.scoped_identity().unwrap(),
            Some(("GALE01".to_string(), 1))
        );

        layers.unload_scoped_layer().unwrap();
        layers.unload_scoped_layer().unwrap();
        assert_eq!(layers.scoped_identity().unwrap(), None);
    }

    #[test]
    fn test_scoped_layer_id_must_stay_in_game_settings() {
        let temp_dir = TempDir::new().unwrap();
        let layers = open(&temp_dir);

        let err = layers.load_scoped_layer("../Config/Layers/BaseOrCurrent", 0).unwrap_err();
        assert!(err.is_contract_violation());
        assert_eq!(layers.scoped_identity().unwrap(), None);
    }

    #[test]
    fn test_persisted_layers_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let layers = open(&temp_dir);
            layers
                .set(LayerId::BaseOrCurrent, "General", "ISOPaths", "1")
                .unwrap();
            layers.persist(LayerId::BaseOrCurrent).unwrap();

            layers.load_scoped_layer("GALE01", 0).unwrap();
            layers
                .set(LayerId::LocalScoped, "Core", "CPUThread", "False")
                .unwrap();
            layers.persist(LayerId::LocalScoped).unwrap();
        }

        let layers = open(&temp_dir);
        assert_eq!(
            layers.get("General", "ISOPaths").unwrap(),
            Some("1".to_string())
        );
        assert_eq!(layers.get("Core", "CPUThread").unwrap(), None);

        layers.load_scoped_layer("GALE01", 0).unwrap();
        assert_eq!(
            layers.get("Core", "CPUThread").unwrap(),
            Some("False".to_string())
        );
    }
}
