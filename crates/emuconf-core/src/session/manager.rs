use super::state::{ScopedState, SessionState};
use crate::error::{EmuconfError, Result};
use crate::host::{HostHooks, LibraryRescan};
use crate::layer::{LayerId, LayerStore};
use crate::section_name::map_section_name_from_ini;
use crate::setting::{
    GLOBAL_STORE_NAMES, LEGACY_GLOBAL_ONLY_KEY, MAIN_RECURSIVE_ISO_PATHS, SCOPED_PLACEHOLDER_KEY,
    SECTION_INI_INTERFACE, SECTION_PROFILE, SECTION_WIIMOTE,
};
use crate::store::{IniStore, Section, StoreRepository, is_valid_file_stem};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One unit of settings editing: either every global store, or the override
/// file of a single game.
///
/// `SettingsSession` is responsible for:
/// - Loading the stores for its mode and resolving section lookups
/// - Persisting stores and keeping the layer store in step
/// - Notifying the host after a global save
/// - Releasing the per-game layer on close
///
/// The session is not internally synchronized; drive it from one thread.
pub struct SettingsSession {
    state: SessionState,
    /// `RecursiveISOPaths` as it was right after the last load.
    loaded_recursive_iso_paths: bool,
    store_repository: Arc<dyn StoreRepository>,
    layer_store: Arc<dyn LayerStore>,
    host: Arc<dyn HostHooks>,
}

impl SettingsSession {
    /// Creates an empty session. Nothing is read until a load call.
    ///
    /// # Arguments
    ///
    /// * `store_repository` - Reads and writes the configuration files
    /// * `layer_store` - The layered config engine kept in sync with this session
    /// * `host` - Notification and query hooks into the host application
    pub fn new(
        store_repository: Arc<dyn StoreRepository>,
        layer_store: Arc<dyn LayerStore>,
        host: Arc<dyn HostHooks>,
    ) -> Self {
        Self {
            state: SessionState::Unloaded,
            loaded_recursive_iso_paths: false,
            store_repository,
            layer_store,
            host,
        }
    }

    // ============================================================================
    // Mode and identity
    // ============================================================================

    /// True for a per-game session.
    pub fn is_scoped(&self) -> bool {
        matches!(self.state, SessionState::Scoped(_))
    }

    /// The game id of a scoped session.
    pub fn scoped_id(&self) -> Option<&str> {
        match &self.state {
            SessionState::Scoped(scoped) => Some(&scoped.entity_id),
            _ => None,
        }
    }

    pub fn scoped_revision(&self) -> Option<u16> {
        match &self.state {
            SessionState::Scoped(scoped) => Some(scoped.revision),
            _ => None,
        }
    }

    /// The layer that edits made through this session belong to.
    pub fn write_layer(&self) -> LayerId {
        if self.is_scoped() {
            LayerId::LocalScoped
        } else {
            LayerId::BaseOrCurrent
        }
    }

    /// True until a load has populated the session.
    pub fn is_empty(&self) -> bool {
        match &self.state {
            SessionState::Unloaded => true,
            SessionState::Global { stores } => stores.is_empty(),
            SessionState::Scoped(_) => false,
        }
    }

    /// Keys of the loaded stores: the global store names, or the placeholder
    /// key for a scoped session.
    pub fn store_keys(&self) -> Vec<&str> {
        match &self.state {
            SessionState::Unloaded => Vec::new(),
            SessionState::Global { stores } => {
                let mut keys: Vec<&str> = stores.keys().map(String::as_str).collect();
                keys.sort_unstable();
                keys
            }
            SessionState::Scoped(_) => vec![SCOPED_PLACEHOLDER_KEY],
        }
    }

    /// The loaded stores under their keys, in key order.
    pub fn loaded_stores(&self) -> Vec<(&str, &IniStore)> {
        match &self.state {
            SessionState::Unloaded => Vec::new(),
            SessionState::Global { stores } => {
                let mut loaded: Vec<(&str, &IniStore)> = stores
                    .iter()
                    .map(|(name, store)| (name.as_str(), store))
                    .collect();
                loaded.sort_unstable_by_key(|(name, _)| *name);
                loaded
            }
            SessionState::Scoped(scoped) => vec![(SCOPED_PLACEHOLDER_KEY, &scoped.store)],
        }
    }

    // ============================================================================
    // Section access
    // ============================================================================

    /// Returns the section, creating it if needed.
    ///
    /// A global session looks up `file_name` among its stores. A scoped
    /// session ignores `file_name` and translates `section_name` to the
    /// per-game naming.
    ///
    /// # Errors
    ///
    /// `ContractViolation` if nothing is loaded or `file_name` is not one of
    /// the loaded global stores.
    pub fn get_section(&mut self, file_name: &str, section_name: &str) -> Result<&mut Section> {
        match &mut self.state {
            SessionState::Unloaded => Err(EmuconfError::contract(format!(
                "section '{section_name}' requested before settings were loaded"
            ))),
            SessionState::Global { stores } => stores
                .get_mut(file_name)
                .map(|store| store.get_or_create_section(section_name))
                .ok_or_else(|| {
                    EmuconfError::contract(format!("store '{file_name}' is not loaded"))
                }),
            SessionState::Scoped(scoped) => Ok(scoped
                .store
                .get_or_create_section(map_section_name_from_ini(section_name))),
        }
    }

    /// Same resolution as [`SettingsSession::get_section`] without creating
    /// missing sections.
    pub fn find_section(&self, file_name: &str, section_name: &str) -> Result<Option<&Section>> {
        match &self.state {
            SessionState::Unloaded => Err(EmuconfError::contract(format!(
                "section '{section_name}' requested before settings were loaded"
            ))),
            SessionState::Global { stores } => stores
                .get(file_name)
                .map(|store| store.section(section_name))
                .ok_or_else(|| {
                    EmuconfError::contract(format!("store '{file_name}' is not loaded"))
                }),
            SessionState::Scoped(scoped) => Ok(scoped
                .store
                .section(map_section_name_from_ini(section_name))),
        }
    }

    /// The single store of a scoped session.
    pub fn scoped_store(&self) -> Result<&IniStore> {
        Ok(&self.scoped_state()?.store)
    }

    pub fn scoped_store_mut(&mut self) -> Result<&mut IniStore> {
        Ok(&mut self.scoped_state_mut()?.store)
    }

    fn scoped_state(&self) -> Result<&ScopedState> {
        match &self.state {
            SessionState::Scoped(scoped) => Ok(scoped),
            _ => Err(EmuconfError::contract(
                "the scoped store is only available in a scoped session",
            )),
        }
    }

    fn scoped_state_mut(&mut self) -> Result<&mut ScopedState> {
        match &mut self.state {
            SessionState::Scoped(scoped) => Ok(scoped),
            _ => Err(EmuconfError::contract(
                "the scoped store is only available in a scoped session",
            )),
        }
    }

    // ============================================================================
    // Loading
    // ============================================================================

    /// Loads every global store, replacing whatever the session held before.
    pub fn load_global(&mut self) -> Result<()> {
        self.release_scoped_layer()?;
        self.state = SessionState::Global {
            stores: HashMap::new(),
        };

        let mut stores = HashMap::with_capacity(GLOBAL_STORE_NAMES.len());
        for name in GLOBAL_STORE_NAMES {
            debug!(store = name, "Reading store");
            stores.insert(name.to_string(), self.store_repository.read(name)?);
        }
        self.state = SessionState::Global { stores };

        self.snapshot_recursive_iso_paths()?;
        info!("[Settings] Loaded global settings");
        Ok(())
    }

    /// Loads the override file of one game, replacing whatever the session
    /// held before. An empty `entity_id` loads the global stores instead.
    ///
    /// # Errors
    ///
    /// `ContractViolation` if `entity_id` cannot name a file, and
    /// `SimulationActive` if the emulation core is running. The session is
    /// left untouched in both cases.
    pub fn load_scoped(&mut self, entity_id: &str, revision: u16) -> Result<()> {
        if entity_id.is_empty() {
            return self.load_global();
        }

        if !is_valid_file_stem(entity_id) {
            return Err(EmuconfError::contract(format!(
                "'{entity_id}' is not a valid game id"
            )));
        }

        // The running core holds its own copy of the per-game layer.
        if self.host.is_simulation_active() {
            return Err(EmuconfError::SimulationActive {
                entity_id: entity_id.to_string(),
            });
        }

        self.release_scoped_layer()?;
        self.state = SessionState::Scoped(ScopedState::new(entity_id, revision));

        self.layer_store.load_scoped_layer(entity_id, revision)?;
        let store = self.store_repository.read_scoped(entity_id)?;
        self.scoped_state_mut()?.store = store;

        self.snapshot_recursive_iso_paths()?;
        info!("[Settings] Loaded settings for {} (revision {})", entity_id, revision);
        Ok(())
    }

    /// Loads again with the current identity. An unloaded session loads the
    /// global stores.
    pub fn reload(&mut self) -> Result<()> {
        let identity = match &self.state {
            SessionState::Scoped(scoped) => Some((scoped.entity_id.clone(), scoped.revision)),
            _ => None,
        };

        match identity {
            Some((entity_id, revision)) => self.load_scoped(&entity_id, revision),
            None => self.load_global(),
        }
    }

    /// Merges the saved Wii Remote profile for `pad_id` (zero-based) into the
    /// scoped store. Does nothing when no such profile exists.
    pub fn load_controller_profile(&mut self, pad_id: u8) -> Result<()> {
        let slot = u32::from(pad_id) + 1;
        let profile_name = format!("{}_{}{}", self.scoped_state()?.entity_id, SECTION_WIIMOTE, slot);

        let Some(profile) = self.store_repository.read_controller_profile(&profile_name)? else {
            debug!(profile = %profile_name, "No controller profile to merge");
            return Ok(());
        };

        let target = self
            .scoped_store_mut()?
            .get_or_create_section(&format!("{SECTION_WIIMOTE}{slot}"));
        if let Some(source) = profile.section(SECTION_PROFILE) {
            for (key, value) in source.iter() {
                target.set(key, value);
            }
        }

        debug!(profile = %profile_name, "Merged controller profile");
        Ok(())
    }

    fn snapshot_recursive_iso_paths(&mut self) -> Result<()> {
        self.loaded_recursive_iso_paths = MAIN_RECURSIVE_ISO_PATHS.get(self)?;
        Ok(())
    }

    // ============================================================================
    // Saving and resetting
    // ============================================================================

    /// Writes the session's stores and persists its layer.
    ///
    /// A global save additionally tells the host to pick up the new values
    /// and starts a library rescan when `RecursiveISOPaths` changed since the
    /// load. Those notifications fire on every call.
    pub fn save_settings(&self) -> Result<()> {
        match &self.state {
            SessionState::Unloaded => Err(EmuconfError::contract(
                "save_settings called before settings were loaded",
            )),
            SessionState::Global { stores } => {
                let mut names: Vec<&String> = stores.keys().collect();
                names.sort_unstable();
                for name in names {
                    debug!(store = %name, "Writing store");
                    self.store_repository.write(name, &stores[name])?;
                }

                self.layer_store.persist(LayerId::BaseOrCurrent)?;

                if !self.host.is_simulation_active() {
                    // Legacy consumers only read their files when idle.
                    self.host.reload_legacy_config();
                    self.host.reload_secondary_controller_config();
                }
                self.host.reload_logging_config();
                self.host.rescan_peripheral_adapters();

                let recursive_iso_paths = MAIN_RECURSIVE_ISO_PATHS.get(self)?;
                if recursive_iso_paths != self.loaded_recursive_iso_paths {
                    self.host.start_library_rescan(LibraryRescan {
                        recursive_iso_paths,
                    });
                }

                info!("[Settings] Saved settings to store files");
                Ok(())
            }
            SessionState::Scoped(scoped) => {
                self.store_repository
                    .write_scoped(&scoped.entity_id, &scoped.store)?;
                self.layer_store.persist(LayerId::LocalScoped)?;

                info!("[Settings] Saved settings for {}", scoped.entity_id);
                Ok(())
            }
        }
    }

    /// Empties every loaded store. Mode, store keys and the layer store are
    /// left alone and nothing is written.
    pub fn clear_settings(&mut self) {
        match &mut self.state {
            SessionState::Unloaded => {}
            SessionState::Global { stores } => {
                for store in stores.values_mut() {
                    *store = IniStore::new();
                }
            }
            SessionState::Scoped(scoped) => scoped.store = IniStore::new(),
        }
    }

    /// Detects a per-game file written by the old save routine, which copied
    /// most global settings into every game file it saved.
    ///
    /// Such files hold entries games cannot override and pin stale global
    /// values, and there is no telling which lines the user added on purpose.
    /// `ThemeName` only ever lived in the global file, so its presence in the
    /// game's `Interface` section gives the file away. A user who wrote that
    /// key by hand gets a false positive. Deleting the file is up to the
    /// caller.
    pub fn scoped_store_contains_legacy_junk(&self) -> bool {
        let SessionState::Scoped(scoped) = &self.state else {
            return false;
        };

        scoped
            .store
            .section(map_section_name_from_ini(SECTION_INI_INTERFACE))
            .is_some_and(|section| section.exists(LEGACY_GLOBAL_ONLY_KEY))
    }

    // ============================================================================
    // Closing
    // ============================================================================

    /// Hands the per-game layer back to the layer store. No-op for a global
    /// session and on every call after the first.
    pub fn close(&mut self) -> Result<()> {
        if let Some(entity_id) = self.scoped_id() {
            info!("[Settings] Closing settings for {}", entity_id);
        }
        self.release_scoped_layer()
    }

    fn release_scoped_layer(&mut self) -> Result<()> {
        let SessionState::Scoped(scoped) = &mut self.state else {
            return Ok(());
        };
        if scoped.layer_released {
            return Ok(());
        }

        // Marked first so a failing unload is never retried.
        scoped.layer_released = true;
        self.layer_store.unload_scoped_layer()
    }
}

impl Drop for SettingsSession {
    fn drop(&mut self) {
        if let SessionState::Scoped(scoped) = &self.state
            && !scoped.layer_released
        {
            warn!(
                "[Settings] Scoped session for {} dropped without close; unloading its layer",
                scoped.entity_id
            );
            if let Err(e) = self.release_scoped_layer() {
                warn!("[Settings] Failed to unload scoped layer: {}", e);
            }
        }
    }
}
