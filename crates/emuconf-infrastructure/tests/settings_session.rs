use emuconf_core::setting::{
    FILE_DOLPHIN, FILE_GFX, GLOBAL_STORE_NAMES, MAIN_RECURSIVE_ISO_PATHS, SECTION_GFX_SETTINGS,
};
use emuconf_core::{LayerId, LibraryRescan, SettingsSession};
use emuconf_infrastructure::{
    ChannelHostHooks, EmuconfPaths, FileLayerStore, HostEvent, TomlStoreRepository, drain_events,
    logging,
};
use std::sync::Arc;
use tempfile::TempDir;

struct Harness {
    _temp_dir: TempDir,
    paths: EmuconfPaths,
    stores: Arc<TomlStoreRepository>,
    layers: Arc<FileLayerStore>,
    hooks: ChannelHostHooks,
    events: tokio::sync::mpsc::UnboundedReceiver<HostEvent>,
}

impl Harness {
    fn new() -> Self {
        logging::init_test();
        let temp_dir = TempDir::new().unwrap();
        let paths = EmuconfPaths::new(temp_dir.path().to_path_buf());
        let (hooks, events) = ChannelHostHooks::channel();
        Self {
            stores: Arc::new(TomlStoreRepository::new(paths.clone())),
            layers: Arc::new(FileLayerStore::open(paths.clone()).unwrap()),
            paths,
            hooks,
            events,
            _temp_dir: temp_dir,
        }
    }

    fn session(&self) -> SettingsSession {
        SettingsSession::new(
            self.stores.clone(),
            self.layers.clone(),
            Arc::new(self.hooks.clone()),
        )
    }
}

#[test]
fn test_global_save_is_visible_to_next_session() {
    let mut harness = Harness::new();

    let mut first = harness.session();
    first.load_global().unwrap();
    assert_eq!(first.store_keys().len(), 4);
    first
        .get_section(FILE_GFX, SECTION_GFX_SETTINGS)
        .unwrap()
        .set("InternalResolution", "3");
    first.save_settings().unwrap();
    first.close().unwrap();

    for name in GLOBAL_STORE_NAMES {
        assert!(harness.paths.store_file(name).unwrap().exists(), "{name} not written");
    }
    assert!(harness.paths.base_layer_file().exists());
    assert_eq!(
        drain_events(&mut harness.events),
        vec![
            HostEvent::ReloadLegacyConfig,
            HostEvent::ReloadSecondaryControllerConfig,
            HostEvent::ReloadLoggingConfig,
            HostEvent::RescanPeripheralAdapters,
        ]
    );

    let mut second = harness.session();
    second.load_global().unwrap();
    let section = second
        .find_section(FILE_GFX, SECTION_GFX_SETTINGS)
        .unwrap()
        .unwrap();
    assert_eq!(section.get("InternalResolution"), Some("3"));
}

#[test]
fn test_recursive_paths_change_queues_library_rescan() {
    let mut harness = Harness::new();

    let mut settings = harness.session();
    settings.load_global().unwrap();
    MAIN_RECURSIVE_ISO_PATHS.set(&mut settings, true).unwrap();
    settings.save_settings().unwrap();

    let rescans: Vec<HostEvent> = drain_events(&mut harness.events)
        .into_iter()
        .filter(|event| matches!(event, HostEvent::StartLibraryRescan(_)))
        .collect();
    assert_eq!(
        rescans,
        vec![HostEvent::StartLibraryRescan(LibraryRescan {
            recursive_iso_paths: true
        })]
    );

    // The saved value is the new baseline for the next session.
    let mut next = harness.session();
    next.load_global().unwrap();
    next.save_settings().unwrap();
    assert!(
        !drain_events(&mut harness.events)
            .iter()
            .any(|event| matches!(event, HostEvent::StartLibraryRescan(_)))
    );
}

#[test]
fn test_scoped_session_round_trip() {
    let harness = Harness::new();

    let mut settings = harness.session();
    settings.load_scoped("GALE01", 1).unwrap();
    assert_eq!(settings.write_layer(), LayerId::LocalScoped);
    assert_eq!(
        harness.layers.scoped_identity().unwrap(),
        Some(("GALE01".to_string(), 1))
    );

    settings
        .get_section(FILE_GFX, SECTION_GFX_SETTINGS)
        .unwrap()
        .set("MSAA", "4");
    harness
        .layers
        .set(LayerId::LocalScoped, "Core", "CPUThread", "False")
        .unwrap();
    settings.save_settings().unwrap();
    settings.close().unwrap();

    assert_eq!(harness.layers.scoped_identity().unwrap(), None);
    assert!(harness.paths.scoped_store_file("GALE01").unwrap().exists());
    assert!(harness.paths.scoped_layer_file("GALE01").unwrap().exists());
    assert!(!harness.paths.store_file(FILE_GFX).unwrap().exists());

    let mut reopened = harness.session();
    reopened.load_scoped("GALE01", 1).unwrap();
    let store = reopened.scoped_store().unwrap();
    assert_eq!(store.section("Video_Settings").unwrap().get("MSAA"), Some("4"));
    assert_eq!(
        harness.layers.get("Core", "CPUThread").unwrap(),
        Some("False".to_string())
    );
    reopened.close().unwrap();
}

#[test]
fn test_scoped_load_refused_while_emulating() {
    let harness = Harness::new();
    harness.hooks.set_simulation_active(true);

    let mut settings = harness.session();
    let err = settings.load_scoped("GALE01", 0).unwrap_err();

    assert!(err.is_contract_violation());
    assert!(settings.is_empty());
    assert_eq!(harness.layers.scoped_identity().unwrap(), None);
}

#[test]
fn test_legacy_junk_in_game_file() {
    let harness = Harness::new();

    // A game file written by the old routine carries global-only keys.
    let mut junk = harness.session();
    junk.load_scoped("GZLE01", 0).unwrap();
    junk.get_section(FILE_DOLPHIN, "Interface")
        .unwrap()
        .set("ThemeName", "Clean");
    junk.save_settings().unwrap();
    junk.close().unwrap();

    let mut settings = harness.session();
    settings.load_scoped("GZLE01", 0).unwrap();
    assert!(settings.scoped_store_contains_legacy_junk());

    settings.clear_settings();
    assert!(!settings.scoped_store_contains_legacy_junk());
    settings.save_settings().unwrap();
    settings.close().unwrap();

    let mut regenerated = harness.session();
    regenerated.load_scoped("GZLE01", 0).unwrap();
    assert!(!regenerated.scoped_store_contains_legacy_junk());
    regenerated.close().unwrap();
}

#[test]
fn test_game_id_cannot_redirect_save_into_global_store() {
    let harness = Harness::new();

    let mut settings = harness.session();
    let err = settings.load_scoped("../Config/GFX", 0).unwrap_err();
    assert!(err.is_contract_violation());
    assert!(settings.is_empty());
    assert!(settings.save_settings().is_err());
    settings.close().unwrap();

    let mut global = harness.session();
    global.load_global().unwrap();
    assert!(global.find_section(FILE_GFX, "Core").unwrap().is_none());
    assert!(!harness.paths.store_file(FILE_GFX).unwrap().exists());
    assert_eq!(harness.layers.scoped_identity().unwrap(), None);
}
