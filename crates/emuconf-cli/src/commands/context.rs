use anyhow::{Context, Result};
use emuconf_core::SettingsSession;
use emuconf_infrastructure::{
    ChannelHostHooks, EmuconfPaths, FileLayerStore, HostEvent, TomlStoreRepository, drain_events,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

/// A loaded session plus the queue its host notifications land in.
pub struct SessionContext {
    pub settings: SettingsSession,
    events: UnboundedReceiver<HostEvent>,
}

impl SessionContext {
    /// Wires the file-backed collaborators under `root` and loads either the
    /// global stores or the override file of `game`.
    pub fn open(root: Option<PathBuf>, game: Option<&str>, revision: u16) -> Result<Self> {
        let paths = match root {
            Some(root) => EmuconfPaths::new(root),
            None => EmuconfPaths::from_env()?,
        };
        info!("Using settings root {}", paths.root().display());

        let stores = Arc::new(TomlStoreRepository::new(paths.clone()));
        let layers = Arc::new(FileLayerStore::open(paths).context("Failed to open layer store")?);
        let (hooks, events) = ChannelHostHooks::channel();

        let mut settings = SettingsSession::new(stores, layers, Arc::new(hooks));
        match game {
            Some(game_id) => settings
                .load_scoped(game_id, revision)
                .with_context(|| format!("Failed to load settings for {game_id}"))?,
            None => settings
                .load_global()
                .context("Failed to load global settings")?,
        }

        Ok(Self { settings, events })
    }

    /// Closes the session and reports the host notifications it queued.
    /// No host runs alongside the CLI, so they are only logged.
    pub fn finish(mut self) -> Result<()> {
        self.settings.close()?;
        for event in drain_events(&mut self.events) {
            info!(?event, "Host notification");
        }
        Ok(())
    }
}
