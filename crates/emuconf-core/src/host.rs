//! Hooks into the host application.

use serde::{Deserialize, Serialize};

/// Context handed to [`HostHooks::start_library_rescan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryRescan {
    /// Value of `RecursiveISOPaths` at save time.
    pub recursive_iso_paths: bool,
}

/// Notification and query hooks the session calls into.
///
/// Notifications are fire-and-forget: implementations decide how and when
/// the work runs (e.g. by queueing it), and the session never waits on it.
pub trait HostHooks: Send + Sync {
    /// Whether the emulation core is currently running.
    fn is_simulation_active(&self) -> bool;

    /// Legacy-format consumers should re-read the general config.
    fn reload_legacy_config(&self);

    /// Legacy-format consumers should re-read the Wii Remote config.
    fn reload_secondary_controller_config(&self);

    fn reload_logging_config(&self);

    fn rescan_peripheral_adapters(&self);

    /// The game library should be rescanned in the background.
    fn start_library_rescan(&self, request: LibraryRescan);
}
