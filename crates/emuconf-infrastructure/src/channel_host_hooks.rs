//! Host hooks that queue notifications on a channel.
//!
//! The session calls hooks synchronously; this implementation only enqueues
//! a [`HostEvent`], and whoever owns the receiver decides when the work runs.

use emuconf_core::{HostHooks, LibraryRescan};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

/// A notification for the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostEvent {
    ReloadLegacyConfig,
    ReloadSecondaryControllerConfig,
    ReloadLoggingConfig,
    RescanPeripheralAdapters,
    StartLibraryRescan(LibraryRescan),
}

/// [`HostHooks`] backed by an unbounded channel and a shared simulation flag.
#[derive(Debug, Clone)]
pub struct ChannelHostHooks {
    sender: UnboundedSender<HostEvent>,
    simulation_active: Arc<AtomicBool>,
}

impl ChannelHostHooks {
    /// Creates the hooks and the receiving end of their event queue.
    pub fn channel() -> (Self, UnboundedReceiver<HostEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let hooks = Self {
            sender,
            simulation_active: Arc::new(AtomicBool::new(false)),
        };
        (hooks, receiver)
    }

    /// Flag the host flips when emulation starts or stops.
    pub fn simulation_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.simulation_active)
    }

    pub fn set_simulation_active(&self, active: bool) {
        self.simulation_active.store(active, Ordering::SeqCst);
    }

    fn send(&self, event: HostEvent) {
        debug!(?event, "Queueing host event");
        // A closed receiver means the host is shutting down.
        if self.sender.send(event).is_err() {
            warn!("[Host] Event receiver dropped; notification discarded");
        }
    }
}

impl HostHooks for ChannelHostHooks {
    fn is_simulation_active(&self) -> bool {
        self.simulation_active.load(Ordering::SeqCst)
    }

    fn reload_legacy_config(&self) {
        self.send(HostEvent::ReloadLegacyConfig);
    }

    fn reload_secondary_controller_config(&self) {
        self.send(HostEvent::ReloadSecondaryControllerConfig);
    }

    fn reload_logging_config(&self) {
        self.send(HostEvent::ReloadLoggingConfig);
    }

    fn rescan_peripheral_adapters(&self) {
        self.send(HostEvent::RescanPeripheralAdapters);
    }

    fn start_library_rescan(&self, request: LibraryRescan) {
        self.send(HostEvent::StartLibraryRescan(request));
    }
}

/// Takes every event queued so far without waiting.
pub fn drain_events(receiver: &mut UnboundedReceiver<HostEvent>) -> Vec<HostEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}
