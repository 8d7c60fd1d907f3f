//! Settings sessions over global and per-game configuration files.
//!
//! A [`SettingsSession`] is either global (the `Dolphin`, `GFX`, `Logger` and
//! `WiimoteNew` stores) or scoped to one game, where a single override file
//! stands in for all of them. The session decides which store and which
//! layer a read or write lands in; file formats, the layer engine and the
//! host application are reached through the traits in [`store`], [`layer`]
//! and [`host`].

pub mod error;
pub mod host;
pub mod layer;
pub mod section_name;
pub mod session;
pub mod setting;
pub mod store;

// Re-export common types
pub use error::{EmuconfError, Result};
pub use host::{HostHooks, LibraryRescan};
pub use layer::{LayerId, LayerStore};
pub use session::SettingsSession;
pub use store::{IniStore, Section, StoreRepository, is_valid_file_stem};
