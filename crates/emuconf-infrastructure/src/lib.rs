//! Concrete collaborators for `emuconf-core`: TOML store files, a file-backed
//! layer store, channel-based host hooks, paths and logging setup.

pub mod channel_host_hooks;
pub mod file_layer_store;
pub mod logging;
pub mod paths;
pub mod storage;
pub mod toml_store_repository;

pub use crate::channel_host_hooks::{ChannelHostHooks, HostEvent, drain_events};
pub use crate::file_layer_store::FileLayerStore;
pub use crate::paths::EmuconfPaths;
pub use crate::toml_store_repository::TomlStoreRepository;
