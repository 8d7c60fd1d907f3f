//! Mode of a settings session.

use crate::store::IniStore;
use std::collections::HashMap;

/// What a session currently holds.
///
/// Global and scoped sessions are separate variants, so a scoped session
/// with more than one store cannot be represented.
#[derive(Debug, Default)]
pub(crate) enum SessionState {
    /// Constructed but never loaded.
    #[default]
    Unloaded,
    /// Global session over the fixed set of named stores.
    Global { stores: HashMap<String, IniStore> },
    /// Per-game override session.
    Scoped(ScopedState),
}

#[derive(Debug)]
pub(crate) struct ScopedState {
    /// Never empty: loading with an empty id yields a global session.
    pub entity_id: String,
    pub revision: u16,
    pub store: IniStore,
    /// Set once the per-game layer has been handed back to the layer store.
    pub layer_released: bool,
}

impl ScopedState {
    pub fn new(entity_id: &str, revision: u16) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            revision,
            store: IniStore::new(),
            layer_released: false,
        }
    }
}
