//! External layer store interface.
//!
//! Some settings have moved to a layered engine owned outside the session.
//! The session only tells it which per-game layer to hold and when to persist.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A precedence tier in the layer store. Later variants win over earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LayerId {
    /// The default global tier (or whichever tier is current when global).
    BaseOrCurrent,
    /// The per-game user override tier.
    LocalScoped,
}

impl LayerId {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerId::BaseOrCurrent => "base-or-current",
            LayerId::LocalScoped => "local-scoped",
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The layered config engine the session keeps in sync on load, save and close.
pub trait LayerStore: Send + Sync {
    /// Loads the per-game layer for `(entity_id, revision)`.
    fn load_scoped_layer(&self, entity_id: &str, revision: u16) -> Result<()>;

    /// Drops the per-game layer loaded by [`LayerStore::load_scoped_layer`].
    fn unload_scoped_layer(&self) -> Result<()>;

    /// Writes one layer to persistent storage.
    fn persist(&self, layer: LayerId) -> Result<()>;
}
