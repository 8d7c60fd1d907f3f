//! Error types for emuconf.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the settings core and its collaborators.
///
/// Contract violations are caller misuse and abort the current operation.
/// I/O, serialization and layer errors come from collaborators and are
/// propagated unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmuconfError {
    /// The caller used the session in a way its current mode does not allow.
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// A scoped load was attempted while the emulation core is running.
    #[error("Attempted to load scoped settings for '{entity_id}' while a simulation is active")]
    SimulationActive { entity_id: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML"
        message: String,
    },

    /// External layer store error
    #[error("Layer error: {0}")]
    Layer(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EmuconfError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a ContractViolation error
    pub fn contract(message: impl Into<String>) -> Self {
        Self::ContractViolation(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Layer error
    pub fn layer(message: impl Into<String>) -> Self {
        Self::Layer(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a caller misuse (including the active-simulation guard)
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::ContractViolation(_) | Self::SimulationActive { .. }
        )
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for EmuconfError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<toml::de::Error> for EmuconfError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for EmuconfError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, EmuconfError>`.
pub type Result<T> = std::result::Result<T, EmuconfError>;
