//! Settings session module.
//!
//! # Module Structure
//!
//! - `state`: Tagged session mode (`Unloaded`, `Global`, `Scoped`)
//! - `manager`: The session itself (`SettingsSession`)
//!
//! # Usage
//!
//! ```ignore
//! use emuconf_core::session::SettingsSession;
//!
//! let mut settings = SettingsSession::new(stores, layers, host);
//! settings.load_scoped("GALE01", 0)?;
//! settings.get_section(FILE_GFX, SECTION_GFX_SETTINGS)?.set("MSAA", "4");
//! settings.save_settings()?;
//! settings.close()?;
//! ```

mod manager;
mod state;


pub use manager::SettingsSession;
