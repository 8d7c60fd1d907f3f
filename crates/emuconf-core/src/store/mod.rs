//! Configuration store domain module.
//!
//! - `model`: In-memory store model (`IniStore`, `Section`)
//! - `repository`: Repository trait for store persistence

mod model;
mod repository;

pub use model::{IniStore, Section};
pub use repository::{StoreRepository, is_valid_file_stem};
