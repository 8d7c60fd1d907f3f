//! Storage layer for atomic file operations.

mod store_file;

pub use store_file::{StoreFile, StoreFileError};
