//! Repository layer for persisted simulation state.
//!
//! Repositories hold the data that must survive a restart:
//! - Radiation sources and the identity counter
//! - Actor exposure levels and live resistance buffs
//!
//! Configuration is static content and is loaded by `rad-content` instead.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::{FileStateRepository, StorageFormat};
pub use memory::InMemoryStateRepo;
pub use traits::StateRepository;
