//! Configuration content for the exposure simulation.
//!
//! This crate turns TOML files into [`rad_core::ExposureConfig`] values:
//! - `config.toml` with the general, damage, equipment, healing, effects and
//!   storage sections
//! - a bundled default file written on first start
//!
//! Loading is forgiving. A section that fails to deserialize falls back to its
//! defaults and is logged, so one typo never discards the rest of the file.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LoadResult, LoadedConfig};

/// Default configuration shipped with the simulator, with comments.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../data/config.toml");
