//! Content loaders for reading macrogame data from files.
//!
//! Each loader turns one RON/TOML file into `macrogame-core` types; the
//! [`ContentFactory`] ties them together for a whole content directory.

pub mod config;
pub mod conversion;
pub mod factory;
pub mod macrogame;
pub mod methods;
pub mod microgames;

pub use config::EngineConfigLoader;
pub use conversion::{ConversionScreenLoader, ScreenCatalog};
pub use factory::{ContentBundle, ContentFactory};
pub use macrogame::MacrogameLoader;
pub use methods::{MethodCatalog, MethodLoader};
pub use microgames::{MicrogameCatalog, MicrogameLoader, VariantRecord};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
