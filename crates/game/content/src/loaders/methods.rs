//! Conversion method catalog loader.

use std::path::Path;

use macrogame_core::{MethodDefinition, MethodTable};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Method catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodCatalog {
    pub methods: Vec<MethodDefinition>,
}

/// Loader for the method catalog from RON files.
pub struct MethodLoader;

impl MethodLoader {
    pub fn load(path: &Path) -> LoadResult<MethodTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<MethodTable> {
        let catalog: MethodCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse method catalog RON: {}", e))?;

        Ok(catalog.methods.into_iter().collect())
    }
}
