//! Microgame catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use macrogame_core::{
    MicrogameId, MicrogameMetadata, MicrogameOracle, MicrogameTable, SkinConfig, VariantId,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// A custom skin registered for one microgame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantRecord {
    pub microgame_id: MicrogameId,
    pub variant_id: VariantId,
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

/// Microgame catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicrogameCatalog {
    pub microgames: Vec<MicrogameMetadata>,
    #[serde(default)]
    pub variants: Vec<VariantRecord>,
}

/// Loader for the microgame catalog from RON files.
pub struct MicrogameLoader;

impl MicrogameLoader {
    pub fn load(path: &Path) -> LoadResult<MicrogameTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<MicrogameTable> {
        let catalog: MicrogameCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse microgame catalog RON: {}", e))?;

        let mut table = MicrogameTable::new();
        for metadata in catalog.microgames {
            table.insert(metadata);
        }

        for variant in catalog.variants {
            if table.microgame(&variant.microgame_id).is_none() {
                tracing::warn!(
                    target: "content::microgames",
                    microgame = %variant.microgame_id,
                    variant = %variant.variant_id,
                    "variant for unknown microgame ignored"
                );
                continue;
            }
            let skin = SkinConfig {
                variant_id: Some(variant.variant_id.clone()),
                values: variant.values,
            };
            table.insert_variant(variant.microgame_id, variant.variant_id, skin);
        }

        Ok(table)
    }
}
