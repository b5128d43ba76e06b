//! Microgame catalog oracle.

use std::collections::BTreeMap;

use crate::definition::{MicrogameId, MicrogameMetadata, SkinConfig, VariantId};

/// Read-only access to base microgame metadata and custom skins.
pub trait MicrogameOracle: Send + Sync {
    /// Returns the metadata of a microgame, or `None` if it was deleted.
    fn microgame(&self, id: &MicrogameId) -> Option<&MicrogameMetadata>;

    /// Returns the skin of a custom variant, or `None` if it does not exist.
    fn variant(&self, microgame: &MicrogameId, variant: &VariantId) -> Option<&SkinConfig>;
}

/// In-memory microgame catalog.
#[derive(Clone, Debug, Default)]
pub struct MicrogameTable {
    microgames: BTreeMap<MicrogameId, MicrogameMetadata>,
    variants: BTreeMap<(MicrogameId, VariantId), SkinConfig>,
}

impl MicrogameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, metadata: MicrogameMetadata) {
        self.microgames.insert(metadata.id.clone(), metadata);
    }

    pub fn insert_variant(&mut self, microgame: MicrogameId, variant: VariantId, skin: SkinConfig) {
        self.variants.insert((microgame, variant), skin);
    }

    pub fn with(mut self, metadata: MicrogameMetadata) -> Self {
        self.insert(metadata);
        self
    }

    pub fn len(&self) -> usize {
        self.microgames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.microgames.is_empty()
    }
}

impl MicrogameOracle for MicrogameTable {
    fn microgame(&self, id: &MicrogameId) -> Option<&MicrogameMetadata> {
        self.microgames.get(id)
    }

    fn variant(&self, microgame: &MicrogameId, variant: &VariantId) -> Option<&SkinConfig> {
        self.variants.get(&(microgame.clone(), variant.clone()))
    }
}
