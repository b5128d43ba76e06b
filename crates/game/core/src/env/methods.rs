//! Conversion method catalog oracle.

use std::collections::BTreeMap;

use crate::definition::{MethodDefinition, MethodId};

/// Read-only access to conversion method records.
pub trait MethodOracle: Send + Sync {
    /// Returns the method definition, or `None` if it was removed.
    fn method(&self, id: &MethodId) -> Option<&MethodDefinition>;
}

/// In-memory method catalog.
#[derive(Clone, Debug, Default)]
pub struct MethodTable {
    methods: BTreeMap<MethodId, MethodDefinition>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, method: MethodDefinition) {
        self.methods.insert(method.id.clone(), method);
    }

    pub fn with(mut self, method: MethodDefinition) -> Self {
        self.insert(method);
        self
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl MethodOracle for MethodTable {
    fn method(&self, id: &MethodId) -> Option<&MethodDefinition> {
        self.methods.get(id)
    }
}

impl FromIterator<MethodDefinition> for MethodTable {
    fn from_iter<T: IntoIterator<Item = MethodDefinition>>(iter: T) -> Self {
        let mut table = Self::new();
        for method in iter {
            table.insert(method);
        }
        table
    }
}
