//! Schema registry service for versioned dataset contracts
//!
//! This module provides an immutable, versioned store of column/type/key/
//! business-rule contracts keyed by schema identifier. Contracts are loaded
//! once at process start from versioned JSON documents and shared read-only
//! by every concurrent parse call.

use std::collections::HashMap;

pub mod contract;
pub mod loader;

#[cfg(test)]
pub mod tests;

// Re-export key types for convenience
pub use contract::{
    BusinessRule, ColumnSpec, KeyPrecedence, QualityThresholds, RuleKind, SchemaContract,
    Transform,
};

/// Schema registry providing O(1) contract lookups by schema identifier
///
/// Immutable once loaded; a new contract version requires a new schema
/// identifier or a republished registry, never in-place mutation.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    /// Contracts indexed by schema identifier
    pub(crate) contracts: HashMap<String, SchemaContract>,
}

impl SchemaRegistry {
    /// Create a new empty schema registry
    pub fn new() -> Self {
        Self {
            contracts: HashMap::new(),
        }
    }

    /// Register a contract under a schema identifier
    ///
    /// Intended for startup wiring and tests; production registries are
    /// loaded from versioned JSON via [`loader`].
    pub fn insert(&mut self, schema_id: impl Into<String>, contract: SchemaContract) {
        self.contracts.insert(schema_id.into(), contract);
    }

    /// Get a contract by schema identifier
    pub fn get(&self, schema_id: &str) -> Option<&SchemaContract> {
        self.contracts.get(schema_id)
    }

    /// Get a contract by schema identifier, or a typed error
    pub fn require(&self, schema_id: &str) -> crate::Result<&SchemaContract> {
        self.contracts
            .get(schema_id)
            .ok_or_else(|| crate::Error::schema_not_found(schema_id))
    }

    /// Check if a schema identifier is registered
    pub fn contains(&self, schema_id: &str) -> bool {
        self.contracts.contains_key(schema_id)
    }

    /// Number of registered contracts
    pub fn contract_count(&self) -> usize {
        self.contracts.len()
    }
}
