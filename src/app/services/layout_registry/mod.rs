//! Layout registry service for versioned fixed-width column specifications
//!
//! This module provides an immutable, versioned store of fixed-width layout
//! specifications keyed by (dataset, period). Layouts are loaded once at
//! process start and shared read-only by every concurrent parse call.

use crate::app::models::QuarterVintage;
use std::collections::HashMap;

pub mod layout;
pub mod loader;

#[cfg(test)]
pub mod tests;

// Re-export key types for convenience
pub use layout::{Layout, LayoutColumn};

/// Named lookup key for layout resolution
///
/// A struct with named fields rather than positional arguments, because
/// silently swapping dataset/year/quarter is the single most common
/// integration defect against this registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayoutKey {
    /// Dataset identifier
    pub dataset_id: String,

    /// Product year of the release
    pub product_year: u16,

    /// Quarter vintage of the release period
    pub quarter_vintage: QuarterVintage,
}

/// Layout registry providing (dataset, period)-keyed layout lookups
///
/// Lookup order: exact (dataset, year, quarter), then (dataset, year,
/// annual), then not found.
#[derive(Debug, Default)]
pub struct LayoutRegistry {
    /// Layouts indexed by lookup key
    pub(crate) layouts: HashMap<LayoutKey, Layout>,

    /// Dataset identifiers with at least one registered layout, supporting
    /// the router's availability probe
    pub(crate) datasets: std::collections::HashSet<String>,
}

impl LayoutRegistry {
    /// Create a new empty layout registry
    pub fn new() -> Self {
        Self {
            layouts: HashMap::new(),
            datasets: std::collections::HashSet::new(),
        }
    }

    /// Register a layout under a lookup key
    pub fn insert(&mut self, key: LayoutKey, layout: Layout) {
        self.datasets.insert(key.dataset_id.clone());
        self.layouts.insert(key, layout);
    }

    /// Get a layout for a dataset/period
    ///
    /// Falls back from the exact quarter to the annual layout for the same
    /// dataset and year.
    pub fn get_layout(&self, key: &LayoutKey) -> Option<&Layout> {
        if let Some(layout) = self.layouts.get(key) {
            return Some(layout);
        }
        if key.quarter_vintage != QuarterVintage::Annual {
            let annual = LayoutKey {
                dataset_id: key.dataset_id.clone(),
                product_year: key.product_year,
                quarter_vintage: QuarterVintage::Annual,
            };
            return self.layouts.get(&annual);
        }
        None
    }

    /// Get a layout for a dataset/period, or a typed error
    pub fn require_layout(&self, key: &LayoutKey) -> crate::Result<&Layout> {
        self.get_layout(key).ok_or_else(|| {
            crate::Error::layout_not_found(
                key.dataset_id.clone(),
                key.product_year,
                key.quarter_vintage.to_string(),
            )
        })
    }

    /// Check whether any layout is registered for a dataset (any period)
    pub fn has_dataset(&self, dataset_id: &str) -> bool {
        self.datasets.contains(dataset_id)
    }

    /// Number of registered layouts
    pub fn layout_count(&self) -> usize {
        self.layouts.len()
    }
}
