//! Layout loading from versioned JSON documents
//!
//! Layout files are named `<dataset>_<year>_<quarter>.json` (quarter one of
//! `q1`-`q4` or `annual`) and decoded here with load-time validation of the
//! span invariants. Column order in memory is always sorted by `start`
//! before the decode plan is built, regardless of file order.

use super::layout::{Layout, LayoutColumn};
use super::{LayoutKey, LayoutRegistry};
use crate::app::models::{ColumnType, QuarterVintage};
use crate::{Error, Result};
use regex::Regex;
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Load every `*.json` layout in a directory into a registry
pub fn load_dir(path: &Path) -> Result<LayoutRegistry> {
    let mut registry = LayoutRegistry::new();

    let entries = std::fs::read_dir(path).map_err(|e| {
        Error::registry_io(
            format!("Failed to read layout directory {}", path.display()),
            e,
        )
    })?;

    let mut files: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    for file in files {
        let stem = file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let key = parse_layout_key(stem)?;
        let layout = load_file(&file)?;
        debug!(
            dataset = %key.dataset_id,
            year = key.product_year,
            quarter = %key.quarter_vintage,
            version = %layout.version,
            "Loaded fixed-width layout"
        );
        registry.insert(key, layout);
    }

    info!(
        layouts = registry.layout_count(),
        path = %path.display(),
        "Layout registry loaded"
    );
    Ok(registry)
}

/// Load and validate one layout file
pub fn load_file(path: &Path) -> Result<Layout> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::registry_io(format!("Failed to read layout {}", path.display()), e)
    })?;
    let file_name = path.display().to_string();
    parse_layout(&content, &file_name)
}

/// Parse a `<dataset>_<year>_<quarter>` file stem into a lookup key
pub fn parse_layout_key(stem: &str) -> Result<LayoutKey> {
    let parts: Vec<&str> = stem.rsplitn(3, '_').collect();
    if parts.len() != 3 {
        return Err(Error::invalid_layout(
            stem,
            "File stem must be <dataset>_<year>_<quarter>",
        ));
    }
    // rsplitn yields parts in reverse order
    let (quarter, year, dataset) = (parts[0], parts[1], parts[2]);

    let product_year = year.parse::<u16>().map_err(|_| {
        Error::invalid_layout(stem, format!("Invalid product year '{year}' in file stem"))
    })?;
    let quarter_vintage = QuarterVintage::from_str(quarter)?;

    Ok(LayoutKey {
        dataset_id: dataset.to_string(),
        product_year,
        quarter_vintage,
    })
}

/// Parse a layout from its JSON text
pub fn parse_layout(content: &str, file_name: &str) -> Result<Layout> {
    let root: Value = serde_json::from_str(content)
        .map_err(|e| Error::registry_json(file_name, "Invalid JSON", Some(e)))?;
    let obj = root
        .as_object()
        .ok_or_else(|| Error::registry_json(file_name, "Layout root must be an object", None))?;

    let version = obj
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::registry_json(file_name, "Missing 'version'", None))?
        .to_string();

    let min_line_length = obj
        .get("min_line_length")
        .and_then(Value::as_u64)
        .ok_or_else(|| Error::registry_json(file_name, "Missing 'min_line_length'", None))?
        as usize;

    let pattern = obj
        .get("data_start_pattern")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::registry_json(file_name, "Missing 'data_start_pattern'", None))?;
    let data_start_pattern = Regex::new(pattern).map_err(|e| {
        Error::invalid_layout(
            file_name,
            format!("Invalid data start pattern '{pattern}': {e}"),
        )
    })?;

    let columns_obj = obj
        .get("columns")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::registry_json(file_name, "Missing 'columns' object", None))?;

    let mut columns = Vec::with_capacity(columns_obj.len());
    for (name, spec) in columns_obj {
        let spec = spec.as_object().ok_or_else(|| {
            Error::invalid_layout(file_name, format!("Column '{name}' must be an object"))
        })?;
        let start = spec.get("start").and_then(Value::as_u64).ok_or_else(|| {
            Error::invalid_layout(file_name, format!("Column '{name}' is missing 'start'"))
        })? as usize;
        let end = spec.get("end").and_then(Value::as_u64).ok_or_else(|| {
            Error::invalid_layout(file_name, format!("Column '{name}' is missing 'end'"))
        })? as usize;
        let ctype = match spec.get("type").and_then(Value::as_str).unwrap_or("string") {
            "string" => ColumnType::Text,
            "integer" => ColumnType::Integer,
            "decimal" => ColumnType::Decimal {
                scale: spec.get("scale").and_then(Value::as_u64).unwrap_or(2) as u32,
            },
            "boolean" => ColumnType::Boolean,
            "date" => ColumnType::Date,
            other => {
                return Err(Error::invalid_layout(
                    file_name,
                    format!("Column '{name}' has unknown type '{other}'"),
                ));
            }
        };
        columns.push(LayoutColumn {
            name: name.to_string(),
            start,
            end,
            ctype,
            nullable: spec
                .get("nullable")
                .and_then(Value::as_bool)
                .unwrap_or(true),
        });
    }

    // Decode plans are built from columns sorted by start offset
    columns.sort_by_key(|c| c.start);

    let layout = Layout {
        version,
        min_line_length,
        data_start_pattern,
        columns,
    };
    layout.validate(file_name)?;
    Ok(layout)
}
