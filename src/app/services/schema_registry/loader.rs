//! Schema contract loading from versioned JSON documents
//!
//! Contracts are persisted as JSON (one file per schema identifier, the
//! identifier being the file stem) and decoded here with load-time
//! validation. Column order in the file is preserved verbatim because the
//! hash recipe and output column order both depend on it. Malformed
//! governance files fail at load, never at parse time.

use super::contract::{
    BusinessRule, ColumnSpec, KeyPrecedence, QualityThresholds, RuleKind, SchemaContract,
    Transform,
};
use super::SchemaRegistry;
use crate::app::models::{ColumnType, Severity};
use crate::{Error, Result};
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Load every `*.json` contract in a directory into a registry
///
/// The schema identifier of each contract is the file stem (e.g.,
/// `plan-premiums-v2.json` registers under `plan-premiums-v2`).
pub fn load_dir(path: &Path) -> Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();

    let entries = std::fs::read_dir(path).map_err(|e| {
        Error::registry_io(
            format!("Failed to read schema directory {}", path.display()),
            e,
        )
    })?;

    let mut files: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    for file in files {
        let schema_id = file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let contract = load_file(&file)?;
        debug!(
            schema_id = %schema_id,
            version = %contract.version,
            columns = contract.columns.len(),
            "Loaded schema contract"
        );
        registry.insert(schema_id, contract);
    }

    info!(
        contracts = registry.contract_count(),
        path = %path.display(),
        "Schema registry loaded"
    );
    Ok(registry)
}

/// Load and validate one contract file
pub fn load_file(path: &Path) -> Result<SchemaContract> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::registry_io(format!("Failed to read contract {}", path.display()), e)
    })?;
    let file_name = path.display().to_string();
    parse_contract(&content, &file_name)
}

/// Parse a contract from its JSON text
///
/// Decoding goes through `serde_json::Value` (with the `preserve_order`
/// feature) rather than derived structs so the file's column order is kept.
pub fn parse_contract(content: &str, file_name: &str) -> Result<SchemaContract> {
    let root: Value = serde_json::from_str(content)
        .map_err(|e| Error::registry_json(file_name, "Invalid JSON", Some(e)))?;

    let obj = root
        .as_object()
        .ok_or_else(|| Error::registry_json(file_name, "Contract root must be an object", None))?;

    let dataset_name = require_str(obj.get("dataset_name"), "dataset_name", file_name)?;
    let version = require_str(obj.get("version"), "version", file_name)?;
    validate_semver(&version, &dataset_name)?;

    let columns_obj = obj
        .get("columns")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::registry_json(file_name, "Missing 'columns' object", None))?;

    let mut columns = Vec::with_capacity(columns_obj.len());
    for (name, spec) in columns_obj {
        columns.push(parse_column(name, spec, &dataset_name)?);
    }

    let natural_keys = obj
        .get("natural_keys")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let business_rules = match obj.get("business_rules") {
        Some(Value::Array(rules)) => rules
            .iter()
            .map(|rule| parse_rule(rule, &dataset_name))
            .collect::<Result<Vec<_>>>()?,
        _ => Vec::new(),
    };

    let quality_thresholds = match obj.get("quality_thresholds") {
        Some(Value::Object(thresholds)) => QualityThresholds {
            expected_min_rows: thresholds.get("expected_min_rows").and_then(Value::as_u64),
            expected_max_rows: thresholds.get("expected_max_rows").and_then(Value::as_u64),
        },
        _ => QualityThresholds::default(),
    };

    let mut column_aliases = HashMap::new();
    if let Some(Value::Object(aliases)) = obj.get("column_aliases") {
        for (canonical, variants) in aliases {
            let variants = variants
                .as_array()
                .map(|arr| {
                    arr.iter()
                        .filter_map(Value::as_str)
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default();
            column_aliases.insert(canonical.clone(), variants);
        }
    }

    let key_precedence = match obj.get("key_precedence").and_then(Value::as_str) {
        Some(policy) => policy.parse::<KeyPrecedence>()?,
        None => KeyPrecedence::default(),
    };

    let sort_tiebreaker = obj
        .get("sort_tiebreaker")
        .and_then(Value::as_str)
        .map(String::from);

    let contract = SchemaContract {
        dataset_name,
        version,
        columns,
        natural_keys,
        business_rules,
        quality_thresholds,
        column_aliases,
        key_precedence,
        sort_tiebreaker,
    };

    contract.validate()?;
    Ok(contract)
}

/// Parse one column spec from its JSON object
fn parse_column(name: &str, spec: &Value, dataset: &str) -> Result<ColumnSpec> {
    let obj = spec.as_object().ok_or_else(|| {
        Error::invalid_contract(dataset, format!("Column '{name}' must be an object"))
    })?;

    let type_name = obj.get("type").and_then(Value::as_str).ok_or_else(|| {
        Error::invalid_contract(dataset, format!("Column '{name}' is missing 'type'"))
    })?;

    let ctype = match type_name {
        "string" => ColumnType::Text,
        "integer" => ColumnType::Integer,
        "decimal" => {
            let scale = obj.get("scale").and_then(Value::as_u64).unwrap_or(2) as u32;
            ColumnType::Decimal { scale }
        }
        "boolean" => ColumnType::Boolean,
        "date" => ColumnType::Date,
        other => {
            return Err(Error::invalid_contract(
                dataset,
                format!("Column '{name}' has unknown type '{other}'"),
            ));
        }
    };

    let pattern = match obj.get("pattern").and_then(Value::as_str) {
        Some(pattern) => Some(Regex::new(pattern).map_err(|e| {
            Error::invalid_contract(
                dataset,
                format!("Column '{name}' has invalid pattern '{pattern}': {e}"),
            )
        })?),
        None => None,
    };

    let transforms = match obj.get("transforms") {
        Some(Value::Array(transforms)) => transforms
            .iter()
            .filter_map(Value::as_str)
            .map(Transform::from_str)
            .collect::<Result<Vec<_>>>()?,
        _ => Vec::new(),
    };

    Ok(ColumnSpec {
        name: name.to_string(),
        ctype,
        nullable: obj.get("nullable").and_then(Value::as_bool).unwrap_or(true),
        pattern,
        min: parse_bound(obj.get("min"), name, dataset)?,
        max: parse_bound(obj.get("max"), name, dataset)?,
        min_exclusive: obj
            .get("min_exclusive")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        max_exclusive: obj
            .get("max_exclusive")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        transforms,
    })
}

/// Parse one business rule from its JSON object
fn parse_rule(rule: &Value, dataset: &str) -> Result<BusinessRule> {
    let obj = rule.as_object().ok_or_else(|| {
        Error::invalid_contract(dataset, "Business rule must be an object".to_string())
    })?;

    let rule_id = obj
        .get("rule_id")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::invalid_contract(dataset, "Business rule is missing 'rule_id'"))?
        .to_string();
    let column = obj
        .get("column")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            Error::invalid_contract(dataset, format!("Rule '{rule_id}' is missing 'column'"))
        })?
        .to_string();

    let kind = match obj.get("kind").and_then(Value::as_str) {
        Some("range") => RuleKind::Range {
            min: parse_bound(obj.get("min"), &column, dataset)?,
            max: parse_bound(obj.get("max"), &column, dataset)?,
            min_exclusive: obj
                .get("min_exclusive")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            max_exclusive: obj
                .get("max_exclusive")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        },
        Some("domain") => RuleKind::Domain {
            values: obj
                .get("values")
                .and_then(Value::as_array)
                .map(|arr| {
                    arr.iter()
                        .filter_map(Value::as_str)
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        },
        Some("non_negative") => RuleKind::NonNegative,
        other => {
            return Err(Error::invalid_contract(
                dataset,
                format!(
                    "Rule '{rule_id}' has unknown kind '{}'",
                    other.unwrap_or("<missing>")
                ),
            ));
        }
    };

    let severity = match obj.get("severity").and_then(Value::as_str) {
        Some(severity) => severity.parse::<Severity>()?,
        None => Severity::Block,
    };

    Ok(BusinessRule {
        rule_id,
        column,
        kind,
        severity,
        advisory: obj
            .get("advisory")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}

/// Parse a numeric bound, accepting JSON numbers or decimal strings
fn parse_bound(value: Option<&Value>, column: &str, dataset: &str) -> Result<Option<Decimal>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .map(Some)
            .map_err(|e| {
                Error::invalid_contract(
                    dataset,
                    format!("Column '{column}' has non-decimal bound '{n}': {e}"),
                )
            }),
        Some(Value::String(s)) => Decimal::from_str(s).map(Some).map_err(|e| {
            Error::invalid_contract(
                dataset,
                format!("Column '{column}' has non-decimal bound '{s}': {e}"),
            )
        }),
        Some(other) => Err(Error::invalid_contract(
            dataset,
            format!("Column '{column}' has non-numeric bound {other}"),
        )),
    }
}

fn require_str(value: Option<&Value>, field: &str, file_name: &str) -> Result<String> {
    value
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| {
            Error::registry_json(file_name, format!("Missing or non-string '{field}'"), None)
        })
}

/// Contract versions are SemVer: MAJOR.MINOR.PATCH
fn validate_semver(version: &str, dataset: &str) -> Result<()> {
    let valid = {
        let parts: Vec<&str> = version.split('.').collect();
        parts.len() == 3
            && parts
                .iter()
                .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
    };
    if valid {
        Ok(())
    } else {
        Err(Error::invalid_contract(
            dataset,
            format!("Version '{version}' is not MAJOR.MINOR.PATCH"),
        ))
    }
}
