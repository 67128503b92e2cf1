//! Shared test fixtures for schema registry tests


/// A representative contract for a plan-premium dataset
pub const PREMIUM_CONTRACT_JSON: &str = r#"{
  "dataset_name": "plan-premiums",
  "version": "2.1.0",
  "columns": {
    "state_code": {
      "type": "string",
      "nullable": false,
      "pattern": "^[0-9]{2}$",
      "transforms": ["zero_pad:2"]
    },
    "plan_id": { "type": "string", "nullable": false },
    "premium": {
      "type": "decimal",
      "scale": 2,
      "nullable": false
    },
    "enrollment": { "type": "integer", "nullable": true },
    "effective_date": { "type": "date", "nullable": true },
    "snp_flag": { "type": "boolean", "nullable": true }
  },
  "natural_keys": ["state_code", "plan_id"],
  "business_rules": [
    {
      "rule_id": "premium_range",
      "column": "premium",
      "kind": "range",
      "min": 0,
      "max": 200,
      "min_exclusive": true,
      "severity": "block"
    },
    {
      "rule_id": "plan_type_domain",
      "column": "plan_id",
      "kind": "domain",
      "values": ["H1000-001", "H1000-002", "H2000-001", "H3000-001"],
      "severity": "block",
      "advisory": true
    }
  ],
  "quality_thresholds": { "expected_min_rows": 2, "expected_max_rows": 100000 },
  "column_aliases": {
    "state_code": ["State Code", "ST_CD", "2024 State"],
    "plan_id": ["Plan ID", "Contract-Plan ID"],
    "premium": ["Monthly Premium", "premium_amount"]
  },
  "key_precedence": "first_wins",
  "sort_tiebreaker": "plan_id"
}"#;

/// Parse the shared fixture contract
pub fn premium_contract() -> crate::app::services::schema_registry::SchemaContract {
    crate::app::services::schema_registry::loader::parse_contract(
        PREMIUM_CONTRACT_JSON,
        "premium_contract_fixture",
    )
    .unwrap()
}
