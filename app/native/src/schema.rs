//! JSON Schema generation for the Tabsplit configuration file.

use crate::config::TabsplitConfig;

/// Identifier placed in the generated schema's `$id`.
const SCHEMA_ID: &str = "urn:tabsplit:config-schema";

/// Generates a JSON Schema for the Tabsplit configuration.
///
/// The schema includes all configuration options with their types,
/// descriptions, and default values.
#[must_use]
pub fn generate_schema() -> schemars::Schema {
    let mut schema = schemars::schema_for!(TabsplitConfig);

    // Add $id for proper schema identification
    if let Some(obj) = schema.as_object_mut() {
        obj.insert("$id".to_string(), serde_json::json!(SCHEMA_ID));
    }

    schema
}

/// Generates a pretty-printed JSON Schema string for the configuration.
#[must_use]
pub fn print_schema() -> String {
    serde_json::to_string_pretty(&generate_schema()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_schema_produces_valid_json() {
        let parsed: serde_json::Value = serde_json::from_str(&print_schema()).unwrap();

        assert!(parsed["$id"].as_str().unwrap().starts_with("urn:tabsplit:"));
        assert_eq!(parsed["$schema"], "https://json-schema.org/draft/2020-12/schema");
        assert_eq!(parsed["title"], "TabsplitConfig");
        assert!(parsed["properties"]["pause"].is_object());
        assert!(parsed["properties"]["newTabUrl"].is_object());
        assert!(parsed["properties"]["commandPrefix"].is_object());
    }
}
