//! Object operations: keys, values, to_entries, from_entries, has, delete,
//! merge, pick.
//!
//! `has` and `delete` require a key; `merge` requires a second JSON document;
//! `pick` requires a non-empty ordered key list. All absences fail before
//! any subprocess is spawned.

use super::Program;
use crate::error::{JqError, JqResult};

const TOOL: &str = "object_op";

/// Optional fields accepted by object operations.
#[derive(Debug, Clone, Default)]
pub struct ObjectParams {
    /// Key name for has/delete.
    pub key: Option<String>,
    /// Second JSON document text for merge.
    pub other: Option<String>,
    /// Ordered key list for pick.
    pub keys: Option<Vec<String>>,
}

/// Build the jq program for an object operation.
pub fn build(operation: &str, params: &ObjectParams) -> JqResult<Program> {
    match operation {
        "keys" => Ok(Program::new("keys")),
        "values" => Ok(Program::new("[.[]]")),
        "to_entries" => Ok(Program::new("to_entries")),
        "from_entries" => Ok(Program::new("from_entries")),
        "has" => match &params.key {
            Some(key) => Ok(Program::new("has($key)").bind_str("key", key)),
            None => Err(JqError::missing(TOOL, "key")),
        },
        "delete" => match &params.key {
            Some(key) => Ok(Program::new("del(.[$key])").bind_str("key", key)),
            None => Err(JqError::missing(TOOL, "key")),
        },
        // Recursive merge. The document is bound with --argjson, so malformed
        // JSON surfaces as an interpreter failure rather than silently
        // corrupting the filter.
        "merge" => match &params.other {
            Some(other) => Ok(Program::new(". * $other").bind_json("other", other.clone())),
            None => Err(JqError::missing(TOOL, "other")),
        },
        // Builds the projection from the requested key list; absent keys come
        // back as explicit nulls.
        "pick" => match params.keys.as_deref() {
            Some(keys) if !keys.is_empty() => {
                let encoded = serde_json::json!(keys).to_string();
                Ok(
                    Program::new(". as $in | $keys | map({key: ., value: $in[.]}) | from_entries")
                        .bind_json("keys", encoded),
                )
            }
            _ => Err(JqError::missing(TOOL, "keys")),
        },
        other => Err(JqError::unknown_operation(TOOL, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("keys", "keys")]
    #[case("values", "[.[]]")]
    #[case("to_entries", "to_entries")]
    #[case("from_entries", "from_entries")]
    fn plain_operations(#[case] operation: &str, #[case] expected: &str) {
        let program = build(operation, &ObjectParams::default()).unwrap();
        assert_eq!(program.filter(), expected);
    }

    #[test]
    fn has_binds_the_key() {
        let params = ObjectParams {
            key: Some("name".to_string()),
            ..Default::default()
        };
        let program = build("has", &params).unwrap();
        assert_eq!(
            program.to_args(&[]),
            vec!["--arg", "key", "name", "has($key)"]
        );
    }

    #[test]
    fn delete_binds_the_key() {
        let params = ObjectParams {
            key: Some("secret".to_string()),
            ..Default::default()
        };
        let program = build("delete", &params).unwrap();
        assert_eq!(program.filter(), "del(.[$key])");
    }

    #[test]
    fn merge_binds_the_document() {
        let params = ObjectParams {
            other: Some(r#"{"b": 2}"#.to_string()),
            ..Default::default()
        };
        let program = build("merge", &params).unwrap();
        assert_eq!(
            program.to_args(&[]),
            vec!["--argjson", "other", r#"{"b": 2}"#, ". * $other"]
        );
    }

    #[test]
    fn pick_encodes_the_key_list() {
        let params = ObjectParams {
            keys: Some(vec!["a".to_string(), "b".to_string()]),
            ..Default::default()
        };
        let program = build("pick", &params).unwrap();
        let args = program.to_args(&[]);
        assert_eq!(args[0], "--argjson");
        assert_eq!(args[1], "keys");
        assert_eq!(args[2], r#"["a","b"]"#);
    }

    #[rstest]
    #[case("has", "key")]
    #[case("delete", "key")]
    #[case("merge", "other")]
    #[case("pick", "keys")]
    fn required_fields(#[case] operation: &str, #[case] field: &str) {
        let err = build(operation, &ObjectParams::default()).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains(field));
    }

    #[test]
    fn pick_rejects_empty_key_list() {
        let params = ObjectParams {
            keys: Some(vec![]),
            ..Default::default()
        };
        let err = build("pick", &params).unwrap_err();
        assert!(err.to_string().contains("keys"));
    }

    #[test]
    fn unknown_operation_fails() {
        let err = build("invert", &ObjectParams::default()).unwrap_err();
        assert!(err.to_string().contains("invert"));
    }
}
