//! Array operations: length, reverse, sort, unique, flatten, sum, min, max,
//! group, first, last.
//!
//! Presence of the optional `key` switches sort/unique/min/max between the
//! plain and `*_by` templates; `group` always requires a key. `depth` only
//! affects flatten.

use super::Program;
use crate::error::{JqError, JqResult};

const TOOL: &str = "array_op";

/// Optional fields accepted by array operations.
#[derive(Debug, Clone, Default)]
pub struct ArrayParams {
    /// Object key for the keyed variants (sort_by, unique_by, min_by,
    /// max_by, group_by).
    pub key: Option<String>,
    /// Depth limit for flatten.
    pub depth: Option<u64>,
}

/// Build the jq program for an array operation.
pub fn build(operation: &str, params: &ArrayParams) -> JqResult<Program> {
    let keyed = |plain: &str, by: &str| -> Program {
        match &params.key {
            Some(key) => Program::new(format!("{}(.[$key])", by)).bind_str("key", key),
            None => Program::new(plain),
        }
    };

    match operation {
        "length" => Ok(Program::new("length")),
        "reverse" => Ok(Program::new("reverse")),
        "sort" => Ok(keyed("sort", "sort_by")),
        "unique" => Ok(keyed("unique", "unique_by")),
        "flatten" => Ok(match params.depth {
            Some(depth) => Program::new("flatten($depth)").bind_json("depth", depth.to_string()),
            None => Program::new("flatten"),
        }),
        "sum" => Ok(Program::new("add")),
        "min" => Ok(keyed("min", "min_by")),
        "max" => Ok(keyed("max", "max_by")),
        "group" => match &params.key {
            Some(key) => Ok(Program::new("group_by(.[$key])").bind_str("key", key)),
            None => Err(JqError::missing(TOOL, "key")),
        },
        "first" => Ok(Program::new("first")),
        "last" => Ok(Program::new("last")),
        other => Err(JqError::unknown_operation(TOOL, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("length", "length")]
    #[case("reverse", "reverse")]
    #[case("sort", "sort")]
    #[case("unique", "unique")]
    #[case("flatten", "flatten")]
    #[case("sum", "add")]
    #[case("min", "min")]
    #[case("max", "max")]
    #[case("first", "first")]
    #[case("last", "last")]
    fn plain_operations(#[case] operation: &str, #[case] expected: &str) {
        let program = build(operation, &ArrayParams::default()).unwrap();
        assert_eq!(program.filter(), expected);
        assert_eq!(program.to_args(&[]), vec![expected.to_string()]);
    }

    #[rstest]
    #[case("sort", "sort_by(.[$key])")]
    #[case("unique", "unique_by(.[$key])")]
    #[case("min", "min_by(.[$key])")]
    #[case("max", "max_by(.[$key])")]
    #[case("group", "group_by(.[$key])")]
    fn keyed_operations(#[case] operation: &str, #[case] expected: &str) {
        let params = ArrayParams {
            key: Some("age".to_string()),
            depth: None,
        };
        let program = build(operation, &params).unwrap();
        assert_eq!(program.filter(), expected);
        assert_eq!(
            program.to_args(&[]),
            vec!["--arg", "key", "age", expected]
        );
    }

    #[test]
    fn flatten_with_depth() {
        let params = ArrayParams {
            key: None,
            depth: Some(2),
        };
        let program = build("flatten", &params).unwrap();
        assert_eq!(
            program.to_args(&[]),
            vec!["--argjson", "depth", "2", "flatten($depth)"]
        );
    }

    #[test]
    fn group_requires_key() {
        let err = build("group", &ArrayParams::default()).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("key"));
    }

    #[test]
    fn unknown_operation_fails() {
        let err = build("rotate", &ArrayParams::default()).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("rotate"));
    }
}
