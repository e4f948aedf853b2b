//! String operations: length, split, join, contains, startswith, endswith,
//! trim, upper, lower, replace.
//!
//! split/join require a separator; contains/startswith/endswith require a
//! search value; replace requires both a search value and a replacement.

use super::Program;
use crate::error::{JqError, JqResult};

const TOOL: &str = "string_op";

/// Optional fields accepted by string operations.
#[derive(Debug, Clone, Default)]
pub struct StringParams {
    /// Separator for split/join.
    pub separator: Option<String>,
    /// Search value for contains/startswith/endswith/replace.
    pub search: Option<String>,
    /// Replacement value for replace.
    pub replacement: Option<String>,
}

/// Build the jq program for a string operation.
pub fn build(operation: &str, params: &StringParams) -> JqResult<Program> {
    let with_separator = |filter: &str| -> JqResult<Program> {
        match &params.separator {
            Some(sep) => Ok(Program::new(filter).bind_str("sep", sep)),
            None => Err(JqError::missing(TOOL, "separator")),
        }
    };
    let with_search = |filter: &str| -> JqResult<Program> {
        match &params.search {
            Some(search) => Ok(Program::new(filter).bind_str("search", search)),
            None => Err(JqError::missing(TOOL, "search")),
        }
    };

    match operation {
        "length" => Ok(Program::new("length")),
        "split" => with_separator("split($sep)"),
        "join" => with_separator("join($sep)"),
        "contains" => with_search("contains($search)"),
        "startswith" => with_search("startswith($search)"),
        "endswith" => with_search("endswith($search)"),
        // jq's trim builtin only landed in 1.7.1; the sub pair works
        // everywhere.
        "trim" => Ok(Program::new(r#"sub("^\\s+"; "") | sub("\\s+$"; "")"#)),
        "upper" => Ok(Program::new("ascii_upcase")),
        "lower" => Ok(Program::new("ascii_downcase")),
        // split/join keeps replace literal; gsub would treat the search
        // value as a regex.
        "replace" => match (&params.search, &params.replacement) {
            (Some(search), Some(replacement)) => Ok(Program::new("split($search) | join($replace)")
                .bind_str("search", search)
                .bind_str("replace", replacement)),
            (None, _) => Err(JqError::missing(TOOL, "search")),
            (_, None) => Err(JqError::missing(TOOL, "replacement")),
        },
        other => Err(JqError::unknown_operation(TOOL, other)),
    }
}
