//! Higher-level jq operations: query, path extraction, transform,
//! conditional select, format, validate.
//!
//! Each operation follows the same contract: build the argument list, run
//! one jq invocation, and classify the captured output — failing only on a
//! non-zero exit with non-empty stderr, and substituting the documented
//! sentinel when a successful call produced no output.

use crate::error::{JqError, JqResult};
use crate::expr::Program;
use crate::invoke::{classify, JqExecutor, JqRequest, NO_MATCHES_SENTINEL, NULL_SENTINEL};

/// Output flags for free-form queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryOpts {
    /// Raw output (-r): print top-level strings without quotes.
    pub raw: bool,
    /// Compact output (-c): no pretty-printing.
    pub compact: bool,
    /// Slurp mode (-s): read the whole input stream into one array before
    /// applying the filter.
    pub slurp: bool,
}

impl QueryOpts {
    fn flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.slurp {
            flags.push("-s");
        }
        if self.compact {
            flags.push("-c");
        }
        if self.raw {
            flags.push("-r");
        }
        flags
    }
}

/// Run a built program against input text and classify the result.
///
/// This is the shared execution path for the per-category operation tools.
pub async fn run_program(
    exec: &JqExecutor,
    tool: &str,
    program: &Program,
    input: &str,
    flags: &[&str],
) -> JqResult<String> {
    let request = JqRequest::new(program.to_args(flags)).with_input(input);
    let output = exec.invoke(request).await?;
    classify(tool, output, NULL_SENTINEL)
}

/// Apply an arbitrary jq filter to a JSON document.
pub async fn query(
    exec: &JqExecutor,
    filter: &str,
    input: &str,
    opts: QueryOpts,
) -> JqResult<String> {
    if filter.trim().is_empty() {
        return Err(JqError::missing("query", "filter"));
    }
    let program = Program::new(filter);
    run_program(exec, "query", &program, input, &opts.flags()).await
}

/// Extract a value at a dot/bracket path like `users[0].name`.
///
/// The path is parsed into segments and bound out-of-band, then evaluated
/// with `getpath($path)` — a missing path yields the `null` sentinel rather
/// than a failure. The catch also covers paths that traverse a scalar,
/// which getpath reports as an indexing error on jq 1.6.
pub async fn extract(exec: &JqExecutor, path: &str, input: &str) -> JqResult<String> {
    let segments = parse_path(path)?;
    let program =
        Program::new("try getpath($path) catch null").bind_json("path", segments.to_string());
    run_program(exec, "extract", &program, input, &["-c"]).await
}

/// Apply a modification expression to a JSON document.
pub async fn transform(exec: &JqExecutor, expression: &str, input: &str) -> JqResult<String> {
    if expression.trim().is_empty() {
        return Err(JqError::missing("transform", "expression"));
    }
    let program = Program::new(expression);
    run_program(exec, "transform", &program, input, &["-c"]).await
}

/// Filter array elements by a jq condition, e.g. `.age > 30`.
///
/// Zero matches yields the `No matches found` sentinel, never an empty
/// string or a failure.
pub async fn select_matching(exec: &JqExecutor, condition: &str, input: &str) -> JqResult<String> {
    if condition.trim().is_empty() {
        return Err(JqError::missing("select", "condition"));
    }
    let program = Program::new(format!("[.[] | select({})]", condition));
    let request = JqRequest::new(program.to_args(&["-c"])).with_input(input);
    let output = exec.invoke(request).await?;
    let result = classify("select", output, NO_MATCHES_SENTINEL)?;
    if result == "[]" {
        Ok(NO_MATCHES_SENTINEL.to_string())
    } else {
        Ok(result)
    }
}

/// Re-serialize a JSON document, pretty-printed or compact.
pub async fn format(exec: &JqExecutor, input: &str, compact: bool) -> JqResult<String> {
    let flags: &[&str] = if compact { &["-c"] } else { &[] };
    let program = Program::new(".");
    run_program(exec, "format", &program, input, flags).await
}

/// Check that input parses as JSON. Malformed input surfaces as an
/// interpreter failure with jq's parse error in stderr.
pub async fn validate(exec: &JqExecutor, input: &str) -> JqResult<String> {
    let program = Program::new(".");
    let request = JqRequest::new(program.to_args(&["-c"])).with_input(input);
    let output = exec.invoke(request).await?;
    classify("validate", output, NULL_SENTINEL)?;
    Ok("Valid JSON".to_string())
}

/// Parse a dot/bracket path into jq path segments.
///
/// `users[0].name` becomes `["users", 0, "name"]`. A leading dot is
/// accepted; an empty path addresses the whole document.
fn parse_path(path: &str) -> JqResult<serde_json::Value> {
    let invalid = || JqError::InvalidPath {
        path: path.to_string(),
    };

    let trimmed = path.trim().trim_start_matches('.');
    let mut segments: Vec<serde_json::Value> = Vec::new();
    if trimmed.is_empty() {
        return Ok(serde_json::Value::Array(segments));
    }

    for part in trimmed.split('.') {
        if part.is_empty() {
            return Err(invalid());
        }
        let mut rest = part;
        if let Some(idx) = rest.find('[') {
            let (name, brackets) = rest.split_at(idx);
            if !name.is_empty() {
                segments.push(serde_json::Value::String(name.to_string()));
            }
            rest = brackets;
            while let Some(inner) = rest.strip_prefix('[') {
                let end = inner.find(']').ok_or_else(invalid)?;
                let index: i64 = inner[..end].trim().parse().map_err(|_| invalid())?;
                segments.push(serde_json::Value::Number(index.into()));
                rest = &inner[end + 1..];
            }
            if !rest.is_empty() {
                return Err(invalid());
            }
        } else {
            segments.push(serde_json::Value::String(rest.to_string()));
        }
    }

    Ok(serde_json::Value::Array(segments))
}
