//! MCP server handler implementation.
//!
//! Implements the rmcp::ServerHandler trait to expose jq-backed JSON tools.
//! Every failure is returned inside the tool result with the error flag set
//! — nothing throws across the MCP boundary.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    Annotated, CallToolResult, Content, Implementation, ListResourcesResult, PaginatedRequestParam,
    ProtocolVersion, RawResource, ReadResourceRequestParam, ReadResourceResult, ResourceContents,
    ServerCapabilities, ServerInfo,
};
use rmcp::schemars::{self, JsonSchema};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::ErrorData as McpError;
use rmcp::{tool, tool_handler, tool_router};
use serde::{Deserialize, Serialize};

use jqbridge_core::expr::array::{self, ArrayParams};
use jqbridge_core::expr::math::{self, MathParams};
use jqbridge_core::expr::object::{self, ObjectParams};
use jqbridge_core::expr::string::{self, StringParams};
use jqbridge_core::filter;
use jqbridge_core::{JqExecutor, JqResult, Program, QueryOpts};

use super::config::ServerConfig;
use super::resources;

/// The jqbridge MCP server handler.
#[derive(Clone)]
pub struct JqServerHandler {
    /// Server configuration.
    config: ServerConfig,
    /// Executor for jq invocations; one subprocess per tool call.
    executor: JqExecutor,
    /// Tool router.
    tool_router: ToolRouter<Self>,
}

impl JqServerHandler {
    /// Create a new handler with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        let executor = config.executor();
        Self {
            config,
            executor,
            tool_router: Self::tool_router(),
        }
    }

    /// The executor this handler invokes jq through.
    pub fn executor(&self) -> &JqExecutor {
        &self.executor
    }

    async fn run_op(&self, tool: &str, program: JqResult<Program>, json: &str, flags: &[&str]) -> Result<CallToolResult, McpError> {
        let result = match program {
            Ok(program) => filter::run_program(&self.executor, tool, &program, json, flags).await,
            Err(e) => Err(e),
        };
        Ok(tool_result(result))
    }
}

/// Map an operation result into the MCP envelope. Success carries the text
/// payload; failure carries the message with the error flag set.
fn tool_result(result: JqResult<String>) -> CallToolResult {
    match result {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => CallToolResult {
            content: vec![Content::text(e.to_string())],
            is_error: Some(true),
            structured_content: None,
            meta: None,
        },
    }
}

/// Query tool input schema.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryInput {
    /// jq filter expression to apply.
    #[schemars(description = "jq filter expression to apply (e.g. '.users[].name')")]
    pub filter: String,

    /// JSON document text.
    #[schemars(description = "JSON document text to process")]
    pub json: String,

    /// Raw output mode.
    #[schemars(description = "Raw output (-r): print strings without quotes")]
    pub raw: Option<bool>,

    /// Compact output mode.
    #[schemars(description = "Compact output (-c): no pretty-printing")]
    pub compact: Option<bool>,

    /// Slurp mode.
    #[schemars(description = "Slurp (-s): gather the whole input stream into one array first")]
    pub slurp: Option<bool>,
}

/// Extract tool input schema.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractInput {
    /// Dot/bracket path.
    #[schemars(description = "Path to extract, e.g. 'users[0].name'. Missing paths yield null")]
    pub path: String,

    /// JSON document text.
    #[schemars(description = "JSON document text to process")]
    pub json: String,
}

/// Transform tool input schema.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TransformInput {
    /// jq modification expression.
    #[schemars(description = "jq modification expression, e.g. '.count += 1'")]
    pub expression: String,

    /// JSON document text.
    #[schemars(description = "JSON document text to process")]
    pub json: String,
}

/// Select tool input schema.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SelectInput {
    /// jq condition applied per element.
    #[schemars(description = "jq condition applied to each array element, e.g. '.age > 30'")]
    pub condition: String,

    /// JSON array text.
    #[schemars(description = "JSON array text to filter")]
    pub json: String,
}

/// Array operation input schema.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArrayOpInput {
    /// Operation name.
    #[schemars(
        description = "Operation: length, reverse, sort, unique, flatten, sum, min, max, group, first, last"
    )]
    pub operation: String,

    /// JSON array text.
    #[schemars(description = "JSON array text to process")]
    pub json: String,

    /// Key for the keyed variants.
    #[schemars(description = "Object key for sort/unique/min/max/group by-key variants")]
    pub key: Option<String>,

    /// Flatten depth.
    #[schemars(description = "Depth limit for flatten")]
    pub depth: Option<u64>,
}

/// Object operation input schema.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ObjectOpInput {
    /// Operation name.
    #[schemars(
        description = "Operation: keys, values, to_entries, from_entries, has, delete, merge, pick"
    )]
    pub operation: String,

    /// JSON object text.
    #[schemars(description = "JSON object text to process")]
    pub json: String,

    /// Key for has/delete.
    #[schemars(description = "Key name (required for has and delete)")]
    pub key: Option<String>,

    /// Second document for merge.
    #[schemars(description = "Second JSON document text (required for merge)")]
    pub other: Option<String>,

    /// Key list for pick.
    #[schemars(description = "Ordered key list (required, non-empty, for pick)")]
    pub keys: Option<Vec<String>>,
}

/// String operation input schema.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StringOpInput {
    /// Operation name.
    #[schemars(
        description = "Operation: length, split, join, contains, startswith, endswith, trim, upper, lower, replace"
    )]
    pub operation: String,

    /// JSON string text (or array for join).
    #[schemars(description = "JSON string text to process (JSON array for join)")]
    pub json: String,

    /// Separator for split/join.
    #[schemars(description = "Separator (required for split and join)")]
    pub separator: Option<String>,

    /// Search value.
    #[schemars(description = "Search value (required for contains/startswith/endswith/replace)")]
    pub search: Option<String>,

    /// Replacement value.
    #[schemars(description = "Replacement value (required for replace); literal, not regex")]
    pub replacement: Option<String>,
}

/// Math operation input schema.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MathOpInput {
    /// Operation name.
    #[schemars(
        description = "Operation: add, multiply, subtract, divide, modulo, floor, ceil, round, abs, sqrt"
    )]
    pub operation: String,

    /// JSON number or numeric array text.
    #[schemars(
        description = "JSON number text (or numeric array for add/multiply without operand)"
    )]
    pub json: String,

    /// Numeric operand.
    #[schemars(
        description = "Operand for binary operations; add/multiply fold over an array when absent"
    )]
    pub operand: Option<f64>,
}

/// Format tool input schema.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FormatInput {
    /// JSON document text.
    #[schemars(description = "JSON document text to re-serialize")]
    pub json: String,

    /// Compact output.
    #[schemars(description = "Compact output instead of pretty-printed")]
    pub compact: Option<bool>,
}

/// Validate tool input schema.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ValidateInput {
    /// JSON document text.
    #[schemars(description = "JSON document text to check")]
    pub json: String,
}

#[tool_router]
impl JqServerHandler {
    /// Apply an arbitrary jq filter to a JSON document.
    #[tool(
        description = "Apply a jq filter to a JSON document. The filter is raw jq syntax; see the jq://reference/filters resource."
    )]
    pub async fn query(&self, input: Parameters<QueryInput>) -> Result<CallToolResult, McpError> {
        let QueryInput {
            filter,
            json,
            raw,
            compact,
            slurp,
        } = input.0;
        let opts = QueryOpts {
            raw: raw.unwrap_or(false),
            compact: compact.unwrap_or(false),
            slurp: slurp.unwrap_or(false),
        };
        Ok(tool_result(
            filter::query(&self.executor, &filter, &json, opts).await,
        ))
    }

    /// Extract the value at a dot/bracket path.
    #[tool(
        description = "Extract the value at a path like 'users[0].name'. Missing paths return null, not an error."
    )]
    pub async fn extract(
        &self,
        input: Parameters<ExtractInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(tool_result(
            filter::extract(&self.executor, &input.0.path, &input.0.json).await,
        ))
    }

    /// Apply a jq modification expression.
    #[tool(
        description = "Transform a JSON document with a jq modification expression, e.g. '.count += 1' or 'del(.secret)'."
    )]
    pub async fn transform(
        &self,
        input: Parameters<TransformInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(tool_result(
            filter::transform(&self.executor, &input.0.expression, &input.0.json).await,
        ))
    }

    /// Keep array elements matching a jq condition.
    #[tool(
        description = "Filter array elements by a jq condition, e.g. '.age > 30'. Returns 'No matches found' when nothing matches."
    )]
    pub async fn select(&self, input: Parameters<SelectInput>) -> Result<CallToolResult, McpError> {
        Ok(tool_result(
            filter::select_matching(&self.executor, &input.0.condition, &input.0.json).await,
        ))
    }

    /// Array operations.
    #[tool(
        description = "Array operations: length, reverse, sort, unique, flatten, sum, min, max, group, first, last. Optional key selects the by-key variant; depth limits flatten."
    )]
    pub async fn array_op(
        &self,
        input: Parameters<ArrayOpInput>,
    ) -> Result<CallToolResult, McpError> {
        let ArrayOpInput {
            operation,
            json,
            key,
            depth,
        } = input.0;
        let params = ArrayParams { key, depth };
        self.run_op("array_op", array::build(&operation, &params), &json, &["-c"])
            .await
    }

    /// Object operations.
    #[tool(
        description = "Object operations: keys, values, to_entries, from_entries, has, delete, merge, pick. has/delete need key; merge needs other; pick needs keys."
    )]
    pub async fn object_op(
        &self,
        input: Parameters<ObjectOpInput>,
    ) -> Result<CallToolResult, McpError> {
        let ObjectOpInput {
            operation,
            json,
            key,
            other,
            keys,
        } = input.0;
        let params = ObjectParams { key, other, keys };
        self.run_op("object_op", object::build(&operation, &params), &json, &["-c"])
            .await
    }

    /// String operations.
    #[tool(
        description = "String operations: length, split, join, contains, startswith, endswith, trim, upper, lower, replace. split/join need separator; contains/startswith/endswith need search; replace needs search and replacement."
    )]
    pub async fn string_op(
        &self,
        input: Parameters<StringOpInput>,
    ) -> Result<CallToolResult, McpError> {
        let StringOpInput {
            operation,
            json,
            separator,
            search,
            replacement,
        } = input.0;
        let params = StringParams {
            separator,
            search,
            replacement,
        };
        // Raw output so string results come back unquoted.
        self.run_op(
            "string_op",
            string::build(&operation, &params),
            &json,
            &["-c", "-r"],
        )
        .await
    }

    /// Math operations.
    #[tool(
        description = "Math operations: add, multiply, subtract, divide, modulo, floor, ceil, round, abs, sqrt. add/multiply fold over an array when operand is absent; subtract/divide/modulo require operand; unary ops ignore it."
    )]
    pub async fn math_op(
        &self,
        input: Parameters<MathOpInput>,
    ) -> Result<CallToolResult, McpError> {
        let MathOpInput {
            operation,
            json,
            operand,
        } = input.0;
        let params = MathParams { operand };
        self.run_op("math_op", math::build(&operation, &params), &json, &["-c"])
            .await
    }

    /// Re-serialize a JSON document.
    #[tool(description = "Format a JSON document: pretty-printed by default, compact with compact=true.")]
    pub async fn format(&self, input: Parameters<FormatInput>) -> Result<CallToolResult, McpError> {
        Ok(tool_result(
            filter::format(
                &self.executor,
                &input.0.json,
                input.0.compact.unwrap_or(false),
            )
            .await,
        ))
    }

    /// Check JSON syntax.
    #[tool(description = "Validate JSON syntax. Returns 'Valid JSON' or the parse error.")]
    pub async fn validate(
        &self,
        input: Parameters<ValidateInput>,
    ) -> Result<CallToolResult, McpError> {
        Ok(tool_result(
            filter::validate(&self.executor, &input.0.json).await,
        ))
    }
}

#[tool_handler]
impl rmcp::ServerHandler for JqServerHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(format!(
                "{} — JSON query and transformation tools backed by jq.\n\n\
                 Every tool takes the document as a `json` string parameter and \
                 runs one jq invocation per call. Use `query` for free-form \
                 filters, `extract` for simple paths, `select` to filter arrays, \
                 and the `*_op` tools for common array/object/string/math \
                 operations without writing jq.\n\n\
                 Reference resources: jq://reference/filters (syntax), \
                 jq://reference/operations (tool catalog).",
                self.config.name
            )),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let resources: Vec<Annotated<RawResource>> = resources::DOCS
            .iter()
            .map(|doc| Annotated {
                raw: RawResource {
                    uri: doc.uri.to_string(),
                    name: doc.name.to_string(),
                    title: None,
                    description: Some(doc.description.to_string()),
                    mime_type: Some(resources::MIME_TYPE.to_string()),
                    size: None,
                    icons: None,
                },
                annotations: None,
            })
            .collect();

        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let uri = request.uri.as_str();

        let doc = resources::find(uri).ok_or_else(|| {
            McpError::invalid_request(format!("Unknown resource URI: {}", uri), None)
        })?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: uri.to_string(),
                mime_type: Some(resources::MIME_TYPE.to_string()),
                text: doc.text.to_string(),
                meta: None,
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    fn handler() -> JqServerHandler {
        JqServerHandler::new(ServerConfig::default())
    }

    fn result_text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("expected text content"),
        }
    }

    #[test]
    fn test_handler_creation() {
        let handler = handler();
        assert_eq!(handler.config.name, "jqbridge");
        assert_eq!(handler.executor().binary(), "jq");
    }

    #[test]
    fn test_get_info() {
        use rmcp::ServerHandler;

        let info = handler().get_info();
        let instructions = info.instructions.expect("instructions should be set");
        assert!(instructions.contains("query"));
        assert!(instructions.contains("jq://reference/filters"));
    }

    #[tokio::test]
    async fn test_query_tool() {
        let result = handler()
            .query(Parameters(QueryInput {
                filter: ".name".to_string(),
                json: r#"{"name": "Alice"}"#.to_string(),
                raw: Some(true),
                compact: None,
                slurp: None,
            }))
            .await
            .expect("query failed");

        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(result_text(&result), "Alice");
    }

    #[tokio::test]
    async fn test_string_op_missing_separator_is_flagged_error() {
        // Validation failure: reported in the envelope, jq never runs.
        let result = handler()
            .string_op(Parameters(StringOpInput {
                operation: "split".to_string(),
                json: r#""a,b,c""#.to_string(),
                separator: None,
                search: None,
                replacement: None,
            }))
            .await
            .expect("string_op failed");

        assert!(result.is_error.unwrap_or(false));
        assert!(result_text(&result).contains("separator"));
    }

    #[tokio::test]
    async fn test_array_op_sum() {
        let result = handler()
            .array_op(Parameters(ArrayOpInput {
                operation: "sum".to_string(),
                json: "[1, 2, 3, 4, 5]".to_string(),
                key: None,
                depth: None,
            }))
            .await
            .expect("array_op failed");

        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(result_text(&result), "15");
    }
}
