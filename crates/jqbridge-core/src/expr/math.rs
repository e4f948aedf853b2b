//! Math operations: add, multiply, subtract, divide, modulo, floor, ceil,
//! round, abs, sqrt.
//!
//! add and multiply are dual-mode: with an operand they apply to a scalar,
//! without one they fold over a numeric sequence. subtract/divide/modulo
//! always require an operand. The unary operations take none — a supplied
//! operand is ignored, not rejected. That asymmetry matches the reference
//! behavior and is pinned by tests rather than unified.

use super::Program;
use crate::error::{JqError, JqResult};

const TOOL: &str = "math_op";

/// Optional fields accepted by math operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathParams {
    /// Numeric operand for the binary operations.
    pub operand: Option<f64>,
}

/// Build the jq program for a math operation.
pub fn build(operation: &str, params: &MathParams) -> JqResult<Program> {
    let binary = |filter: &str| -> JqResult<Program> {
        match params.operand {
            Some(n) => Ok(Program::new(filter).bind_json("n", encode_number(n))),
            None => Err(JqError::missing(TOOL, "operand")),
        }
    };

    match operation {
        "add" => Ok(match params.operand {
            Some(n) => Program::new(". + $n").bind_json("n", encode_number(n)),
            None => Program::new("add"),
        }),
        "multiply" => Ok(match params.operand {
            Some(n) => Program::new(". * $n").bind_json("n", encode_number(n)),
            None => Program::new("reduce .[] as $x (1; . * $x)"),
        }),
        "subtract" => binary(". - $n"),
        "divide" => binary(". / $n"),
        "modulo" => binary(". % $n"),
        "floor" => Ok(Program::new("floor")),
        "ceil" => Ok(Program::new("ceil")),
        "round" => Ok(Program::new("round")),
        "abs" => Ok(Program::new("if . < 0 then -. else . end")),
        "sqrt" => Ok(Program::new("sqrt")),
        other => Err(JqError::unknown_operation(TOOL, other)),
    }
}

/// Integral operands are emitted without a fractional part so jq arithmetic
/// stays in integers where the caller supplied one.
fn encode_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < i64::MAX as f64 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
