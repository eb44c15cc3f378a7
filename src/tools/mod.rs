//! MCP tool implementations.
//!
//! Two independent toolsets live here: `calculator` (arithmetic and
//! trigonometry with uniform bounds checking) and `demo` (miscellaneous
//! utility tools). Each toolset module exports a `register` function that
//! adds its tools to the registry during server initialization. `bounds`
//! holds the numeric range checks shared by the calculator operations.

pub mod bounds;
pub mod calculator;
pub mod demo;

use serde_json::{Value, json};

/// Tagged outcome of a calculator operation: a numeric value on success, a
/// descriptive message on failure. Exactly one variant per call.
///
/// Errors are ordinary return values relayed verbatim to the caller, never
/// faults. The transport layer serializes `Int`/`Float` as JSON numbers and
/// `Error` as a JSON string, so clients must not assume the result is
/// uniformly numeric.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcValue {
    Int(i64),
    Float(f64),
    Error(String),
}

impl CalcValue {
    /// Serialize the outcome for a tool-call response.
    ///
    /// Infinities and NaN never reach this point; the bounds checks convert
    /// them to `Error` first, so the JSON number encoding is always finite.
    pub fn into_json(self) -> Value {
        match self {
            CalcValue::Int(n) => json!(n),
            CalcValue::Float(x) => json!(x),
            CalcValue::Error(message) => json!(message),
        }
    }

    /// The error message, if this outcome is an error.
    pub fn as_error(&self) -> Option<&str> {
        match self {
            CalcValue::Error(message) => Some(message),
            _ => None,
        }
    }
}
