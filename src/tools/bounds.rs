//! Numeric bounds checking shared by the calculator operations.
//!
//! Every calculator result passes through one of these checks before it is
//! returned: integer results must fit the platform's native signed range
//! (`i64`), floating-point results must be finite. Out-of-range results
//! become descriptive error values naming the operation that produced them.

use crate::tools::CalcValue;

/// Check that an exact integer result fits the `i64` range.
///
/// Operations compute in `i128` so the mathematical result is always exact;
/// this is where the platform range is enforced. `operation` is the
/// human-readable operation name used in the error message ("addition",
/// "modulo operation", ...).
pub fn check_int_bounds(value: i128, operation: &str) -> CalcValue {
    if value < i64::MIN as i128 {
        CalcValue::Error(format!(
            "Error: Underflow occurred in {operation}. Result is too small."
        ))
    } else if value > i64::MAX as i128 {
        CalcValue::Error(format!(
            "Error: Overflow occurred in {operation}. Result is too large."
        ))
    } else {
        CalcValue::Int(value as i64)
    }
}

/// Check that a floating-point result is finite.
///
/// Positive infinity reports as overflow, negative infinity as underflow.
/// NaN reports as invalid input: a non-numeric result is never passed
/// through to the caller.
pub fn check_float_bounds(value: f64, operation: &str) -> CalcValue {
    if value == f64::NEG_INFINITY {
        CalcValue::Error(format!(
            "Error: Underflow occurred in {operation}. Result is too small."
        ))
    } else if value == f64::INFINITY {
        CalcValue::Error(format!(
            "Error: Overflow occurred in {operation}. Result is too large."
        ))
    } else if value.is_nan() {
        CalcValue::Error(format!("Error: Invalid input for {operation}."))
    } else {
        CalcValue::Float(value)
    }
}
