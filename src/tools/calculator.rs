//! Calculator toolset: arithmetic and trigonometric operations.
//!
//! Every operation is a stateless function over primitive operands. Integer
//! operations compute exactly in `i128` and enforce the `i64` range;
//! floating-point operations enforce finiteness. Domain guards (zero
//! denominator, zero divisor, negative square-root input) run before the
//! computation. All failures are descriptive error values, never panics.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::core::registry::{McpTool, ToolHandler, ToolRegistry};
use crate::tools::CalcValue;
use crate::tools::bounds::{check_float_bounds, check_int_bounds};

/// Add two integers. Exact result, checked against the `i64` range.
pub fn add(a: i64, b: i64) -> CalcValue {
    debug!("adding {a} + {b}");
    check_int_bounds(a as i128 + b as i128, "addition")
}

/// Subtract the second integer from the first.
pub fn subtract(a: i64, b: i64) -> CalcValue {
    debug!("subtracting {a} - {b}");
    check_int_bounds(a as i128 - b as i128, "subtraction")
}

/// Multiply two integers.
pub fn multiply(a: i64, b: i64) -> CalcValue {
    debug!("multiplying {a} * {b}");
    check_int_bounds(a as i128 * b as i128, "multiplication")
}

/// Divide numerator by denominator. Guards the zero denominator before
/// dividing; the quotient is then checked for finiteness.
pub fn divide(numerator: f64, denominator: f64) -> CalcValue {
    debug!("dividing {numerator} / {denominator}");
    if denominator == 0.0 {
        return CalcValue::Error("Error: Cannot divide by zero.".to_string());
    }
    check_float_bounds(numerator / denominator, "division")
}

/// Raise base to the power of exponent.
pub fn power(base: f64, exponent: f64) -> CalcValue {
    debug!("calculating {base} ^ {exponent}");
    check_float_bounds(base.powf(exponent), "exponentiation")
}

/// Square root of a non-negative number.
pub fn square_root(number: f64) -> CalcValue {
    debug!("calculating square root of {number}");
    if number < 0.0 {
        return CalcValue::Error(
            "Error: Cannot calculate the square root of a negative number.".to_string(),
        );
    }
    check_float_bounds(number.sqrt(), "square root calculation")
}

/// Remainder of an integer division. The remainder takes the sign of the
/// divisor (floored division), matching the calculator's documented
/// behavior for negative operands.
pub fn modulo(a: i64, b: i64) -> CalcValue {
    debug!("calculating {a} % {b}");
    if b == 0 {
        return CalcValue::Error("Error: Cannot perform modulo with zero divisor.".to_string());
    }
    let (a, b) = (a as i128, b as i128);
    let mut remainder = a % b;
    if remainder != 0 && (remainder < 0) != (b < 0) {
        remainder += b;
    }
    check_int_bounds(remainder, "modulo operation")
}

/// Sine of an angle given in degrees.
pub fn sine(angle_degrees: f64) -> CalcValue {
    debug!("calculating sin({angle_degrees}°)");
    check_float_bounds(angle_degrees.to_radians().sin(), "sine calculation")
}

/// Cosine of an angle given in degrees.
pub fn cosine(angle_degrees: f64) -> CalcValue {
    debug!("calculating cos({angle_degrees}°)");
    check_float_bounds(angle_degrees.to_radians().cos(), "cosine calculation")
}

/// Tangent of an angle given in degrees.
///
/// A non-numeric result (e.g. a non-finite angle) reports as invalid input,
/// distinct from the overflow error.
pub fn tangent(angle_degrees: f64) -> CalcValue {
    debug!("calculating tan({angle_degrees}°)");
    check_float_bounds(angle_degrees.to_radians().tan(), "tangent calculation")
}

#[derive(Deserialize)]
struct OperandPair {
    a: i64,
    b: i64,
}

#[derive(Deserialize)]
struct DivisionArgs {
    numerator: f64,
    denominator: f64,
}

#[derive(Deserialize)]
struct PowerArgs {
    base: f64,
    exponent: f64,
}

#[derive(Deserialize)]
struct SquareRootArgs {
    number: f64,
}

#[derive(Deserialize)]
struct AngleArgs {
    angle_degrees: f64,
}

/// Wrap an operation as a registry handler: deserialize the JSON arguments
/// into the operation's parameter struct, run it, and serialize the tagged
/// outcome. Malformed arguments are a transport-level failure; operation
/// errors are ordinary result values.
fn handler<A, F>(operation: F) -> ToolHandler
where
    A: DeserializeOwned + 'static,
    F: Fn(A) -> CalcValue + Send + Sync + 'static,
{
    Box::new(move |args: Value| {
        let args: A = serde_json::from_value(args).map_err(|e| format!("Invalid arguments: {e}"))?;
        Ok(operation(args).into_json())
    })
}

/// JSON Schema for a tool taking two named numeric parameters.
fn pair_schema(kind: &str, first: (&str, &str), second: (&str, &str)) -> Value {
    json!({
        "type": "object",
        "properties": {
            first.0: { "type": kind, "description": first.1 },
            second.0: { "type": kind, "description": second.1 }
        },
        "required": [first.0, second.0]
    })
}

/// JSON Schema for a tool taking a single named numeric parameter.
fn single_schema(kind: &str, name: &str, description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            name: { "type": kind, "description": description }
        },
        "required": [name]
    })
}

/// Register the calculator toolset.
pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        McpTool {
            name: "add".to_string(),
            description: "Add two integer numbers together.".to_string(),
            input_schema: pair_schema(
                "integer",
                ("a", "The first number"),
                ("b", "The second number"),
            ),
        },
        handler(|args: OperandPair| add(args.a, args.b)),
    );

    registry.register(
        McpTool {
            name: "subtract".to_string(),
            description: "Subtract the second number from the first number.".to_string(),
            input_schema: pair_schema(
                "integer",
                ("a", "The first number (minuend)"),
                ("b", "The second number (subtrahend)"),
            ),
        },
        handler(|args: OperandPair| subtract(args.a, args.b)),
    );

    registry.register(
        McpTool {
            name: "multiply".to_string(),
            description: "Multiply two integer numbers.".to_string(),
            input_schema: pair_schema(
                "integer",
                ("a", "The first number"),
                ("b", "The second number"),
            ),
        },
        handler(|args: OperandPair| multiply(args.a, args.b)),
    );

    registry.register(
        McpTool {
            name: "divide".to_string(),
            description: "Divide the numerator by the denominator.".to_string(),
            input_schema: pair_schema(
                "number",
                ("numerator", "The number to be divided"),
                ("denominator", "The number to divide by"),
            ),
        },
        handler(|args: DivisionArgs| divide(args.numerator, args.denominator)),
    );

    registry.register(
        McpTool {
            name: "power".to_string(),
            description: "Raise a number to the power of an exponent.".to_string(),
            input_schema: pair_schema(
                "number",
                ("base", "The base number"),
                ("exponent", "The exponent"),
            ),
        },
        handler(|args: PowerArgs| power(args.base, args.exponent)),
    );

    registry.register(
        McpTool {
            name: "square_root".to_string(),
            description: "Calculate the square root of a non-negative number.".to_string(),
            input_schema: single_schema("number", "number", "The number to find the square root of"),
        },
        handler(|args: SquareRootArgs| square_root(args.number)),
    );

    registry.register(
        McpTool {
            name: "modulo".to_string(),
            description: "Calculate the remainder of an integer division.".to_string(),
            input_schema: pair_schema("integer", ("a", "The dividend"), ("b", "The divisor")),
        },
        handler(|args: OperandPair| modulo(args.a, args.b)),
    );

    registry.register(
        McpTool {
            name: "sine".to_string(),
            description: "Calculate the sine of an angle given in degrees.".to_string(),
            input_schema: single_schema("number", "angle_degrees", "The angle in degrees"),
        },
        handler(|args: AngleArgs| sine(args.angle_degrees)),
    );

    registry.register(
        McpTool {
            name: "cosine".to_string(),
            description: "Calculate the cosine of an angle given in degrees.".to_string(),
            input_schema: single_schema("number", "angle_degrees", "The angle in degrees"),
        },
        handler(|args: AngleArgs| cosine(args.angle_degrees)),
    );

    registry.register(
        McpTool {
            name: "tangent".to_string(),
            description: "Calculate the tangent of an angle given in degrees.".to_string(),
            input_schema: single_schema("number", "angle_degrees", "The angle in degrees"),
        },
        handler(|args: AngleArgs| tangent(args.angle_degrees)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float_of(value: CalcValue) -> f64 {
        match value {
            CalcValue::Float(x) => x,
            other => panic!("expected float result, got {other:?}"),
        }
    }

    #[test]
    fn add_within_range() {
        assert_eq!(add(2, 3), CalcValue::Int(5));
        assert_eq!(add(-2, -3), CalcValue::Int(-5));
    }

    #[test]
    fn add_overflow_and_underflow() {
        assert_eq!(
            add(i64::MAX, 1).as_error(),
            Some("Error: Overflow occurred in addition. Result is too large.")
        );
        assert_eq!(
            add(i64::MIN, -1).as_error(),
            Some("Error: Underflow occurred in addition. Result is too small.")
        );
    }

    #[test]
    fn subtract_underflow() {
        assert_eq!(subtract(10, 4), CalcValue::Int(6));
        assert_eq!(
            subtract(i64::MIN, 1).as_error(),
            Some("Error: Underflow occurred in subtraction. Result is too small.")
        );
    }

    #[test]
    fn multiply_overflow() {
        assert_eq!(multiply(-6, 7), CalcValue::Int(-42));
        assert_eq!(
            multiply(i64::MAX, 2).as_error(),
            Some("Error: Overflow occurred in multiplication. Result is too large.")
        );
    }

    #[test]
    fn divide_by_zero_is_guarded() {
        assert_eq!(
            divide(5.0, 0.0).as_error(),
            Some("Error: Cannot divide by zero.")
        );
        assert_eq!(
            divide(0.0, 0.0).as_error(),
            Some("Error: Cannot divide by zero.")
        );
    }

    #[test]
    fn divide_finite_result() {
        assert_eq!(divide(9.0, 2.0), CalcValue::Float(4.5));
    }

    #[test]
    fn divide_overflowing_quotient() {
        assert_eq!(
            divide(f64::MAX, f64::MIN_POSITIVE).as_error(),
            Some("Error: Overflow occurred in division. Result is too large.")
        );
    }

    #[test]
    fn power_results() {
        assert!((float_of(power(2.0, 10.0)) - 1024.0).abs() < 1e-9);
        assert_eq!(
            power(10.0, 1000.0).as_error(),
            Some("Error: Overflow occurred in exponentiation. Result is too large.")
        );
    }

    #[test]
    fn square_root_of_negative_is_guarded() {
        assert_eq!(
            square_root(-1.0).as_error(),
            Some("Error: Cannot calculate the square root of a negative number.")
        );
    }

    #[test]
    fn square_root_of_sixteen() {
        assert_eq!(square_root(16.0), CalcValue::Float(4.0));
        assert_eq!(square_root(0.0), CalcValue::Float(0.0));
    }

    #[test]
    fn modulo_with_zero_divisor_is_guarded() {
        assert_eq!(
            modulo(7, 0).as_error(),
            Some("Error: Cannot perform modulo with zero divisor.")
        );
    }

    #[test]
    fn modulo_sign_follows_the_divisor() {
        assert_eq!(modulo(7, 3), CalcValue::Int(1));
        assert_eq!(modulo(-7, 3), CalcValue::Int(2));
        assert_eq!(modulo(7, -3), CalcValue::Int(-2));
        assert_eq!(modulo(-7, -3), CalcValue::Int(-1));
    }

    #[test]
    fn modulo_min_by_negative_one() {
        // i64::MIN % -1 would overflow native i64 arithmetic; the i128
        // computation yields the exact result.
        assert_eq!(modulo(i64::MIN, -1), CalcValue::Int(0));
    }

    #[test]
    fn sine_and_cosine_at_zero() {
        assert!(float_of(sine(0.0)).abs() < 1e-12);
        assert!((float_of(cosine(0.0)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn sine_at_ninety_degrees() {
        assert!((float_of(sine(90.0)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tangent_at_forty_five_degrees() {
        assert!((float_of(tangent(45.0)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tangent_of_non_finite_angle_is_invalid_input() {
        assert_eq!(
            tangent(f64::INFINITY).as_error(),
            Some("Error: Invalid input for tangent calculation.")
        );
    }

    #[test]
    fn operations_are_idempotent() {
        assert_eq!(add(12, 30), add(12, 30));
        assert_eq!(divide(1.0, 3.0), divide(1.0, 3.0));
        assert_eq!(sine(30.0), sine(30.0));
    }

    #[test]
    fn handlers_reject_malformed_arguments() {
        let mut registry = ToolRegistry::new();
        register(&mut registry);

        let result = registry
            .invoke("add", serde_json::json!({ "a": 1 }))
            .expect("add is registered");
        assert!(result.is_err());

        let result = registry
            .invoke("add", serde_json::json!({ "a": 1.5, "b": 2 }))
            .expect("add is registered");
        assert!(result.is_err());
    }

    #[test]
    fn handlers_relay_error_values_as_results() {
        let mut registry = ToolRegistry::new();
        register(&mut registry);

        let result = registry
            .invoke("divide", serde_json::json!({ "numerator": 1.0, "denominator": 0.0 }))
            .expect("divide is registered")
            .expect("operation errors are values, not failures");
        assert_eq!(result, serde_json::json!("Error: Cannot divide by zero."));
    }
}
