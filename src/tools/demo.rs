//! Demo toolset: miscellaneous utility tools.
//!
//! Unlike the calculator toolset, these tools perform no bounds checking;
//! the integer arithmetic saturates at the `i64` range so every call is
//! total. `random_number` and `current_time` are the only sources of
//! non-determinism in the server.

use chrono::Local;
use rand::Rng;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::core::registry::{McpTool, ToolRegistry};

/// Add two integers, saturating at the `i64` range.
pub fn add(a: i64, b: i64) -> i64 {
    a.saturating_add(b)
}

/// Multiply two integers, saturating at the `i64` range.
pub fn multiply(a: i64, b: i64) -> i64 {
    a.saturating_mul(b)
}

/// A uniformly distributed integer in the inclusive range
/// `[min_val, max_val]`, or a descriptive error value when the range is
/// inverted.
pub fn random_number(min_val: i64, max_val: i64) -> Result<i64, String> {
    if min_val > max_val {
        return Err(format!(
            "Error: Invalid range: min_val ({min_val}) is greater than max_val ({max_val})."
        ));
    }
    Ok(rand::rng().random_range(min_val..=max_val))
}

/// The current local timestamp, formatted as "YYYY-MM-DD HH:MM:SS".
pub fn current_time() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Area of a circle with the given radius.
pub fn calculate_circle_area(radius: f64) -> f64 {
    std::f64::consts::PI * radius * radius
}

/// The input text with every character upper-cased.
pub fn to_uppercase(text: &str) -> String {
    text.to_uppercase()
}

#[derive(Deserialize)]
struct OperandPair {
    a: i64,
    b: i64,
}

#[derive(Deserialize)]
struct RandomRangeArgs {
    #[serde(default = "default_min_val")]
    min_val: i64,
    #[serde(default = "default_max_val")]
    max_val: i64,
}

fn default_min_val() -> i64 {
    1
}

fn default_max_val() -> i64 {
    100
}

#[derive(Deserialize)]
struct RadiusArgs {
    radius: f64,
}

#[derive(Deserialize)]
struct TextArgs {
    text: String,
}

fn parse<A: serde::de::DeserializeOwned>(args: Value) -> Result<A, String> {
    serde_json::from_value(args).map_err(|e| format!("Invalid arguments: {e}"))
}

/// Register the demo toolset.
///
/// The arithmetic tools carry a `demo_` prefix: the merged server shares a
/// single tool namespace with the calculator toolset, which already claims
/// `add` and `multiply`.
pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        McpTool {
            name: "demo_add".to_string(),
            description: "Add two numbers.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "a": { "type": "integer", "description": "The first number" },
                    "b": { "type": "integer", "description": "The second number" }
                },
                "required": ["a", "b"]
            }),
        },
        Box::new(|args: Value| {
            let args: OperandPair = parse(args)?;
            debug!("demo add {} + {}", args.a, args.b);
            Ok(json!(add(args.a, args.b)))
        }),
    );

    registry.register(
        McpTool {
            name: "demo_multiply".to_string(),
            description: "Multiply two numbers.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "a": { "type": "integer", "description": "The first number" },
                    "b": { "type": "integer", "description": "The second number" }
                },
                "required": ["a", "b"]
            }),
        },
        Box::new(|args: Value| {
            let args: OperandPair = parse(args)?;
            debug!("demo multiply {} * {}", args.a, args.b);
            Ok(json!(multiply(args.a, args.b)))
        }),
    );

    registry.register(
        McpTool {
            name: "random_number".to_string(),
            description: "Generate a random number between min_val and max_val (inclusive)."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "min_val": {
                        "type": "integer",
                        "description": "Lower bound of the range",
                        "default": 1
                    },
                    "max_val": {
                        "type": "integer",
                        "description": "Upper bound of the range",
                        "default": 100
                    }
                }
            }),
        },
        Box::new(|args: Value| {
            let args: RandomRangeArgs = parse(args)?;
            debug!("random number in [{}, {}]", args.min_val, args.max_val);
            // An inverted range is an operation error, relayed as a value.
            Ok(match random_number(args.min_val, args.max_val) {
                Ok(n) => json!(n),
                Err(message) => json!(message),
            })
        }),
    );

    registry.register(
        McpTool {
            name: "current_time".to_string(),
            description: "Get the current date and time.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
        Box::new(|_args: Value| {
            debug!("current time requested");
            Ok(json!(current_time()))
        }),
    );

    registry.register(
        McpTool {
            name: "calculate_circle_area".to_string(),
            description: "Calculate the area of a circle given its radius.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "radius": { "type": "number", "description": "The radius of the circle" }
                },
                "required": ["radius"]
            }),
        },
        Box::new(|args: Value| {
            let args: RadiusArgs = parse(args)?;
            debug!("circle area for radius {}", args.radius);
            Ok(json!(calculate_circle_area(args.radius)))
        }),
    );

    registry.register(
        McpTool {
            name: "to_uppercase".to_string(),
            description: "Convert text to uppercase.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string", "description": "The text to convert" }
                },
                "required": ["text"]
            }),
        },
        Box::new(|args: Value| {
            let args: TextArgs = parse(args)?;
            debug!("uppercasing {} bytes", args.text.len());
            Ok(json!(to_uppercase(&args.text)))
        }),
    );
}
