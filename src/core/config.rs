//! Environment-driven server configuration.
//!
//! Everything the server needs at startup comes from environment variables
//! with sensible defaults, so the binary runs with zero configuration:
//!
//! - `SERVER_NAME`: name reported in MCP initialize responses
//! - `SERVER_VERSION`: version string reported alongside it
//! - `MCP_TRANSPORT_MODE`: "stdio", "http", or "both" (default: "both")
//! - `HOST` / `PORT`: bind address for HTTP mode (default: 0.0.0.0:3000)
//! - `MCP_TOOLSETS`: "calculator", "demo", or "both" (default: "both")

use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid transport mode '{0}': must be 'stdio', 'http', or 'both'")]
    InvalidTransport(String),
    #[error("invalid toolset selection '{0}': must be 'calculator', 'demo', or 'both'")]
    InvalidToolsets(String),
    #[error("invalid port '{0}'")]
    InvalidPort(String),
}

/// How the server accepts requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// Line-based JSON-RPC on stdin/stdout (MCP Inspector, local use).
    Stdio,
    /// HTTP JSON-RPC server (production deployments, web integrations).
    Http,
    /// Both at once: STDIO in a background task, HTTP in the foreground.
    Both,
}

impl TransportMode {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "stdio" => Ok(TransportMode::Stdio),
            "http" => Ok(TransportMode::Http),
            "both" => Ok(TransportMode::Both),
            other => Err(ConfigError::InvalidTransport(other.to_string())),
        }
    }
}

/// Which toolsets the registry is populated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolsetSelection {
    Calculator,
    Demo,
    Both,
}

impl ToolsetSelection {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "calculator" => Ok(ToolsetSelection::Calculator),
            "demo" => Ok(ToolsetSelection::Demo),
            "both" => Ok(ToolsetSelection::Both),
            other => Err(ConfigError::InvalidToolsets(other.to_string())),
        }
    }

    pub fn includes_calculator(self) -> bool {
        matches!(self, ToolsetSelection::Calculator | ToolsetSelection::Both)
    }

    pub fn includes_demo(self) -> bool {
        matches!(self, ToolsetSelection::Demo | ToolsetSelection::Both)
    }
}

/// Server configuration resolved at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    pub transport: TransportMode,
    pub host: String,
    pub port: u16,
    pub toolsets: ToolsetSelection,
}

impl ServerConfig {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(|key| env::var(key).ok())
    }

    /// Resolve from an arbitrary variable source. Split out from
    /// `from_env` so tests don't have to mutate process-wide state.
    fn resolve(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let name = var("SERVER_NAME").unwrap_or_else(|| "calculator-mcp-server".to_string());
        let version = var("SERVER_VERSION").unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

        let transport = match var("MCP_TRANSPORT_MODE") {
            Some(raw) => TransportMode::parse(&raw)?,
            None => TransportMode::Both,
        };

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match var("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 3000,
        };

        let toolsets = match var("MCP_TOOLSETS") {
            Some(raw) => ToolsetSelection::parse(&raw)?,
            None => ToolsetSelection::Both,
        };

        Ok(ServerConfig {
            name,
            version,
            transport,
            host,
            port,
            toolsets,
        })
    }

    /// The HTTP bind address, "host:port".
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve_with(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::resolve(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = resolve_with(&[]).expect("defaults are valid");
        assert_eq!(config.name, "calculator-mcp-server");
        assert_eq!(config.transport, TransportMode::Both);
        assert_eq!(config.toolsets, ToolsetSelection::Both);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = resolve_with(&[
            ("SERVER_NAME", "calc"),
            ("SERVER_VERSION", "9.9.9"),
            ("MCP_TRANSPORT_MODE", "http"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("MCP_TOOLSETS", "calculator"),
        ])
        .expect("valid configuration");
        assert_eq!(config.name, "calc");
        assert_eq!(config.version, "9.9.9");
        assert_eq!(config.transport, TransportMode::Http);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.toolsets, ToolsetSelection::Calculator);
    }

    #[test]
    fn invalid_transport_is_rejected() {
        let err = resolve_with(&[("MCP_TRANSPORT_MODE", "carrier-pigeon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTransport(_)));
    }

    #[test]
    fn invalid_toolsets_are_rejected() {
        let err = resolve_with(&[("MCP_TOOLSETS", "everything")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidToolsets(_)));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = resolve_with(&[("PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }

    #[test]
    fn toolset_selection_predicates() {
        assert!(ToolsetSelection::Both.includes_calculator());
        assert!(ToolsetSelection::Both.includes_demo());
        assert!(!ToolsetSelection::Calculator.includes_demo());
        assert!(!ToolsetSelection::Demo.includes_calculator());
    }
}
