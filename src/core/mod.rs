//! Core server framework.
//!
//! - `config`: environment-driven server configuration
//! - `registry`: tool registry shared by the transports
//! - `server`: JSON-RPC protocol handling, HTTP and STDIO transports

pub mod config;
pub mod registry;
pub mod server;
