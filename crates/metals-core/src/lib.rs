//! Core shared types for the Metals debug integration.
//!
//! This crate is intentionally small: it holds the pure, host-independent
//! pieces (JVM proxy property handling, debug configuration shapes, and
//! environment assignment parsing) that both the adapter binary and its tests
//! build on.

pub mod debug_config;
pub mod env;
pub mod proxy;
mod sanitize;

pub use debug_config::{
    DebugConfiguration, DebugDiscoveryParams, DebugSession, RunMainData, RunType, ScalaRunMain,
    CONFIGURATION_TYPE,
};
pub use env::parse_env_assignments;
pub use proxy::{derive_proxy_environment, split_jvm_options, ProxyEnvironment, ProxyScheme};
pub use sanitize::sanitize_json_error_message;
