//! Debug Adapter Protocol pieces of the Scala/Metals debug integration.
//!
//! This crate provides:
//! - DAP message framing over async byte streams ([`dap`]).
//! - A no-op "run and exit" adapter used when a program is run without
//!   debugging ([`run_adapter`]).
//! - Parsing of the debug adapter URI returned by the language server
//!   ([`descriptor`]).
//! - The configuration/discovery flow that asks the language server for a
//!   debug session and hands the resulting port to the editor ([`launcher`]).

pub mod dap;
pub mod descriptor;
pub mod error;
pub mod hardening;
pub mod launcher;
pub mod run_adapter;

pub use crate::descriptor::{debug_server_from_uri, DebugAdapterServer};
pub use crate::error::{DapError, DescriptorError, LaunchError};
pub use crate::launcher::{DebugHost, DebugLauncher, LanguageServer, RunTask};
pub use crate::run_adapter::RunDebugAdapter;
