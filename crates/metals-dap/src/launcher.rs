//! Run/debug discovery: ask the language server for a debug session and hand
//! the resulting adapter port to the editor.
//!
//! The language server and the editor are external processes; they are
//! reached through the [`LanguageServer`] and [`DebugHost`] traits.

use std::collections::BTreeMap;

use async_trait::async_trait;
use metals_config::DebugSettings;
use metals_core::{
    parse_env_assignments, DebugConfiguration, DebugDiscoveryParams, DebugSession, RunType,
    ScalaRunMain, CONFIGURATION_TYPE,
};
use serde_json::Value;

use crate::descriptor::{debug_server_from_uri, DebugAdapterServer};
use crate::error::LaunchResult;

/// The language server's `debug-adapter-start` command.
#[async_trait]
pub trait LanguageServer: Send + Sync {
    /// Start a debug adapter for `params` (discovery params, a run main, or a
    /// full launch configuration). `None` when the server could not resolve
    /// anything to run.
    async fn start_debug_adapter(&self, params: Value) -> LaunchResult<Option<DebugSession>>;
}

/// The editor surface used by the discovery flow.
#[async_trait]
pub trait DebugHost: Send + Sync {
    fn has_workspace_folder(&self) -> bool;

    /// URI of the document in the active editor, if any.
    fn active_document_uri(&self) -> Option<String>;

    async fn save_all_files(&self) -> LaunchResult<()>;

    async fn focus_debug_console(&self) -> LaunchResult<()>;

    /// Start a debug session; returns whether the editor accepted it.
    async fn start_debugging(&self, configuration: DebugConfiguration) -> LaunchResult<bool>;

    async fn execute_task(&self, task: RunTask) -> LaunchResult<()>;
}

/// Shell task that runs a main class without a debug adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTask {
    pub definition_type: String,
    pub task: String,
    pub name: String,
    pub source: String,
    pub shell_command: String,
    pub env: BTreeMap<String, String>,
}

impl RunTask {
    pub fn new(shell_command: impl Into<String>, env: BTreeMap<String, String>) -> Self {
        Self {
            definition_type: CONFIGURATION_TYPE.to_owned(),
            task: "run".to_owned(),
            name: "Scala run".to_owned(),
            source: "Metals".to_owned(),
            shell_command: shell_command.into(),
            env,
        }
    }
}

pub struct DebugLauncher<S, H> {
    server: S,
    host: H,
    settings: DebugSettings,
}

impl<S: LanguageServer, H: DebugHost> DebugLauncher<S, H> {
    pub fn new(server: S, host: H, settings: DebugSettings) -> Self {
        Self {
            server,
            host,
            settings,
        }
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Run or debug `params`.
    ///
    /// A run main that carries a shell command is executed directly as a
    /// task when `no_debug` is set; everything else goes through a debug
    /// adapter started by the language server.
    pub async fn start(&self, no_debug: bool, params: Value) -> LaunchResult<bool> {
        if no_debug {
            if let Some(main) = ScalaRunMain::from_params(&params) {
                if let Some((command, data)) = main.as_shell_run() {
                    return self.run_main(command, &data.environment_variables).await;
                }
            }
        }
        self.debug(no_debug, params).await
    }

    async fn run_main(&self, shell_command: &str, environment: &[String]) -> LaunchResult<bool> {
        if !self.host.has_workspace_folder() {
            tracing::debug!(target: "metals.dap", "no workspace folder; not running main");
            return Ok(false);
        }

        let task = RunTask::new(shell_command, parse_env_assignments(environment));
        tracing::info!(target: "metals.dap", command = %task.shell_command, "running main as a shell task");
        self.host.execute_task(task).await?;
        Ok(true)
    }

    async fn debug(&self, no_debug: bool, params: Value) -> LaunchResult<bool> {
        if self.settings.save_before_debug {
            self.host.save_all_files().await?;
        }

        let Some(session) = self.server.start_debug_adapter(params).await? else {
            tracing::info!(target: "metals.dap", "language server did not start a debug adapter");
            return Ok(false);
        };

        let server = debug_server_from_uri(&session.uri)?;
        tracing::info!(
            target: "metals.dap",
            name = %session.name,
            server = %server,
            no_debug,
            "starting debug session"
        );

        let configuration = DebugConfiguration::launch(session.name, no_debug, server.port);
        if self.settings.focus_debug_console {
            self.host.focus_debug_console().await?;
        }
        self.host.start_debugging(configuration).await
    }

    /// Fill in a launch configuration before the editor starts it.
    ///
    /// Without any launch configuration (`type` unset) the active document is
    /// run or tested through discovery; the configuration itself is returned
    /// unchanged either way.
    pub async fn resolve_debug_configuration(
        &self,
        configuration: DebugConfiguration,
    ) -> LaunchResult<DebugConfiguration> {
        if configuration.type_.is_some() {
            return Ok(configuration);
        }
        let Some(path) = self.host.active_document_uri() else {
            return Ok(configuration);
        };

        let params = DebugDiscoveryParams {
            path,
            run_type: RunType::RunOrTestFile,
        };
        self.start(configuration.is_no_debug(), serde_json::to_value(params)?)
            .await?;
        Ok(configuration)
    }

    /// Debug adapter to connect a session to.
    ///
    /// Only configurations naming a main class, test class or attach host are
    /// resolved through the language server; for anything else the editor
    /// falls back to its own adapter (`None`).
    pub async fn create_debug_adapter_descriptor(
        &self,
        configuration: &DebugConfiguration,
    ) -> LaunchResult<Option<DebugAdapterServer>> {
        if !configuration.targets_language_server() {
            return Ok(None);
        }

        let params = serde_json::to_value(configuration)?;
        let Some(session) = self.server.start_debug_adapter(params).await? else {
            return Ok(None);
        };
        Ok(Some(debug_server_from_uri(&session.uri)?))
    }
}
