use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Debug configuration type registered for Scala sessions.
pub const CONFIGURATION_TYPE: &str = "scala";

/// Reply of the language server's `debug-adapter-start` command: a named
/// session and the URI of the debug adapter it spawned (e.g. `tcp://127.0.0.1:5005`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugSession {
    pub name: String,
    pub uri: String,
}

/// What the language server should discover when asked to debug a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunType {
    Run,
    RunOrTestFile,
    TestFile,
    TestTarget,
}

/// Arguments for debug discovery: "run or test whatever is in this document".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugDiscoveryParams {
    pub path: String,
    pub run_type: RunType,
}

/// Launch configuration as handed over by the editor.
///
/// Only the keys this integration inspects are typed; everything else is kept
/// in `extra` and written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugConfiguration {
    /// `None` when the user has no launch configurations and just pressed "run".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_debug: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    /// Port of an already running debug adapter. The editor connects to it
    /// directly when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_server: Option<u16>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DebugConfiguration {
    /// Configuration that attaches the editor to a debug adapter listening on `port`.
    pub fn launch(name: impl Into<String>, no_debug: bool, port: u16) -> Self {
        Self {
            type_: Some(CONFIGURATION_TYPE.to_owned()),
            name: Some(name.into()),
            request: Some("launch".to_owned()),
            no_debug: Some(no_debug),
            debug_server: Some(port),
            ..Self::default()
        }
    }

    /// Whether the language server knows how to start a session for this
    /// configuration (a main class, a test class, or a remote attach host).
    pub fn targets_language_server(&self) -> bool {
        self.main_class.is_some() || self.test_class.is_some() || self.host_name.is_some()
    }

    pub fn is_no_debug(&self) -> bool {
        self.no_debug.unwrap_or(false)
    }
}

/// A main class resolved by the language server, as passed to the run/debug command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalaRunMain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RunMainData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMainData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default)]
    pub arguments: Vec<String>,
    #[serde(default)]
    pub jvm_options: Vec<String>,
    #[serde(default)]
    pub environment_variables: Vec<String>,
    /// Ready-to-run command line. Present only when the server can run the
    /// main class without a debug adapter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell_command: Option<String>,
}

impl ScalaRunMain {
    /// Interpret arbitrary command parameters as a run main, if they have that shape.
    pub fn from_params(params: &Value) -> Option<Self> {
        if !params.is_object() {
            return None;
        }
        serde_json::from_value(params.clone()).ok()
    }

    /// Returns the run data when it carries a non-empty shell command.
    pub fn as_shell_run(&self) -> Option<(&str, &RunMainData)> {
        let data = self.data.as_ref()?;
        let command = data.shell_command.as_deref().filter(|cmd| !cmd.is_empty())?;
        Some((command, data))
    }
}
