use async_trait::async_trait;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use metals_config::DebugSettings;
use metals_core::{DebugConfiguration, DebugSession};
use metals_dap::error::LaunchResult;
use metals_dap::{DebugAdapterServer, DebugHost, DebugLauncher, LanguageServer, LaunchError, RunTask};

#[derive(Default)]
struct FakeServer {
    reply: Option<DebugSession>,
    requests: Mutex<Vec<Value>>,
}

impl FakeServer {
    fn replying(name: &str, uri: &str) -> Self {
        Self {
            reply: Some(DebugSession {
                name: name.to_owned(),
                uri: uri.to_owned(),
            }),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LanguageServer for FakeServer {
    async fn start_debug_adapter(&self, params: Value) -> LaunchResult<Option<DebugSession>> {
        self.requests.lock().push(params);
        Ok(self.reply.clone())
    }
}

#[derive(Default)]
struct FakeHost {
    no_workspace: bool,
    active_document: Option<String>,
    calls: Mutex<Vec<&'static str>>,
    started: Mutex<Vec<DebugConfiguration>>,
    tasks: Mutex<Vec<RunTask>>,
}

#[async_trait]
impl DebugHost for FakeHost {
    fn has_workspace_folder(&self) -> bool {
        !self.no_workspace
    }

    fn active_document_uri(&self) -> Option<String> {
        self.active_document.clone()
    }

    async fn save_all_files(&self) -> LaunchResult<()> {
        self.calls.lock().push("save");
        Ok(())
    }

    async fn focus_debug_console(&self) -> LaunchResult<()> {
        self.calls.lock().push("focus");
        Ok(())
    }

    async fn start_debugging(&self, configuration: DebugConfiguration) -> LaunchResult<bool> {
        self.calls.lock().push("start");
        self.started.lock().push(configuration);
        Ok(true)
    }

    async fn execute_task(&self, task: RunTask) -> LaunchResult<()> {
        self.calls.lock().push("task");
        self.tasks.lock().push(task);
        Ok(())
    }
}

fn launcher(server: FakeServer, host: FakeHost) -> DebugLauncher<FakeServer, FakeHost> {
    DebugLauncher::new(server, host, DebugSettings::default())
}

fn run_main_params() -> Value {
    json!({
        "dataKind": "scala-main-class",
        "data": {
            "class": "example.Main",
            "environmentVariables": ["HTTP_PROXY=http://corp:3128", "EMPTY", "OPTS=-Da=b"],
            "shellCommand": "java -cp /ws/out example.Main",
        }
    })
}

#[tokio::test]
async fn debug_starts_session_on_the_reported_port() {
    let launcher = launcher(
        FakeServer::replying("Debug Main", "tcp://127.0.0.1:61234"),
        FakeHost::default(),
    );
    let params = json!({"path": "file:///ws/Main.scala", "runType": "run"});

    assert!(launcher.start(false, params.clone()).await.unwrap());

    assert_eq!(launcher.server().requests.lock().clone(), vec![params]);
    assert_eq!(launcher.host().calls.lock().clone(), vec!["save", "focus", "start"]);
    assert_eq!(
        serde_json::to_value(&launcher.host().started.lock()[0]).unwrap(),
        json!({
            "type": "scala",
            "name": "Debug Main",
            "request": "launch",
            "noDebug": false,
            "debugServer": 61234,
        })
    );
}

#[tokio::test]
async fn debug_without_session_returns_false() {
    let launcher = launcher(FakeServer::default(), FakeHost::default());

    assert!(!launcher.start(false, json!({"path": "file:///ws/A.scala"})).await.unwrap());
    assert_eq!(launcher.host().calls.lock().clone(), vec!["save"]);
    assert!(launcher.host().started.lock().is_empty());
}

#[tokio::test]
async fn settings_can_skip_save_and_focus() {
    let launcher = DebugLauncher::new(
        FakeServer::replying("Run", "tcp://localhost:5005"),
        FakeHost::default(),
        DebugSettings {
            save_before_debug: false,
            focus_debug_console: false,
        },
    );

    assert!(launcher.start(true, json!({"path": "file:///ws/A.scala"})).await.unwrap());
    assert_eq!(launcher.host().calls.lock().clone(), vec!["start"]);
    assert_eq!(launcher.host().started.lock()[0].no_debug, Some(true));
}

#[tokio::test]
async fn no_debug_run_main_with_shell_command_runs_a_task() {
    let launcher = launcher(FakeServer::default(), FakeHost::default());

    assert!(launcher.start(true, run_main_params()).await.unwrap());

    assert!(launcher.server().requests.lock().is_empty());
    let tasks = launcher.host().tasks.lock();
    assert_eq!(tasks.len(), 1);
    let task = &tasks[0];
    assert_eq!(task.definition_type, "scala");
    assert_eq!(task.task, "run");
    assert_eq!(task.name, "Scala run");
    assert_eq!(task.source, "Metals");
    assert_eq!(task.shell_command, "java -cp /ws/out example.Main");
    assert_eq!(task.env["HTTP_PROXY"], "http://corp:3128");
    assert_eq!(task.env["EMPTY"], "");
    assert_eq!(task.env["OPTS"], "-Da=b");
}

#[tokio::test]
async fn run_main_without_workspace_folder_is_not_run() {
    let host = FakeHost {
        no_workspace: true,
        ..FakeHost::default()
    };
    let launcher = launcher(FakeServer::default(), host);

    assert!(!launcher.start(true, run_main_params()).await.unwrap());
    assert!(launcher.host().tasks.lock().is_empty());
}

#[tokio::test]
async fn debugging_a_run_main_goes_through_the_language_server() {
    let launcher = launcher(
        FakeServer::replying("Debug", "tcp://127.0.0.1:5005"),
        FakeHost::default(),
    );

    assert!(launcher.start(false, run_main_params()).await.unwrap());
    assert!(launcher.host().tasks.lock().is_empty());
    assert_eq!(launcher.server().requests.lock().len(), 1);
}

#[tokio::test]
async fn resolve_without_type_discovers_the_active_document() {
    let host = FakeHost {
        active_document: Some("file:///ws/src/Main.scala".to_owned()),
        ..FakeHost::default()
    };
    let launcher = launcher(FakeServer::replying("Main", "tcp://127.0.0.1:4711"), host);
    let configuration: DebugConfiguration = serde_json::from_value(json!({"noDebug": true})).unwrap();

    let resolved = launcher
        .resolve_debug_configuration(configuration.clone())
        .await
        .unwrap();

    assert_eq!(resolved, configuration);
    assert_eq!(
        launcher.server().requests.lock().clone(),
        vec![json!({"path": "file:///ws/src/Main.scala", "runType": "runOrTestFile"})]
    );
    assert_eq!(launcher.host().started.lock()[0].no_debug, Some(true));
}

#[tokio::test]
async fn resolve_leaves_typed_or_editorless_configurations_alone() {
    let launcher = launcher(FakeServer::replying("x", "tcp://h:1"), FakeHost::default());

    let typed: DebugConfiguration =
        serde_json::from_value(json!({"type": "scala", "request": "launch", "mainClass": "a.B"}))
            .unwrap();
    assert_eq!(
        launcher.resolve_debug_configuration(typed.clone()).await.unwrap(),
        typed
    );

    let untyped = DebugConfiguration::default();
    assert_eq!(
        launcher.resolve_debug_configuration(untyped.clone()).await.unwrap(),
        untyped
    );
    assert!(launcher.server().requests.lock().is_empty());
}

#[tokio::test]
async fn descriptor_is_resolved_for_main_test_and_attach_configurations() {
    for key in ["mainClass", "testClass", "hostName"] {
        let launcher = launcher(
            FakeServer::replying("s", "tcp://127.0.0.1:5005"),
            FakeHost::default(),
        );
        let configuration: DebugConfiguration =
            serde_json::from_value(json!({"type": "scala", "request": "launch", key: "x"})).unwrap();

        let server = launcher
            .create_debug_adapter_descriptor(&configuration)
            .await
            .unwrap();
        assert_eq!(
            server,
            Some(DebugAdapterServer {
                host: "127.0.0.1".to_owned(),
                port: 5005
            })
        );
        assert_eq!(
            launcher.server().requests.lock()[0][key],
            json!("x"),
            "configuration is forwarded to the server"
        );
    }
}

#[tokio::test]
async fn descriptor_is_none_for_other_configurations_or_missing_sessions() {
    let launcher = launcher(FakeServer::replying("s", "tcp://127.0.0.1:5005"), FakeHost::default());
    let plain: DebugConfiguration =
        serde_json::from_value(json!({"type": "scala", "request": "launch", "debugServer": 4711}))
            .unwrap();
    assert_eq!(launcher.create_debug_adapter_descriptor(&plain).await.unwrap(), None);
    assert!(launcher.server().requests.lock().is_empty());

    let launcher = self::launcher(FakeServer::default(), FakeHost::default());
    let main: DebugConfiguration =
        serde_json::from_value(json!({"type": "scala", "mainClass": "a.Main"})).unwrap();
    assert_eq!(launcher.create_debug_adapter_descriptor(&main).await.unwrap(), None);
}

#[tokio::test]
async fn malformed_session_uri_is_an_error() {
    let launcher = launcher(FakeServer::replying("s", "tcp://127.0.0.1"), FakeHost::default());
    let err = launcher.start(false, json!({})).await.unwrap_err();
    assert!(matches!(err, LaunchError::Descriptor(_)), "{err}");
    assert!(launcher.host().started.lock().is_empty());
}
