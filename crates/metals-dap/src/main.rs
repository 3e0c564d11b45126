use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use metals_config::MetalsConfig;
use metals_core::{derive_proxy_environment, split_jvm_options};
use metals_dap::{debug_server_from_uri, RunDebugAdapter};

/// Debug adapter helpers for the Scala/Metals integration.
#[derive(Debug, Parser)]
#[command(name = "metals-dap", version, about)]
struct Cli {
    /// Path to a TOML config file.
    ///
    /// If unset, `METALS_DAP_CONFIG` is used as a fallback. When neither is
    /// provided built-in defaults apply.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the run-and-exit debug adapter over stdio.
    RunAdapter,

    /// Print `*_proxy` environment assignments derived from JVM proxy properties.
    ProxyEnv {
        /// A whole JVM options string (e.g. the value of `JAVA_OPTS`), split on whitespace.
        #[arg(long)]
        jvm_options: Option<String>,

        /// Print a JSON object instead of `NAME=value` lines.
        #[arg(long)]
        json: bool,

        /// Individual `-D<key>=<value>` properties.
        #[arg(allow_hyphen_values = true)]
        properties: Vec<String>,
    },

    /// Print the `host:port` of a debug adapter URI such as `tcp://127.0.0.1:5005`.
    Descriptor { uri: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = MetalsConfig::load_or_default(cli.config);
    metals_dap::hardening::init(&config, Arc::new(|message| eprintln!("{message}")));

    match cli.command {
        Command::RunAdapter => {
            tracing::info!(target: "metals.dap", "serving run adapter on stdio");
            RunDebugAdapter::new().serve_stdio().await?;
        }
        Command::ProxyEnv {
            jvm_options,
            json,
            mut properties,
        } => {
            if let Some(options) = jvm_options.as_deref() {
                properties.extend(split_jvm_options(options).into_iter().map(str::to_owned));
            }
            let env = derive_proxy_environment(&properties);
            if json {
                let map: BTreeMap<&str, &str> = env.iter().collect();
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else {
                for assignment in env.into_env_assignments() {
                    println!("{assignment}");
                }
            }
        }
        Command::Descriptor { uri } => {
            println!("{}", debug_server_from_uri(&uri)?);
        }
    }

    Ok(())
}
