use anyhow::Context as _;
use clap::{Parser, Subcommand};
use mongo_connectivity::{
    ConnectionAttributes, ConnectivityTests, ConnectorConfig, DriverOptionsOverride,
};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Check that a MongoDB deployment is reachable and answers commands
#[derive(Parser, Debug)]
#[command(name = "mongo-connectivity", version)]
struct Args {
    /// Application name sent to the server when the target sets none
    #[arg(long, env = "MONGO_CONNECTIVITY_APP_NAME")]
    app_name: Option<String>,

    /// Server selection timeout in milliseconds
    #[arg(long, env = "MONGO_CONNECTIVITY_SERVER_SELECTION_TIMEOUT_MS")]
    server_selection_timeout_ms: Option<u64>,

    /// TCP connect timeout in milliseconds
    #[arg(long, env = "MONGO_CONNECTIVITY_CONNECT_TIMEOUT_MS")]
    connect_timeout_ms: Option<u64>,

    /// Log topology events while connecting (visible with RUST_LOG=info)
    #[arg(long)]
    trace_topology: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Test a connection string through the connection model
    Uri {
        #[arg(env = "MONGODB_URI")]
        uri: String,
    },
    /// Test connection attributes given as JSON, or @FILE to read them from a file
    Attributes { attributes: String },
    /// Test a connection string directly through the driver
    Driver {
        #[arg(env = "MONGODB_URI")]
        uri: String,
        /// Driver option overrides as a JSON object
        #[arg(long)]
        options: Option<String>,
    },
}

impl Args {
    fn connector_config(&self) -> ConnectorConfig {
        let mut builder = ConnectorConfig::builder().trace_topology(self.trace_topology);
        if let Some(name) = &self.app_name {
            builder = builder.app_name(name.clone());
        }
        if let Some(ms) = self.server_selection_timeout_ms {
            builder = builder.server_selection_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.connect_timeout_ms {
            builder = builder.connect_timeout(Duration::from_millis(ms));
        }
        builder.build()
    }
}

fn read_attributes(arg: &str) -> anyhow::Result<ConnectionAttributes> {
    let json = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read attributes from {path}"))?,
        None => arg.to_string(),
    };
    ConnectionAttributes::from_json(&json).context("failed to parse connection attributes")
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let tests = ConnectivityTests::with_config(args.connector_config());

    let outcome = match &args.command {
        Command::Uri { uri } => tests.test_connection_model_uri(uri).await?,
        Command::Attributes { attributes } => {
            let attributes = read_attributes(attributes)?;
            tests.test_connection_model_attributes(attributes).await?
        }
        Command::Driver { uri, options } => {
            let overrides = match options {
                Some(json) => DriverOptionsOverride::from_json(json)
                    .context("failed to parse driver options")?,
                None => DriverOptionsOverride::default(),
            };
            tests.test_native_driver_uri(uri, &overrides).await?
        }
    };

    tracing::debug!(success = outcome.is_success(), "test finished");
    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
