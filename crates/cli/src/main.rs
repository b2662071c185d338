use anyhow::Context;
use clap::{Parser, Subcommand};
use inout_kernel::settings::Settings;

/// In-N-Out Books service and tooling
#[derive(Debug, Parser)]
#[command(name = "inout", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
        /// Start with an empty catalogue
        #[arg(long)]
        no_seed: bool,
    },
    /// Print the merged OpenAPI document
    Openapi,
    /// Print the resolved settings as JSON
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load().with_context(|| "failed to load settings")?;

    match cli.command {
        Command::Serve { port, no_seed } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            if no_seed {
                settings.storage.seed = false;
            }
            inout_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "inout serve starting");

            let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
            runtime.block_on(in_n_out_books::run(settings))
        }
        Command::Openapi => {
            let store = in_n_out_books::memory_store(false);
            let registry = in_n_out_books::build_registry(&settings, store)?;
            let spec = inout_http::openapi::document(&registry);
            println!("{}", serde_json::to_string_pretty(&spec)?);
            Ok(())
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}
