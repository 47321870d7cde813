use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_app::AppContext;
use folio_kernel::settings::Settings;

/// Operate the Folio book catalogue service
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply migrations and serve HTTP (default)
    Serve,
    /// Apply migrations and exit
    Migrate,
    /// Delete every book
    Clear {
        /// Restart id assignment at 1
        #[arg(long)]
        restart_ids: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load Folio settings")?;
    folio_telemetry::init(&settings.telemetry)?;

    tracing::info!(env = ?settings.environment, command = ?cli.command, "folio CLI starting");

    let app = AppContext::connect(settings).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            app.migrate().await?;
            app.serve().await
        }
        Command::Migrate => app.migrate().await,
        Command::Clear { restart_ids } => {
            app.migrate().await?;
            app.clear(restart_ids).await
        }
    }
}
