use anyhow::Context;
use bookstore::Application;
use bookstore_kernel::settings::Settings;
use clap::{Parser, Subcommand};

/// Bookstore service command line
#[derive(Debug, Parser)]
#[command(name = "bookstore-cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Use a throwaway in-memory database
        #[arg(long)]
        in_memory: bool,
    },
    /// Apply pending migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().context("failed to load bookstore settings")?;
    bookstore_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve { in_memory } => {
            if in_memory {
                settings.database.url = "sqlite::memory:".to_string();
            }
            let pool = bookstore_db::connect(&settings.database).await?;
            let app = Application::build(settings, pool)
                .await
                .context("failed to build application")?;
            app.serve().await
        }
        Command::Migrate => {
            let pool = bookstore_db::connect(&settings.database).await?;
            let applied = bookstore::app::migrate(&settings, &pool).await?;
            tracing::info!(applied, db = %settings.database.url, "migrations applied");
            pool.close().await;
            Ok(())
        }
    }
}
