use anyhow::Context;
use bookstore::Application;
use bookstore_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load bookstore settings")?;
    bookstore_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "bookstore bootstrap starting"
    );

    let pool = bookstore_db::connect(&settings.database).await?;
    let app = Application::build(settings, pool)
        .await
        .context("failed to build application")?;

    app.serve().await
}
