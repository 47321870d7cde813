use anyhow::Context;
use folio_app::AppContext;
use folio_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Folio settings")?;
    folio_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db_host = %settings.database.host,
        db_name = %settings.database.name,
        "folio-app bootstrap starting"
    );

    let app = AppContext::connect(settings).await?;
    app.migrate().await?;
    app.serve().await
}
