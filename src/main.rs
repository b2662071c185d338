use anyhow::Context;
use inout_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load settings")?;
    inout_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        address = %settings.server.address(),
        "in-n-out-books bootstrap starting"
    );

    in_n_out_books::run(settings).await
}
