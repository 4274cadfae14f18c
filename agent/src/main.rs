use anyhow::Context;
use farm_core::host;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    utils::logger::init_from_env()?;
    let cfg = agent::Config::from_env()?;

    info!(
        os = %host::os(),
        platform = host::platform(),
        report_interval = ?cfg.report_interval,
        "running agent"
    );

    let snapshot = tokio::task::spawn_blocking(|| agent::Snapshot::collect(agent::SAMPLE_INTERVAL))
        .await
        .context("collect host snapshot")?;
    let path = utils::files::json_dump(&snapshot, None)?;
    info!(path = %path.display(), "wrote host snapshot");

    agent::run(cfg).await
}
