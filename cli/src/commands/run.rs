use std::time::Duration;

use fleetrun_core::api::{Agent, AppConfig, AppContext, CliError};

use super::cli::RunArgs;

#[tracing::instrument(name = "cli.run", skip(cfg, args))]
pub async fn run(cfg: AppConfig, args: &RunArgs) -> Result<i32, CliError> {
    let services = fleetrun_plugins::factory::build_services(&cfg)
        .map_err(|e| CliError::Config(format!("{e:#}")))?;
    let ctx = AppContext::new(cfg, services);
    let agent = Agent::new(&ctx);

    match args.interval_secs {
        Some(secs) => {
            tracing::info!(interval_secs = secs, "watching portal");
            agent.watch(Duration::from_secs(secs.max(1))).await;
            Ok(0)
        }
        None => {
            let summary = agent.poll_once().await?;
            tracing::info!(
                fetched = summary.fetched,
                completed = summary.completed,
                failed = summary.failed,
                skipped = summary.skipped,
                "poll finished"
            );
            Ok(0)
        }
    }
}
