use clap::Parser;
mod commands;
use commands::cli;
use fleetrun_core::api::{CliError, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "fleetrun failed");
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let cfg = fleetrun_core::config::load(args.config.as_deref())
        .map_err(|e| CliError::Config(format!("{e:#}")))?;
    init_tracing(&cfg.logging).map_err(CliError::Logging)?;

    match args.command {
        Some(cli::Commands::Decode(decode_args)) => commands::decode::decode(&decode_args),
        Some(cli::Commands::Run(run_args)) => commands::run::run(cfg, &run_args).await,
        None => commands::run::run(cfg, &cli::RunArgs::default()).await,
    }
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: success
    // 11: config error
    // 20: portal / IO error
    // 50: internal/uncategorized
    match e {
        CliError::Config(_) => 11,
        CliError::Logging(_) => 11,
        CliError::Portal(_) => 20,
        CliError::Io(_) => 20,
        CliError::Anyhow(_) => 50,
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("fleetrun"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("fleetrun.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_category() {
        assert_eq!(exit_code_for_error(&CliError::Config("x".into())), 11);
        assert_eq!(exit_code_for_error(&CliError::Portal("x".into())), 20);
        assert_eq!(
            exit_code_for_error(&CliError::Anyhow(anyhow::anyhow!("x"))),
            50
        );
    }
}
