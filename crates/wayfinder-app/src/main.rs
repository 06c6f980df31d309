mod boot;
mod cli;
mod repl;

use std::process::ExitCode;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};
use wayfinder_config::WayfinderConfig;

const DEFAULT_LOG_DIRECTIVE: &str = "wayfinder=info";

type FilterHandle = reload::Handle<EnvFilter, Registry>;

fn env_filter(directive: &str) -> EnvFilter {
    let directive = directive.parse().unwrap_or_else(|_| {
        eprintln!("Ignoring invalid log directive `{directive}`");
        DEFAULT_LOG_DIRECTIVE
            .parse()
            .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into())
    });
    EnvFilter::from_default_env().add_directive(directive)
}

/// Install the subscriber before anything else logs. The filter stays
/// reloadable so `[logging].level` can apply once config is read.
fn init_logging(args: &cli::Args) -> FilterHandle {
    let directive = args.log_level.as_deref().unwrap_or(DEFAULT_LOG_DIRECTIVE);
    let (filter, handle) = reload::Layer::new(env_filter(directive));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
    handle
}

/// `--log-level` wins; otherwise the configured level replaces the default.
fn apply_config_level(handle: &FilterHandle, args: &cli::Args, config: &WayfinderConfig) {
    if args.log_level.is_some() {
        return;
    }
    let directive = format!("wayfinder={}", config.logging.level.as_directive());
    if let Err(e) = handle.reload(env_filter(&directive)) {
        tracing::warn!("failed to apply configured log level: {e}");
    }
}

async fn run(args: cli::Args, log_handle: FilterHandle) -> wayfinder_common::Result<()> {
    tracing::info!("Wayfinder v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = wayfinder_config::load_config(args.config.as_deref())?;
    apply_config_level(&log_handle, &args, &config);
    tracing::info!(model = %config.engine.model, "config loaded");

    let token = boot::resolve_credential(
        args.token.as_deref(),
        &config.engine.credential_env,
        |name| std::env::var(name).ok(),
    )?;
    let mut orchestrator = boot::build_orchestrator(&config, token)?;

    if let Some(question) = args.once.as_deref() {
        println!("{}", orchestrator.handle(question).await);
    } else {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        repl::run(&mut orchestrator, stdin, tokio::io::stdout()).await?;
    }

    let usage = orchestrator.tracker();
    tracing::info!(
        calls = usage.call_count(),
        tokens = usage.total_tokens(),
        "Shutdown complete"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional; real environment variables take precedence.
    dotenvy::dotenv().ok();

    let args = cli::parse();
    let log_handle = init_logging(&args);

    match run(args, log_handle).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
