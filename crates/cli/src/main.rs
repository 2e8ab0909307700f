use std::{io::Read, path::PathBuf, process::ExitCode};

use {
    anyhow::Context,
    clap::{Args, Parser, Subcommand},
    marketwatch_config::{MarketwatchConfig, load_with_env},
    marketwatch_pipeline::{InvocationResponse, TriggerEvent, handle},
    tracing::{error, info},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(
    name = "marketwatch",
    version,
    about = "Notify Discord/Slack about marketplace plugin updates"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,

    /// Config file (default: ./marketwatch.toml or ~/.config/marketwatch/).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check for updates and notify (the default).
    Run(RunArgs),
    /// Print the effective configuration with secrets redacted.
    ShowConfig,
}

#[derive(Args, Clone, Default)]
struct RunArgs {
    /// Send a test notification to Slack instead of checking the marketplace.
    #[arg(long)]
    test_slack: bool,

    /// Send a test notification to Discord instead of checking the marketplace.
    #[arg(long)]
    test_discord: bool,

    /// Trigger payload as a JSON file (`-` for stdin).
    #[arg(long)]
    event: Option<PathBuf>,

    /// Write the collected version summary to this file.
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Override the recency window.
    #[arg(long)]
    lookback_minutes: Option<u64>,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    // stdout carries the response envelope; logs go to stderr.
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn read_event(args: &RunArgs) -> anyhow::Result<TriggerEvent> {
    let flags = TriggerEvent {
        test_slack: args.test_slack,
        test_discord: args.test_discord,
    };
    let Some(path) = &args.event else {
        return Ok(flags);
    };

    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read event from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read event file {}", path.display()))?
    };
    let event = TriggerEvent::from_json(&raw).context("invalid event payload")?;
    Ok(event.merge(flags))
}

fn load_config(cli: &Cli, args: &RunArgs) -> anyhow::Result<MarketwatchConfig> {
    let mut config = load_with_env(cli.config.as_deref())?;
    if let Some(path) = &args.summary {
        config.summary_path = Some(path.clone());
    }
    if let Some(minutes) = args.lookback_minutes {
        config.lookback_minutes = minutes;
    }
    Ok(config)
}

async fn run(cli: &Cli, args: &RunArgs) -> InvocationResponse {
    let prepared = read_event(args).and_then(|event| Ok((event, load_config(cli, args)?)));
    match prepared {
        Ok((event, config)) => handle(event, config).await,
        Err(e) => {
            error!(error = %format!("{e:#}"), "invocation could not start");
            InvocationResponse::failure(format!("{e:#}"))
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "marketwatch starting");

    match &cli.command {
        Some(Commands::ShowConfig) => {
            let config = load_config(&cli, &cli.run)?;
            println!("{config:#?}");
            Ok(ExitCode::SUCCESS)
        },
        Some(Commands::Run(args)) => emit(run(&cli, args).await),
        None => emit(run(&cli, &cli.run).await),
    }
}

fn emit(response: InvocationResponse) -> anyhow::Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
