use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use sinkwatch::config::Config;
use sinkwatch::monitor::{self, ReportSink, StatusReport, WriterSink};
use sinkwatch::{EventFilter, OutputFormat, StateQuery, SystemRunner};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sinkwatch")]
#[command(about = "Report mute and volume of the default PulseAudio sink whenever it changes", long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    #[arg(long, global = true, env = "SINKWATCH_CONFIG")]
    config: Option<String>,
    #[arg(long, global = true)]
    pactl: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Follow `pactl subscribe` and print a status line per change (default)
    Watch(WatchOpts),
    /// Print the current status once and exit
    Query(QueryOpts),
    /// Print the effective configuration
    Config,
    /// Generate shell completions
    Completions { shell: Shell },
}

#[derive(clap::Args, Debug, Default)]
struct WatchOpts {
    #[arg(long, value_enum)]
    filter: Option<EventFilter>,
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    #[arg(long)]
    line_buffer: Option<usize>,
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(clap::Args, Debug)]
struct QueryOpts {
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(pactl) = cli.pactl {
        config.pactl.path = pactl;
    }

    match cli.command.unwrap_or_else(|| Commands::Watch(WatchOpts::default())) {
        Commands::Watch(opts) => run_watch(config, opts).await?,
        Commands::Query(opts) => run_query(config, opts).await?,
        Commands::Config => print!("{}", config.to_toml()?),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "sinkwatch", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn load_config(path: Option<&str>) -> Result<Config> {
    match path {
        Some(path) => {
            let path = std::path::PathBuf::from(shellexpand::tilde(path).into_owned());
            Config::load_from_path(path.clone())
                .with_context(|| format!("failed to load config from {}", path.display()))
        }
        None => Config::load().context("failed to load config"),
    }
}

async fn run_watch(mut config: Config, opts: WatchOpts) -> Result<()> {
    if let Some(filter) = opts.filter {
        config.monitor.filter = filter;
    }
    if let Some(format) = opts.format {
        config.monitor.format = format;
    }
    if let Some(line_buffer) = opts.line_buffer {
        config.monitor.line_buffer = line_buffer;
    }
    if let Some(timeout_ms) = opts.timeout_ms {
        config.pactl.query_timeout_ms = Some(timeout_ms);
    }

    let mut sink = WriterSink::stdout(config.monitor.format);
    monitor::run(&config, &mut sink).await?;

    Ok(())
}

async fn run_query(mut config: Config, opts: QueryOpts) -> Result<()> {
    if let Some(timeout_ms) = opts.timeout_ms {
        config.pactl.query_timeout_ms = Some(timeout_ms);
    }

    let runner = SystemRunner::with_timeout(config.query_timeout());
    let query = StateQuery::new(runner, config.pactl_path());
    let (muted, volume) = query.status().await?;

    let mut sink = WriterSink::stdout(opts.format.unwrap_or(config.monitor.format));
    sink.emit(&StatusReport {
        muted,
        volume,
        line: String::new(),
        partial: false,
    })?;

    Ok(())
}
