use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use flora_api::session::CHANNEL_CAPACITY;
use flora_api::{
    AppError, ExplorerConfig, FloraExplorerApi, MemoryMapSurface, MemoryReporter, ReportEntry,
    StatusIndicator, StatusLine, Tee, TracingReporter, UiEvent, API_CONTRACT_VERSION,
};
use flora_core::SYSTEM_VERSION;
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const CLI_CONTRACT_VERSION: &str = "cli.v1";
/// Extra wait after stdin closes, on top of debounce and worst-case latency
const DRAIN_MARGIN: Duration = Duration::from_millis(50);

#[derive(Debug, Parser)]
#[command(name = "flora")]
#[command(about = "Flora catalogue explorer")]
#[command(version = SYSTEM_VERSION)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// YAML explorer configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// JSON catalogue replacing the built-in records
    #[arg(long, global = true)]
    catalogue: Option<PathBuf>,
    #[arg(long, global = true)]
    failure_rate: Option<f64>,
    /// Fixed simulated latency (sets both bounds)
    #[arg(long, global = true)]
    latency_ms: Option<u64>,
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Default tracing filter; `RUST_LOG` wins when set
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the whole catalogue
    List,
    /// One simulated remote call, then filter and render
    Search(QueryArgs),
    /// Show which clause admitted each record
    Explain(QueryArgs),
    /// Map view for one record
    Show(ShowArgs),
    /// Startup health call against `/status`
    Status,
    /// Genetic sequence validity per record
    Validate,
    /// Component health report
    Diagnostics,
    /// Line-oriented session on stdin
    Interactive,
}

#[derive(Debug, Args)]
struct QueryArgs {
    #[arg(long, default_value = "")]
    query: String,
}

#[derive(Debug, Args)]
struct ShowArgs {
    #[arg(long)]
    id: String,
}

fn with_contract_version(value: Value) -> Value {
    match value {
        Value::Object(mut object) => {
            object.insert(
                "contract_version".to_string(),
                Value::String(CLI_CONTRACT_VERSION.to_string()),
            );
            Value::Object(object)
        }
        other => serde_json::json!({
            "contract_version": CLI_CONTRACT_VERSION,
            "payload": other
        }),
    }
}

fn emit_json(value: &impl Serialize) -> Result<()> {
    let value = serde_json::to_value(value)?;
    println!("{}", serde_json::to_string_pretty(&with_contract_version(value))?);
    Ok(())
}

/// One compact JSON object per line, for the interactive session.
fn emit_json_line(value: &impl Serialize) -> Result<()> {
    let value = serde_json::to_value(value)?;
    println!("{}", serde_json::to_string(&with_contract_version(value))?);
    Ok(())
}

fn load_config(global: &GlobalArgs) -> Result<ExplorerConfig> {
    let mut config = match &global.config {
        Some(path) => ExplorerConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ExplorerConfig::default(),
    };
    if let Some(rate) = global.failure_rate {
        config.failure_rate = rate;
    }
    if let Some(latency) = global.latency_ms {
        config.latency_min_ms = latency;
        config.latency_max_ms = latency;
    }
    if global.seed.is_some() {
        config.seed = global.seed;
    }
    if let Some(level) = &global.log_level {
        config.log_level.clone_from(level);
    }
    config.validate().context("invalid explorer configuration")?;
    Ok(config)
}

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli.global)?;
    init_tracing(&config.log_level);
    tracing::debug!(api = API_CONTRACT_VERSION, version = SYSTEM_VERSION, "flora starting");

    let api = match FloraExplorerApi::load(config, cli.global.catalogue.as_deref()) {
        Ok(api) => api,
        Err(error) => {
            tracing::error!(error = %error, detail = ?error.detail, "failed to initialize explorer");
            emit_json(&serde_json::json!({ "error": error }))?;
            return Ok(ExitCode::FAILURE);
        }
    };

    match cli.command {
        Command::List => emit_json(&api.list())?,
        Command::Search(args) => emit_json(&api.search(&args.query).await)?,
        Command::Explain(args) => emit_json(&api.explain(&args.query))?,
        Command::Show(args) => match api.detail(&args.id) {
            Ok(view) => emit_json(&view)?,
            Err(error) => {
                emit_json(&serde_json::json!({ "error": error }))?;
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Status => {
            let status = api.status().await;
            let ok = status.ok;
            emit_json(&status)?;
            if !ok {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Validate => emit_json(&api.validate())?,
        Command::Diagnostics => emit_json(&api.diagnostics())?,
        Command::Interactive => run_interactive(&api).await?,
    }
    Ok(ExitCode::SUCCESS)
}

#[derive(Debug, PartialEq, Eq)]
enum Line {
    Event(UiEvent),
    Wait(Duration),
    Quit,
    Unknown(String),
}

fn parse_line(line: &str) -> Line {
    let Some(command) = line.strip_prefix(':') else {
        return Line::Event(UiEvent::Input(line.to_string()));
    };
    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("open"), Some(id)) => Line::Event(UiEvent::Open(id.to_string())),
        (Some("close"), None) => Line::Event(UiEvent::Close),
        (Some("submit"), None) => Line::Event(UiEvent::Submit),
        (Some("quit"), None) => Line::Quit,
        (Some("wait"), Some(ms)) => match ms.parse::<u64>() {
            Ok(ms) => Line::Wait(Duration::from_millis(ms)),
            Err(_) => Line::Unknown(line.to_string()),
        },
        _ => Line::Unknown(line.to_string()),
    }
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum SessionEnd<T: Serialize> {
    FinalState { state: T, reported_errors: u64, reports: Vec<ReportEntry> },
    Error { error: AppError, status: StatusLine },
}

/// Plain lines replace the search box contents. `:open ID`, `:close`,
/// `:submit`, `:wait MS` and `:quit` control the session. Closing stdin
/// waits long enough for a pending search to land before stopping. The final
/// line carries the session's report history.
async fn run_interactive(api: &FloraExplorerApi) -> Result<()> {
    let history = Arc::new(MemoryReporter::new());
    let api = api.clone().with_reporter(Arc::new(Tee(TracingReporter, Arc::clone(&history))));
    let (events_tx, events_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (updates_tx, mut updates_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let session = tokio::spawn(api.explorer(MemoryMapSurface::new(), updates_tx).run(events_rx));
    let printer = tokio::spawn(async move {
        while let Some(update) = updates_rx.recv().await {
            emit_json_line(&update)?;
        }
        Ok::<(), anyhow::Error>(())
    });

    let config = api.config();
    let drain = config.debounce() + Duration::from_millis(config.latency_max_ms) + DRAIN_MARGIN;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            tokio::time::sleep(drain).await;
            break;
        };
        match parse_line(line.trim_end_matches('\r')) {
            Line::Event(event) => {
                if events_tx.send(event).await.is_err() {
                    break;
                }
            }
            Line::Wait(duration) => tokio::time::sleep(duration).await,
            Line::Quit => break,
            Line::Unknown(text) => tracing::warn!(line = %text, "unknown interactive command"),
        }
    }
    let _ = events_tx.send(UiEvent::Shutdown).await;

    let finished = session.await;
    printer.await.context("update printer panicked")??;
    match finished {
        Ok(state) => emit_json_line(&SessionEnd::FinalState {
            state,
            reported_errors: history.error_count(),
            reports: history.entries(),
        }),
        Err(err) => {
            tracing::error!(error = %err, "explorer session failed");
            emit_json_line(&SessionEnd::<()>::Error {
                error: AppError::internal(err.to_string()),
                status: StatusIndicator::Critical.into(),
            })
        }
    }
}
