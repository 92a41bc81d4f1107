use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use session_import::import::{DiskFile, HttpImportGateway, PathFileSource, SharedFile};
use session_import::workflow::{ImportController, TerminalView, WorkflowEvent, WorkflowSender};
use session_import::{util, Config};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Parser)]
#[command(
    name = "session-import",
    version,
    about = "Validate, preview, and import exported browser sessions"
)]
struct Cli {
    /// Session export (.json) to open on start
    file: Option<PathBuf>,

    /// Import service endpoint (overrides config)
    #[arg(long)]
    gateway_url: Option<String>,

    /// Data directory for config and logs (default: ~/.session-import)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// How long the success message stays before the selection clears
    #[arg(long)]
    clear_delay_ms: Option<u64>,
}

/// A line typed on stdin
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Open(PathBuf),
    Drop(PathBuf),
    Browse,
    Import,
    Clear,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let (verb, arg) = match line.split_once(char::is_whitespace) {
        Some((verb, arg)) => (verb, arg.trim()),
        None => (line, ""),
    };

    match (verb, arg) {
        ("open", path) if !path.is_empty() => Some(Command::Open(PathBuf::from(path))),
        ("drop", path) if !path.is_empty() => Some(Command::Drop(PathBuf::from(path))),
        ("browse", "") => Some(Command::Browse),
        ("import" | "submit", "") => Some(Command::Import),
        ("clear", "") => Some(Command::Clear),
        ("quit" | "exit" | "back", "") => Some(Command::Quit),
        _ => None,
    }
}

async fn open_file(path: PathBuf) -> Option<Vec<SharedFile>> {
    match DiskFile::open(&path).await {
        Ok(file) => Some(vec![Arc::new(file) as SharedFile]),
        Err(e) => {
            eprintln!("❌ Cannot open {}: {}", path.display(), e);
            None
        }
    }
}

/// Translate stdin lines into workflow events until EOF or `quit`
async fn forward_commands(tx: WorkflowSender) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read command");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match parse_command(line) {
            Some(Command::Open(path)) => open_file(path).await.map(WorkflowEvent::InputChanged),
            Some(Command::Drop(path)) => open_file(path).await.map(WorkflowEvent::Dropped),
            Some(Command::Browse) => Some(WorkflowEvent::Browse),
            Some(Command::Import) => Some(WorkflowEvent::Submit),
            Some(Command::Clear) => Some(WorkflowEvent::Clear),
            Some(Command::Quit) => break,
            None => {
                eprintln!("Commands: open <path>, drop <path>, browse, import, clear, quit");
                None
            }
        };

        if let Some(event) = event {
            if tx.send(event).is_err() {
                return;
            }
        }
    }

    let _ = tx.send(WorkflowEvent::Close);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_data_dir(cli.data_dir.clone());

    // Log to file (~/.session-import/logs/session-import.log)
    fs::create_dir_all(util::logs_dir()).context("Failed to create log directory")?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let mut config = Config::load();
    if let Some(url) = cli.gateway_url {
        config.gateway.url = url;
    }
    if let Some(ms) = cli.clear_delay_ms {
        config.workflow.clear_delay = Duration::from_millis(ms);
    }

    let gateway = HttpImportGateway::new(config.gateway.url.clone(), config.gateway.timeout)
        .context("Failed to build import gateway")?;
    let has_initial_file = cli.file.is_some();
    let source = PathFileSource::new(cli.file);

    let controller = ImportController::new(
        TerminalView::stdout(),
        Arc::new(gateway),
        Arc::new(source),
        &config.workflow,
    );

    let tx = controller.sender();
    if has_initial_file {
        let _ = tx.send(WorkflowEvent::Browse);
    }
    tokio::spawn(forward_commands(tx));

    controller.run().await;
    Ok(())
}
