//! `caregraph` binary: runs patient chat turns from the command line.
//!
//! With `-m TEXT` runs one turn and prints the reply plus the session id; otherwise reads
//! lines from stdin against one session until `exit`, `quit` or end of input.

use std::path::PathBuf;

use caregraph_cli::{build_engine, load_config, run_once, run_repl, RunOptions};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "caregraph")]
#[command(about = "Post-discharge care assistant: identify a patient, then answer their questions")]
struct Args {
    /// Run a single message and exit.
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// Continue an existing session.
    #[arg(long, value_name = "ID")]
    session: Option<String>,

    /// Patient data JSON file (default: env PATIENTS_PATH or data/patients.json).
    #[arg(long, value_name = "PATH")]
    patients: Option<PathBuf>,

    /// Knowledge corpus JSON file (default: env KNOWLEDGE_PATH; unset means empty).
    #[arg(long, value_name = "PATH")]
    knowledge: Option<PathBuf>,

    /// Persist sessions to this SQLite file (default: env DB_PATH; unset keeps them in memory).
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Sampling temperature (0–2).
    #[arg(long)]
    temperature: Option<f32>,

    /// Log node enter/exit for every turn.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            temperature: self.temperature,
            patients_path: self.patients.clone(),
            knowledge_path: self.knowledge.clone(),
            db_path: self.db.clone(),
            verbose: self.verbose,
        }
    }
}

/// Initializes tracing to stderr; if env `LOG_FILE` is set, also to that file (append,
/// plain text). `RUST_LOG` overrides the default filter.
fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::Layer;

    let default_filter = if verbose {
        "info,caregraph=debug,caregraph_cli=debug"
    } else {
        "warn,caregraph=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter.clone());

    let registry = tracing_subscriber::registry().with(stderr_layer);

    if let Ok(path) = std::env::var("LOG_FILE") {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_filter(filter);
        registry.with(file_layer).init();
        tracing::info!(path = %path, "logging to file");
    } else {
        registry.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let config = load_config(&args.run_options())?;
    init_tracing(config.verbose)?;

    let engine = build_engine(&config).await?;
    let mut stdout = std::io::stdout();

    match args.message.as_deref() {
        Some(message) => {
            run_once(&engine, args.session.as_deref(), message, &mut stdout).await?;
        }
        None => {
            println!("Hello! I'm your post-discharge care assistant. What's your full name?");
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            run_repl(&engine, args.session.clone(), stdin, &mut stdout).await?;
        }
    }
    Ok(())
}
