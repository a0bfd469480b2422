//! Charla CLI
//!
//! Terminal conversation surface for charla-core: an interactive REPL over
//! stdin, or a scripted run when utterances are given as arguments.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use charla_core::{
    session, Backend, Config, DialogueRouter, GolfAdvisor, NlpModels, Role, SurfaceEvent,
    TextProcessor,
};

const EVENT_CAPACITY: usize = 64;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "charla")]
#[command(about = "Spanish text-processing and golf caddie assistant")]
struct Args {
    /// Utterances to send in order (interactive mode when empty)
    utterances: Vec<String>,

    /// Which backend answers the conversation
    #[arg(long, value_enum, default_value = "text")]
    mode: Mode,

    /// Path to a charla.toml configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Assistant name shown in the transcript
    #[arg(long)]
    name: Option<String>,

    /// Run without the morphological analyzer
    #[arg(long = "no-morphology")]
    no_morphology: bool,

    /// Print one JSON event per line instead of a transcript
    #[arg(long)]
    json: bool,

    /// Print status indicator changes
    #[arg(long)]
    status: bool,

    /// Enable verbose debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Text,
    Golf,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "charla=debug,charla_core=debug"
    } else {
        "charla=info,charla_core=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// ============================================================================
// Rendering
// ============================================================================

struct Renderer {
    assistant_name: String,
    json: bool,
    show_status: bool,
}

impl Renderer {
    /// Text for one event, `None` when nothing should be printed
    fn render(&self, event: &SurfaceEvent, now: DateTime<Local>) -> Result<Option<String>> {
        if self.json {
            return Ok(Some(serde_json::to_string(event)?));
        }

        let out = match event {
            SurfaceEvent::Display {
                role,
                message,
                results,
            } => {
                let speaker = match role {
                    Role::User => "Tú",
                    Role::Assistant => self.assistant_name.as_str(),
                };
                let mut out = format!("[{}] {}: {}", now.format("%H:%M"), speaker, message);
                if !results.is_empty() {
                    out.push_str("\n\nResultados del procesamiento:");
                    for (i, result) in results.iter().enumerate() {
                        out.push_str(&format!("\n   {:2}. {}", i + 1, result));
                    }
                }
                Some(out)
            }
            SurfaceEvent::Status { text } if self.show_status => Some(format!("-- {} --", text)),
            SurfaceEvent::Status { .. } | SurfaceEvent::Terminate => None,
        };
        Ok(out)
    }
}

/// Print events until the session terminates or goes away
async fn print_events(mut events: mpsc::Receiver<SurfaceEvent>, renderer: Renderer) -> Result<()> {
    while let Some(event) = events.recv().await {
        if let Some(text) = renderer.render(&event, Local::now())? {
            println!("{}", text);
        }
        if event == SurfaceEvent::Terminate {
            debug!("Terminate received");
            break;
        }
    }
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if present)
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(name) = &args.name {
        config.assistant.name = name.clone();
    }
    if args.no_morphology {
        config.nlp.morphology = false;
    }

    let models = Arc::new(NlpModels::load(&config.nlp));
    let backend: Arc<dyn Backend> = match args.mode {
        Mode::Text => Arc::new(TextProcessor::new(models)),
        Mode::Golf => Arc::new(GolfAdvisor::new(models)),
    };
    info!(mode = ?args.mode, name = %config.assistant.name, "Starting session");

    let router = Arc::new(DialogueRouter::new(backend, &config.assistant));
    let (tx, rx) = mpsc::channel(EVENT_CAPACITY);
    let session = session::spawn(router, tx);

    let renderer = Renderer {
        assistant_name: config.assistant.name.clone(),
        json: args.json,
        show_status: args.status,
    };
    let mut printer = tokio::spawn(print_events(rx, renderer));
    let mut printer_result = None;

    if !args.utterances.is_empty() {
        for utterance in &args.utterances {
            if session.submit(utterance.as_str()).await.is_err() {
                debug!("Session closed before all utterances were sent");
                break;
            }
        }
    } else {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read stdin")? else {
                        break;
                    };
                    if session.submit(line).await.is_err() {
                        break;
                    }
                }
                result = &mut printer => {
                    printer_result = Some(result);
                    break;
                }
            }
        }
    }

    let state = session.close().await?;
    debug!(?state, "Session finished");

    let printed = match printer_result {
        Some(result) => result,
        None => printer.await,
    };
    printed.context("Event printer failed")?
}
