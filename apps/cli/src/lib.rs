//! Terminal host for the cloze trainer.

pub mod config;
pub mod render;
pub mod state;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use cloze_core::{Action, PassageKind, PracticeSession};
use rand::Rng;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::state::SavedState;

/// Memorize a passage by progressively hiding its words.
#[derive(Debug, Parser)]
#[command(name = "cloze", version)]
pub struct Cli {
    /// Passage text file
    pub passage: PathBuf,

    /// JSON file holding saved progress (created on first save)
    #[arg(long, short)]
    pub state: Option<PathBuf>,

    /// Passage kind: scripture or poetry (overrides CLOZE_PASSAGE_KIND)
    #[arg(long)]
    pub kind: Option<PassageKind>,

    /// Keep [OPTIONAL] sections
    #[arg(long)]
    pub include_optional: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the passage with hidden words blanked out
    Show,
    /// Apply an action, save progress, and print the result
    Act {
        /// harder, easier, toggle-show-all, toggle-segment-mode, complete-segment,
        /// submit-review-quality, start-review, previous-segment
        action: String,
        /// Quality for submit-review-quality, segment number for start-review
        argument: Option<String>,
    },
    /// List segment progress and review times
    Due,
}

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let output = execute(cli, config, Utc::now(), &mut rand::thread_rng())?;
    print!("{}", output);
    Ok(())
}

/// Run one command against the passage and state file; returns what to print.
pub fn execute<R: Rng + ?Sized>(
    cli: Cli,
    mut config: Config,
    now: DateTime<Utc>,
    rng: &mut R,
) -> anyhow::Result<String> {
    if let Some(kind) = cli.kind {
        config.kind = kind;
    }
    if cli.include_optional {
        config.session.include_optional = true;
    }

    let text = std::fs::read_to_string(&cli.passage)
        .with_context(|| format!("reading passage {}", cli.passage.display()))?;

    let saved = match &cli.state {
        Some(path) => state::load(path)?,
        None => None,
    };
    let mut session = match saved {
        Some(saved) => PracticeSession::restore(&text, config.kind, config.session, saved.record)
            .with_cursor(saved.cursor),
        None => PracticeSession::new(&text, config.kind, config.session),
    };
    tracing::debug!(words = session.total_words(), kind = %config.kind, "passage loaded");

    match cli.command {
        Command::Show => Ok(render::screen(&session, now)),
        Command::Due => Ok(render::progress_report(&session, now)),
        Command::Act { action, argument } => {
            let action = Action::parse(&action, argument.as_deref())?;
            session.apply(action, now, rng);
            tracing::info!(?action, percentage = session.percentage(), "action applied");

            if let Some(path) = &cli.state {
                let saved = SavedState {
                    record: session.to_record(),
                    cursor: session.cursor().clone(),
                };
                state::save(path, &saved)?;
            }
            Ok(render::screen(&session, now))
        }
    }
}
