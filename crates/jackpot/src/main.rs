//! jackpot - a once-a-day slot machine for journal prompts
//!
//! This is the terminal front end. It wires together:
//! - Configuration loading
//! - Store initialization and the history writer task
//! - The slot machine (spin engine and reels)
//! - Reel timers on the tokio runtime

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use jackpot_config::load_config_or_default;
use jackpot_core::{CoreEvent, IgnoreReason, SlotMachine, SpinOutcome};
use jackpot_store::{PromptStore, SqliteStore};
use jackpot_util::{
    default_config_path, format_countdown, format_datetime_full, is_mock_time_active,
    MonotonicInstant,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// jackpot - Spin three reels, get one journal prompt per day
#[derive(Parser, Debug)]
#[command(name = "jackpot")]
#[command(about = "Spin three reels, get one journal prompt per day", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/journal-jackpot/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set JACKPOT_DATA_DIR env var)
    #[arg(short, long, env = "JACKPOT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Show today's prompt or when the next spin opens (default)
    State,
    /// Pull the lever
    Spin,
    /// List past prompts
    History,
    /// Erase all history
    Reset {
        /// Confirm the erase
        #[arg(long)]
        yes: bool,
    },
}

struct App {
    machine: SlotMachine,
    writer: JoinHandle<()>,
}

impl App {
    fn open(args: &Args) -> Result<Self> {
        let mut settings = load_config_or_default(&args.config)
            .with_context(|| format!("Failed to load config from {:?}", args.config))?;

        if let Some(data_dir) = &args.data_dir {
            settings.storage.data_dir = data_dir.clone();
        }

        std::fs::create_dir_all(&settings.storage.data_dir).with_context(|| {
            format!(
                "Failed to create data directory {:?}",
                settings.storage.data_dir
            )
        })?;

        let db_path = settings.storage.database_path();
        let store: Arc<dyn PromptStore> = Arc::new(
            SqliteStore::open(&db_path)
                .with_context(|| format!("Failed to open database {:?}", db_path))?,
        );
        info!(db_path = %db_path.display(), "Store initialized");

        let (history_writer, writer) = jackpot_core::spawn_writer(store.clone());
        let mut machine = SlotMachine::from_settings(store.as_ref(), history_writer, &settings)
            .context("Failed to read prompt history")?;
        machine.refresh_display(jackpot_util::now());

        Ok(Self { machine, writer })
    }

    async fn run(mut self, command: Command) -> Result<()> {
        let result = match command {
            Command::State => {
                self.print_state();
                Ok(())
            }
            Command::Spin => self.spin().await,
            Command::History => {
                self.print_history();
                Ok(())
            }
            Command::Reset { yes } => self.reset(yes).await,
        };

        self.shutdown().await;
        result
    }

    fn print_state(&self) {
        let now = jackpot_util::now();
        let state = self.machine.state(now);

        if let Some(prompt) = &state.todays_prompt {
            println!("Today's prompt: {}", prompt.text());
        }

        if state.can_spin {
            println!("Ready to spin!");
        } else if let Some(remaining) = state.time_until_next_spin(&now) {
            println!("{} until next spin", format_countdown(remaining));
        }
    }

    async fn spin(&mut self) -> Result<()> {
        let now = jackpot_util::now();

        let persisted = match self.machine.spin(now, MonotonicInstant::now()) {
            SpinOutcome::Spun { persisted, .. } => persisted,
            SpinOutcome::Ignored { reason, state } => {
                match reason {
                    IgnoreReason::AlreadySpunToday => {
                        if let Some(prompt) = &state.todays_prompt {
                            println!("Today's prompt: {}", prompt.text());
                        }
                        if let Some(remaining) = state.time_until_next_spin(&now) {
                            println!("{} until next spin", format_countdown(remaining));
                        }
                    }
                    IgnoreReason::InFlight => println!("Already spinning"),
                }
                return Ok(());
            }
        };

        self.animate().await?;

        // A failed write keeps today's prompt on screen; only warn
        if let Err(e) = persisted.wait().await {
            warn!(error = %e, "Prompt was not saved");
            eprintln!("Warning: today's prompt could not be saved ({})", e);
        }
        Ok(())
    }

    /// Run reel timers until every reel has stopped, or Ctrl-C
    async fn animate(&mut self) -> Result<()> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        self.render_reels()?;

        while self.machine.is_animating() {
            let Some(deadline) = self.machine.next_deadline() else {
                break;
            };

            tokio::select! {
                _ = tokio::time::sleep_until(tokio::time::Instant::from_std(deadline.into_std())) => {}
                _ = &mut ctrl_c => {
                    info!("Interrupted, stopping reels");
                    self.machine.stop_reels(jackpot_util::now());
                    self.render_reels()?;
                    println!();
                    break;
                }
            }

            for event in self.machine.advance(MonotonicInstant::now()) {
                self.handle_core_event(event)?;
            }
            if self.machine.is_animating() {
                self.render_reels()?;
            }
        }

        Ok(())
    }

    fn handle_core_event(&self, event: CoreEvent) -> Result<()> {
        match event {
            CoreEvent::ReelSettled { reel, word } => {
                debug!(reel, word = %word, "Reel settled");
                self.render_reels()
            }
            CoreEvent::AllReelsStopped { words } => {
                println!();
                println!();
                println!("  *** JACKPOT! ***");
                println!("  Today's prompt: {}", words.join(" "));
                Ok(())
            }
        }
    }

    fn render_reels(&self) -> Result<()> {
        let [a, b, c] = self.machine.display_words();
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "\r  [ {:^14} | {:^14} | {:^14} ]", a, b, c)?;
        stdout.flush()?;
        Ok(())
    }

    fn print_history(&self) {
        let now = jackpot_util::now();
        let view = self.machine.history_view(now);

        if view.is_empty() {
            println!("No past prompts yet");
        } else {
            for item in &view.items {
                let text = if item.text.trim().is_empty() {
                    "(empty)"
                } else {
                    item.text.as_str()
                };
                println!("{:>12}  {}", item.label, text);
            }
        }

        if let Some(start) = view.journey_start {
            println!();
            println!("Journey started {}", format_datetime_full(&start));
        }
    }

    async fn reset(&mut self, yes: bool) -> Result<()> {
        if !yes {
            bail!("Refusing to erase all history without --yes");
        }

        self.machine
            .reset_all()
            .wait()
            .await
            .context("Failed to clear history")?;

        println!("History erased");
        Ok(())
    }

    async fn shutdown(self) {
        // Dropping the machine drops the last writer handle
        drop(self.machine);
        if let Err(e) = self.writer.await {
            warn!(error = %e, "History writer ended abnormally");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!(version = env!("CARGO_PKG_VERSION"), "jackpot starting");
    if is_mock_time_active() {
        warn!(now = %format_datetime_full(&jackpot_util::now()), "Mock time active");
    }

    let app = App::open(&args)?;
    app.run(args.command.unwrap_or(Command::State)).await
}
