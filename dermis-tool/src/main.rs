mod config;
mod error;
mod image_source;
mod report;
mod session;
mod store;

#[cfg(feature = "tui")]
mod tui;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dermis_oracle::{OpenRouterClient, SkinAnalyst};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, load_config};
use crate::error::DermError;
use crate::image_source::read_image_file;
use crate::report::{
    ANALYSIS_FAILED, NEED_TWO_PHOTOS, render_entry, render_history_line,
};
use crate::session::{CompareSelection, analyze_and_record, compare_entries};
use crate::store::{AppContext, StoreType, data_dir};

#[derive(Parser)]
#[command(name = "derm")]
#[command(about = "Skin photo analysis and healing timeline", long_about = None)]
struct Cli {
    /// Store type: fjall or json
    #[arg(long, global = true)]
    store_type: Option<StoreType>,

    /// Path to the timeline store
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Model to use
    #[arg(short, long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a photo and add it to the timeline
    Analyze {
        /// Image file (jpg, png, webp, gif, heic, heif, bmp)
        image: PathBuf,
    },

    /// List the timeline
    History,

    /// Show a stored analysis
    Show {
        /// Timeline index, as listed by `history`
        index: usize,
    },

    /// Compare two photos from the timeline
    Compare {
        /// Index of the baseline photo
        earlier: usize,

        /// Index of the current photo
        later: usize,
    },

    #[cfg(feature = "tui")]
    /// Start the interactive interface
    Ui,
}

fn init_logging(to_file: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if to_file {
        let dir = data_dir();
        std::fs::create_dir_all(&dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("derm.log"))?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}

fn build_analyst(
    config: &Config,
    model: Option<String>,
) -> Result<SkinAnalyst<OpenRouterClient>, DermError> {
    let api_key = config.api_key()?;
    let client = match &config.base_url {
        Some(base_url) => OpenRouterClient::with_base_url(api_key, base_url),
        None => OpenRouterClient::new(api_key),
    };

    Ok(SkinAnalyst::with_model(client, config.model(model)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "tui")]
    let owns_terminal = matches!(cli.command, Command::Ui);
    #[cfg(not(feature = "tui"))]
    let owns_terminal = false;

    init_logging(owns_terminal)?;

    let config = load_config();
    let timeout = config.request_timeout();
    let (store_type, store_path) = config.store(cli.store_type, cli.store);
    let mut ctx = AppContext::open(store_type, store_path)?;

    match cli.command {
        Command::Analyze { image } => {
            let payload = read_image_file(&image)?;
            let analyst = build_analyst(&config, cli.model)?;

            analyze_and_record(&analyst, &mut ctx.timeline, payload, timeout)
                .await
                .context(ANALYSIS_FAILED)?;

            if let Some(entry) = ctx.timeline.last() {
                print!("{}", render_entry(ctx.timeline.len() - 1, entry));
            }
        }
        Command::History => {
            if ctx.timeline.is_empty() {
                println!("No scans yet. Run `derm analyze <IMAGE>` to add one.");
            }
            for (index, entry) in ctx.timeline.load_all().iter().enumerate() {
                println!("{}", render_history_line(index, entry));
            }
        }
        Command::Show { index } => {
            let entry = ctx.timeline.get(index).ok_or(DermError::EntryNotFound {
                index,
                len: ctx.timeline.len(),
            })?;

            print!("{}", render_entry(index, entry));
        }
        Command::Compare { earlier, later } => {
            if ctx.timeline.len() < 2 {
                bail!(NEED_TWO_PHOTOS);
            }

            let selection = CompareSelection {
                baseline: earlier,
                current: later,
            };
            selection.pair(ctx.timeline.len())?;

            let analyst = build_analyst(&config, cli.model)?;
            let narrative = compare_entries(&analyst, &ctx.timeline, selection, timeout).await?;

            for index in [earlier, later] {
                if let Some(entry) = ctx.timeline.get(index) {
                    println!("{}", render_history_line(index, entry));
                }
            }
            println!("\n{}", narrative);
        }
        #[cfg(feature = "tui")]
        Command::Ui => {
            let analyst = build_analyst(&config, cli.model)?;
            tui::run(ctx, analyst, timeout).await?;
        }
    }

    Ok(())
}
