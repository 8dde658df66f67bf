//! # CLI Layer
//!
//! The only layer that touches the terminal. It parses arguments, sets up logging
//! and configuration, opens the chosen store and hands both to the menu loop:
//!
//! 1. **setup**: clap definitions
//! 2. **prompt**: line prompts over any `BufRead`/`Write`
//! 3. **menu**: the choice loop and its handlers
//! 4. **render**: strings for panels, tables and messages
//!
//! Exit status is decided in `main`: an error returned from [`run`] exits 1.

mod menu;
mod prompt;
mod render;
mod setup;
mod styles;

use clap::Parser;
use prompt::Prompter;
use setup::Cli;
use std::io::{self, BufRead, Write};
use tracing::info;
use vibes::api::VibesApi;
use vibes::config::{BackendKind, ConfigPaths, VibesConfig};
use vibes::error::Result;
use vibes::logging::{init_logging, Verbosity};
use vibes::store::cosmos::CosmosStore;
use vibes::store::memory::InMemoryStore;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(Verbosity::from_occurrences(cli.verbose));

    let config = VibesConfig::load(&ConfigPaths::discover(cli.config.clone()))?;
    let backend = match cli.backend {
        Some(backend) => backend,
        None => config.backend()?,
    };
    info!(?backend, "starting session");

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    match backend {
        BackendKind::Memory => run_memory(&mut prompter),
        BackendKind::Cosmos => run_cosmos(&config, &mut prompter),
    }
}

fn run_memory<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<()> {
    prompter.say(&render::welcome("in-memory (nothing is persisted)"))?;

    let mut api = VibesApi::new(InMemoryStore::new());
    menu::run_session(&mut api, prompter)
}

fn run_cosmos<R: BufRead, W: Write>(
    config: &VibesConfig,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    prompter.say(&render::welcome(&config.endpoint))?;
    prompter.say(&render::status("Connecting to Cosmos DB..."))?;

    let store = match CosmosStore::connect(config) {
        Ok(store) => store,
        Err(e) => {
            // main reports the error itself; only the remedy goes to stdout.
            if e.is_unavailable() {
                prompter.say(&render::unavailable_hint())?;
            }
            return Err(e);
        }
    };
    prompter.say(&render::status(&format!(
        "Successfully connected to Cosmos DB\nDatabase: {}\nContainer: {}",
        store.database(),
        store.container()
    )))?;

    let mut api = VibesApi::new(store);
    let outcome = menu::run_session(&mut api, prompter);
    drop(api);
    prompter.say(&render::status("Disconnected from Cosmos DB"))?;
    outcome
}
