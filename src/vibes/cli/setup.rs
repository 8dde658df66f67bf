use clap::{ArgAction, Parser};
use std::path::PathBuf;
use vibes::config::BackendKind;

#[derive(Parser, Debug)]
#[command(name = "vibes", bin_name = "vibes", version)]
#[command(about = "Console manager for a collection of vibes", long_about = None)]
pub struct Cli {
    /// Storage backend, overriding the configured one
    #[arg(short, long, value_enum, help_heading = "Options")]
    pub backend: Option<BackendKind>,

    /// Configuration file to use instead of ./vibes.toml
    #[arg(short, long, value_name = "PATH", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Verbose diagnostics on stderr (repeat for more)
    #[arg(short, long, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,
}
