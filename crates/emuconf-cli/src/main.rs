use anyhow::Result;
use clap::{Parser, Subcommand};
use emuconf_infrastructure::logging;
use std::path::PathBuf;

mod commands;

use commands::context::SessionContext;

#[derive(Parser)]
#[command(name = "emuconf")]
#[command(about = "emuconf - edit global and per-game emulator settings", long_about = None)]
struct Cli {
    /// Root directory (defaults to $EMUCONF_ROOT, then the platform config dir)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Edit the override file of this game instead of the global files
    #[arg(long, global = true)]
    game: Option<String>,

    /// Revision of the game given with --game
    #[arg(long, global = true, default_value_t = 0)]
    revision: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every loaded store as JSON
    Show,
    /// Print one value
    Get {
        store: String,
        section: String,
        key: String,
    },
    /// Set one value and save
    Set {
        store: String,
        section: String,
        key: String,
        value: String,
    },
    /// Empty every loaded store and save
    Clear,
    /// Report whether a game file is a stale copy of the global settings
    CheckJunk {
        /// Empty the game file when it is
        #[arg(long)]
        delete: bool,
    },
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let mut context = SessionContext::open(cli.root, cli.game.as_deref(), cli.revision)?;

    let outcome = match cli.command {
        Commands::Show => commands::inspect::show(&context),
        Commands::Get {
            store,
            section,
            key,
        } => commands::inspect::get(&context, &store, &section, &key),
        Commands::Set {
            store,
            section,
            key,
            value,
        } => commands::edit::set(&mut context, &store, &section, &key, &value),
        Commands::Clear => commands::edit::clear(&mut context),
        Commands::CheckJunk { delete } => commands::edit::check_junk(&mut context, delete),
    };

    // Release the game layer even when the command failed.
    context.finish()?;
    outcome
}
