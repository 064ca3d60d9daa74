//! codify CLI - Checks and expands `#[derive(Codify)]` declarations
//!
//! Commands:
//! - `codify check` - Report diagnostics for every codify type in a file
//! - `codify expand` - Print the code the derive generates
//! - `codify keys` - Print each type's key table

use clap::{Parser, Subcommand};
use codify_logging::{LogLevel, init_logging};

mod check;
mod expand;
mod keys;
mod settings;
mod source;

#[derive(Parser)]
#[command(name = "codify")]
#[command(author, version, about = "Checker and expander for codify types", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the generator over a source file and report diagnostics
    Check {
        /// Path to the Rust source file
        #[arg(short, long)]
        input: String,

        /// Path to codify.toml (default: ./codify.toml when present)
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Print the generated code for each type in a source file
    Expand {
        /// Path to the Rust source file
        #[arg(short, long)]
        input: String,

        /// Only expand this type
        #[arg(short = 't', long = "type")]
        type_name: Option<String>,

        /// Path to codify.toml (default: ./codify.toml when present)
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Print the key table of each type in a source file
    Keys {
        /// Path to the Rust source file
        #[arg(short, long)]
        input: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: keys::Format,

        /// Path to codify.toml (default: ./codify.toml when present)
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(LogLevel::from_verbosity(cli.verbose));

    match cli.command {
        Commands::Check { input, config } => {
            let config = settings::load(config.as_deref())?;
            if !check::run(&input, &config)? {
                std::process::exit(1);
            }
        }
        Commands::Expand {
            input,
            type_name,
            config,
        } => {
            let config = settings::load(config.as_deref())?;
            expand::run(&input, type_name.as_deref(), &config)?;
        }
        Commands::Keys {
            input,
            format,
            config,
        } => {
            let config = settings::load(config.as_deref())?;
            keys::run(&input, format, &config)?;
        }
    }

    Ok(())
}
