use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kana_cli::commands::{automaton_ops, config_ops, convert_ops};
use kana_cli::{load_engine, EngineOptions};

#[derive(Parser)]
#[command(name = "kanatool", about = "Romaji conversion and typing-automaton diagnostics")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Tab-separated rule table (default: embedded romaji table)
    #[arg(long, global = true)]
    table: Option<PathBuf>,
    /// Settings TOML overriding the embedded defaults
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    /// Add identity rules for printable ASCII not claimed by the table
    #[arg(long, global = true)]
    half_width: bool,
    /// Expand ambiguous rules over printable ASCII before converting
    #[arg(long, global = true)]
    complement: bool,
    /// Log engine and search events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a key sequence and print the resulting text
    Convert {
        /// Keys to type
        keys: String,
        /// Print every step result per key
        #[arg(long)]
        steps: bool,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List key sequences that type a target string
    Automaton {
        /// Text to type
        target: String,
        /// Maximum number of key sequences to print
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Search step budget (default: automaton.max_steps setting)
        #[arg(long)]
        max_steps: Option<usize>,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Validate a rule table file
    Check {
        /// Path to the tab-separated rule table
        file: String,
    },

    /// Print the embedded romaji table
    ExportTable,

    /// Settings file utilities
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the embedded default settings
    Export,
    /// Validate a settings TOML file
    Check {
        /// Path to the settings TOML file
        file: String,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("kana_core=debug,kana_engine=debug")),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    let global = cli.global;

    if global.verbose {
        init_logging();
    }

    if let Some(path) = &global.settings {
        let content = fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error reading {}: {}", path.display(), e);
            process::exit(1);
        });
        if let Err(e) = kana_engine::settings::init_custom(content) {
            eprintln!("Error in {}: {}", path.display(), e);
            process::exit(1);
        }
    }

    let engine = || {
        let options = EngineOptions {
            half_width: global.half_width
                || kana_engine::settings::settings().table.half_width_identity,
            complement: global.complement,
        };
        load_engine(global.table.as_deref(), options).unwrap_or_else(|e| {
            eprintln!("Error loading rule table: {}", e);
            process::exit(1);
        })
    };

    match cli.command {
        Command::Convert { keys, steps, json } => {
            convert_ops::convert_cmd(engine(), &keys, steps, json);
        }
        Command::Automaton {
            target,
            limit,
            max_steps,
            json,
        } => {
            automaton_ops::automaton_cmd(engine(), &target, limit, max_steps, json);
        }
        Command::Check { file } => config_ops::table_check(&file),
        Command::ExportTable => config_ops::table_export(),
        Command::Settings { action } => match action {
            SettingsAction::Export => config_ops::settings_export(),
            SettingsAction::Check { file } => config_ops::settings_check(&file),
        },
    }
}
