mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use mml_render::RenderOptions;

use commands::{cmd_check, cmd_decode, cmd_names};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Model graph codec for mml exchange documents.
#[derive(Parser)]
#[command(name = "mml", version, about = "Model graph codec for mml exchange documents")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log level used when RUST_LOG is not set (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: log::LevelFilter,

    /// Spaces per nesting level in rendered text
    #[arg(long, global = true, default_value_t = 4)]
    indent: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render exchange JSON documents as canonical model text
    Decode {
        /// Exchange JSON documents; names resolve across all of them
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the ID to qualified-name table of exchange JSON documents
    Names {
        /// Exchange JSON documents
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Report unresolved references in model and pattern documents
    Check {
        /// Model or pattern exchange JSON documents
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let options = RenderOptions { indent: cli.indent };
    match cli.command {
        Commands::Decode { files } => cmd_decode(&files, &options, cli.output, cli.quiet),
        Commands::Names { files } => cmd_names(&files, cli.output, cli.quiet),
        Commands::Check { files } => cmd_check(&files, cli.output, cli.quiet),
    }
}

/// RUST_LOG wins over `--log-level` when set.
fn init_logging(level: log::LevelFilter) {
    if std::env::var("RUST_LOG").is_err() {
        env_logger::Builder::new()
            .filter_level(level)
            .format_timestamp(None)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .format_timestamp(None)
            .init();
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
