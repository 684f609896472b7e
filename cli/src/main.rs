mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eqchannel_core::context::AppConfig;
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Channeling analysis over EverQuest logs")]
struct Cli {
    /// Config file to use instead of the per-user default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract cast attempt records from a log directory
    Parse {
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// Parse one log instead; relative paths resolve against the log directory
        #[arg(short, long, conflicts_with = "dir")]
        file: Option<PathBuf>,
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Process files one at a time
        #[arg(long)]
        sequential: bool,
        /// Print success/failure counts per hit count
        #[arg(long)]
        summary: bool,
    },
    /// Add level gap and base class columns to a record file
    Enrich {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long)]
        spell_table: Option<PathBuf>,
        #[arg(long)]
        wiki_cache: Option<PathBuf>,
    },
    /// Score both models against recorded outcomes
    Compare {
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Score the exponential model alone
    Validate {
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Observed and predicted success per hit count
    ByHits {
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Most hits survived by a successful cast, with locations
    MaxHits {
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the config file location and values
    Show,
    /// Persist a new log directory
    SetDirectory {
        #[arg(short, long)]
        path: String,
    },
}

/// Reports own stdout, so diagnostics go to `EQCHANNEL_LOG_PATH` when it
/// names a writable file and to stderr otherwise. `RUST_LOG` overrides the
/// default `info` level.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    if let Ok(path) = std::env::var("EQCHANNEL_LOG_PATH")
        && let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
    {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(file)
            .init();
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig, String> {
    let config = match path {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    config.map_err(|e| e.to_string())
}

fn main() -> Result<(), String> {
    init_logging();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Parse {
            dir,
            file,
            out,
            sequential,
            summary,
        } => match file {
            Some(file) => commands::parse_file(&config, &file, out, summary),
            None => commands::parse_directory(&config, dir, out, sequential, summary),
        },
        Commands::Enrich {
            input,
            out,
            spell_table,
            wiki_cache,
        } => commands::enrich(&config, input, out, spell_table, wiki_cache),
        Commands::Compare { input } => commands::compare(&config, input),
        Commands::Validate { input } => commands::validate(&config, input),
        Commands::ByHits { input } => commands::by_hits(&config, input),
        Commands::MaxHits { dir } => commands::max_hits(&config, dir),
        Commands::Config(ConfigCommand::Show) => commands::show_config(&config, cli.config.as_deref()),
        Commands::Config(ConfigCommand::SetDirectory { path }) => {
            commands::set_directory(config, path, cli.config.as_deref())
        }
    }
}
