mod commands;
mod config;
mod outline_file;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{check, edit, init, show, CheckArgs, Context, EditArgs, InitArgs, ShowArgs};
use config::Config;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Outliner CLI - edit hierarchical task outlines from the terminal
#[derive(Parser, Debug)]
#[command(name = "outliner")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Outline file (defaults to outline.json in the working directory)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a config file and an outline with a single root
    Init(InitArgs),

    /// Print the outline
    Show(ShowArgs),

    /// Apply one structural or content edit
    Edit(EditArgs),

    /// Validate the outline file
    Check(CheckArgs),
}

fn log_level(verbose: u8, config: &Config) -> Level {
    match verbose {
        0 => config.level(),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn run(cli: Cli, cwd: &str) -> anyhow::Result<()> {
    let config = Config::load(cwd)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_level(cli.verbose, &config).as_str())),
        )
        .with_writer(std::io::stderr)
        .init();

    let ctx = Context {
        outline_path: outline_file::resolve(cwd, cli.file.as_deref()),
        config,
    };

    match cli.command {
        Command::Init(args) => init(args, cwd, &ctx.outline_path),
        Command::Show(args) => show(args, &ctx),
        Command::Edit(args) => edit(args, &ctx),
        Command::Check(args) => check(args, &ctx),
    }
}

fn main() {
    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| run(cli, &cwd.display().to_string()));

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
