//! `pgx` - transpile small JavaScript-like expressions to Lua, JavaScript,
//! C and Hare.

mod commands;
mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::batch::{BatchArgs, cmd_batch};
use commands::captures::cmd_captures;
use commands::parse::cmd_parse;
use commands::transpile::{TranspileArgs, cmd_transpile};
use config::PgxConfig;

#[derive(Parser)]
#[command(name = "pgx", version, about = "Multi-target expression transpiler")]
struct Cli {
    /// Enable debug logging (overridden by PGX_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory to look for .pgx/config.toml in (default: current directory)
    #[arg(short = 'C', long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the AST of an expression as JSON
    Parse {
        /// Expression source
        expr: String,
    },

    /// Transpile an expression
    Transpile(TranspileArgs),

    /// List the variables an arrow function captures
    Captures {
        /// Arrow function source
        expr: String,
    },

    /// Transpile a file of expressions, one per line
    Batch(BatchArgs),
}

/// Reset SIGPIPE to default behavior so piping to `head` etc. doesn't panic.
#[cfg(unix)]
fn reset_sigpipe() {
    // SAFETY: libc::signal is a standard POSIX function; this only restores
    // the default disposition for SIGPIPE.
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn reset_sigpipe() {}

/// Log to stderr, filtered by `PGX_LOG` (default `warn`, `debug` with -v).
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("PGX_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli) -> anyhow::Result<String> {
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("failed to determine current directory")?,
    };
    let config = PgxConfig::load(&root);
    tracing::debug!(?config, root = %root.display(), "resolved config");

    match cli.command {
        Command::Parse { expr } => cmd_parse(&expr),
        Command::Transpile(args) => cmd_transpile(&args, &config),
        Command::Captures { expr } => cmd_captures(&expr),
        Command::Batch(args) => cmd_batch(&args, &config),
    }
}

fn main() {
    reset_sigpipe();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
