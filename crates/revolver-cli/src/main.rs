#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]

mod commands;
mod logging;

use clap::Parser;
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "revolver")]
#[command(author, version, about = "Directory-fallback module resolution", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Arguments shared by `resolve` and `explain`.
#[derive(clap::Args, Debug)]
struct RequestArgs {
    /// Module request as written in source (e.g. "./Button", "*/Button")
    request: String,

    /// Directory of the requesting file (defaults to the working directory)
    #[arg(long, value_name = "DIR")]
    from: Option<PathBuf>,

    /// Config file (defaults to the nearest revolver.json)
    #[arg(long, value_name = "FILE", env = "REVOLVER_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Resolve a request to a file
    Resolve(RequestArgs),

    /// Explain how a request is resolved, step by step
    Explain(RequestArgs),

    /// Write a starter revolver.json
    Init {
        /// Overwrite an existing revolver.json
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.json);

    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let cwd = dunce::canonicalize(&cwd).unwrap_or(cwd);
    let _span = tracing::info_span!("cmd", cwd = %cwd.display()).entered();

    match cli.command {
        Some(Commands::Resolve(args)) => {
            let input = commands::RequestInput::new(&cwd, args.request, args.from, args.config)?;
            commands::resolve::run(&input, cli.json)
        }
        Some(Commands::Explain(args)) => {
            let input = commands::RequestInput::new(&cwd, args.request, args.from, args.config)?;
            commands::explain::run(&input, cli.json)
        }
        Some(Commands::Init { force }) => commands::init::run(&cwd, force, cli.json),
        Some(Commands::Version) | None => commands::version::run(),
    }
}
