//! NXSL CLI: assemble, inspect and run NXSL programs.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Input/assembly/usage error
//! - 3: Runtime error

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "nxsl", version)]
#[command(about = "Assemble, inspect and run NXSL programs")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble and run a program
    Run {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Preload a constant (repeatable)
        #[arg(long = "define", value_name = "NAME=VALUE", value_parser = commands::parse_binding)]
        defines: Vec<commands::Binding>,

        /// Preload a global variable (repeatable)
        #[arg(long = "global", value_name = "NAME=VALUE", value_parser = commands::parse_binding)]
        globals: Vec<commands::Binding>,

        /// Maximum call depth
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,

        /// Maximum number of instructions to execute
        #[arg(long, value_name = "N")]
        budget: Option<u64>,

        /// Print the value the program exited with
        #[arg(long)]
        print_result: bool,
    },

    /// Print the disassembly listing
    Dump {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Assemble only and report counts
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Install the stderr log subscriber.
///
/// Default level is `warn`; each `-v` raises it. `RUST_LOG` wins when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Run {
            file,
            defines,
            globals,
            max_depth,
            budget,
            print_result,
        } => commands::run(&commands::RunOptions {
            file,
            defines,
            globals,
            max_depth,
            budget,
            print_result,
        }),
        Command::Dump { file } => commands::dump(&file),
        Command::Check { file } => commands::check(&file),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}
