//! Command line front end for the refract generator.

#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub mod generate;
pub mod resolve;
pub mod writer;

#[derive(Parser, Debug)]
#[command(
    name = "refract",
    version,
    about = "Emit TypeScript declarations, GraphQL schema code and API bindings from a service model"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate every configured emission for a model
    Generate(generate::GenerateArgs),
    /// Resolve a single type descriptor and print the expression
    Resolve(resolve::ResolveArgs),
}

/// Parse `args` (including the program name) and run the selected command.
pub fn run_cli(args: impl IntoIterator<Item = String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Generate(args)) => generate::run(args),
            Some(Commands::Resolve(args)) => resolve::run(args),
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

/// Install the stderr subscriber.
///
/// `REFRACT_LOG` holds either a plain level (`debug`), applied to the refract
/// crates only, or a full filter spec such as `refract_core=trace`.
pub fn init_tracing() {
    let filter = match std::env::var("REFRACT_LOG") {
        Ok(level) if is_plain_level(&level) => crate_filter(&level),
        Ok(spec) => spec,
        Err(_) => crate_filter("info"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn crate_filter(level: &str) -> String {
    format!("{}={level},refract_core={level}", module_path!())
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
