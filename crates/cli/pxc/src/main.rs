//! PhySL compiler CLI
//!
//! Compiles host-language functions to engine IR and inspects the pieces in
//! between.

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "CLI tool needs to print to stdout/stderr"
)]

mod ast;
mod compile;
mod fmt;
mod report;

use clap::{ArgAction, Parser, Subcommand};
use compile::{CompileOptions, Render};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pxc")]
#[command(about = "PhySL compiler", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Raise the log level (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the functions of a source file to IR
    Compile {
        /// Source file
        path: PathBuf,

        /// Only compile this function
        #[arg(long)]
        function: Option<String>,

        /// Session configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Lay the IR out one argument per line
        #[arg(long)]
        pretty: bool,

        /// Remove position tags
        #[arg(long, conflicts_with = "pretty")]
        strip_tags: bool,

        /// Write the listing to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compile a syntax tree serialized as JSON
    Lower {
        /// JSON module file
        path: PathBuf,

        /// Session configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Dump the syntax tree of a source file as JSON
    Ast {
        /// Source file
        path: PathBuf,

        /// Only dump this function
        #[arg(long)]
        function: Option<String>,
    },

    /// Pretty-print an IR file
    Fmt {
        /// IR file
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compile {
            path,
            function,
            config,
            pretty,
            strip_tags,
            output,
        } => compile::compile(
            &path,
            &CompileOptions {
                function,
                config,
                render: Render::from_flags(pretty, strip_tags),
                output,
            },
        ),
        Commands::Lower { path, config } => compile::lower(&path, config.as_deref()),
        Commands::Ast { path, function } => ast::dump(&path, function.as_deref()),
        Commands::Fmt { path } => fmt::format_file(&path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report::print_error(&error);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
