//! JPQL.Next command-line interface

use clap::{Parser, Subcommand};
use jpql::cli::output::OutputFormat;
use jpql::cli::{build, functions, output};
use std::path::PathBuf;

/// JPQL.Next command-line tool
#[derive(Parser)]
#[command(name = "jpql")]
#[command(author, version, about = "JPQL.Next expression builder tools", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the AST of a JSON-encoded parse tree
    Build {
        /// Parse tree file (JSON)
        tree: PathBuf,

        /// Query text the tree spans point into
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Builder configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Build a predicate instead of an expression
        #[arg(short, long)]
        predicate: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// List built-in and registered functions
    Functions {
        /// Builder configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    output::setup_colors(&cli.color);

    let result = match cli.command {
        Commands::Build {
            tree,
            source,
            config,
            predicate,
            format,
        } => build::build(build::BuildConfig {
            tree,
            source,
            config,
            predicate,
            format,
            verbose: cli.verbose,
        }),
        Commands::Functions { config } => functions::functions(functions::FunctionsConfig { config }),
    };

    if let Err(e) = result {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}
