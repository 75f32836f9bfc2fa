use std::process;

use ablate_core::AblateError;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    analyze::{self, AnalyzeArgs},
    configure::{self, ConfigureArgs},
    version::{self, VersionArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "ablate",
    version,
    about = "Automated ablation studies for pipeline components"
)]
struct Cli {
    /// Emit debug logs from the ablate crates on stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Configure a study from a components YAML file and write run templates.
    Configure(ConfigureArgs),
    /// Compute component importance from filled-in run results.
    Analyze(AnalyzeArgs),
    /// Print version information.
    Version(VersionArgs),
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let outcome = match cli.command {
        Command::Configure(args) => configure::run(&args),
        Command::Analyze(args) => analyze::run(&args),
        Command::Version(args) => version::run(&args),
    };
    if let Err(err) = outcome {
        eprintln!("Error: {err}");
        process::exit(exit_code(&err));
    }
}

fn init_logging(verbose: bool) {
    let directives = if verbose {
        "warn,ablate_exp=debug,ablate_cli=debug"
    } else {
        "warn"
    };
    // RUST_LOG wins over the flag when set.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code(err: &AblateError) -> i32 {
    match err {
        AblateError::Io(_) => 2,
        AblateError::Validation(_) => 3,
        AblateError::Serde(_) => 4,
    }
}
