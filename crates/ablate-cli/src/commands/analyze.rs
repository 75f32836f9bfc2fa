use std::path::PathBuf;

use ablate_core::AblateError;
use ablate_exp::{
    analyze_results, load_config_document, load_results, read_text, write_text, AblationStudy,
};
use clap::Args;
use tracing::info;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// JSONL file (one run per line) or the JSON document written by `configure`.
    #[arg(long)]
    pub results: PathBuf,
    /// Study configuration, when it is not embedded in the results.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Optional path to write the analysis JSON instead of printing it.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &AnalyzeArgs) -> Result<(), AblateError> {
    let loaded = load_results(&read_text(&args.results)?)?;
    let fallback = match (&loaded.config, &args.config) {
        (None, Some(path)) => Some(load_config_document(&read_text(path)?)?),
        _ => None,
    };

    let (_, report) = analyze_results(&AblationStudy::new(), loaded, fallback)?;
    let rendered = report.to_json()?;
    match &args.output {
        Some(path) => {
            write_text(path, &rendered)?;
            info!(path = %path.display(), "wrote analysis");
            println!("Analysis written to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
