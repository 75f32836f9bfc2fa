use std::path::PathBuf;

use ablate_core::AblateError;
use ablate_exp::{
    load_components, parse_metric_list, read_text, write_text, AblationStudy, StudyPlan,
};
use clap::Args;
use tracing::info;

#[derive(Args, Debug)]
pub struct ConfigureArgs {
    /// Path to a YAML file listing components.
    #[arg(long = "components")]
    pub components: PathBuf,
    /// Comma-separated metric names, e.g. accuracy,latency_ms.
    #[arg(long)]
    pub metrics: String,
    /// Number of repetitions per ablation run.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub repetitions: i64,
    /// Path to write the study plan JSON.
    #[arg(long, default_value = "ablation_config.json")]
    pub output: PathBuf,
    /// Seed for reproducible run identifiers.
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: &ConfigureArgs) -> Result<(), AblateError> {
    let components = load_components(&read_text(&args.components)?)?;
    let metrics = parse_metric_list(&args.metrics)?;

    let study = match args.seed {
        Some(seed) => AblationStudy::with_seed(seed),
        None => AblationStudy::new(),
    };
    let mut config = study.configure(components, metrics)?;
    config.set_repetitions(args.repetitions)?;

    let plan = StudyPlan::generate(&study, config)?;
    write_text(&args.output, &plan.to_json()?)?;
    info!(path = %args.output.display(), runs = plan.runs.len(), "wrote study plan");
    println!(
        "Ablation config with {} runs written to {}",
        plan.runs.len(),
        args.output.display()
    );
    Ok(())
}
