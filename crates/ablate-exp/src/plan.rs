//! Study documents exchanged with the evaluation harness.
//!
//! A [`StudyPlan`] is written with empty metrics, filled in externally, and
//! read back either as the same JSON document or as JSONL run records.

use std::collections::BTreeSet;

use ablate_core::errors::{AblateError, ErrorInfo};
use ablate_core::{AblationConfig, AblationResult, AblationRun, Component, ImportanceMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::serde::{from_json_slice, from_yaml_str, json_decode_error, to_pretty_json};
use crate::study::AblationStudy;

/// Guidance embedded in every generated plan.
pub const PLAN_INSTRUCTIONS: &str =
    "Fill in 'metrics' dict for each run, then use 'analyze' to compute importance.";

fn default_instructions() -> String {
    PLAN_INSTRUCTIONS.to_string()
}

/// Configuration plus pending runs, as emitted by `configure`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    /// Validated study configuration.
    pub config: AblationConfig,
    /// Baseline followed by one run per enabled component, metrics empty.
    pub runs: Vec<AblationRun>,
    /// Guidance for whoever fills in the metrics.
    #[serde(default = "default_instructions")]
    pub instructions: String,
}

impl StudyPlan {
    /// Generates the runs for `config` and bundles them into a plan.
    pub fn generate(study: &AblationStudy, config: AblationConfig) -> Result<Self, AblateError> {
        let runs = study.generate_runs(&config)?;
        Ok(Self {
            config,
            runs,
            instructions: default_instructions(),
        })
    }

    /// Indented JSON rendering of the plan.
    pub fn to_json(&self) -> Result<String, AblateError> {
        to_pretty_json(self)
    }

    /// Parses a plan document.
    pub fn from_json(text: &str) -> Result<Self, AblateError> {
        from_json_slice(text.as_bytes())
    }
}

/// Runs read from a results file, with the configuration when one was embedded.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedResults {
    /// Configuration embedded in a plan-shaped document; `None` for JSONL.
    pub config: Option<AblationConfig>,
    /// Runs in file order.
    pub runs: Vec<AblationRun>,
}

/// Reads filled-in runs from either a plan-shaped JSON document (`config` and
/// `runs` keys) or line-delimited run records.
///
/// Text that does not parse as a single JSON value is treated as JSONL. A lone
/// run object is rejected: it parses as one document without the required keys.
pub fn load_results(text: &str) -> Result<LoadedResults, AblateError> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return results_from_document(value);
        }
    }
    let runs = parse_run_lines(trimmed)?;
    debug!(runs = runs.len(), "parsed JSONL results");
    Ok(LoadedResults { config: None, runs })
}

fn results_from_document(value: Value) -> Result<LoadedResults, AblateError> {
    let Value::Object(mut map) = value else {
        return Err(missing_document_keys());
    };
    if map.contains_key("config") && map.contains_key("runs") {
        let config = map.remove("config").unwrap_or(Value::Null);
        let runs = map.remove("runs").unwrap_or(Value::Null);
        let config: AblationConfig = serde_json::from_value(config)
            .map_err(|err| json_decode_error("results-config", err))?;
        let runs: Vec<AblationRun> =
            serde_json::from_value(runs).map_err(|err| json_decode_error("results-runs", err))?;
        debug!(runs = runs.len(), "parsed results document");
        return Ok(LoadedResults {
            config: Some(config),
            runs,
        });
    }
    Err(missing_document_keys())
}

fn missing_document_keys() -> AblateError {
    AblateError::Validation(
        ErrorInfo::new(
            "results-document-keys",
            "JSON file must contain 'config' and 'runs' keys",
        )
        .with_hint("pass the document written by `configure`, or one run per line"),
    )
}

fn parse_run_lines(text: &str) -> Result<Vec<AblationRun>, AblateError> {
    let mut runs = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let run =
            serde_json::from_str::<AblationRun>(line).map_err(|err| line_error(idx + 1, err))?;
        runs.push(run);
    }
    Ok(runs)
}

fn line_error(line: usize, err: serde_json::Error) -> AblateError {
    match json_decode_error("results-jsonl-line", err) {
        AblateError::Validation(info) => {
            AblateError::Validation(info.with_context("line", line.to_string()))
        }
        AblateError::Serde(info) => AblateError::Serde(info.with_context("line", line.to_string())),
        other => other,
    }
}

/// Parses a configuration file holding either `{"config": {...}}` or a bare
/// configuration object.
pub fn load_config_document(text: &str) -> Result<AblationConfig, AblateError> {
    let mut value: Value = from_json_slice(text.as_bytes())?;
    let config = match value.get_mut("config").map(Value::take) {
        Some(embedded) => embedded,
        None => value,
    };
    serde_json::from_value(config).map_err(|err| json_decode_error("config-document", err))
}

/// Synthesises a configuration from the component and metric names observed
/// across `runs`, both sorted.
pub fn infer_config(runs: &[AblationRun]) -> Result<AblationConfig, AblateError> {
    let names: BTreeSet<&str> = runs
        .iter()
        .flat_map(|run| run.components.iter().map(Component::name))
        .collect();
    let metrics: BTreeSet<&str> = runs
        .iter()
        .flat_map(|run| run.metrics.keys().map(String::as_str))
        .collect();
    let components = names
        .into_iter()
        .map(Component::new)
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        components = components.len(),
        metrics = metrics.len(),
        "inferred configuration from runs"
    );
    AblationConfig::new(components, metrics.into_iter().map(str::to_string).collect())
}

/// One row of the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    /// Ablated component name.
    pub component: String,
    /// Baseline mean minus ablated mean.
    pub importance: f64,
}

/// Importance scores and their ranking, as emitted by `analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Scores in run order.
    pub component_importance: ImportanceMap,
    /// Scores sorted highest first.
    pub ranking: Vec<RankEntry>,
}

impl AnalysisReport {
    /// Indented JSON rendering of the report.
    pub fn to_json(&self) -> Result<String, AblateError> {
        to_pretty_json(self)
    }
}

/// Resolves the configuration (embedded, then `fallback`, then inferred from
/// the runs), ranks the components and returns the ranked result with its
/// report.
pub fn analyze_results(
    study: &AblationStudy,
    loaded: LoadedResults,
    fallback: Option<AblationConfig>,
) -> Result<(AblationResult, AnalysisReport), AblateError> {
    let config = match loaded.config.or(fallback) {
        Some(config) => config,
        None => infer_config(&loaded.runs)?,
    };
    let mut result = AblationResult::new(config, loaded.runs);
    let ranking = study.rank_components(&mut result);
    info!(
        runs = result.runs.len(),
        ranked = ranking.len(),
        "analyzed ablation results"
    );
    let report = AnalysisReport {
        component_importance: result.component_importance.clone(),
        ranking: ranking
            .into_iter()
            .map(|(component, importance)| RankEntry {
                component,
                importance,
            })
            .collect(),
    };
    Ok((result, report))
}

/// Parses a YAML list of component definitions.
pub fn load_components(yaml: &str) -> Result<Vec<Component>, AblateError> {
    let raw: serde_yaml::Value = from_yaml_str(yaml)?;
    if !raw.is_sequence() {
        return Err(AblateError::validation(
            "components-not-list",
            "components YAML must be a list of component objects",
        ));
    }
    serde_yaml::from_value(raw).map_err(|err| {
        AblateError::Validation(ErrorInfo::new("components-invalid", err.to_string()))
    })
}

/// Splits a comma-separated metric list, dropping blank entries.
pub fn parse_metric_list(raw: &str) -> Result<Vec<String>, AblateError> {
    let metrics: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|metric| !metric.is_empty())
        .map(str::to_string)
        .collect();
    if metrics.is_empty() {
        return Err(AblateError::Validation(
            ErrorInfo::new(
                "metrics-empty",
                "--metrics must contain at least one metric name",
            )
            .with_hint("e.g. --metrics accuracy,latency_ms"),
        ));
    }
    Ok(metrics)
}
