use std::cmp::Ordering;
use std::collections::BTreeSet;

use ablate_core::errors::AblateError;
use ablate_core::{
    AblationConfig, AblationResult, AblationRun, Component, ImportanceMap, RngHandle,
};
use tracing::{debug, info};

const BASELINE_RUN_ID_PREFIX: &str = "baseline";
const ABLATION_RUN_ID_PREFIX: &str = "ablate";
const RUN_ID_SUFFIX_LEN: usize = 8;
const IMPORTANCE_DECIMALS: usize = 6;

/// Ablation study engine.
///
/// Generates one baseline run plus one run per enabled component, and turns
/// externally measured metrics into per-component importance scores.
///
/// ```
/// use ablate_core::{AblationResult, Component};
/// use ablate_exp::AblationStudy;
///
/// let study = AblationStudy::with_seed(7);
/// let config = study
///     .configure(
///         vec![Component::new("retriever")?, Component::new("reranker")?],
///         vec!["accuracy".into()],
///     )?;
/// let mut runs = study.generate_runs(&config)?;
/// runs[0].metrics.insert("accuracy".into(), 0.9);
/// runs[1].metrics.insert("accuracy".into(), 0.7);
/// runs[2].metrics.insert("accuracy".into(), 0.85);
/// let mut result = AblationResult::new(config, runs);
/// let ranking = study.rank_components(&mut result);
/// assert_eq!(ranking[0].0, "retriever");
/// # Ok::<(), ablate_core::AblateError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct AblationStudy {
    seed: Option<u64>,
}

impl AblationStudy {
    /// Study whose run identifiers draw on OS entropy.
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Study whose run identifiers are reproducible for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// Wraps components and metric names into a validated configuration.
    pub fn configure(
        &self,
        components: Vec<Component>,
        metrics: Vec<String>,
    ) -> Result<AblationConfig, AblateError> {
        AblationConfig::new(components, metrics)
    }

    /// Produces the baseline run followed by one run per enabled component,
    /// in `base_components` order. Every run owns its own component snapshot.
    pub fn generate_runs(
        &self,
        config: &AblationConfig,
    ) -> Result<Vec<AblationRun>, AblateError> {
        let mut ids = RunIds::new(self.seed);
        let base = config.base_components();
        let mut runs = Vec::with_capacity(base.len() + 1);

        runs.push(AblationRun::new(
            ids.next(BASELINE_RUN_ID_PREFIX),
            None,
            base.to_vec(),
        )?);

        for component in base.iter().filter(|component| component.enabled) {
            let components = base
                .iter()
                .map(|candidate| {
                    let mut snapshot = candidate.clone();
                    if snapshot.name() == component.name() {
                        snapshot.enabled = false;
                    }
                    snapshot
                })
                .collect();
            let prefix = format!("{ABLATION_RUN_ID_PREFIX}-{}", component.name());
            let run = AblationRun::new(
                ids.next(&prefix),
                Some(component.name().to_string()),
                components,
            )?;
            debug!(run_id = run.run_id(), component = component.name(), "generated ablation run");
            runs.push(run);
        }

        info!(
            runs = runs.len(),
            components = base.len(),
            "generated ablation runs"
        );
        Ok(runs)
    }

    /// Importance of each ablated component relative to the first baseline
    /// run: `mean(baseline) - mean(ablated)`, rounded to six decimals.
    ///
    /// Returns an empty map when no baseline exists or the baseline has no
    /// metrics. Ablation runs without metrics score `0.0`. A component that
    /// appears in several runs keeps the score of the last one.
    pub fn compute_importance(&self, result: &AblationResult) -> ImportanceMap {
        let Some(baseline_avg) = result.baseline().and_then(AblationRun::mean_metric) else {
            debug!("no baseline metrics available; importance is empty");
            return ImportanceMap::new();
        };

        let mut importance = ImportanceMap::new();
        for run in &result.runs {
            let Some(name) = run.disabled_component() else {
                continue;
            };
            let score = match run.mean_metric() {
                Some(ablated_avg) => round_score(baseline_avg - ablated_avg),
                None => 0.0,
            };
            if let Some(previous) = importance.insert(name.to_string(), score) {
                debug!(component = name, previous, score, "importance overwritten by later run");
            }
        }
        importance
    }

    /// Computes importance, stores it on `result` and returns the entries
    /// sorted by score, highest first. Ties keep importance-map order.
    pub fn rank_components(&self, result: &mut AblationResult) -> Vec<(String, f64)> {
        let importance = self.compute_importance(result);
        let mut ranking: Vec<(String, f64)> = importance
            .iter()
            .map(|(name, score)| (name.clone(), *score))
            .collect();
        ranking.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        result.component_importance = importance;
        ranking
    }
}

/// Rounds to six decimals on the exact binary value, so `0.1234565` (stored
/// just below the tie) becomes `0.123456`.
fn round_score(value: f64) -> f64 {
    format!("{value:.prec$}", prec = IMPORTANCE_DECIMALS)
        .parse()
        .unwrap_or(value)
}

/// Issues `<prefix>-<hex>` identifiers, unique within one generated set.
struct RunIds {
    rng: RngHandle,
    issued: BTreeSet<String>,
}

impl RunIds {
    fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => RngHandle::from_seed(seed),
            None => RngHandle::from_entropy(),
        };
        Self {
            rng,
            issued: BTreeSet::new(),
        }
    }

    fn next(&mut self, prefix: &str) -> String {
        loop {
            let id = format!("{prefix}-{}", self.rng.hex_token(RUN_ID_SUFFIX_LEN));
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }
}
