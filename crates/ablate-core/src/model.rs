//! Validated value objects describing an ablation study.
//!
//! Every type here enforces its invariants at construction time, both through
//! the explicit constructors and through serde (`try_from` records), so an
//! invalid component, configuration or run can never be materialised.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AblateError, ErrorInfo};

/// Maximum number of characters permitted in a component name.
pub const MAX_COMPONENT_NAME_LEN: usize = 128;

/// Opaque per-component configuration.
pub type ComponentSettings = BTreeMap<String, Value>;

/// Metric name to observed value.
pub type MetricValues = BTreeMap<String, f64>;

/// Component name to importance score, in insertion order.
pub type ImportanceMap = IndexMap<String, f64>;

fn validate_component_name(raw: &str) -> Result<String, AblateError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AblateError::Validation(
            ErrorInfo::new("component-name-empty", "component name must not be empty")
                .with_hint("give every component a non-blank `name`"),
        ));
    }
    let len = name.chars().count();
    if len > MAX_COMPONENT_NAME_LEN {
        return Err(AblateError::Validation(
            ErrorInfo::new(
                "component-name-too-long",
                format!("component name exceeds {MAX_COMPONENT_NAME_LEN} characters"),
            )
            .with_context("length", len.to_string()),
        ));
    }
    Ok(name.to_string())
}

/// A named, toggle-able component of the system under study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ComponentRecord")]
pub struct Component {
    name: String,
    /// Whether the component participates in the run.
    pub enabled: bool,
    /// Free-form settings forwarded to the evaluation harness.
    pub config: ComponentSettings,
}

#[derive(Deserialize)]
struct ComponentRecord {
    name: String,
    #[serde(default = "default_enabled")]
    enabled: bool,
    #[serde(default)]
    config: ComponentSettings,
}

fn default_enabled() -> bool {
    true
}

impl TryFrom<ComponentRecord> for Component {
    type Error = AblateError;

    fn try_from(record: ComponentRecord) -> Result<Self, Self::Error> {
        let mut component = Component::new(record.name)?;
        component.enabled = record.enabled;
        component.config = record.config;
        Ok(component)
    }
}

impl Component {
    /// Creates an enabled component with empty settings.
    pub fn new(name: impl AsRef<str>) -> Result<Self, AblateError> {
        Ok(Self {
            name: validate_component_name(name.as_ref())?,
            enabled: true,
            config: ComponentSettings::new(),
        })
    }

    /// Sets the enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Adds a single setting entry.
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Returns the component name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Fixed parameters of an ablation study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConfigRecord")]
pub struct AblationConfig {
    base_components: Vec<Component>,
    metrics_to_track: Vec<String>,
    repetitions: u32,
}

#[derive(Deserialize)]
struct ConfigRecord {
    base_components: Vec<Component>,
    metrics_to_track: Vec<String>,
    #[serde(default = "default_repetitions")]
    repetitions: i64,
}

fn default_repetitions() -> i64 {
    1
}

impl TryFrom<ConfigRecord> for AblationConfig {
    type Error = AblateError;

    fn try_from(record: ConfigRecord) -> Result<Self, Self::Error> {
        let mut config = AblationConfig::new(record.base_components, record.metrics_to_track)?;
        config.set_repetitions(record.repetitions)?;
        Ok(config)
    }
}

impl AblationConfig {
    /// Builds a configuration with `repetitions = 1`.
    ///
    /// Fails when either list is empty. Metric names are trimmed.
    pub fn new(
        base_components: Vec<Component>,
        metrics_to_track: Vec<String>,
    ) -> Result<Self, AblateError> {
        if base_components.is_empty() {
            return Err(AblateError::validation(
                "config-components-empty",
                "base_components must contain at least one component",
            ));
        }
        if metrics_to_track.is_empty() {
            return Err(AblateError::validation(
                "config-metrics-empty",
                "metrics_to_track must contain at least one metric name",
            ));
        }
        Ok(Self {
            base_components,
            metrics_to_track: metrics_to_track
                .into_iter()
                .map(|metric| metric.trim().to_string())
                .collect(),
            repetitions: 1,
        })
    }

    /// Updates the advisory repetition count; values below one are rejected.
    pub fn set_repetitions(&mut self, repetitions: i64) -> Result<(), AblateError> {
        if repetitions < 1 {
            return Err(AblateError::Validation(
                ErrorInfo::new("config-repetitions", "repetitions must be at least 1")
                    .with_context("repetitions", repetitions.to_string()),
            ));
        }
        self.repetitions = u32::try_from(repetitions).map_err(|_| {
            AblateError::Validation(
                ErrorInfo::new("config-repetitions", "repetitions is out of range")
                    .with_context("repetitions", repetitions.to_string()),
            )
        })?;
        Ok(())
    }

    /// Builder form of [`AblationConfig::set_repetitions`].
    pub fn with_repetitions(mut self, repetitions: i64) -> Result<Self, AblateError> {
        self.set_repetitions(repetitions)?;
        Ok(self)
    }

    /// Components of the full system, in study order.
    pub fn base_components(&self) -> &[Component] {
        &self.base_components
    }

    /// Metric names the study intends to record.
    pub fn metrics_to_track(&self) -> &[String] {
        &self.metrics_to_track
    }

    /// Number of repetitions an external harness should average over.
    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }
}

/// One configuration of the system, either the baseline or a single ablation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RunRecord")]
pub struct AblationRun {
    run_id: String,
    disabled_component: Option<String>,
    /// Snapshot of the components as configured for this run.
    pub components: Vec<Component>,
    /// Observed metric values, filled in by the evaluation harness.
    pub metrics: MetricValues,
}

#[derive(Deserialize)]
struct RunRecord {
    run_id: String,
    #[serde(default)]
    disabled_component: Option<String>,
    #[serde(default)]
    components: Vec<Component>,
    #[serde(default)]
    metrics: MetricValues,
}

impl TryFrom<RunRecord> for AblationRun {
    type Error = AblateError;

    fn try_from(record: RunRecord) -> Result<Self, Self::Error> {
        let run = AblationRun::new(
            record.run_id,
            record.disabled_component,
            record.components,
        )?;
        Ok(run.with_metrics(record.metrics))
    }
}

impl AblationRun {
    /// Creates a run with empty metrics. `disabled_component = None` marks the
    /// baseline.
    pub fn new(
        run_id: impl AsRef<str>,
        disabled_component: Option<String>,
        components: Vec<Component>,
    ) -> Result<Self, AblateError> {
        let run_id = run_id.as_ref().trim();
        if run_id.is_empty() {
            return Err(AblateError::validation(
                "run-id-empty",
                "run_id must not be empty",
            ));
        }
        Ok(Self {
            run_id: run_id.to_string(),
            disabled_component: disabled_component.map(|name| name.trim().to_string()),
            components,
            metrics: MetricValues::new(),
        })
    }

    /// Attaches metric values, replacing any existing ones. Metric names are
    /// trimmed.
    pub fn with_metrics<I, K>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        self.metrics = metrics
            .into_iter()
            .map(|(k, v)| (k.into().trim().to_string(), v))
            .collect();
        self
    }

    /// Identifier of the run.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Name of the ablated component, `None` for the baseline.
    pub fn disabled_component(&self) -> Option<&str> {
        self.disabled_component.as_deref()
    }

    /// Whether this run is the baseline.
    pub fn is_baseline(&self) -> bool {
        self.disabled_component.is_none()
    }

    /// Arithmetic mean of all metric values, `None` when no metrics exist.
    pub fn mean_metric(&self) -> Option<f64> {
        if self.metrics.is_empty() {
            return None;
        }
        let total: f64 = self.metrics.values().sum();
        Some(total / self.metrics.len() as f64)
    }
}

/// Analysis-ready bundle of a configuration and its runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AblationResult {
    /// Originating configuration.
    pub config: AblationConfig,
    /// Baseline and ablation runs.
    #[serde(default)]
    pub runs: Vec<AblationRun>,
    /// Importance per component, populated by ranking.
    #[serde(default)]
    pub component_importance: ImportanceMap,
}

impl AblationResult {
    /// Bundles runs with their configuration; importance starts empty.
    pub fn new(config: AblationConfig, runs: Vec<AblationRun>) -> Self {
        Self {
            config,
            runs,
            component_importance: ImportanceMap::new(),
        }
    }

    /// First run without a disabled component.
    pub fn baseline(&self) -> Option<&AblationRun> {
        self.runs.iter().find(|run| run.is_baseline())
    }
}
