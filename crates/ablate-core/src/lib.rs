#![deny(missing_docs)]
#![doc = "Core error types and validated domain model for ablation studies."]

pub mod errors;
pub mod model;
pub mod rng;

pub use errors::{AblateError, ErrorInfo};
pub use model::{
    AblationConfig, AblationResult, AblationRun, Component, ComponentSettings, ImportanceMap,
    MetricValues, MAX_COMPONENT_NAME_LEN,
};
pub use rng::RngHandle;
