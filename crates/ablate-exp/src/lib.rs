//! Ablation run generation, importance scoring and study documents.

#![deny(missing_docs)]

mod io;
mod plan;
mod serde;
mod study;

pub use crate::io::{read_text, write_text};
pub use crate::plan::{
    analyze_results, infer_config, load_components, load_config_document, load_results,
    parse_metric_list, AnalysisReport, LoadedResults, RankEntry, StudyPlan, PLAN_INSTRUCTIONS,
};
pub use crate::serde::{from_json_slice, from_yaml_str, to_canonical_json_bytes, to_pretty_json};
pub use crate::study::AblationStudy;
