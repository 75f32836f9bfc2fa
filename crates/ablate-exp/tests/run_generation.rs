use std::collections::BTreeSet;

use ablate_core::{AblationConfig, Component};
use ablate_exp::AblationStudy;
use proptest::prelude::*;

fn build_config(flags: &[bool]) -> AblationConfig {
    let components = flags
        .iter()
        .enumerate()
        .map(|(idx, enabled)| {
            Component::new(format!("component_{idx}"))
                .expect("component")
                .with_enabled(*enabled)
                .with_setting("index", idx as u64)
        })
        .collect();
    AblationConfig::new(components, vec!["accuracy".into()]).expect("config")
}

proptest! {
    #[test]
    fn one_run_per_enabled_component(
        flags in prop::collection::vec(any::<bool>(), 1..12),
        seed in any::<u64>()
    ) {
        let config = build_config(&flags);
        let runs = AblationStudy::with_seed(seed).generate_runs(&config).expect("runs");

        let enabled = flags.iter().filter(|flag| **flag).count();
        prop_assert_eq!(runs.len(), enabled + 1);
        prop_assert_eq!(runs.iter().filter(|run| run.is_baseline()).count(), 1);
        prop_assert!(runs[0].is_baseline());
        prop_assert_eq!(&runs[0].components[..], config.base_components());

        let ids: BTreeSet<_> = runs.iter().map(|run| run.run_id().to_string()).collect();
        prop_assert_eq!(ids.len(), runs.len());

        let expected_order: Vec<&str> = config
            .base_components()
            .iter()
            .filter(|component| component.enabled)
            .map(Component::name)
            .collect();
        let actual_order: Vec<&str> = runs[1..]
            .iter()
            .filter_map(|run| run.disabled_component())
            .collect();
        prop_assert_eq!(actual_order, expected_order);
    }

    #[test]
    fn ablation_disables_exactly_its_component(
        flags in prop::collection::vec(any::<bool>(), 1..12)
    ) {
        let config = build_config(&flags);
        let runs = AblationStudy::with_seed(11).generate_runs(&config).expect("runs");
        for run in runs.iter().skip(1) {
            let target = run.disabled_component().expect("ablation run");
            prop_assert_eq!(run.components.len(), config.base_components().len());
            for (snapshot, original) in run.components.iter().zip(config.base_components()) {
                prop_assert_eq!(snapshot.name(), original.name());
                prop_assert_eq!(&snapshot.config, &original.config);
                if snapshot.name() == target {
                    prop_assert!(!snapshot.enabled);
                } else {
                    prop_assert_eq!(snapshot.enabled, original.enabled);
                }
            }
        }
    }
}

#[test]
fn all_enabled_ablations_have_single_disabled_component() {
    let config = build_config(&[true, true, true]);
    let runs = AblationStudy::new().generate_runs(&config).expect("runs");
    assert_eq!(runs.len(), 4);
    for run in runs.iter().skip(1) {
        let disabled: Vec<_> = run.components.iter().filter(|c| !c.enabled).collect();
        assert_eq!(disabled.len(), 1);
        assert_eq!(Some(disabled[0].name()), run.disabled_component());
    }
}

#[test]
fn skips_components_that_start_disabled() {
    let config = build_config(&[true, false]);
    let runs = AblationStudy::new().generate_runs(&config).expect("runs");
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[1].disabled_component(), Some("component_0"));
}

#[test]
fn snapshots_are_independent() {
    let config = build_config(&[true, true]);
    let mut runs = AblationStudy::new().generate_runs(&config).expect("runs");

    runs[0].components[0].enabled = false;
    runs[0].components[1]
        .config
        .insert("top_k".into(), serde_json::json!(99));
    runs[0].components.clear();

    assert!(runs[1].components[1].enabled);
    assert!(!runs[1].components[1].config.contains_key("top_k"));
    assert_eq!(runs[2].components.len(), 2);
    assert!(config.base_components()[0].enabled);
    assert!(!config.base_components()[1].config.contains_key("top_k"));
}

#[test]
fn generated_runs_start_without_metrics() {
    let config = build_config(&[true, true]);
    let runs = AblationStudy::new().generate_runs(&config).expect("runs");
    assert!(runs.iter().all(|run| run.metrics.is_empty()));
}
