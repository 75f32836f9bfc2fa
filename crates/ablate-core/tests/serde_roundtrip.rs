use ablate_core::{AblationConfig, AblationResult, AblationRun, Component, MAX_COMPONENT_NAME_LEN};
use proptest::prelude::*;
use serde_json::json;

fn sample_config() -> AblationConfig {
    let components = vec![
        Component::new("retriever")
            .expect("component")
            .with_setting("top_k", 5),
        Component::new("reranker").expect("component").with_enabled(false),
    ];
    AblationConfig::new(components, vec!["accuracy".into(), "latency_ms".into()])
        .expect("config")
        .with_repetitions(3)
        .expect("repetitions")
}

#[test]
fn config_serializes_to_external_shape() {
    let value = serde_json::to_value(sample_config()).expect("serialize");
    assert_eq!(
        value,
        json!({
            "base_components": [
                { "name": "retriever", "enabled": true, "config": { "top_k": 5 } },
                { "name": "reranker", "enabled": false, "config": {} }
            ],
            "metrics_to_track": ["accuracy", "latency_ms"],
            "repetitions": 3
        })
    );
}

#[test]
fn result_round_trip_json() {
    let config = sample_config();
    let baseline = AblationRun::new("baseline-1", None, config.base_components().to_vec())
        .expect("run")
        .with_metrics([("accuracy", 0.9)]);
    let mut result = AblationResult::new(config, vec![baseline]);
    result.component_importance.insert("retriever".into(), 0.1);

    let text = serde_json::to_string_pretty(&result).expect("serialize");
    let decoded: AblationResult = serde_json::from_str(&text).expect("deserialize");
    assert_eq!(decoded, result);

    let value: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert!(value["runs"][0]["disabled_component"].is_null());
}

#[test]
fn result_requires_config() {
    let err = serde_json::from_value::<AblationResult>(json!({ "runs": [] })).unwrap_err();
    assert!(err.to_string().contains("config"));
}

proptest! {
    #[test]
    fn component_names_validate_by_trimmed_length(name in "[ a-z_]{0,140}") {
        let trimmed = name.trim();
        let outcome = Component::new(&name);
        if trimmed.is_empty() || trimmed.chars().count() > MAX_COMPONENT_NAME_LEN {
            prop_assert!(outcome.is_err());
        } else {
            let component = outcome.unwrap();
            prop_assert_eq!(component.name(), trimmed);
        }
    }
}
