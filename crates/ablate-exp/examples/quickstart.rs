use ablate_core::{AblationResult, Component};
use ablate_exp::AblationStudy;

fn main() {
    let components = vec![
        Component::new("retriever")
            .expect("component")
            .with_setting("top_k", 5),
        Component::new("reranker").expect("component"),
        Component::new("query_rewriter").expect("component"),
    ];
    let study = AblationStudy::with_seed(4242);
    let config = study
        .configure(components, vec!["accuracy".into(), "latency_ms".into()])
        .expect("config");

    let mut runs = study.generate_runs(&config).expect("runs");
    println!("generated {} runs", runs.len());

    // Stand-in for an evaluation harness.
    for run in &mut runs {
        let (accuracy, latency) = match run.disabled_component() {
            None => (0.87, 320.0),
            Some("retriever") => (0.71, 210.0),
            Some("reranker") => (0.84, 290.0),
            Some(_) => (0.86, 300.0),
        };
        run.metrics.insert("accuracy".into(), accuracy);
        run.metrics.insert("latency_ms".into(), latency);
        println!("  {}", run.run_id());
    }

    let mut result = AblationResult::new(config, runs);
    for (rank, (name, score)) in study.rank_components(&mut result).iter().enumerate() {
        println!("{:>2}. {name:<16} {score:+.6}", rank + 1);
    }
}
