use ablate_core::{AblationConfig, AblationResult, Component};
use ablate_exp::AblationStudy;
use criterion::{criterion_group, criterion_main, Criterion};

fn config() -> AblationConfig {
    let components = (0..32)
        .map(|idx| {
            Component::new(format!("stage_{idx:02}"))
                .expect("component")
                .with_setting("depth", idx)
        })
        .collect();
    AblationConfig::new(
        components,
        vec!["accuracy".into(), "recall".into(), "latency_ms".into()],
    )
    .expect("config")
}

fn bench_generate(c: &mut Criterion) {
    let config = config();
    let study = AblationStudy::with_seed(4242);
    c.bench_function("generate_runs", |b| {
        b.iter(|| {
            let _ = study.generate_runs(&config).expect("runs");
        });
    });
}

fn bench_rank(c: &mut Criterion) {
    let config = config();
    let study = AblationStudy::with_seed(4242);
    let mut runs = study.generate_runs(&config).expect("runs");
    for (idx, run) in runs.iter_mut().enumerate() {
        let offset = idx as f64 * 0.01;
        run.metrics.insert("accuracy".into(), 0.9 - offset);
        run.metrics.insert("recall".into(), 0.8 - offset);
        run.metrics.insert("latency_ms".into(), 120.0 + offset);
    }
    let template = AblationResult::new(config, runs);
    c.bench_function("rank_components", |b| {
        b.iter(|| {
            let mut result = template.clone();
            let _ = study.rank_components(&mut result);
        });
    });
}

criterion_group!(benches, bench_generate, bench_rank);
criterion_main!(benches);
