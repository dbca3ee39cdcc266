use criterion::{Criterion, criterion_group, criterion_main};
use megadex::synthetic::{SyntheticSpec, write_synthetic};
use megadex::{CreatureTable, PipelineConfig, RandomForest, StandardScaler, impute, label};
use ndarray::{Array1, Array2};

fn training_data() -> (Array2<f64>, Array1<bool>) {
    let mut buf = Vec::new();
    write_synthetic(&mut buf, &SyntheticSpec::default()).unwrap();
    let table = CreatureTable::from_reader(csv::Reader::from_reader(buf.as_slice())).unwrap();
    let config = PipelineConfig::default();
    let creatures = table.creatures(&config.name_column, &config.features).unwrap();
    let (features, _) = impute::fill_missing_with_median(&creatures.features, &creatures.feature_names).unwrap();
    let labels = label::mega_labels(&creatures.names, &config.label_pattern);
    let (_, scaled) = StandardScaler::fit_transform(&features).unwrap();
    (scaled, labels)
}

fn bench_fit_forest(c: &mut Criterion) {
    let (x, y) = training_data();

    c.bench_function("fit 100 trees on 800 creatures", |b| {
        b.iter(|| {
            let _ = RandomForest::params().fit(&x, &y).unwrap();
        })
    });
}

fn bench_score_dataset(c: &mut Criterion) {
    let (x, y) = training_data();
    let forest = RandomForest::params().fit(&x, &y).unwrap();

    c.bench_function("score 800 creatures", |b| {
        b.iter(|| {
            let _ = forest.predict_proba(&x).unwrap();
        });
    });
}

criterion_group!(benches, bench_fit_forest, bench_score_dataset);
criterion_main!(benches);
