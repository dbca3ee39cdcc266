use megadex::pipeline::{self, PREDICTIONS_CSV};
use megadex::synthetic::{SyntheticSpec, write_synthetic};
use megadex::{Error, PipelineConfig};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

fn dataset(dir: &Path, spec: &SyntheticSpec) -> PipelineConfig {
    let input = dir.join("creatures.csv");
    write_synthetic(File::create(&input).unwrap(), spec).unwrap();
    PipelineConfig {
        input,
        output_dir: dir.join("out"),
        ..PipelineConfig::default()
    }
}

fn read_predictions(config: &PipelineConfig) -> Vec<(String, String)> {
    let mut reader = csv::Reader::from_path(config.output_path(PREDICTIONS_CSV)).unwrap();
    assert_eq!(
        reader.headers().unwrap(),
        &csv::StringRecord::from(vec!["Pokemon", "Mega_Evolution"])
    );
    reader
        .records()
        .map(|r| {
            let r = r.unwrap();
            (r[0].to_string(), r[1].to_string())
        })
        .collect()
}

#[test]
fn scores_every_creature_and_writes_all_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let config = dataset(dir.path(), &SyntheticSpec::default());
    let outcome = pipeline::run(&config).unwrap();

    assert_eq!(outcome.shape, (800, 13));
    assert_eq!(outcome.class_counts, (760, 40));
    assert_eq!(outcome.imputed.iter().map(|f| f.filled).sum::<usize>(), 4);

    let rows = read_predictions(&config);
    assert_eq!(rows.len(), 800);
    assert!(rows.iter().all(|(_, v)| v == "Yes" || v == "No"));
    let yes = rows.iter().filter(|(_, v)| v == "Yes").count();
    assert!((15..=80).contains(&yes), "{yes} creatures predicted Mega");

    for chart in [
        pipeline::CONFUSION_MATRIX_PNG,
        pipeline::ROC_CURVE_PNG,
        pipeline::PRECISION_RECALL_PNG,
        pipeline::FEATURE_IMPORTANCE_PNG,
    ] {
        let img = image::open(config.output_path(chart)).unwrap();
        assert!(img.width() > 0 && img.height() > 0);
    }
}

#[test]
fn split_is_stratified_and_labels_follow_names() {
    let dir = tempfile::tempdir().unwrap();
    let config = dataset(dir.path(), &SyntheticSpec::default());
    let outcome = pipeline::run(&config).unwrap();

    let train: HashSet<_> = outcome.split.train.iter().copied().collect();
    let test: HashSet<_> = outcome.split.test.iter().copied().collect();
    assert!(train.is_disjoint(&test));
    assert_eq!(train.len() + test.len(), 800);
    assert_eq!(test.len(), 200);

    let records = &outcome.evaluation.records;
    assert_eq!(records.len(), 200);
    for r in records {
        assert_eq!(r.actual, r.name.to_lowercase().contains("mega"));
        assert!((0.0..=1.0).contains(&r.probability));
    }
    let test_positive = records.iter().filter(|r| r.actual).count() as f64 / 200.0;
    assert!((test_positive - 0.05).abs() < 0.01);
    assert_eq!(outcome.evaluation.report.weighted_avg.support, 200);
}

#[test]
fn repeated_runs_are_identical() {
    let spec = SyntheticSpec {
        rows: 300,
        ..SyntheticSpec::default()
    };
    let first_dir = tempfile::tempdir().unwrap();
    let second_dir = tempfile::tempdir().unwrap();
    let first = dataset(first_dir.path(), &spec);
    let second = dataset(second_dir.path(), &spec);

    let a = pipeline::run(&first).unwrap();
    let b = pipeline::run(&second).unwrap();

    assert_eq!(a.overlap.predicted, b.overlap.predicted);
    assert_eq!(a.exported, b.exported);
    assert_eq!(
        std::fs::read(first.output_path(PREDICTIONS_CSV)).unwrap(),
        std::fs::read(second.output_path(PREDICTIONS_CSV)).unwrap()
    );
}

#[test]
fn zero_positives_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = dataset(
        dir.path(),
        &SyntheticSpec {
            rows: 100,
            mega_fraction: 0.0,
            ..SyntheticSpec::default()
        },
    );
    let err = pipeline::run(&config).unwrap_err();
    assert!(matches!(err, Error::Split(_)), "unexpected error: {err}");
    assert!(!config.output_path(PREDICTIONS_CSV).exists());
}

#[test]
fn missing_feature_column_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = dataset(dir.path(), &SyntheticSpec::default());
    config.features.push("Weight".to_string());
    let err = pipeline::run(&config).unwrap_err();
    assert!(matches!(err, Error::MissingColumn(ref c) if c == "Weight"));
}

#[test]
fn absent_input_is_fatal() {
    let config = PipelineConfig {
        input: "no/such/creatures.csv".into(),
        ..PipelineConfig::default()
    };
    assert!(pipeline::run(&config).is_err());
}
