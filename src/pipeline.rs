//! The end-to-end run: load, label, impute, split, scale, fit, evaluate,
//! chart, export. Each stage hands a fresh value to the next.

use ndarray::{Array1, Array2, Axis};

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::export::{self, ExportRow, NameOverlap};
use crate::forest::{RandomForest, RandomForestParams};
use crate::impute::{self, FilledColumn};
use crate::label;
use crate::metrics::{self, ClassificationReport, ConfusionMatrix, Curve};
use crate::plot;
use crate::scaler::StandardScaler;
use crate::split::{self, Split};
use crate::table::CreatureTable;

pub const CONFUSION_MATRIX_PNG: &str = "confusion_matrix.png";
pub const ROC_CURVE_PNG: &str = "roc_curve.png";
pub const PRECISION_RECALL_PNG: &str = "precision_recall_curve.png";
pub const FEATURE_IMPORTANCE_PNG: &str = "feature_importance.png";
pub const PREDICTIONS_CSV: &str = "mega_evolution_predictions.csv";

/// Scaler and forest fitted on the training partition.
pub struct TrainedModel {
    pub scaler: StandardScaler,
    pub forest: RandomForest,
}

impl TrainedModel {
    pub fn fit(x_train: &Array2<f64>, y_train: &Array1<bool>, config: &PipelineConfig) -> Result<Self> {
        let (scaler, scaled) = StandardScaler::fit_transform(x_train)?;
        let forest = RandomForestParams::default()
            .n_trees(config.n_trees)
            .seed(config.seed)
            .fit(&scaled, y_train)?;
        Ok(TrainedModel { scaler, forest })
    }

    /// Hard labels and positive-class probabilities for raw (unscaled) rows.
    pub fn predict(&self, x: &Array2<f64>) -> Result<(Array1<bool>, Array1<f64>)> {
        let scaled = self.scaler.transform(x)?;
        let proba = self.forest.predict_proba(&scaled)?;
        let labels = proba.mapv(|p| p > 0.5);
        Ok((labels, proba))
    }
}

/// One held-out row after scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub name: String,
    pub actual: bool,
    pub predicted: bool,
    pub probability: f64,
}

/// Test-partition diagnostics.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub records: Vec<PredictionRecord>,
    pub report: ClassificationReport,
    pub confusion: ConfusionMatrix,
    pub roc: Curve,
    pub precision_recall: Curve,
    pub ranked_importances: Vec<(String, f64)>,
}

/// Everything a run produced besides the files it wrote.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub shape: (usize, usize),
    pub class_counts: (usize, usize),
    pub imputed: Vec<FilledColumn>,
    pub split: Split,
    pub evaluation: Evaluation,
    pub exported: Vec<ExportRow>,
    pub overlap: NameOverlap,
}

pub fn run(config: &PipelineConfig) -> Result<PipelineOutcome> {
    log::info!("Loading {}", config.input.display());
    let table = CreatureTable::from_path(&config.input)?;
    run_on_table(config, &table)
}

pub fn run_on_table(config: &PipelineConfig, table: &CreatureTable) -> Result<PipelineOutcome> {
    let shape = table.shape();
    println!("Dataset shape: ({}, {})", shape.0, shape.1);
    println!("\nFirst few rows:");
    println!("{}", table.head(5));
    println!("\nColumn names: {:?}", table.columns);

    let creatures = table.creatures(&config.name_column, &config.features)?;
    let labels = label::mega_labels(&creatures.names, &config.label_pattern);
    let class_counts = label::class_counts(&labels);
    println!("\nClass distribution:");
    println!("0    {}", class_counts.0);
    println!("1    {}", class_counts.1);
    println!(
        "Percentage of Mega Evolutions: {:.2}%",
        percentage(class_counts.1, labels.len())
    );

    let (features, imputed) = impute::fill_missing_with_median(&creatures.features, &creatures.feature_names)?;
    for fill in &imputed {
        log::info!(
            "Imputed {} value(s) in '{}' with median {}",
            fill.filled,
            creatures.feature_names[fill.column],
            fill.median
        );
    }

    let split = split::stratified_split(&labels, config.test_fraction, config.seed)?;
    log::info!("Split: {} train / {} test rows", split.train.len(), split.test.len());
    let x_train = features.select(Axis(0), &split.train);
    let y_train = labels.select(Axis(0), &split.train);
    let x_test = features.select(Axis(0), &split.test);
    let y_test = labels.select(Axis(0), &split.test);

    log::info!("Fitting {} trees (seed {})", config.n_trees, config.seed);
    let model = TrainedModel::fit(&x_train, &y_train, config)?;

    let evaluation = evaluate(&model, &x_test, &y_test, &split.test, &creatures.names, &creatures.feature_names)?;
    println!("\nClassification Report:");
    println!("{}", evaluation.report);
    println!("Feature importance:");
    for (name, importance) in &evaluation.ranked_importances {
        println!("{name:>10}  {importance:.4}");
    }
    println!(
        "ROC AUC: {:.2}  PR AUC: {:.2}",
        evaluation.roc.auc(),
        evaluation.precision_recall.auc()
    );

    write_charts(config, &evaluation)?;

    let (all_predicted, _) = model.predict(&features)?;
    let all_predicted = all_predicted.to_vec();
    let exported = export::export_rows(&creatures.names, &all_predicted);
    let csv_path = config.output_path(PREDICTIONS_CSV);
    export::write_predictions(&csv_path, &exported)?;
    println!("\n💾 Final output saved to '{}'", csv_path.display());

    println!("\nSample predictions:");
    println!("{:>5}  {:<30} {}", "", "Pokemon", "Mega_Evolution");
    for (i, row) in exported.iter().take(10).enumerate() {
        println!("{i:>5}  {:<30} {}", row.name, row.mega_evolution);
    }

    let overlap = NameOverlap::new(&creatures.names, &labels.to_vec(), &all_predicted);
    println!(
        "\nActual Mega Evolutions in dataset ({}):",
        overlap.actual.len()
    );
    println!("{:?}", overlap.actual);
    println!("\nPredicted Mega Evolutions ({}):", overlap.predicted.len());
    println!("{:?}", &overlap.predicted[..overlap.predicted.len().min(20)]);
    if let Some(recall) = overlap.recall() {
        println!("\nModel recall for Mega Evolutions: {recall:.2}");
    }
    if let Some(precision) = overlap.precision() {
        println!("Model precision for Mega Evolutions: {precision:.2}");
    }

    Ok(PipelineOutcome {
        shape,
        class_counts,
        imputed,
        split,
        evaluation,
        exported,
        overlap,
    })
}

/// Scores the held-out rows and gathers the report, curves and importances.
pub fn evaluate(
    model: &TrainedModel,
    x_test: &Array2<f64>,
    y_test: &Array1<bool>,
    test_rows: &[usize],
    names: &[String],
    feature_names: &[String],
) -> Result<Evaluation> {
    if test_rows.len() != y_test.len() {
        return Err(Error::Model(format!(
            "{} test rows but {} test labels",
            test_rows.len(),
            y_test.len()
        )));
    }
    let (predicted, proba) = model.predict(x_test)?;
    let actual = y_test.to_vec();
    let predicted = predicted.to_vec();
    let scores = proba.to_vec();

    let records = test_rows
        .iter()
        .zip(&actual)
        .zip(&predicted)
        .zip(&scores)
        .map(|(((&row, &actual), &predicted), &probability)| PredictionRecord {
            name: names[row].clone(),
            actual,
            predicted,
            probability,
        })
        .collect();

    Ok(Evaluation {
        records,
        report: ClassificationReport::new(&actual, &predicted),
        confusion: ConfusionMatrix::from_predictions(&actual, &predicted),
        roc: metrics::roc_curve(&actual, &scores),
        precision_recall: metrics::precision_recall_curve(&actual, &scores),
        ranked_importances: model.forest.ranked_importances(feature_names),
    })
}

fn write_charts(config: &PipelineConfig, evaluation: &Evaluation) -> Result<()> {
    std::fs::create_dir_all(&config.output_dir).map_err(|source| Error::Io {
        path: config.output_dir.clone(),
        source,
    })?;
    plot::confusion_matrix(&evaluation.confusion, &config.output_path(CONFUSION_MATRIX_PNG))?;
    plot::roc_curve(&evaluation.roc, &config.output_path(ROC_CURVE_PNG))?;
    plot::precision_recall_curve(&evaluation.precision_recall, &config.output_path(PRECISION_RECALL_PNG))?;
    plot::feature_importance(&evaluation.ranked_importances, &config.output_path(FEATURE_IMPORTANCE_PNG))?;
    log::info!("Charts written to {}", config.output_dir.display());
    Ok(())
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 { 0.0 } else { part as f64 * 100.0 / whole as f64 }
}
