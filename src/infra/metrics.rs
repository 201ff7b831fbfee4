// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Writes the training history and test predictions to disk so
// learning curves, prediction-vs-actual scatter plots and
// residual histograms can be drawn by any plotting tool.
//
// Output files (in the checkpoint directory):
//   metrics.csv           — one row per epoch
//   history.json          — the four parallel sequences
//   test_predictions.csv  — target, prediction, residual
//
// Example metrics.csv:
//   epoch,train_loss,val_loss,train_mae,val_mae
//   1,0.912400,0.640100,0.781200,0.655300
//   2,0.501300,0.412800,0.563900,0.521700
//
// Every run starts the files from scratch.

use anyhow::{ensure, Context, Result};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::PathBuf,
};

use crate::domain::history::{EpochMetrics, TrainingHistory};

const METRICS_CSV:     &str = "metrics.csv";
const HISTORY_JSON:    &str = "history.json";
const PREDICTIONS_CSV: &str = "test_predictions.csv";

/// Logs epoch metrics and predictions to files for later analysis.
pub struct MetricsLogger {
    dir: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn csv_path(&self) -> PathBuf {
        self.dir.join(METRICS_CSV)
    }

    /// Write the full history as metrics.csv and history.json.
    pub fn write_history(&self, history: &TrainingHistory) -> Result<()> {
        let path = self.csv_path();
        let mut f = BufWriter::new(
            File::create(&path).with_context(|| format!("Cannot create '{}'", path.display()))?,
        );
        writeln!(f, "epoch,train_loss,val_loss,train_mae,val_mae")?;
        for m in history.epochs() {
            write_row(&mut f, &m)?;
        }
        f.flush()?;

        let json_path = self.dir.join(HISTORY_JSON);
        fs::write(&json_path, serde_json::to_string_pretty(history)?)
            .with_context(|| format!("Cannot write '{}'", json_path.display()))?;

        tracing::debug!("Logged {} epochs to '{}'", history.len(), path.display());
        Ok(())
    }

    /// Write paired targets and predictions, plus the residual.
    pub fn write_predictions(&self, targets: &[f64], predictions: &[f64]) -> Result<PathBuf> {
        ensure!(
            targets.len() == predictions.len(),
            "got {} targets but {} predictions",
            targets.len(),
            predictions.len()
        );
        let path = self.dir.join(PREDICTIONS_CSV);
        let mut f = BufWriter::new(
            File::create(&path).with_context(|| format!("Cannot create '{}'", path.display()))?,
        );
        writeln!(f, "target,prediction,residual")?;
        for (t, p) in targets.iter().zip(predictions) {
            writeln!(f, "{:.2},{:.2},{:.2}", t, p, t - p)?;
        }
        f.flush()?;
        Ok(path)
    }
}

/// One CSV row with 6 decimal places for each metric
fn write_row(f: &mut impl Write, m: &EpochMetrics) -> Result<()> {
    writeln!(
        f,
        "{},{:.6},{:.6},{:.6},{:.6}",
        m.epoch, m.train_loss, m.val_loss, m.train_mae, m.val_mae,
    )?;
    Ok(())
}
