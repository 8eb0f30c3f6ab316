// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the training pipeline in order:
//
//   Step 1: Load the listings CSV       (Layer 4 - data)
//   Step 2: Remove outliers             (Layer 4 - data)
//   Step 3: One-hot encode categoricals (Layer 4 - data)
//   Step 4: Split train/test            (Layer 4 - data)
//   Step 5: Save config                 (Layer 6 - infra)
//   Step 6: Cross-validate, fit, save   (Layer 5 - ml)
//   Step 7: Validation report           (Layer 5 - ml)
//
// Steps 1–6 are fatal on error. A failed report is logged and
// the run still succeeds, the model being already on disk.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::{encoder::encode, loader::CsvLoader, outliers::remove_outliers, splitter::split};
use crate::domain::traits::TableSource;
use crate::infra::model_store::ModelStore;
use crate::infra::report_writer::ReportRecord;
use crate::ml::report::ReportGenerator;
use crate::ml::trainer::train;

// ─── Training Configuration ──────────────────────────────────────────────────
// Every path and knob of a training run. Saved as JSON beside
// the model so the run can be reproduced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:    PathBuf,
    pub encoding:     String,
    pub categorical:  Vec<String>,
    pub target:       String,
    pub outlier_k:    f64,
    pub test_fraction: f64,
    pub seed:         u64,
    pub folds:        usize,
    pub model_dir:    PathBuf,
    pub model_name:   String,
    pub results_path: PathBuf,
    pub plot_path:    PathBuf,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:     PathBuf::from("data/precos-imoveis-vitoria-2020.csv"),
            encoding:      "windows-1252".to_string(),
            categorical:   vec!["bairro".to_string(), "tipo de construção".to_string()],
            target:        "valor".to_string(),
            outlier_k:     crate::data::outliers::DEFAULT_K,
            test_fraction: crate::data::splitter::DEFAULT_TEST_FRACTION,
            seed:          crate::data::splitter::DEFAULT_SEED,
            folds:         crate::ml::trainer::DEFAULT_FOLDS,
            model_dir:     PathBuf::from("."),
            model_name:    crate::ml::trainer::DEFAULT_MODEL_NAME.to_string(),
            results_path:  PathBuf::from("results.csv"),
            plot_path:     PathBuf::from("pred_vs_real.png"),
        }
    }
}

/// What a training run produced.
#[derive(Debug)]
pub struct TrainSummary {
    pub model_path:      PathBuf,
    pub removed_outliers: usize,
    pub report:          Option<ReportRecord>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<TrainSummary> {
        let cfg = &self.config;

        // ── Step 1: Load ──────────────────────────────────────────────────────
        let mut frame = CsvLoader::new(&cfg.data_path, &cfg.encoding)
            .with_text_columns(&cfg.categorical)
            .load()
            .with_context(|| format!("cannot load dataset '{}'", cfg.data_path.display()))?;

        // ── Step 2: Outliers ──────────────────────────────────────────────────
        let outliers = remove_outliers(&mut frame, cfg.outlier_k).context("outlier removal failed")?;

        // ── Step 3: Encode ────────────────────────────────────────────────────
        let frame = encode(frame, &cfg.categorical, &cfg.target).context("categorical encoding failed")?;

        // ── Step 4: Split ─────────────────────────────────────────────────────
        let data = split(&frame, cfg.test_fraction, cfg.seed).context("train/test split failed")?;

        // ── Step 5: Save config ───────────────────────────────────────────────
        let store = ModelStore::new(&cfg.model_dir)
            .with_context(|| format!("cannot use model directory '{}'", cfg.model_dir.display()))?;
        store.save_config(cfg).context("cannot save training config")?;

        // ── Step 6: Train ─────────────────────────────────────────────────────
        let trained = train(
            &data.x_train,
            &data.y_train,
            &data.feature_names,
            cfg.folds,
            &store,
            &cfg.model_name,
        )
        .context("training failed")?;

        // ── Step 7: Report ────────────────────────────────────────────────────
        let generator = ReportGenerator::new(&cfg.results_path, &cfg.plot_path);
        let report = match generator.generate(&trained.model, &data.x_test, &data.y_test, &trained.cv_scores) {
            Ok(record) => Some(record),
            Err(e) if !e.is_fatal() => {
                tracing::error!("Could not build the performance report: {}", e);
                None
            }
            Err(e) => return Err(e).context("report generation failed"),
        };

        Ok(TrainSummary {
            model_path:       store.path_of(&cfg.model_name),
            removed_outliers: outliers.removed_rows,
            report,
        })
    }
}
