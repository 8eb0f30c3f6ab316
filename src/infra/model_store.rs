// ============================================================
// Layer 6 — Model Store
// ============================================================
// Persists the fitted regression and the run configuration.
//
// What gets written per training run:
//   1. <model name> (default regLinear.sav) — bincode-encoded
//      LinearRegression: weights, intercept, feature names
//   2. train_config.json — the TrainConfig that produced it
//
// File layout:
//   <dir>/
//     regLinear.sav
//     train_config.json
//
// Reference: bincode / serde_json crate documentation

use std::{fs, path::{Path, PathBuf}};

use crate::application::train_use_case::TrainConfig;
use crate::domain::error::{PipelineError, Result};
use crate::ml::linear::LinearRegression;

const CONFIG_FILE: &str = "train_config.json";

/// Saves and loads model artifacts inside one directory.
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    /// Point the store at `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| PipelineError::io(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of an artifact called `name`.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Serialise `model` to `<dir>/<name>`.
    pub fn save_model(&self, model: &LinearRegression, name: &str) -> Result<PathBuf> {
        if !model.is_fitted() {
            return Err(PipelineError::Training("refusing to save an unfitted model".into()));
        }
        let path  = self.path_of(name);
        let bytes = bincode::serialize(model)
            .map_err(|e| PipelineError::Training(format!("cannot serialise model: {e}")))?;

        fs::write(&path, bytes).map_err(|e| PipelineError::io(&path, e))?;
        tracing::info!("Saved model as '{}'", path.display());
        Ok(path)
    }

    /// Read a model written by save_model().
    pub fn load_model(&self, name: &str) -> Result<LinearRegression> {
        let path  = self.path_of(name);
        let bytes = fs::read(&path).map_err(|e| PipelineError::io(&path, e))?;
        bincode::deserialize(&bytes).map_err(|e| {
            PipelineError::Configuration(format!(
                "'{}' is not a saved model: {e}",
                path.display()
            ))
        })
    }

    /// Write the run configuration as pretty JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.path_of(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)
            .map_err(|e| PipelineError::Configuration(format!("cannot serialise config: {e}")))?;

        fs::write(&path, json).map_err(|e| PipelineError::io(&path, e))?;
        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.path_of(CONFIG_FILE);
        let json = fs::read_to_string(&path).map_err(|e| PipelineError::io(&path, e))?;
        serde_json::from_str(&json).map_err(|e| {
            PipelineError::Configuration(format!("'{}' is not a training config: {e}", path.display()))
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::Regressor;
    use ndarray::array;

    #[test]
    fn test_model_round_trip() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path()).unwrap();

        let mut model = LinearRegression::new().with_feature_names(vec!["area".into()]);
        model.fit(&array![[1.0], [2.0], [3.0]], &array![5.0, 7.0, 9.0]).unwrap();

        let path = store.save_model(&model, "regLinear.sav").unwrap();
        assert!(path.exists());
        assert_eq!(store.load_model("regLinear.sav").unwrap(), model);
    }

    #[test]
    fn test_unfitted_model_is_not_saved() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path()).unwrap();
        assert!(store.save_model(&LinearRegression::new(), "m.sav").is_err());
        assert!(!store.path_of("m.sav").exists());
    }

    #[test]
    fn test_config_round_trip() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path()).unwrap();

        let cfg = TrainConfig { folds: 3, ..TrainConfig::default() };
        store.save_config(&cfg).unwrap();
        assert_eq!(store.load_config().unwrap(), cfg);
    }

    #[test]
    fn test_garbage_model_file_is_rejected() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path()).unwrap();
        fs::write(store.path_of("bad.sav"), b"\x01").unwrap();
        assert!(store.load_model("bad.sav").is_err());
    }
}
