//! Persistence of model documents.

use crate::error::{AnalysisError, Result};
use crate::model::{TechnologyAgnosticDeploymentModel, TechnologySpecificDeploymentModel};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Source and sink of the model documents of a transformation process.
pub trait ModelStore: Send + Sync {
    /// The technology-specific model of a process. Missing models are an error.
    fn technology_specific_model(&self, process_id: Uuid)
    -> Result<TechnologySpecificDeploymentModel>;

    /// The technology-agnostic model of a process, or a new empty one.
    fn technology_agnostic_model(&self, process_id: Uuid)
    -> Result<TechnologyAgnosticDeploymentModel>;

    fn update_technology_specific_model(&self, model: &TechnologySpecificDeploymentModel)
    -> Result<()>;

    fn update_technology_agnostic_model(&self, model: &TechnologyAgnosticDeploymentModel)
    -> Result<()>;
}

/// Stores models as pretty-printed JSON files in one directory:
/// `<process-id>.tsdm.json` and `<process-id>.tadm.json`.
#[derive(Debug, Clone)]
pub struct FileModelStore {
    root: PathBuf,
}

impl FileModelStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn technology_specific_path(&self, process_id: Uuid) -> PathBuf {
        self.root.join(format!("{}.tsdm.json", process_id))
    }

    pub fn technology_agnostic_path(&self, process_id: Uuid) -> PathBuf {
        self.root.join(format!("{}.tadm.json", process_id))
    }

    fn read(path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|source| AnalysisError::FileRead {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write through a temporary file so readers never see a partial document.
    fn write<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        fs::create_dir_all(path.parent().unwrap_or(Path::new(".")))?;
        let json = serde_json::to_string_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}

impl ModelStore for FileModelStore {
    fn technology_specific_model(
        &self,
        process_id: Uuid,
    ) -> Result<TechnologySpecificDeploymentModel> {
        let path = self.technology_specific_path(process_id);
        if !path.exists() {
            return Err(AnalysisError::ModelNotFound(format!(
                "No technology-specific deployment model found for process {}",
                process_id
            )));
        }
        Ok(serde_json::from_str(&Self::read(&path)?)?)
    }

    fn technology_agnostic_model(
        &self,
        process_id: Uuid,
    ) -> Result<TechnologyAgnosticDeploymentModel> {
        let path = self.technology_agnostic_path(process_id);
        if !path.exists() {
            log::debug!("No technology-agnostic model for {}, starting empty", process_id);
            return Ok(TechnologyAgnosticDeploymentModel::new(process_id));
        }
        Ok(serde_json::from_str(&Self::read(&path)?)?)
    }

    fn update_technology_specific_model(
        &self,
        model: &TechnologySpecificDeploymentModel,
    ) -> Result<()> {
        Self::write(
            &self.technology_specific_path(model.transformation_process_id),
            model,
        )
    }

    fn update_technology_agnostic_model(
        &self,
        model: &TechnologyAgnosticDeploymentModel,
    ) -> Result<()> {
        Self::write(
            &self.technology_agnostic_path(model.transformation_process_id),
            model,
        )
    }
}
