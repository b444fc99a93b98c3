//! Technology-specific deployment model (TSDM).
//!
//! The TSDM records which files of a deployment were analyzed and, for every
//! analyzed file, the per-line recognition trace produced by the manifest
//! parser. Models nest: a model can embed the models of referenced files.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recognition of one physical source line.
///
/// `weight` is 1 when the parser understood the line's meaning and 0 when the
/// line was present but not interpreted. `recognized` marks the line as part
/// of an analyzed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub number: u32,
    pub recognized: bool,
    pub weight: u8,
}

impl Line {
    /// A line whose meaning was understood.
    pub fn weighted(number: u32) -> Self {
        Self {
            number,
            recognized: true,
            weight: 1,
        }
    }

    /// A line that was visited but not interpreted.
    pub fn unweighted(number: u32) -> Self {
        Self {
            number,
            recognized: true,
            weight: 0,
        }
    }
}

/// The analyzed content of one file location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentModelContent {
    pub location: String,
    #[serde(default)]
    pub lines: Vec<Line>,
}

/// Technology-specific deployment model of one transformation process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnologySpecificDeploymentModel {
    pub id: Uuid,
    pub transformation_process_id: Uuid,
    pub technology: String,
    #[serde(default)]
    pub commands: Vec<String>,
    #[serde(default)]
    pub content: Vec<DeploymentModelContent>,
    #[serde(default)]
    pub embedded_deployment_models: Vec<TechnologySpecificDeploymentModel>,
}

impl TechnologySpecificDeploymentModel {
    pub fn new(transformation_process_id: Uuid, technology: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            transformation_process_id,
            technology: technology.into(),
            commands: Vec::new(),
            content: Vec::new(),
            embedded_deployment_models: Vec::new(),
        }
    }

    fn holds_any(&self, locations: &[String]) -> bool {
        self.content
            .iter()
            .any(|c| locations.iter().any(|l| l == &c.location))
    }

    /// Find the (possibly embedded) model whose content includes one of `locations`.
    pub fn find_by_location(&self, locations: &[String]) -> Option<&Self> {
        if self.holds_any(locations) {
            return Some(self);
        }
        self.embedded_deployment_models
            .iter()
            .find_map(|m| m.find_by_location(locations))
    }

    /// Mutable variant of [`find_by_location`](Self::find_by_location).
    pub fn find_by_location_mut(&mut self, locations: &[String]) -> Option<&mut Self> {
        if self.holds_any(locations) {
            return Some(self);
        }
        self.embedded_deployment_models
            .iter_mut()
            .find_map(|m| m.find_by_location_mut(locations))
    }

    /// Add analyzed content, replacing any previous content of the same location.
    pub fn add_content(&mut self, content: DeploymentModelContent) {
        match self.content.iter_mut().find(|c| c.location == content.location) {
            Some(existing) => *existing = content,
            None => self.content.push(content),
        }
    }

    /// Remove the content entry of `location`, if present.
    pub fn remove_content(&mut self, location: &str) {
        self.content.retain(|c| c.location != location);
    }
}
