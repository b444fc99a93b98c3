//! Indentation-sensitive Kubernetes manifest parser.
//!
//! Parsing one file yields two things at once:
//!
//! - the structured [`KubernetesDeployment`] / [`KubernetesService`] objects
//!   found in the file, and
//! - a recognition trace with one [`Line`](crate::model::Line) per physical
//!   line of every document, weighted 1 when the parser understood the line.
//!
//! A document starts at a line beginning with `kind:` and runs until a line
//! exactly equal to `---` or the end of the file. Lines outside documents are
//! not traced. Every line inside a document is traced exactly once.
//!
//! This is not a YAML parser: anchors, flow style and multi-document tricks
//! are out of scope. Only the field paths needed for the architecture model
//! are interpreted.
//!
//! # Example
//!
//! ```rust
//! use kube_tadm::analyzer::manifest::parse_manifest;
//!
//! let manifest = "kind: Service\nmetadata:\n  name: order\n";
//! let parsed = parse_manifest(manifest).unwrap();
//! assert_eq!(parsed.services[0].name, "order");
//! assert_eq!(parsed.trace.lines().len(), 3);
//! ```

mod block;
mod cursor;
mod metadata;
pub mod objects;
mod service;
pub mod trace;
mod workload;

pub use cursor::{LineCursor, SourceLine};
pub use objects::{
    Container, ContainerPort, EnvVar, KubernetesDeployment, KubernetesService, Label, Selector,
    ServicePort,
};
pub use trace::{Coverage, LineTrace};

use crate::error::{AnalysisError, Result};
use crate::model::push_unique;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Kind of a manifest document, selecting its walker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ManifestKind {
    Service,
    Workload(WorkloadKind),
    Unknown(String),
}

/// Workload kinds sharing one walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkloadKind {
    Deployment,
    StatefulSet,
}

impl ManifestKind {
    /// Classify a `kind:` value (case-sensitive).
    pub fn from_kind(kind: &str) -> Self {
        match kind {
            "Service" => Self::Service,
            "Deployment" => Self::Workload(WorkloadKind::Deployment),
            "StatefulSet" => Self::Workload(WorkloadKind::StatefulSet),
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service => write!(f, "Service"),
            Self::Workload(WorkloadKind::Deployment) => write!(f, "Deployment"),
            Self::Workload(WorkloadKind::StatefulSet) => write!(f, "StatefulSet"),
            Self::Unknown(kind) => write!(f, "{} (unknown)", kind),
        }
    }
}

/// Location of one document within a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestDocument {
    pub kind: ManifestKind,
    /// Number of the `kind:` line
    pub first_line: u32,
    pub line_count: u32,
}

impl ManifestDocument {
    /// Line numbers covered by this document.
    pub fn line_numbers(&self) -> std::ops::Range<u32> {
        self.first_line..self.first_line + self.line_count
    }
}

/// Everything recognized in one manifest file.
#[derive(Debug, Clone, Default)]
pub struct ParsedManifest {
    pub documents: Vec<ManifestDocument>,
    pub deployments: Vec<KubernetesDeployment>,
    pub services: Vec<KubernetesService>,
    pub trace: LineTrace,
}

/// Parse manifest text.
///
/// Fails only on malformed numeric fields; unknown kinds are traced with
/// weight 0 and produce no object.
pub fn parse_manifest(content: &str) -> Result<ParsedManifest> {
    let lines: Vec<&str> = content.lines().collect();
    let mut parsed = ParsedManifest::default();
    let mut index = 0;

    while index < lines.len() {
        if !lines[index].starts_with("kind:") {
            index += 1;
            continue;
        }
        let end = lines[index..]
            .iter()
            .position(|line| *line == "---")
            .map_or(lines.len(), |offset| index + offset);

        parse_document(&lines[index..end], index as u32 + 1, &mut parsed)?;
        index = end;
    }
    Ok(parsed)
}

/// Read and parse a manifest file.
pub fn parse_manifest_file(path: &Path) -> Result<ParsedManifest> {
    let content = std::fs::read_to_string(path).map_err(|source| AnalysisError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&content)
}

fn parse_document(lines: &[&str], first_line: u32, parsed: &mut ParsedManifest) -> Result<()> {
    let mut cursor = LineCursor::new(lines, first_line);
    let kind = cursor
        .peek()
        .map(|line| ManifestKind::from_kind(line.value()))
        .unwrap_or_else(|| ManifestKind::Unknown(String::new()));
    log::debug!(
        "Document at line {} ({} lines): {}",
        first_line,
        lines.len(),
        kind
    );

    let mut trace = LineTrace::new();
    match &kind {
        ManifestKind::Service => {
            let service = service::walk_service(&mut cursor, &mut trace)?;
            push_unique(&mut parsed.services, service);
        }
        ManifestKind::Workload(_) => {
            let deployment = workload::walk_workload(&mut cursor, &mut trace)?;
            push_unique(&mut parsed.deployments, deployment);
        }
        ManifestKind::Unknown(_) => {
            while let Some(line) = cursor.advance() {
                trace.unweighted(line.number);
            }
        }
    }

    parsed.trace.extend(trace);
    parsed.documents.push(ManifestDocument {
        kind,
        first_line,
        line_count: lines.len() as u32,
    });
    Ok(())
}
