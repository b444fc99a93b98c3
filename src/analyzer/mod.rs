//! # Analyzer Module
//!
//! Turns Kubernetes manifests into deployment model updates:
//! - [`manifest`] parses files into objects and a per-line recognition trace
//! - [`transform`] builds components, types, properties and artifacts
//! - [`relations`] infers `ConnectsTo` and `HostedOn` relations
//! - [`task`] runs one analysis task end to end

pub mod location;
pub mod manifest;
pub mod relations;
pub mod task;
pub mod transform;

pub use location::{ManifestFile, ResolvedLocation, resolve_location};
pub use manifest::{ParsedManifest, parse_manifest, parse_manifest_file};
pub use relations::RelationInferenceEngine;
pub use task::{AnalysisRequest, AnalysisService, AnalysisTask, CancellationFlag, TaskReport};
pub use transform::{ServiceBindings, TransformReport, bind_services, transform};
