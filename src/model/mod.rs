//! Deployment model documents exchanged with the modeling tool.
//!
//! - [`tadm`] - the technology-agnostic model (components, types, relations)
//! - [`tsdm`] - the technology-specific model (analyzed files and their line traces)

pub mod tadm;
pub mod tsdm;

pub use tadm::{
    Artifact, Component, ComponentType, Confidence, Property, PropertyType, PropertyValue,
    Relation, RelationType, TechnologyAgnosticDeploymentModel,
};
pub use tsdm::{DeploymentModelContent, Line, TechnologySpecificDeploymentModel};

/// Push `item` unless a structurally equal value is already present.
///
/// Returns `true` when the item was added. Insertion order is preserved, so
/// the first occurrence of a value always wins.
pub fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) -> bool {
    if items.contains(&item) {
        false
    } else {
        items.push(item);
        true
    }
}
