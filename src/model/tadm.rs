//! Technology-agnostic deployment model (TADM).
//!
//! The TADM describes deployable units as generic components with typed
//! properties, artifacts and relations, independent of Kubernetes vocabulary.
//! It is owned by the caller; an analysis task only appends to it.

use super::push_unique;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Enumerations
// ============================================================================

/// How an element of the model was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    /// Read directly from explicit manifest fields
    Confirmed,
    /// Inferred heuristically
    Suspected,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed => write!(f, "CONFIRMED"),
            Self::Suspected => write!(f, "SUSPECTED"),
        }
    }
}

/// Value type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    String,
    Integer,
}

/// Concrete value of a component property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Integer(i64),
    String(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{}", s),
        }
    }
}

// ============================================================================
// Model elements
// ============================================================================

/// A typed key/value property.
///
/// Component properties carry a value and a confidence. The properties of a
/// [`ComponentType`] are templates: same key and type, no value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub key: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<PropertyValue>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
}

impl Property {
    /// A confirmed INTEGER property.
    pub fn integer(key: impl Into<String>, value: i64) -> Self {
        Self {
            key: key.into(),
            property_type: PropertyType::Integer,
            value: Some(PropertyValue::Integer(value)),
            required: false,
            confidence: Some(Confidence::Confirmed),
        }
    }

    /// A confirmed STRING property.
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            property_type: PropertyType::String,
            value: Some(PropertyValue::String(value.into())),
            required: false,
            confidence: Some(Confidence::Confirmed),
        }
    }

    /// The value-less template of this property, as stored on component types.
    pub fn template(&self) -> Self {
        Self {
            key: self.key.clone(),
            property_type: self.property_type,
            value: None,
            required: self.required,
            confidence: None,
        }
    }
}

/// A deployable artifact of a component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    #[serde(rename = "type")]
    pub artifact_type: String,
    pub confidence: Confidence,
}

impl Artifact {
    pub const DOCKER_IMAGE: &'static str = "docker_image";

    /// Artifact for a container image reference.
    pub fn docker_image(image: impl Into<String>) -> Self {
        Self {
            name: image.into(),
            artifact_type: Self::DOCKER_IMAGE.to_string(),
            confidence: Confidence::Confirmed,
        }
    }
}

/// Structural template shared by components of the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl ComponentType {
    /// Derive the type of `component`: named `<component>-type`, holding the
    /// key, type and required flag of every component property.
    pub fn derived_from(component: &Component) -> Self {
        Self {
            name: format!("{}-type", component.name),
            description: None,
            properties: component.properties.iter().map(Property::template).collect(),
        }
    }
}

/// One deployable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Name of the component's [`ComponentType`]
    #[serde(rename = "type")]
    pub component_type: String,
    pub confidence: Confidence,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl Component {
    pub fn new(name: impl Into<String>, confidence: Confidence) -> Self {
        Self {
            name: name.into(),
            description: None,
            component_type: String::new(),
            confidence,
            properties: Vec::new(),
            artifacts: Vec::new(),
        }
    }
}

/// Entry in the model's relation-type catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RelationType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// A directed, typed edge between two components, referenced by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub name: String,
    #[serde(rename = "type")]
    pub relation_type: String,
    pub source: String,
    pub target: String,
    pub confidence: Confidence,
}

impl Relation {
    /// Create a relation named `<source>_<type>_<target>`.
    pub fn new(
        source: &Component,
        relation_type: &RelationType,
        target: &Component,
        confidence: Confidence,
    ) -> Self {
        Self {
            name: format!("{}_{}_{}", source.name, relation_type.name, target.name),
            relation_type: relation_type.name.clone(),
            source: source.name.clone(),
            target: target.name.clone(),
            confidence,
        }
    }
}

// ============================================================================
// Document
// ============================================================================

/// The technology-agnostic deployment model of one transformation process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnologyAgnosticDeploymentModel {
    pub transformation_process_id: Uuid,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub component_types: Vec<ComponentType>,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub relation_types: Vec<RelationType>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl TechnologyAgnosticDeploymentModel {
    /// An empty model for a transformation process.
    pub fn new(transformation_process_id: Uuid) -> Self {
        Self {
            transformation_process_id,
            properties: Vec::new(),
            component_types: Vec::new(),
            components: Vec::new(),
            relation_types: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn component_type(&self, name: &str) -> Option<&ComponentType> {
        self.component_types.iter().find(|t| t.name == name)
    }

    pub fn relation_type(&self, name: &str) -> Option<&RelationType> {
        self.relation_types.iter().find(|t| t.name == name)
    }

    /// Append component types not already present. Returns how many were added.
    pub fn add_component_types(&mut self, types: impl IntoIterator<Item = ComponentType>) -> usize {
        types
            .into_iter()
            .filter(|t| push_unique(&mut self.component_types, t.clone()))
            .count()
    }

    /// Append components not already present. Returns how many were added.
    pub fn add_components(&mut self, components: impl IntoIterator<Item = Component>) -> usize {
        components
            .into_iter()
            .filter(|c| push_unique(&mut self.components, c.clone()))
            .count()
    }

    /// Append relations not already present. Returns how many were added.
    pub fn add_relations(&mut self, relations: impl IntoIterator<Item = Relation>) -> usize {
        relations
            .into_iter()
            .filter(|r| push_unique(&mut self.relations, r.clone()))
            .count()
    }
}
