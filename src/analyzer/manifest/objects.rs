//! Kubernetes objects recognized by the manifest parser.
//!
//! Only the fields needed to build the architecture model are kept. Set-like
//! collections are `Vec`s deduplicated by structural equality in declaration
//! order (see [`push_unique`](crate::model::push_unique)).

use serde::Serialize;

/// A `key: value` pair from `labels` or `selector` blocks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Label {
    pub key: String,
    pub value: String,
}

impl Label {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Service selectors share the label shape.
pub type Selector = Label;

/// `containers[].ports[]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ContainerPort {
    pub name: Option<String>,
    pub port: i32,
}

/// `containers[].env[]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

/// A container of a workload's pod template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Container {
    pub name: String,
    pub image: String,
    pub ports: Vec<ContainerPort>,
    pub env_vars: Vec<EnvVar>,
}

/// A `Deployment` or `StatefulSet`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct KubernetesDeployment {
    pub name: String,
    pub replica_count: i32,
    pub labels: Vec<Label>,
    pub containers: Vec<Container>,
}

impl KubernetesDeployment {
    /// Whether any label equals `selector` in both key and value.
    pub fn is_selected_by(&self, selector: &Selector) -> bool {
        self.labels.iter().any(|label| label == selector)
    }

    /// Whether any container of this workload exposes `port`.
    pub fn exposes_port(&self, port: i32) -> bool {
        self.containers
            .iter()
            .flat_map(|c| c.ports.iter())
            .any(|p| p.port == port)
    }
}

/// `spec.ports[]` entry of a Service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ServicePort {
    pub name: Option<String>,
    pub port: i32,
    pub target_port: i32,
}

/// A `Service`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct KubernetesService {
    pub name: String,
    pub labels: Vec<Label>,
    pub selectors: Vec<Selector>,
    pub ports: Vec<ServicePort>,
}

impl KubernetesService {
    /// Whether any selector of this service matches a label of `deployment`.
    pub fn selects(&self, deployment: &KubernetesDeployment) -> bool {
        self.selectors.iter().any(|s| deployment.is_selected_by(s))
    }
}
