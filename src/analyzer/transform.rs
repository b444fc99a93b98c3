//! Transformation of parsed Kubernetes objects into model components.

use super::manifest::{KubernetesDeployment, KubernetesService};
use super::relations::RelationInferenceEngine;
use crate::config::RelationConfig;
use crate::model::{
    Artifact, Component, ComponentType, Confidence, Property, TechnologyAgnosticDeploymentModel,
};
use serde::Serialize;

const DEFAULT_CONTAINER_PORT_KEY: &str = "container_port";
const DEFAULT_SERVICE_PORT_KEY: &str = "external_port";

/// Pairing of Services to the Deployment they select, by name.
///
/// Each Service is bound to at most one Deployment; the first binding wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceBindings {
    bindings: Vec<(String, String)>,
}

impl ServiceBindings {
    /// Bind `service` to `deployment` unless the service is already bound.
    pub fn bind(&mut self, service: impl Into<String>, deployment: impl Into<String>) -> bool {
        let service = service.into();
        if self.deployment_for(&service).is_some() {
            return false;
        }
        self.bindings.push((service, deployment.into()));
        true
    }

    pub fn deployment_for(&self, service: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(s, _)| s == service)
            .map(|(_, d)| d.as_str())
    }

    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(s, _)| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(s, d)| (s.as_str(), d.as_str()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Counts of what one transformation added to the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformReport {
    pub components_added: usize,
    pub component_types_added: usize,
    pub relations_added: usize,
    pub service_bindings: usize,
}

/// Turn the objects of one analysis task into components and relations and
/// merge them into `model`.
///
/// Elements already present in the model (by structural equality) are not
/// appended again, so running the same input twice leaves the model unchanged.
pub fn transform(
    model: &mut TechnologyAgnosticDeploymentModel,
    deployments: &[KubernetesDeployment],
    services: &[KubernetesService],
    config: &RelationConfig,
) -> TransformReport {
    let bindings = bind_services(deployments, services);
    let components: Vec<Component> = deployments
        .iter()
        .map(|deployment| build_component(deployment, services))
        .collect();
    let component_types: Vec<ComponentType> =
        components.iter().map(ComponentType::derived_from).collect();

    let mut report = TransformReport {
        service_bindings: bindings.len(),
        ..Default::default()
    };
    report.component_types_added = model.add_component_types(component_types);
    report.components_added = model.add_components(components.iter().cloned());

    let relations = RelationInferenceEngine::new(config).infer(model, &components, &bindings);
    report.relations_added = model.add_relations(relations);

    log::info!(
        "Transformed {} deployments and {} services: {} components, {} relations added",
        deployments.len(),
        services.len(),
        report.components_added,
        report.relations_added
    );
    report
}

/// Pair every Service with the first Deployment it selects.
pub fn bind_services(
    deployments: &[KubernetesDeployment],
    services: &[KubernetesService],
) -> ServiceBindings {
    let mut bindings = ServiceBindings::default();
    for service in services {
        if let Some(deployment) = deployments.iter().find(|d| service.selects(d)) {
            log::debug!("Service {} selects deployment {}", service.name, deployment.name);
            bindings.bind(&service.name, &deployment.name);
        }
    }
    bindings
}

fn build_component(deployment: &KubernetesDeployment, services: &[KubernetesService]) -> Component {
    let mut component = Component::new(&deployment.name, Confidence::Confirmed);
    component.component_type = format!("{}-type", deployment.name);

    for container in &deployment.containers {
        if !container.image.is_empty()
            && !component.artifacts.iter().any(|a| a.name == container.image)
        {
            component.artifacts.push(Artifact::docker_image(&container.image));
        }
        for port in &container.ports {
            let key = port.name.as_deref().unwrap_or(DEFAULT_CONTAINER_PORT_KEY);
            component
                .properties
                .push(Property::integer(key, i64::from(port.port)));
        }
        for env_var in &container.env_vars {
            component
                .properties
                .push(Property::string(&env_var.key, &env_var.value));
        }
    }

    for service in services.iter().filter(|s| s.selects(deployment)) {
        for port in &service.ports {
            if deployment.exposes_port(port.target_port) {
                let key = port.name.as_deref().unwrap_or(DEFAULT_SERVICE_PORT_KEY);
                let value = format!("{}:{}", port.port, port.target_port);
                component.properties.push(Property::string(key, value));
            }
        }
    }

    component
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::manifest::{Container, ContainerPort, EnvVar, Label, ServicePort};
    use crate::model::{PropertyType, PropertyValue, RelationType};
    use uuid::Uuid;

    fn order_deployment() -> KubernetesDeployment {
        KubernetesDeployment {
            name: "order".to_string(),
            replica_count: 1,
            labels: vec![Label::new("app", "order")],
            containers: vec![Container {
                name: "order".to_string(),
                image: "order:v1".to_string(),
                ports: vec![ContainerPort {
                    name: Some("http".to_string()),
                    port: 8080,
                }],
                env_vars: vec![EnvVar {
                    key: "CATALOG_URL".to_string(),
                    value: "http://catalog:8080".to_string(),
                }],
            }],
        }
    }

    fn catalog_deployment() -> KubernetesDeployment {
        KubernetesDeployment {
            name: "catalog".to_string(),
            replica_count: 1,
            labels: vec![Label::new("app", "catalog")],
            containers: vec![Container {
                name: "catalog".to_string(),
                image: "catalog:v2".to_string(),
                ports: vec![ContainerPort {
                    name: None,
                    port: 8080,
                }],
                env_vars: Vec::new(),
            }],
        }
    }

    fn order_service() -> KubernetesService {
        KubernetesService {
            name: "order".to_string(),
            labels: Vec::new(),
            selectors: vec![Label::new("app", "order")],
            ports: vec![ServicePort {
                name: None,
                port: 80,
                target_port: 8080,
            }],
        }
    }

    fn empty_model() -> TechnologyAgnosticDeploymentModel {
        let mut model = TechnologyAgnosticDeploymentModel::new(Uuid::new_v4());
        model.relation_types.push(RelationType::new("ConnectsTo"));
        model.relation_types.push(RelationType::new("HostedOn"));
        model
    }

    #[test]
    fn test_service_port_property() {
        let mut model = empty_model();
        transform(
            &mut model,
            &[order_deployment()],
            &[order_service()],
            &RelationConfig::default(),
        );

        let order = model.component("order").unwrap();
        assert_eq!(order.component_type, "order-type");
        assert_eq!(order.artifacts, vec![Artifact::docker_image("order:v1")]);

        let http = order.properties.iter().find(|p| p.key == "http").unwrap();
        assert_eq!(http.property_type, PropertyType::Integer);
        assert_eq!(http.value, Some(PropertyValue::Integer(8080)));

        let external = order
            .properties
            .iter()
            .find(|p| p.key == "external_port")
            .unwrap();
        assert_eq!(external.property_type, PropertyType::String);
        assert_eq!(external.value, Some(PropertyValue::String("80:8080".to_string())));
    }

    #[test]
    fn test_component_type_has_no_values() {
        let mut model = empty_model();
        transform(
            &mut model,
            &[order_deployment()],
            &[order_service()],
            &RelationConfig::default(),
        );

        let component_type = model.component_type("order-type").unwrap();
        let keys: Vec<&str> = component_type.properties.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["http", "CATALOG_URL", "external_port"]);
        assert!(component_type.properties.iter().all(|p| p.value.is_none()));
    }

    #[test]
    fn test_unmatched_target_port_adds_nothing() {
        let mut service = order_service();
        service.ports[0].target_port = 9090;
        let mut model = empty_model();
        transform(&mut model, &[order_deployment()], &[service], &RelationConfig::default());

        let order = model.component("order").unwrap();
        assert!(order.properties.iter().all(|p| p.key != "external_port"));
    }

    #[test]
    fn test_deployment_without_containers() {
        let deployment = KubernetesDeployment {
            name: "empty".to_string(),
            ..Default::default()
        };
        let mut model = empty_model();
        let report = transform(&mut model, &[deployment], &[], &RelationConfig::default());

        assert_eq!(report.components_added, 1);
        let component = model.component("empty").unwrap();
        assert!(component.artifacts.is_empty());
        assert!(component.properties.is_empty());
    }

    #[test]
    fn test_duplicate_keys_keep_declaration_order() {
        let mut deployment = order_deployment();
        let mut second = deployment.containers[0].clone();
        second.name = "sidecar".to_string();
        second.image = "envoy:1.28".to_string();
        second.ports[0].port = 9901;
        deployment.containers.push(second);
        deployment.containers.push(Container {
            name: "copy".to_string(),
            image: "order:v1".to_string(),
            ..Default::default()
        });

        let component = build_component(&deployment, &[]);
        let http: Vec<&PropertyValue> = component
            .properties
            .iter()
            .filter(|p| p.key == "http")
            .filter_map(|p| p.value.as_ref())
            .collect();
        assert_eq!(
            http,
            vec![&PropertyValue::Integer(8080), &PropertyValue::Integer(9901)]
        );
        assert_eq!(component.artifacts.len(), 2);
        assert_eq!(component.artifacts[0].name, "order:v1");
    }

    #[test]
    fn test_connects_to_relation() {
        let mut model = empty_model();
        let report = transform(
            &mut model,
            &[order_deployment(), catalog_deployment()],
            &[order_service()],
            &RelationConfig::default(),
        );

        assert_eq!(report.components_added, 2);
        assert_eq!(report.relations_added, 1);
        assert_eq!(model.relations[0].name, "order_ConnectsTo_catalog");
        let catalog = model.component("catalog").unwrap();
        assert_eq!(catalog.properties[0].key, "container_port");
    }

    #[test]
    fn test_retransform_adds_no_duplicates() {
        let mut model = empty_model();
        let deployments = [order_deployment(), catalog_deployment()];
        let services = [order_service()];
        transform(&mut model, &deployments, &services, &RelationConfig::default());
        let before = model.clone();

        let report = transform(&mut model, &deployments, &services, &RelationConfig::default());
        assert_eq!(report.components_added, 0);
        assert_eq!(report.relations_added, 0);
        assert_eq!(model, before);
    }

    #[test]
    fn test_first_matching_deployment_is_bound() {
        let mut shadow = catalog_deployment();
        shadow.name = "order-canary".to_string();
        shadow.labels = vec![Label::new("app", "order")];

        let bindings = bind_services(&[order_deployment(), shadow], &[order_service()]);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings.deployment_for("order"), Some("order"));
    }

    #[test]
    fn test_bind_keeps_first() {
        let mut bindings = ServiceBindings::default();
        assert!(bindings.bind("web", "frontend"));
        assert!(!bindings.bind("web", "backend"));
        assert_eq!(bindings.iter().collect::<Vec<_>>(), vec![("web", "frontend")]);
    }
}
