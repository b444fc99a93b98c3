//! Relation inference between components.
//!
//! Two heuristics run over the components created by one analysis task:
//!
//! - **Hosted on**: when the model already holds a component of the container
//!   runtime type, every new component is SUSPECTED to be hosted on the first
//!   one found.
//! - **Connects to**: properties whose key looks like a connection setting
//!   (`connect`, `host`, `server`, `url`, `uri`) are searched for component
//!   names. The longest name contained in the value wins, so `catalog-db:5432`
//!   resolves to `catalog-db` rather than `catalog`. When no component name
//!   matches, Service names are tried and resolved to the Deployment the
//!   Service selects.
//!
//! Unresolvable values are dropped; inference never fails.

use super::transform::ServiceBindings;
use crate::config::RelationConfig;
use crate::model::{
    Component, Confidence, Relation, RelationType, TechnologyAgnosticDeploymentModel, push_unique,
};

/// Infers relations for newly created components.
#[derive(Debug, Clone, Copy)]
pub struct RelationInferenceEngine<'a> {
    config: &'a RelationConfig,
}

impl<'a> RelationInferenceEngine<'a> {
    pub fn new(config: &'a RelationConfig) -> Self {
        Self { config }
    }

    /// Infer relations whose source is one of `new_components`.
    ///
    /// `model` must already contain the new components so they can be
    /// targets of each other. The result holds no structural duplicates.
    pub fn infer(
        &self,
        model: &TechnologyAgnosticDeploymentModel,
        new_components: &[Component],
        bindings: &ServiceBindings,
    ) -> Vec<Relation> {
        let connects_to = self.resolve_relation_type(model, &self.config.connects_to);
        let hosted_on = self.resolve_relation_type(model, &self.config.hosted_on);
        let runtime = self.container_runtime(model);

        let mut relations = Vec::new();
        for component in new_components {
            for target in self.connection_targets(model, component, bindings) {
                let relation = Relation::new(component, &connects_to, target, Confidence::Confirmed);
                push_unique(&mut relations, relation);
            }

            if let Some(runtime) = runtime.filter(|r| r.name != component.name) {
                log::debug!("{} is hosted on runtime {}", component.name, runtime.name);
                let relation = Relation::new(component, &hosted_on, runtime, Confidence::Suspected);
                push_unique(&mut relations, relation);
            }
        }
        relations
    }

    /// Look up a relation type by name, substituting a placeholder when the
    /// catalogue lacks it.
    fn resolve_relation_type(
        &self,
        model: &TechnologyAgnosticDeploymentModel,
        name: &str,
    ) -> RelationType {
        match model.relation_type(name) {
            Some(relation_type) => relation_type.clone(),
            None => {
                log::warn!(
                    "Relation type '{}' is not declared in the model, using a placeholder",
                    name
                );
                RelationType::new(name)
            }
        }
    }

    /// First component whose type is the container runtime type.
    fn container_runtime<'m>(
        &self,
        model: &'m TechnologyAgnosticDeploymentModel,
    ) -> Option<&'m Component> {
        let runtime_type = model.component_type(&self.config.container_runtime_type)?;
        model
            .components
            .iter()
            .find(|c| c.component_type == runtime_type.name)
    }

    fn connection_targets<'m>(
        &self,
        model: &'m TechnologyAgnosticDeploymentModel,
        source: &Component,
        bindings: &ServiceBindings,
    ) -> Vec<&'m Component> {
        let mut targets: Vec<&Component> = Vec::new();
        for property in &source.properties {
            if !self.config.is_connection_key(&property.key) {
                continue;
            }
            let Some(value) = &property.value else {
                continue;
            };
            let value = value.to_string();

            match resolve_target(model, source, &value, bindings) {
                Some(target) => {
                    log::debug!(
                        "{}: {}={} connects to {}",
                        source.name,
                        property.key,
                        value,
                        target.name
                    );
                    if !targets.iter().any(|t| t.name == target.name) {
                        targets.push(target);
                    }
                }
                None => log::debug!(
                    "{}: no component found for {}={}",
                    source.name,
                    property.key,
                    value
                ),
            }
        }
        targets
    }
}

/// Resolve the component a connection value points at.
fn resolve_target<'m>(
    model: &'m TechnologyAgnosticDeploymentModel,
    source: &Component,
    value: &str,
    bindings: &ServiceBindings,
) -> Option<&'m Component> {
    let direct = longest_contained(
        value,
        model
            .components
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| *name != source.name),
    );
    if let Some(name) = direct {
        return model.component(name);
    }

    let service = longest_contained(value, bindings.service_names())?;
    let deployment = bindings.deployment_for(service)?;
    model
        .component(deployment)
        .filter(|target| target.name != source.name)
}

/// The longest non-empty candidate contained in `value`; the first one wins on ties.
fn longest_contained<'n>(value: &str, candidates: impl Iterator<Item = &'n str>) -> Option<&'n str> {
    candidates
        .filter(|name| !name.is_empty() && value.contains(*name))
        .fold(None, |best: Option<&str>, name| match best {
            Some(best) if best.len() >= name.len() => Some(best),
            _ => Some(name),
        })
}
