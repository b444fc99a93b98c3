//! Walker for `kind: Deployment` and `kind: StatefulSet` documents.
//!
//! Both kinds share one shape for everything that ends up in the model:
//! replicas, labels and the containers of the pod template.

use super::block::{
    mark_subtree, next_item, next_item_field, next_member, optional_value, parse_number,
    recognize_leaf, skip_unknown,
};
use super::cursor::{LineCursor, SourceLine};
use super::metadata::walk_metadata;
use super::objects::{Container, ContainerPort, EnvVar, KubernetesDeployment};
use super::trace::LineTrace;
use crate::error::Result;
use crate::model::push_unique;

/// Walk a workload document from its `kind:` line to its end.
pub(super) fn walk_workload(
    cursor: &mut LineCursor<'_>,
    trace: &mut LineTrace,
) -> Result<KubernetesDeployment> {
    let mut deployment = KubernetesDeployment::default();

    while let Some(line) = cursor.advance() {
        match line.key() {
            Some("kind") => recognize_leaf(line, cursor, trace),
            Some("metadata") => {
                let metadata = walk_metadata(line, cursor, trace);
                deployment.name = metadata.name;
                deployment.labels = metadata.labels;
            }
            Some("spec") => walk_spec(line, cursor, trace, &mut deployment)?,
            _ => skip_unknown(line, cursor, trace),
        }
    }
    Ok(deployment)
}

fn walk_spec(
    header: SourceLine<'_>,
    cursor: &mut LineCursor<'_>,
    trace: &mut LineTrace,
    deployment: &mut KubernetesDeployment,
) -> Result<()> {
    trace.weighted(header.number);

    while let Some(line) = next_member(cursor, header.indent, trace) {
        match line.key() {
            Some("replicas") => {
                deployment.replica_count = parse_number(&line, "replicas")?;
                recognize_leaf(line, cursor, trace);
            }
            Some("selector") => {
                trace.weighted(line.number);
                mark_subtree(cursor, line.indent, trace);
            }
            Some("template") => walk_template(line, cursor, trace, deployment)?,
            _ => skip_unknown(line, cursor, trace),
        }
    }
    Ok(())
}

fn walk_template(
    header: SourceLine<'_>,
    cursor: &mut LineCursor<'_>,
    trace: &mut LineTrace,
    deployment: &mut KubernetesDeployment,
) -> Result<()> {
    trace.weighted(header.number);

    while let Some(line) = next_member(cursor, header.indent, trace) {
        match line.key() {
            Some("metadata") => {
                trace.weighted(line.number);
                mark_subtree(cursor, line.indent, trace);
            }
            Some("spec") => walk_pod_spec(line, cursor, trace, deployment)?,
            _ => skip_unknown(line, cursor, trace),
        }
    }
    Ok(())
}

fn walk_pod_spec(
    header: SourceLine<'_>,
    cursor: &mut LineCursor<'_>,
    trace: &mut LineTrace,
    deployment: &mut KubernetesDeployment,
) -> Result<()> {
    trace.weighted(header.number);

    while let Some(line) = next_member(cursor, header.indent, trace) {
        match line.key() {
            Some("containers") => {
                trace.weighted(line.number);
                while let Some(first) = next_item(cursor, line.indent, trace) {
                    let container = walk_container(first, cursor, trace)?;
                    push_unique(&mut deployment.containers, container);
                }
            }
            _ => skip_unknown(line, cursor, trace),
        }
    }
    Ok(())
}

fn walk_container(
    first: SourceLine<'_>,
    cursor: &mut LineCursor<'_>,
    trace: &mut LineTrace,
) -> Result<Container> {
    let mut container = Container::default();
    let mut field = Some(first);

    while let Some(line) = field {
        match line.key() {
            Some("name") => {
                container.name = line.value().to_string();
                recognize_leaf(line, cursor, trace);
            }
            Some("image") => {
                container.image = line.value().to_string();
                recognize_leaf(line, cursor, trace);
            }
            Some("ports") => {
                trace.weighted(line.number);
                while let Some(item) = next_item(cursor, line.indent, trace) {
                    let port = walk_container_port(item, cursor, trace)?;
                    push_unique(&mut container.ports, port);
                }
            }
            Some("env") => {
                trace.weighted(line.number);
                while let Some(item) = next_item(cursor, line.indent, trace) {
                    let env_var = walk_env_var(item, cursor, trace);
                    push_unique(&mut container.env_vars, env_var);
                }
            }
            _ => skip_unknown(line, cursor, trace),
        }
        field = next_item_field(cursor, first.indent, trace);
    }
    Ok(container)
}

fn walk_container_port(
    first: SourceLine<'_>,
    cursor: &mut LineCursor<'_>,
    trace: &mut LineTrace,
) -> Result<ContainerPort> {
    let mut port = ContainerPort::default();
    let mut field = Some(first);

    while let Some(line) = field {
        match line.key() {
            Some("name") => {
                port.name = optional_value(&line);
                recognize_leaf(line, cursor, trace);
            }
            Some("containerPort") => {
                port.port = parse_number(&line, "containerPort")?;
                recognize_leaf(line, cursor, trace);
            }
            _ => skip_unknown(line, cursor, trace),
        }
        field = next_item_field(cursor, first.indent, trace);
    }
    Ok(port)
}

fn walk_env_var(first: SourceLine<'_>, cursor: &mut LineCursor<'_>, trace: &mut LineTrace) -> EnvVar {
    let mut env_var = EnvVar::default();
    let mut field = Some(first);

    while let Some(line) = field {
        match line.key() {
            Some("name") => {
                env_var.key = line.value().to_string();
                recognize_leaf(line, cursor, trace);
            }
            Some("value") => {
                env_var.value = line.value().to_string();
                recognize_leaf(line, cursor, trace);
            }
            // valueFrom and friends are not modeled
            _ => skip_unknown(line, cursor, trace),
        }
        field = next_item_field(cursor, first.indent, trace);
    }
    env_var
}
