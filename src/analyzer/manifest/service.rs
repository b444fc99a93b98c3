//! Walker for `kind: Service` documents.

use super::block::{
    next_item, next_item_field, next_member, optional_value, parse_number, recognize_leaf,
    skip_unknown,
};
use super::cursor::{LineCursor, SourceLine};
use super::metadata::{walk_metadata, walk_pairs};
use super::objects::{KubernetesService, ServicePort};
use super::trace::LineTrace;
use crate::error::Result;
use crate::model::push_unique;

/// Walk a Service document from its `kind:` line to its end.
pub(super) fn walk_service(
    cursor: &mut LineCursor<'_>,
    trace: &mut LineTrace,
) -> Result<KubernetesService> {
    let mut service = KubernetesService::default();

    while let Some(line) = cursor.advance() {
        match line.key() {
            Some("kind") => recognize_leaf(line, cursor, trace),
            Some("metadata") => {
                let metadata = walk_metadata(line, cursor, trace);
                service.name = metadata.name;
                service.labels = metadata.labels;
            }
            Some("spec") => walk_spec(line, cursor, trace, &mut service)?,
            _ => skip_unknown(line, cursor, trace),
        }
    }
    Ok(service)
}

fn walk_spec(
    header: SourceLine<'_>,
    cursor: &mut LineCursor<'_>,
    trace: &mut LineTrace,
    service: &mut KubernetesService,
) -> Result<()> {
    trace.weighted(header.number);

    while let Some(line) = next_member(cursor, header.indent, trace) {
        match line.key() {
            Some("selector") => {
                trace.weighted(line.number);
                walk_pairs(line.indent, cursor, trace, &mut service.selectors);
            }
            Some("ports") => {
                trace.weighted(line.number);
                while let Some(first) = next_item(cursor, line.indent, trace) {
                    let port = walk_port(first, cursor, trace)?;
                    push_unique(&mut service.ports, port);
                }
            }
            _ => skip_unknown(line, cursor, trace),
        }
    }
    Ok(())
}

fn walk_port(
    first: SourceLine<'_>,
    cursor: &mut LineCursor<'_>,
    trace: &mut LineTrace,
) -> Result<ServicePort> {
    let mut port = ServicePort::default();
    let mut field = Some(first);

    while let Some(line) = field {
        match line.key() {
            Some("name") => {
                port.name = optional_value(&line);
                recognize_leaf(line, cursor, trace);
            }
            Some("port") => {
                port.port = parse_number(&line, "port")?;
                recognize_leaf(line, cursor, trace);
            }
            Some("targetPort") => {
                port.target_port = parse_number(&line, "targetPort")?;
                recognize_leaf(line, cursor, trace);
            }
            _ => skip_unknown(line, cursor, trace),
        }
        field = next_item_field(cursor, first.indent, trace);
    }
    Ok(port)
}
