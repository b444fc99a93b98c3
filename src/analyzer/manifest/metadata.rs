//! `metadata` and key/value blocks common to every recognized kind.

use super::block::{next_member, recognize_leaf, skip_unknown};
use super::cursor::{LineCursor, SourceLine};
use super::objects::Label;
use super::trace::LineTrace;
use crate::model::push_unique;

/// Fields collected from a `metadata:` block.
#[derive(Debug, Default)]
pub(super) struct Metadata {
    pub name: String,
    pub labels: Vec<Label>,
}

/// Walk the `metadata:` block opened by `header`.
pub(super) fn walk_metadata(
    header: SourceLine<'_>,
    cursor: &mut LineCursor<'_>,
    trace: &mut LineTrace,
) -> Metadata {
    trace.weighted(header.number);
    let mut metadata = Metadata::default();

    while let Some(line) = next_member(cursor, header.indent, trace) {
        match line.key() {
            Some("name") => {
                metadata.name = line.value().to_string();
                recognize_leaf(line, cursor, trace);
            }
            Some("labels") => {
                trace.weighted(line.number);
                walk_pairs(line.indent, cursor, trace, &mut metadata.labels);
            }
            _ => skip_unknown(line, cursor, trace),
        }
    }
    metadata
}

/// Collect every `key: value` pair nested under the header at `indent`.
///
/// Nested maps (`matchLabels:`) are descended into; lines that are not
/// key/value pairs are traced with weight 0.
pub(super) fn walk_pairs(
    indent: usize,
    cursor: &mut LineCursor<'_>,
    trace: &mut LineTrace,
    pairs: &mut Vec<Label>,
) {
    while let Some(line) = next_member(cursor, indent, trace) {
        match line.key() {
            Some(key) if !line.value().is_empty() => {
                push_unique(pairs, Label::new(key, line.value()));
                recognize_leaf(line, cursor, trace);
            }
            Some(_) => {
                trace.weighted(line.number);
                walk_pairs(line.indent, cursor, trace, pairs);
            }
            None => skip_unknown(line, cursor, trace),
        }
    }
}
