//! Indentation-keyed block traversal shared by the object walkers.
//!
//! A block member is any line nested strictly deeper than its header. A list
//! item starts at a `- ` line (at or below the header's indent) and owns every
//! following line indented at least as far as its first field. Blank and
//! comment lines never end a block; they are traced with weight 0 wherever
//! they are met.

use super::cursor::{LineCursor, SourceLine};
use super::trace::LineTrace;
use crate::error::{AnalysisError, Result};

/// Next member of the block opened at `indent`, or `None` at block end.
pub(super) fn next_member<'a>(
    cursor: &mut LineCursor<'a>,
    indent: usize,
    trace: &mut LineTrace,
) -> Option<SourceLine<'a>> {
    next_within(cursor, trace, |line| line.indent > indent)
}

/// Next field of a list item whose first field sits at `content_indent`.
pub(super) fn next_item_field<'a>(
    cursor: &mut LineCursor<'a>,
    content_indent: usize,
    trace: &mut LineTrace,
) -> Option<SourceLine<'a>> {
    next_within(cursor, trace, |line| line.indent >= content_indent)
}

fn next_within<'a>(
    cursor: &mut LineCursor<'a>,
    trace: &mut LineTrace,
    belongs: impl Fn(&SourceLine<'a>) -> bool,
) -> Option<SourceLine<'a>> {
    while let Some(line) = cursor.advance() {
        if line.is_trivia() {
            trace.unweighted(line.number);
            continue;
        }
        if belongs(&line) {
            return Some(line);
        }
        cursor.push_back();
        return None;
    }
    None
}

/// First field of the next item of the list opened at `indent`.
///
/// Items may sit at the header's own indent (compact sequences). Deeper lines
/// that are not items are traced as uninterpreted content. A bare `-` line
/// takes its first field from the next deeper line; without one the item is
/// empty and skipped.
pub(super) fn next_item<'a>(
    cursor: &mut LineCursor<'a>,
    indent: usize,
    trace: &mut LineTrace,
) -> Option<SourceLine<'a>> {
    while let Some(line) = cursor.advance() {
        if line.is_trivia() {
            trace.unweighted(line.number);
            continue;
        }
        if line.is_list_item() && line.indent >= indent {
            let item = line.strip_dash();
            if !item.is_trivia() {
                return Some(item);
            }
            trace.weighted(line.number);
            match next_member(cursor, line.indent, trace) {
                Some(first) => return Some(first),
                None => continue,
            }
        }
        if line.indent > indent {
            skip_unknown(line, cursor, trace);
            continue;
        }
        cursor.push_back();
        return None;
    }
    None
}

/// Trace every line nested deeper than `indent` with weight 0.
pub(super) fn skip_subtree(cursor: &mut LineCursor<'_>, indent: usize, trace: &mut LineTrace) {
    while let Some(line) = next_member(cursor, indent, trace) {
        trace.unweighted(line.number);
    }
}

/// Trace every line nested deeper than `indent` with weight 1.
///
/// Used for blocks whose structure is understood but whose content is not
/// modeled (`spec.selector`, `spec.template.metadata`).
pub(super) fn mark_subtree(cursor: &mut LineCursor<'_>, indent: usize, trace: &mut LineTrace) {
    while let Some(line) = next_member(cursor, indent, trace) {
        trace.weighted(line.number);
    }
}

/// Trace an unrecognized line and everything nested under it with weight 0.
pub(super) fn skip_unknown(line: SourceLine<'_>, cursor: &mut LineCursor<'_>, trace: &mut LineTrace) {
    trace.unweighted(line.number);
    skip_subtree(cursor, line.indent, trace);
}

/// Trace a recognized scalar field. Continuation lines of multi-line values
/// are traced with weight 0.
pub(super) fn recognize_leaf(line: SourceLine<'_>, cursor: &mut LineCursor<'_>, trace: &mut LineTrace) {
    trace.weighted(line.number);
    skip_subtree(cursor, line.indent, trace);
}

/// Parse the line's value as a base-10 integer.
pub(super) fn parse_number(line: &SourceLine<'_>, field: &str) -> Result<i32> {
    let value = line.value();
    value
        .parse::<i32>()
        .map_err(|_| AnalysisError::InvalidNumber {
            line: line.number,
            field: field.to_string(),
            value: value.to_string(),
        })
}

/// Optional name field: empty values count as absent.
pub(super) fn optional_value(line: &SourceLine<'_>) -> Option<String> {
    let value = line.value();
    (!value.is_empty()).then(|| value.to_string())
}
