//! Recognition trace collected while walking a manifest.

use crate::model::Line;
use serde::Serialize;

/// Ordered per-line recognition records of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineTrace {
    lines: Vec<Line>,
}

impl LineTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weighted(&mut self, number: u32) {
        self.lines.push(Line::weighted(number));
    }

    pub fn unweighted(&mut self, number: u32) {
        self.lines.push(Line::unweighted(number));
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn extend(&mut self, other: LineTrace) {
        self.lines.extend(other.lines);
    }

    pub fn coverage(&self) -> Coverage {
        Coverage::of(&self.lines)
    }
}

/// How much of an analyzed file the parser understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub total_lines: usize,
    pub weighted_lines: usize,
}

impl Coverage {
    pub fn of(lines: &[Line]) -> Self {
        Self {
            total_lines: lines.len(),
            weighted_lines: lines.iter().filter(|l| l.weight > 0).count(),
        }
    }

    /// Weighted share in percent; 0 for an empty trace.
    pub fn percent(&self) -> f64 {
        if self.total_lines == 0 {
            0.0
        } else {
            self.weighted_lines as f64 * 100.0 / self.total_lines as f64
        }
    }
}
