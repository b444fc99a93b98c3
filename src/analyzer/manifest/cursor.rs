//! Line cursor over a materialized manifest document.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Regex for a `key: value` or `key:` line (value group optional).
static KEY_VALUE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\s:#][^:]*?)\s*:(?:\s+(.*))?$").unwrap());

/// `kind:` lines are accepted without a gap after the colon (`kind:Service`).
static KIND_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(kind):\s*(.*)$").unwrap());

/// One physical line with its indentation depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-indexed line number in the file
    pub number: u32,
    /// Leading whitespace width
    pub indent: usize,
    /// Line text without leading and trailing whitespace
    pub content: &'a str,
}

impl<'a> SourceLine<'a> {
    pub fn new(number: u32, text: &'a str) -> Self {
        let trimmed = text.trim_start();
        Self {
            number,
            indent: text.len() - trimmed.len(),
            content: trimmed.trim_end(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.content.is_empty()
    }

    pub fn is_comment(&self) -> bool {
        self.content.starts_with('#')
    }

    /// Blank and comment lines carry no structure.
    pub fn is_trivia(&self) -> bool {
        self.is_blank() || self.is_comment()
    }

    /// Whether the line opens a sequence item (`- ...`).
    pub fn is_list_item(&self) -> bool {
        self.content == "-" || self.content.starts_with("- ")
    }

    /// The item content of a `- ` line, as if the dash were a space.
    ///
    /// `      - name: web` becomes `name: web` at indent 8, so the item's
    /// remaining fields line up with its first one.
    pub fn strip_dash(&self) -> Self {
        let rest = &self.content[1..];
        let inner = rest.trim_start();
        Self {
            number: self.number,
            indent: self.indent + 1 + (rest.len() - inner.len()),
            content: inner,
        }
    }

    fn captures(&self) -> Option<Captures<'a>> {
        KEY_VALUE_REGEX
            .captures(self.content)
            .or_else(|| KIND_REGEX.captures(self.content))
    }

    /// The mapping key of this line, if it has one.
    pub fn key(&self) -> Option<&'a str> {
        let caps = self.captures()?;
        let key = caps.get(1)?.as_str();
        Some(unquote(key))
    }

    /// The scalar value after the key, with a trailing comment and
    /// surrounding quotes removed. Empty for block headers.
    pub fn value(&self) -> &'a str {
        let Some(caps) = self.captures() else {
            return "";
        };
        let Some(raw) = caps.get(2) else {
            return "";
        };
        let raw = raw.as_str();
        let raw = if raw.starts_with('#') {
            ""
        } else {
            match raw.find(" #") {
                Some(pos) => &raw[..pos],
                None => raw,
            }
        };
        unquote(raw.trim())
    }
}

fn unquote(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Rewindable cursor with one line of pushback.
#[derive(Debug)]
pub struct LineCursor<'a> {
    lines: Vec<SourceLine<'a>>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    /// Materialize `texts` as lines numbered from `first_number`.
    pub fn new(texts: &[&'a str], first_number: u32) -> Self {
        let lines = texts
            .iter()
            .copied()
            .zip(first_number..)
            .map(|(text, number)| SourceLine::new(number, text))
            .collect();
        Self { lines, pos: 0 }
    }

    pub fn peek(&self) -> Option<SourceLine<'a>> {
        self.lines.get(self.pos).copied()
    }

    pub fn advance(&mut self) -> Option<SourceLine<'a>> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }

    /// Step back over the line returned by the last [`advance`](Self::advance).
    pub fn push_back(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }
}
