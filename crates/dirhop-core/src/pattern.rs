//! Compiles user-supplied path fragments into the patterns the cascade
//! matches against.
//!
//! Fragments are regex syntax. They are joined with `.*` gaps to form the
//! full pattern, and the last fragment is compiled on its own for the
//! high-precision end-of-path checks. A first fragment starting with `/`
//! anchors both patterns to the start of the input.

use regex::{Regex, RegexBuilder};

use crate::error::Result;

/// Compiled patterns for one resolution call.
#[derive(Debug)]
pub struct PatternSpec {
    /// All fragments in order, separated by `.*`.
    full: Regex,
    /// Last fragment alone, unanchored (substring end matches).
    end_any: Regex,
    /// Last fragment alone, anchored `^(?:…)$` (full-token end matches).
    end_exact: Regex,
    /// True when the first fragment begins with the path-root marker.
    anchored: bool,
    /// True when both patterns fold case.
    case_insensitive: bool,
}

impl PatternSpec {
    /// Build the pattern set for an ordered fragment sequence.
    ///
    /// # Errors
    /// Returns [`crate::Error::Pattern`] if any fragment is not valid
    /// regex syntax.
    pub fn build(fragments: &[String], case_insensitive: bool) -> Result<Self> {
        let anchored = fragments
            .first()
            .is_some_and(|fragment| fragment.starts_with('/'));
        let joined = fragments.join(".*");
        let full_source = if anchored {
            format!("^{joined}")
        } else {
            joined
        };
        let last = fragments.last().map(String::as_str).unwrap_or_default();

        Ok(Self {
            full: compile(&full_source, case_insensitive)?,
            end_any: compile(last, case_insensitive)?,
            end_exact: compile(&format!("^(?:{last})$"), case_insensitive)?,
            anchored,
            case_insensitive,
        })
    }

    /// Whether the full pattern matches anywhere in `text`.
    pub fn matches_full(&self, text: &str) -> bool {
        self.full.is_match(text)
    }

    /// Byte span of the leftmost full-pattern match in `text`.
    pub fn full_match_span(&self, text: &str) -> Option<(usize, usize)> {
        self.full
            .find(text)
            .map(|found| (found.start(), found.end()))
    }

    /// Whether the end fragment matches the whole of `segment`.
    pub fn end_matches_exact(&self, segment: &str) -> bool {
        self.end_exact.is_match(segment)
    }

    /// Whether the end fragment matches anywhere in `segment`.
    pub fn end_matches(&self, segment: &str) -> bool {
        self.end_any.is_match(segment)
    }

    /// Whether the patterns are anchored to the path root.
    pub fn anchored(&self) -> bool {
        self.anchored
    }

    /// Whether the patterns fold case.
    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }
}

fn compile(source: &str, case_insensitive: bool) -> Result<Regex> {
    RegexBuilder::new(source)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(Into::into)
}
