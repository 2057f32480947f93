//! Primitive chompers: regex matches and `until` scans
//!
//! Regexes only ever match inside the current chunk, against the whole
//! chunk text, so assertions such as `^` and `\b` see what precedes the
//! current column. `until` is the one primitive that walks across chunk
//! boundaries.

use super::chomper::{application_error, ChompResult, PiecesFn};
use super::error::ErrorTracker;
use super::regex_cache;
use super::state::ChompState;
use super::value::Value;
use regex::Regex;
use std::sync::Arc;

/// Matches a pattern at the current column
pub struct RegexChomper {
    pattern: String,
    regex: Regex,
}

impl RegexChomper {
    /// Compile `pattern`, anchored at the current column
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: pattern.to_string(),
            regex: regex_cache::get_or_compile(pattern)?,
        })
    }

    /// The pattern as written by the caller
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub(crate) fn chomp(&self, state: &mut ChompState<'_>, tracker: &mut ErrorTracker) -> ChompResult {
        let chunk = Arc::clone(state.current());
        let (end, text) = match regex_cache::match_at(&self.regex, &chunk, state.column()) {
            Some(m) => (m.end(), m.as_str().to_string()),
            None => {
                tracker.report(expected(&self.pattern), state.location());
                return Ok(None);
            }
        };
        state.advance_to(end);
        Ok(Some(Value::String(text)))
    }
}

/// Matches a pattern at the current column, producing its capture groups
pub struct GroupRegexChomper {
    pattern: String,
    regex: Regex,
}

impl GroupRegexChomper {
    /// Compile `pattern`, anchored at the current column
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: pattern.to_string(),
            regex: regex_cache::get_or_compile(pattern)?,
        })
    }

    pub(crate) fn chomp(&self, state: &mut ChompState<'_>, tracker: &mut ErrorTracker) -> ChompResult {
        let chunk = Arc::clone(state.current());
        let (end, groups) = match regex_cache::captures_at(&self.regex, &chunk, state.column()) {
            Some(caps) => {
                let groups: Vec<Value> = caps
                    .iter()
                    .skip(1)
                    .map(|g| g.map_or(Value::Nil, |m| Value::string(m.as_str())))
                    .collect();
                // group 0 always participates
                let whole = caps.get(0).map_or(state.column(), |m| m.end());
                (whole, groups)
            }
            None => {
                tracker.report(expected(&self.pattern), state.location());
                return Ok(None);
            }
        };
        state.advance_to(end);
        Ok(Some(Value::Array(groups)))
    }
}

/// Consumes everything before the first match of a lookahead pattern
///
/// The scan crosses chunk boundaries and stops at the end of input when
/// the pattern never matches, so `until` itself never fails.
pub struct UntilChomper {
    regex: Regex,
    reducer: Option<PiecesFn>,
}

impl UntilChomper {
    /// Compile the lookahead `pattern`
    pub fn new(pattern: &str, reducer: Option<PiecesFn>) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: regex_cache::get_or_compile(pattern)?,
            reducer,
        })
    }

    pub(crate) fn chomp(&self, state: &mut ChompState<'_>, tracker: &mut ErrorTracker) -> ChompResult {
        let start = state.location();
        let mut pieces = Vec::new();
        loop {
            let column = state.column();
            let found = self.regex.find_at(state.current(), column).map(|m| m.start());
            match found {
                Some(end) => {
                    pieces.push(state.current()[column..end].to_string());
                    state.advance_to(end);
                    break;
                }
                None => {
                    pieces.push(state.rest().to_string());
                    let end = state.current().len();
                    state.advance_to(end);
                    if state.at_end() {
                        break;
                    }
                }
            }
        }

        match &self.reducer {
            None => Ok(Some(Value::String(pieces.concat()))),
            Some(reduce) => match reduce(pieces) {
                Ok(value) => Ok(Some(value)),
                Err(msg) => Err(application_error(tracker, start, msg)),
            },
        }
    }
}

fn expected(pattern: &str) -> String {
    format!("Expected pattern '{}'", pattern)
}
