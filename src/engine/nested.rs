//! Balanced delimiter matching
//!
//! Nesting is tracked with a counter rather than recursion, so arbitrarily
//! deep input uses constant stack. Matching is confined to the chunk the
//! opening delimiter was found in.
//!
//! Inside the scan, delimiter matches that consume nothing are skipped,
//! so patterns such as `a*` cannot stall the search. The opening match
//! itself may be empty.

use super::chomper::ChompResult;
use super::error::ErrorTracker;
use super::regex_cache;
use super::state::ChompState;
use super::value::Value;
use regex::{Match, Regex};
use std::sync::Arc;

/// Matches `open ... close` with balanced inner delimiters
pub struct NestedChomper {
    open_pattern: String,
    close_pattern: String,
    open: Regex,
    close: Regex,
}

impl NestedChomper {
    /// Compile the delimiter patterns
    pub fn new(open: &str, close: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            open_pattern: open.to_string(),
            close_pattern: close.to_string(),
            open: regex_cache::get_or_compile(open)?,
            close: regex_cache::get_or_compile(close)?,
        })
    }

    pub(crate) fn chomp(&self, state: &mut ChompState<'_>, tracker: &mut ErrorTracker) -> ChompResult {
        let start = state.location();
        let text = Arc::clone(state.current());
        let column = state.column();

        let inner_start = match regex_cache::match_at(&self.open, &text, column) {
            Some(m) => m.end(),
            None => {
                tracker.report(format!("Expected pattern '{}'", self.open_pattern), start);
                return Ok(None);
            }
        };

        let mut depth = 1usize;
        let mut pos = inner_start;
        loop {
            let open = next_token(&self.open, &text, pos);
            let close = next_token(&self.close, &text, pos);
            let (token, opens) = match (open, close) {
                (None, None) => {
                    tracker.report(
                        format!(
                            "No closing '{}' to match opening '{}'",
                            self.close_pattern, self.open_pattern
                        ),
                        start,
                    );
                    return Ok(None);
                }
                (Some(o), None) => (o, true),
                (None, Some(c)) => (c, false),
                (Some(o), Some(c)) if c.start() < o.start() => (c, false),
                (Some(o), Some(_)) => (o, true),
            };

            if opens {
                depth += 1;
            } else {
                depth -= 1;
                if depth == 0 {
                    let inner = text[inner_start..token.start()].to_string();
                    state.advance_to(token.end());
                    return Ok(Some(Value::String(inner)));
                }
            }
            pos = token.end();
        }
    }
}

/// First non-empty match of `regex` at or after `pos`
fn next_token<'h>(regex: &Regex, text: &'h str, mut pos: usize) -> Option<Match<'h>> {
    loop {
        let m = regex.find_at(text, pos)?;
        if m.end() > m.start() {
            return Some(m);
        }
        let step = text[m.end()..].chars().next()?.len_utf8();
        pos = m.end() + step;
    }
}
