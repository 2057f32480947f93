//! Structural combinators: composition, alternation and optional

use super::chomper::{ChompResult, Chomper};
use super::error::ErrorTracker;
use super::state::ChompState;
use super::value::Value;

/// Chomps each child in order, optionally separated
///
/// Produces an array of the fertile children's values. A failing child
/// fails the whole composition without giving back what earlier children
/// consumed; recovery belongs to an enclosing alternation or optional.
pub struct CompositionChomper {
    children: Vec<Chomper>,
    separator: Option<Chomper>,
}

impl CompositionChomper {
    /// Create a composition
    pub fn new(children: Vec<Chomper>, separator: Option<Chomper>) -> Self {
        Self {
            children,
            separator,
        }
    }

    pub(crate) fn chomp(&self, state: &mut ChompState<'_>, tracker: &mut ErrorTracker) -> ChompResult {
        let mut values = Vec::with_capacity(self.children.len());
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                if let Some(sep) = &self.separator {
                    if sep.chomp(state, tracker)?.is_none() {
                        return Ok(None);
                    }
                }
            }
            match child.chomp(state, tracker)? {
                Some(value) if child.fertile() => values.push(value),
                Some(_) => {}
                None => return Ok(None),
            }
        }
        Ok(Some(Value::Array(values)))
    }
}

/// Tries each child from the same position; the first match wins
pub struct AlternationChomper {
    children: Vec<Chomper>,
}

impl AlternationChomper {
    /// Create an alternation
    pub fn new(children: Vec<Chomper>) -> Self {
        Self { children }
    }

    pub(crate) fn chomp(&self, state: &mut ChompState<'_>, tracker: &mut ErrorTracker) -> ChompResult {
        let mark = state.mark();
        for child in &self.children {
            if let Some(value) = child.chomp(state, tracker)? {
                return Ok(Some(value));
            }
            state.rollback(mark, tracker)?;
        }
        tracker.report("No alternative matched", state.location());
        Ok(None)
    }
}

/// Produces a default value when its child fails
pub struct OptionalChomper {
    child: Chomper,
    default: Value,
}

impl OptionalChomper {
    /// Create an optional
    pub fn new(child: Chomper, default: Value) -> Self {
        Self { child, default }
    }

    pub(crate) fn chomp(&self, state: &mut ChompState<'_>, tracker: &mut ErrorTracker) -> ChompResult {
        let mark = state.mark();
        match self.child.chomp(state, tracker)? {
            Some(value) => Ok(Some(value)),
            None => {
                state.rollback(mark, tracker)?;
                Ok(Some(self.default.clone()))
            }
        }
    }
}
