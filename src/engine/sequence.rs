//! Sequence Chomper
//!
//! Repeats an element, optionally separated, and hands the elements to a
//! reducer through [`Elements`], a pull-based iterator. Input is consumed
//! one element at a time as the reducer pulls, so a reducer that stops
//! early leaves the rest of the input untouched.
//!
//! Separator placement is configured per sequence:
//!
//! | mode               | grammar                    |
//! |--------------------|----------------------------|
//! | plain              | `elem (sep elem)*`         |
//! | leading            | `sep (elem (sep elem)*)?`  |
//! | trailing           | `(elem sep)*`              |
//! | leading + trailing | `sep (elem sep)*`          |
//!
//! A missing leading separator fails the sequence. Any other failure ends
//! the repetition and gives back everything after the last accepted
//! element. A repetition that consumes no input ends the sequence after
//! that element.

use super::chomper::{application_error, ChompResult, Chomper, ReduceFn};
use super::error::{ErrorTracker, ParseError};
use super::state::ChompState;
use super::value::Value;

/// Repetition of an element, lazily reduced
pub struct SequenceChomper {
    element: Chomper,
    separator: Option<Chomper>,
    leading: bool,
    trailing: bool,
    reducer: Option<ReduceFn>,
}

impl SequenceChomper {
    /// Create a sequence; without a reducer, elements are collected into an array
    pub fn new(
        element: Chomper,
        separator: Option<Chomper>,
        leading: bool,
        trailing: bool,
        reducer: Option<ReduceFn>,
    ) -> Self {
        Self {
            element,
            separator,
            leading,
            trailing,
            reducer,
        }
    }

    pub(crate) fn chomp(&self, state: &mut ChompState<'_>, tracker: &mut ErrorTracker) -> ChompResult {
        let start = state.location();
        if self.leading {
            if let Some(sep) = &self.separator {
                if sep.chomp(state, tracker)?.is_none() {
                    return Ok(None);
                }
            }
        }

        let mut cursor = SeqCursor {
            seq: self,
            state,
            tracker,
            pulled: 0,
            done: false,
            halt: None,
        };
        let reduced = {
            let mut elements = Elements {
                source: &mut cursor,
            };
            match &self.reducer {
                Some(reduce) => reduce(&mut elements),
                None => Ok(Value::Array(elements.collect())),
            }
        };

        if let Some(err) = cursor.halt.take() {
            return Err(err);
        }
        match reduced {
            Ok(value) => Ok(Some(value)),
            Err(msg) => Err(application_error(cursor.tracker, start, msg)),
        }
    }
}

/// Something that yields sequence elements on demand
trait ElementSource {
    fn pull(&mut self) -> Option<Value>;
}

/// The elements of a sequence, parsed as they are pulled
///
/// Handed to sequence reducers. Each call to `next` parses at most one
/// more element.
pub struct Elements<'a> {
    source: &'a mut (dyn ElementSource + 'a),
}

impl Iterator for Elements<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.source.pull()
    }
}

struct SeqCursor<'s, 'i> {
    seq: &'s SequenceChomper,
    state: &'s mut ChompState<'i>,
    tracker: &'s mut ErrorTracker,
    pulled: usize,
    done: bool,
    halt: Option<ParseError>,
}

impl SeqCursor<'_, '_> {
    /// Parse the next element, giving back any partial progress on failure
    fn step(&mut self) -> ChompResult {
        let mark = self.state.mark();
        let sep = self.seq.separator.as_ref();

        if !self.seq.trailing && self.pulled > 0 {
            if let Some(sep) = sep {
                if sep.chomp(self.state, self.tracker)?.is_none() {
                    self.state.rollback(mark, self.tracker)?;
                    return Ok(None);
                }
            }
        }

        let value = match self.seq.element.chomp(self.state, self.tracker)? {
            Some(value) => value,
            None => {
                self.state.rollback(mark, self.tracker)?;
                return Ok(None);
            }
        };

        if self.seq.trailing {
            if let Some(sep) = sep {
                if sep.chomp(self.state, self.tracker)?.is_none() {
                    self.state.rollback(mark, self.tracker)?;
                    return Ok(None);
                }
            }
        }

        self.pulled += 1;
        Ok(Some(value))
    }
}

impl ElementSource for SeqCursor<'_, '_> {
    fn pull(&mut self) -> Option<Value> {
        if self.done {
            return None;
        }
        let before = self.state.mark();
        match self.step() {
            Ok(Some(value)) => {
                // an element that consumes nothing would repeat forever
                if self.state.mark() == before {
                    self.done = true;
                }
                Some(value)
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                self.halt = Some(err);
                None
            }
        }
    }
}
