//! Error Reporting for Fro
//!
//! Parsing failures are tracked with a farthest-failure heuristic: among
//! all recoverable failures seen during one parse, only those at the
//! most advanced [`Location`] are kept. Each message is tagged with the
//! innermost named chomper that was active when it was reported.
//!
//! # Example Output
//!
//! ```text
//! Error at line 1, column 6:
//! [1,2,X]
//!      ^
//! - Expected pattern '-?[0-9]+' (when parsing int)
//! ```

use super::location::Location;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// One failure description, qualified by the chomper name active at the time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorMessage {
    /// The error message
    pub message: String,
    /// Innermost named chomper active when the failure was reported
    pub name: Option<String>,
}

impl ErrorMessage {
    /// Create a new message
    pub fn new(message: impl Into<String>, name: Option<String>) -> Self {
        Self {
            message: message.into(),
            name,
        }
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} (when parsing {})", self.message, name),
            None => write!(f, "{}", self.message),
        }
    }
}

/// What kind of failure ended the parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// The input did not match the grammar
    Failure,
    /// A chomper consumed into a later chunk before failing, so it could
    /// not be rolled back
    FailedLookahead,
    /// A caller-supplied mapper or reducer returned an error
    Application,
    /// The grammar was wired incorrectly (e.g. an unresolved stub)
    Misuse,
    /// The recursion depth limit was exceeded
    RecursionLimit,
}

impl ErrorKind {
    /// Whether alternation and optional chompers may recover from this kind
    ///
    /// Only [`ErrorKind::Failure`] is ever recoverable; every other kind
    /// ends the parse.
    #[inline]
    pub fn is_fatal(self) -> bool {
        !matches!(self, ErrorKind::Failure)
    }
}

/// A located parse error
#[derive(Debug, Clone)]
pub struct ParseError {
    /// The kind of failure
    pub kind: ErrorKind,
    /// Where the failure occurred
    pub location: Location,
    /// Ordered failure messages (ties at the same location are all kept)
    pub messages: Vec<ErrorMessage>,
}

/// Serializable snapshot of a [`ParseError`]
#[derive(Debug, Clone, Serialize)]
struct ErrorReport<'a> {
    kind: ErrorKind,
    line: usize,
    column: usize,
    context: &'a str,
    messages: &'a [ErrorMessage],
}

impl ParseError {
    /// Create a new error
    pub fn new(kind: ErrorKind, location: Location, messages: Vec<ErrorMessage>) -> Self {
        Self {
            kind,
            location,
            messages,
        }
    }

    /// Create an error carrying a single message
    pub fn single(
        kind: ErrorKind,
        location: Location,
        message: impl Into<String>,
        name: Option<String>,
    ) -> Self {
        Self::new(kind, location, vec![ErrorMessage::new(message, name)])
    }

    /// Line number (1-based)
    #[inline]
    pub fn line(&self) -> usize {
        self.location.line()
    }

    /// Column number (1-based, in characters)
    #[inline]
    pub fn column(&self) -> usize {
        self.location.char_column()
    }

    /// Names attached to the messages, in message order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().filter_map(|m| m.name.as_deref())
    }

    /// Printable context snippet of the offending chunk, with a caret
    pub fn context(&self) -> String {
        self.location.format_with_caret()
    }

    /// Serialize the error report to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&ErrorReport {
            kind: self.kind,
            line: self.line(),
            column: self.column(),
            context: self.location.line_text(),
            messages: &self.messages,
        })
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Error at line {}, column {}:",
            self.line(),
            self.column()
        )?;
        writeln!(f, "{}", self.context())?;
        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "- {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Tracks the most relevant failures seen during one parse
///
/// One tracker is created per top-level parse call and threaded through
/// every chomp. It also keeps the stack of currently active chomper
/// names, used to qualify reported messages.
#[derive(Debug, Default)]
pub struct ErrorTracker {
    farthest: Option<Location>,
    messages: Vec<ErrorMessage>,
    names: Vec<Arc<str>>,
}

impl ErrorTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a name onto the active-name stack
    #[inline]
    pub fn offer_name(&mut self, name: &Arc<str>) {
        self.names.push(Arc::clone(name));
    }

    /// Pop a name from the active-name stack
    ///
    /// # Panics
    ///
    /// Panics if `name` is not the innermost active name, which means a
    /// chomper did not balance its own bookkeeping.
    pub fn revoke_name(&mut self, name: &Arc<str>) {
        match self.names.pop() {
            Some(current) if current == *name => {}
            Some(current) => panic!("cannot revoke name {:?}, current name is {:?}", name, current),
            None => panic!("tracker contains no names, cannot revoke {:?}", name),
        }
    }

    /// Innermost active name, if any
    pub fn current_name(&self) -> Option<String> {
        self.names.last().map(|n| n.to_string())
    }

    /// Farthest location at which a failure was reported
    pub fn farthest(&self) -> Option<&Location> {
        self.farthest.as_ref()
    }

    /// Report a recoverable failure at `location`
    ///
    /// A strictly farther failure replaces the retained set, a tie is
    /// appended and anything nearer is ignored.
    pub fn report(&mut self, message: impl Into<String>, location: Location) {
        let entry = ErrorMessage::new(message, self.current_name());
        match self.farthest.as_ref().map(|f| location.cmp(f)) {
            Some(std::cmp::Ordering::Less) => {}
            Some(std::cmp::Ordering::Equal) => {
                if !self.messages.contains(&entry) {
                    self.messages.push(entry);
                }
            }
            _ => {
                self.farthest = Some(location);
                self.messages.clear();
                self.messages.push(entry);
            }
        }
    }

    /// Build an error of `kind` at `location`, qualified by the current name
    pub fn fatal(&self, kind: ErrorKind, location: Location, message: impl Into<String>) -> ParseError {
        ParseError::single(kind, location, message, self.current_name())
    }

    /// Build the failed-lookahead error raised when a rollback would cross
    /// back into an earlier chunk
    ///
    /// The error is placed at the farthest reported failure, which is where
    /// the consumed branch actually broke down.
    pub fn failed_lookahead(&self, fallback: Location) -> ParseError {
        let location = self.farthest.clone().unwrap_or(fallback);
        let mut messages = vec![ErrorMessage::new(
            "Failed lookahead: cannot roll back into an earlier chunk",
            self.current_name(),
        )];
        messages.extend(self.messages.iter().cloned());
        ParseError::new(ErrorKind::FailedLookahead, location, messages)
    }

    /// Turn the retained failures into a [`ParseError`]
    pub fn retrieve_error(&self) -> Option<ParseError> {
        self.farthest
            .as_ref()
            .map(|loc| ParseError::new(ErrorKind::Failure, loc.clone(), self.messages.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(chunk: usize, column: usize) -> Location {
        Location::new(chunk, column, Arc::from("abcdef"))
    }

    #[test]
    fn test_farther_failure_replaces() {
        let mut tracker = ErrorTracker::new();
        tracker.report("first", loc(0, 1));
        tracker.report("second", loc(0, 3));
        let err = tracker.retrieve_error().unwrap();
        assert_eq!(err.location.column, 3);
        assert_eq!(err.messages.len(), 1);
        assert_eq!(err.messages[0].message, "second");
    }

    #[test]
    fn test_nearer_failure_ignored() {
        let mut tracker = ErrorTracker::new();
        tracker.report("far", loc(1, 0));
        tracker.report("near", loc(0, 5));
        let err = tracker.retrieve_error().unwrap();
        assert_eq!(err.location.chunk_index, 1);
        assert_eq!(err.messages[0].message, "far");
    }

    #[test]
    fn test_ties_keep_all_messages() {
        let mut tracker = ErrorTracker::new();
        tracker.report("a", loc(0, 2));
        tracker.report("b", loc(0, 2));
        tracker.report("a", loc(0, 2));
        let err = tracker.retrieve_error().unwrap();
        let messages: Vec<_> = err.messages.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(messages, vec!["a", "b"]);
    }

    #[test]
    fn test_messages_carry_innermost_name() {
        let mut tracker = ErrorTracker::new();
        let outer: Arc<str> = Arc::from("outer");
        let inner: Arc<str> = Arc::from("inner");
        tracker.offer_name(&outer);
        tracker.offer_name(&inner);
        tracker.report("boom", loc(0, 0));
        tracker.revoke_name(&inner);
        tracker.report("bang", loc(0, 0));
        tracker.revoke_name(&outer);

        let err = tracker.retrieve_error().unwrap();
        let names: Vec<_> = err.names().collect();
        assert_eq!(names, vec!["inner", "outer"]);
        assert!(tracker.current_name().is_none());
    }

    #[test]
    #[should_panic(expected = "cannot revoke")]
    fn test_unbalanced_revoke_panics() {
        let mut tracker = ErrorTracker::new();
        tracker.offer_name(&Arc::from("a"));
        tracker.revoke_name(&Arc::from("b"));
    }

    #[test]
    fn test_empty_tracker_has_no_error() {
        assert!(ErrorTracker::new().retrieve_error().is_none());
    }

    #[test]
    fn test_display_and_json() {
        let err = ParseError::single(
            ErrorKind::Failure,
            Location::new(0, 2, Arc::from("ab$d")),
            "Expected pattern 'c'",
            Some("letters".to_string()),
        );
        let rendered = err.to_string();
        assert!(rendered.starts_with("Error at line 1, column 3:"));
        assert!(rendered.contains("ab$d\n  ^"));
        assert!(rendered.contains("(when parsing letters)"));

        let json = err.to_json().unwrap();
        assert!(json.contains("\"line\":1"));
        assert!(json.contains("\"column\":3"));
        assert!(json.contains("\"kind\":\"Failure\""));
    }
}
