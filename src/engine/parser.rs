//! Parser Façade
//!
//! [`Parser`] is the public handle on a grammar tree. It is cheap to clone,
//! immutable and `Send + Sync`, so one grammar can be built once and used
//! for any number of parses, from any number of threads. Every parse gets
//! its own [`ChompState`] and [`ErrorTracker`].
//!
//! # Example
//!
//! ```rust
//! use fro::prelude::*;
//!
//! let pair = compose_sep([intp(), intp()], "~,").name("pair");
//! let value = pair.parse_one("3,4").unwrap().unwrap();
//! assert_eq!(value, Value::array(vec![Value::int(3), Value::int(4)]));
//! ```

use super::chomper::{Chomper, ChomperKind, MapFn};
use super::control::{MapChomper, MemoChomper};
use super::error::{ErrorKind, ErrorTracker, ParseError};
use super::primitives::{RegexChomper, UntilChomper};
use super::state::{ChompState, MemoId};
use super::structural::{CompositionChomper, OptionalChomper};
use super::value::Value;
use std::fmt;
use std::sync::Arc;

/// Default maximum recursion depth
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 1000;

/// Per-parse limits
///
/// The recursion depth counts every chomper on the active path, not only
/// recursive entries. A rule that recurses through `k` chompers uses `k`
/// levels per nesting level of the input. For example, a `tie` grammar of
/// the form `alt([compose([open, inner, close]).get().map(f), empty])`
/// costs five levels per nesting level, so the default admits about 200
/// levels of nesting. Raise the limit for deeper input, keeping in mind
/// that each level also uses native stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum nesting of chomper calls (0 = unlimited)
    pub max_recursion_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
        }
    }
}

impl ParserConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum recursion depth
    pub fn with_max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }
}

/// An immutable parser
#[derive(Clone)]
pub struct Parser {
    chomper: Chomper,
}

impl Parser {
    pub(crate) fn from_chomper(chomper: Chomper) -> Self {
        Self { chomper }
    }

    pub(crate) fn into_chomper(self) -> Chomper {
        self.chomper
    }

    /// The root of the grammar tree
    pub fn chomper(&self) -> &Chomper {
        &self.chomper
    }

    fn wrap(&self, kind: ChomperKind) -> Parser {
        Parser::from_chomper(self.chomper.restyle(kind))
    }

    // ========================================================================
    // Parsing
    // ========================================================================

    /// Parse a sequence of chunks with the default configuration
    ///
    /// # Returns
    /// * `Ok(Some(value))` if the whole input was consumed
    /// * `Ok(None)` if the parser is quiet and the input did not match
    /// * `Err(ParseError)` otherwise, and for fatal errors even when quiet
    pub fn parse<I, S>(&self, chunks: I) -> Result<Option<Value>, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parse_with_config(chunks, &ParserConfig::default())
    }

    /// Parse a sequence of chunks under `config`
    pub fn parse_with_config<I, S>(
        &self,
        chunks: I,
        config: &ParserConfig,
    ) -> Result<Option<Value>, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = ChompState::new(
            chunks.into_iter().map(|chunk: S| -> String { chunk.into() }),
            config.max_recursion_depth,
        );
        let mut tracker = ErrorTracker::new();
        log_debug!("parse start: {:?}", self.chomper);

        let outcome = self.chomper.chomp(&mut state, &mut tracker);
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                log_debug!("parse aborted: {:?} at {}", err.kind, err.location);
                return Err(err);
            }
        };

        if let Some(value) = outcome {
            if state.at_end() {
                log_debug!("parse finished at {}", state.location());
                return Ok(Some(value));
            }
            tracker.report("Expected end of input", state.location());
        }

        if self.chomper.quiet() {
            return Ok(None);
        }
        let err = tracker.retrieve_error().unwrap_or_else(|| {
            ParseError::single(ErrorKind::Failure, state.location(), "Parse failed", None)
        });
        log_debug!("parse failed at {}", err.location);
        Err(err)
    }

    /// Parse a single chunk
    pub fn parse_one(&self, text: &str) -> Result<Option<Value>, ParseError> {
        self.parse(std::iter::once(text))
    }

    /// Parse `text` split into line chunks, line terminators included
    pub fn parse_str(&self, text: &str) -> Result<Option<Value>, ParseError> {
        self.parse(split_lines(text))
    }

    // ========================================================================
    // Flags
    // ========================================================================

    /// Copy of this parser whose failures are reported under `name`
    pub fn name(&self, name: impl Into<String>) -> Parser {
        let name: Arc<str> = Arc::from(name.into());
        Parser::from_chomper(self.chomper.with_name(Some(name)))
    }

    /// Copy of this parser that yields no value instead of a recoverable error
    pub fn quiet(&self) -> Parser {
        Parser::from_chomper(self.chomper.with_quiet(true))
    }

    /// Copy of this parser whose value is kept by an enclosing composition
    pub fn fertile(&self) -> Parser {
        self.refertilize(true)
    }

    /// Copy of this parser whose value is dropped by an enclosing composition
    pub fn infertile(&self) -> Parser {
        self.refertilize(false)
    }

    fn refertilize(&self, fertile: bool) -> Parser {
        if self.chomper.fertile() == fertile {
            return self.clone();
        }
        let delegate = self.wrap(ChomperKind::Delegate(self.chomper.clone()));
        Parser::from_chomper(delegate.chomper.with_fertile(fertile))
    }

    /// The name set with [`Parser::name`]
    pub fn label(&self) -> Option<&str> {
        self.chomper.name().map(|n| &**n)
    }

    /// Whether the parser is fertile
    pub fn is_fertile(&self) -> bool {
        self.chomper.fertile()
    }

    /// Whether the parser is quiet
    pub fn is_quiet(&self) -> bool {
        self.chomper.quiet()
    }

    // ========================================================================
    // Values
    // ========================================================================

    /// Transform the produced value
    pub fn map<F, T>(&self, f: F) -> Parser
    where
        F: Fn(Value) -> T + Send + Sync + 'static,
        T: Into<Value> + 'static,
    {
        self.try_map(move |v| Ok::<T, String>(f(v)))
    }

    /// Transform the produced value, failing the parse on `Err`
    ///
    /// An `Err` becomes a fatal application error located at the start of
    /// this parser's match.
    pub fn try_map<F, T, E>(&self, f: F) -> Parser
    where
        F: Fn(Value) -> Result<T, E> + Send + Sync + 'static,
        T: Into<Value> + 'static,
        E: fmt::Display + 'static,
    {
        let func: MapFn = Arc::new(move |v: Value| -> Result<Value, String> {
            f(v).map(Into::into).map_err(|e| e.to_string())
        });
        self.wrap(ChomperKind::Map(MapChomper::new(self.chomper.clone(), func)))
    }

    /// Transform the elements of a produced array
    pub fn flat_map<F, T>(&self, f: F) -> Parser
    where
        F: Fn(Vec<Value>) -> T + Send + Sync + 'static,
        T: Into<Value> + 'static,
    {
        self.try_map(move |v| match v {
            Value::Array(items) => Ok(f(items)),
            other => Err(format!("expected an array, found {}", other.type_name())),
        })
    }

    /// Unwrap a single-element array
    pub fn get(&self) -> Parser {
        self.try_map(|v| match v {
            Value::Array(mut items) if items.len() == 1 => Ok(items.remove(0)),
            Value::Array(items) => Err(format!("expected a single value, found {}", items.len())),
            other => Err(format!("expected a single value, found {}", other.type_name())),
        })
    }

    /// Produce `default` without consuming input when this parser fails
    pub fn maybe(&self, default: impl Into<Value>) -> Parser {
        self.wrap(ChomperKind::Optional(OptionalChomper::new(
            self.chomper.clone(),
            default.into(),
        )))
    }

    /// Record every value this parser produces, for use by
    /// [`dependent`](super::parser_dsl::dependent)
    pub fn memo(&self) -> Parser {
        self.wrap(ChomperKind::Memo(MemoChomper::new(self.chomper.clone())))
    }

    /// Id of the values recorded by a [`Parser::memo`] parser
    pub fn memo_id(&self) -> Option<MemoId> {
        match self.chomper.kind() {
            ChomperKind::Memo(memo) => Some(memo.id()),
            _ => None,
        }
    }

    // ========================================================================
    // Surroundings
    // ========================================================================

    /// Require `prefix` before this parser, dropping its value
    pub fn prepend(&self, prefix: impl Into<Parser>) -> Parser {
        self.surround(Some(prefix.into().chomper), None)
    }

    /// Require `suffix` after this parser, dropping its value
    pub fn append(&self, suffix: impl Into<Parser>) -> Parser {
        self.surround(None, Some(suffix.into().chomper))
    }

    /// Skip whitespace before this parser, within the current chunk
    pub fn lstrip(&self) -> Parser {
        self.surround(Some(whitespace()), None)
    }

    /// Skip whitespace after this parser, within the current chunk
    pub fn rstrip(&self) -> Parser {
        self.surround(None, Some(whitespace()))
    }

    /// Skip whitespace on both sides, within the current chunk
    pub fn strip(&self) -> Parser {
        self.lstrip().rstrip()
    }

    /// Skip whitespace before this parser, across chunks
    pub fn lstrips(&self) -> Parser {
        self.surround(Some(whitespace_across_chunks()), None)
    }

    /// Skip whitespace after this parser, across chunks
    pub fn rstrips(&self) -> Parser {
        self.surround(None, Some(whitespace_across_chunks()))
    }

    /// Skip whitespace on both sides, across chunks
    pub fn strips(&self) -> Parser {
        self.lstrips().rstrips()
    }

    fn surround(&self, before: Option<Chomper>, after: Option<Chomper>) -> Parser {
        let mut children = Vec::with_capacity(3);
        children.extend(before.map(|c| c.with_fertile(false)));
        children.push(self.chomper.with_fertile(true));
        children.extend(after.map(|c| c.with_fertile(false)));

        let composed = Chomper::new(ChomperKind::Composition(CompositionChomper::new(
            children, None,
        )))
        .with_name(self.chomper.name().cloned())
        .with_quiet(self.chomper.quiet());
        let unwrapped = Parser::from_chomper(composed).get();
        if self.chomper.fertile() {
            unwrapped
        } else {
            unwrapped.infertile()
        }
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Parser").field(&self.chomper).finish()
    }
}

fn whitespace() -> Chomper {
    match RegexChomper::new(r"\s*") {
        Ok(regex) => Chomper::new(ChomperKind::Regex(regex)),
        Err(err) => unreachable!("whitespace pattern is valid: {}", err),
    }
}

fn whitespace_across_chunks() -> Chomper {
    match UntilChomper::new(r"\S", None) {
        Ok(until) => Chomper::new(ChomperKind::Until(until)),
        Err(err) => unreachable!("whitespace pattern is valid: {}", err),
    }
}

/// Split `text` into lines, keeping each line's terminator
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut start = 0;
    for end in memchr::memchr_iter(b'\n', text.as_bytes()) {
        lines.push(text[start..=end].to_string());
        start = end + 1;
    }
    if start < text.len() {
        lines.push(text[start..].to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::parser_dsl::{compose, intp, natp, regex};

    #[test]
    fn test_split_lines_keeps_terminators() {
        assert_eq!(split_lines("a\nb\r\nc"), vec!["a\n", "b\r\n", "c"]);
        assert_eq!(split_lines("a\n"), vec!["a\n"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_config_builder() {
        let config = ParserConfig::new().with_max_recursion_depth(10);
        assert_eq!(config.max_recursion_depth, 10);
        assert_eq!(
            ParserConfig::default().max_recursion_depth,
            DEFAULT_MAX_RECURSION_DEPTH
        );
    }

    #[test]
    fn test_requires_full_consumption() {
        let p = regex("ab");
        assert!(p.parse_one("ab").unwrap().is_some());
        let err = p.parse_one("abc").unwrap_err();
        assert_eq!(err.column(), 3);
        assert_eq!(err.messages[0].message, "Expected end of input");
    }

    #[test]
    fn test_quiet_yields_none() {
        let p = regex("ab").quiet();
        assert_eq!(p.parse_one("x").unwrap(), None);
        assert_eq!(p.parse_one("abc").unwrap(), None);
    }

    #[test]
    fn test_flags_do_not_mutate_original() {
        let base = regex("a");
        let named = base.name("letter");
        let quiet = named.quiet();
        assert_eq!(base.label(), None);
        assert_eq!(named.label(), Some("letter"));
        assert!(!named.is_quiet());
        assert!(quiet.is_quiet());
    }

    #[test]
    fn test_fertility_flip_keeps_name() {
        let p = regex("a").name("letter").infertile();
        assert!(!p.is_fertile());
        assert_eq!(p.label(), Some("letter"));
        assert!(p.fertile().is_fertile());
    }

    #[test]
    fn test_map_and_get() {
        let doubled = intp().map(|v| v.as_int().unwrap_or(0) * 2);
        assert_eq!(doubled.parse_one("21").unwrap(), Some(Value::int(42)));

        let single = compose([intp()]).get();
        assert_eq!(single.parse_one("7").unwrap(), Some(Value::int(7)));

        let err = compose([intp(), intp()]).get().parse_one("12").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Application);
    }

    #[test]
    fn test_flat_map() {
        let sum = compose([intp(), regex("~\\+"), intp()])
            .flat_map(|items| items.iter().filter_map(Value::as_int).sum::<i64>());
        assert_eq!(sum.parse_one("2+3").unwrap(), Some(Value::int(5)));
    }

    #[test]
    fn test_try_map_error_is_fatal_even_when_quiet() {
        let p = regex("[a-z]+")
            .try_map(|v| Err::<Value, _>(format!("unknown word {}", v)))
            .quiet();
        let err = p.parse_one("abc").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Application);
        assert!(err.messages[0].message.contains("unknown word"));
    }

    #[test]
    fn test_maybe() {
        let p = compose([regex("a"), regex("b").maybe(Value::Nil), regex("c")]);
        assert_eq!(
            p.parse_one("ac").unwrap(),
            Some(Value::array(vec![
                Value::string("a"),
                Value::Nil,
                Value::string("c")
            ]))
        );
    }

    #[test]
    fn test_strip_variants() {
        assert_eq!(intp().lstrip().parse_one("  12").unwrap(), Some(Value::int(12)));
        assert!(intp().lstrip().parse_one("45 ").is_err());
        assert_eq!(
            natp().rstrip().parse_one("7890\r\n\r").unwrap(),
            Some(Value::int(7890))
        );
        assert!(regex("abc").strip().parse_one("ab c").is_err());
        assert_eq!(
            regex("abc").strip().parse_one(" abc \t").unwrap(),
            Some(Value::string("abc"))
        );
    }

    #[test]
    fn test_strips_cross_chunks() {
        let p = intp().strips();
        assert_eq!(p.parse(vec!["  \n", "  5 \n", "\n"]).unwrap(), Some(Value::int(5)));
    }

    #[test]
    fn test_prepend_append() {
        let p = intp().prepend("#").append(";");
        assert_eq!(p.parse_one("#9;").unwrap(), Some(Value::int(9)));
        assert!(p.parse_one("9;").is_err());
    }

    #[test]
    fn test_infertile_strip_stays_infertile() {
        let p = regex("x").infertile().strip();
        assert!(!p.is_fertile());
        let comp = compose([p, intp()]);
        assert_eq!(
            comp.parse_one(" x 3").unwrap(),
            Some(Value::array(vec![Value::int(3)]))
        );
    }

    #[test]
    fn test_parse_str_splits_lines() {
        let p = crate::engine::parser_dsl::seq(intp().rstrips()).build();
        assert_eq!(
            p.parse_str("1\n2\n3\n").unwrap(),
            Some(Value::array(vec![Value::int(1), Value::int(2), Value::int(3)]))
        );
    }
}
