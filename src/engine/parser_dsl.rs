//! Parser DSL - Grammar Construction
//!
//! Free functions that build [`Parser`]s, plus a handful of ready-made
//! parsers for common tokens.
//!
//! Anywhere a parser is expected, a pattern string can be passed instead;
//! it is promoted to a [`regex`] parser. A leading `~` makes the promoted
//! parser infertile (its value is dropped from compositions), and `\~`
//! stands for a literal leading tilde.
//!
//! # Example
//!
//! ```rust
//! use fro::prelude::*;
//!
//! // [1,2,3] -> [1, 2, 3]
//! let list = compose([
//!     regex(r"~\["),
//!     seq(intp()).separator("~,").build(),
//!     regex(r"~\]"),
//! ])
//! .get();
//!
//! let value = list.parse_one("[1,2,3]").unwrap().unwrap();
//! assert_eq!(value, Value::from(vec![1i64, 2, 3]));
//! ```

use super::chomper::{BuildFn, Chomper, ChomperKind, DependFn, PiecesFn, ReduceFn, ThunkFn};
use super::control::{DependentChomper, LazyChomper, StubChomper, ThunkChomper};
use super::nested::NestedChomper;
use super::parser::Parser;
use super::primitives::{GroupRegexChomper, RegexChomper, UntilChomper};
use super::sequence::{Elements, SequenceChomper};
use super::structural::{AlternationChomper, CompositionChomper};
use super::value::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Strip the fertility marker from a pattern
///
/// # Returns
/// The pattern to compile, and whether the parser is fertile
fn split_fertility(pattern: &str) -> (&str, bool) {
    if let Some(rest) = pattern.strip_prefix('~') {
        (rest, false)
    } else if pattern.starts_with(r"\~") {
        (&pattern[1..], true)
    } else {
        (pattern, true)
    }
}

fn leaf(kind: ChomperKind) -> Parser {
    Parser::from_chomper(Chomper::new(kind))
}

fn chompers<I, P>(parsers: I) -> Vec<Chomper>
where
    I: IntoIterator<Item = P>,
    P: Into<Parser>,
{
    parsers.into_iter().map(|p| p.into().into_chomper()).collect()
}

// ============================================================================
// Primitives
// ============================================================================

/// Match a regular expression at the current position, producing the match
///
/// # Panics
///
/// Panics if `pattern` is not a valid regular expression. Use
/// [`try_regex`] for patterns that are not known up front.
pub fn regex(pattern: &str) -> Parser {
    try_regex(pattern).unwrap_or_else(|err| panic!("invalid pattern {:?}: {}", pattern, err))
}

/// Match a regular expression, reporting invalid patterns
pub fn try_regex(pattern: &str) -> Result<Parser, regex::Error> {
    let (pattern, fertile) = split_fertility(pattern);
    let parser = leaf(ChomperKind::Regex(RegexChomper::new(pattern)?));
    Ok(if fertile { parser } else { parser.infertile() })
}

/// Match a regular expression, producing its capture groups as an array
///
/// Groups that did not participate in the match are [`Value::Nil`].
///
/// # Panics
///
/// Panics if `pattern` is not a valid regular expression.
pub fn group_regex(pattern: &str) -> Parser {
    try_group_regex(pattern)
        .unwrap_or_else(|err| panic!("invalid pattern {:?}: {}", pattern, err))
}

/// Match a regular expression producing groups, reporting invalid patterns
pub fn try_group_regex(pattern: &str) -> Result<Parser, regex::Error> {
    let (pattern, fertile) = split_fertility(pattern);
    let parser = leaf(ChomperKind::GroupRegex(GroupRegexChomper::new(pattern)?));
    Ok(if fertile { parser } else { parser.infertile() })
}

/// Consume everything up to the first match of `pattern`, across chunks
///
/// Produces the consumed text. Consumes to the end of input if the pattern
/// never matches.
///
/// # Panics
///
/// Panics if `pattern` is not a valid regular expression.
pub fn until(pattern: &str) -> Parser {
    build_until(pattern, None)
}

/// Like [`until`], reducing the consumed piece of each chunk with `f`
pub fn until_with<F, T, E>(pattern: &str, f: F) -> Parser
where
    F: Fn(Vec<String>) -> Result<T, E> + Send + Sync + 'static,
    T: Into<Value> + 'static,
    E: fmt::Display + 'static,
{
    let reducer: PiecesFn = Arc::new(move |pieces: Vec<String>| -> Result<Value, String> {
        f(pieces).map(Into::into).map_err(|e| e.to_string())
    });
    build_until(pattern, Some(reducer))
}

fn build_until(pattern: &str, reducer: Option<PiecesFn>) -> Parser {
    match UntilChomper::new(pattern, reducer) {
        Ok(until) => leaf(ChomperKind::Until(until)),
        Err(err) => panic!("invalid pattern {:?}: {}", pattern, err),
    }
}

// ============================================================================
// Structure
// ============================================================================

/// Chomp each parser in order, producing an array of the fertile values
pub fn compose<I, P>(parsers: I) -> Parser
where
    I: IntoIterator<Item = P>,
    P: Into<Parser>,
{
    leaf(ChomperKind::Composition(CompositionChomper::new(
        chompers(parsers),
        None,
    )))
}

/// Like [`compose`], requiring `separator` between adjacent parsers
pub fn compose_sep<I, P>(parsers: I, separator: impl Into<Parser>) -> Parser
where
    I: IntoIterator<Item = P>,
    P: Into<Parser>,
{
    leaf(ChomperKind::Composition(CompositionChomper::new(
        chompers(parsers),
        Some(separator.into().into_chomper()),
    )))
}

/// Try each parser from the same position; the first to match wins
pub fn alt<I, P>(parsers: I) -> Parser
where
    I: IntoIterator<Item = P>,
    P: Into<Parser>,
{
    leaf(ChomperKind::Alternation(AlternationChomper::new(chompers(
        parsers,
    ))))
}

/// Match a balanced `open ... close` run, producing the text in between
///
/// # Panics
///
/// Panics if either pattern is not a valid regular expression.
pub fn nested(open: &str, close: &str) -> Parser {
    match NestedChomper::new(open, close) {
        Ok(nested) => leaf(ChomperKind::Nested(nested)),
        Err(err) => panic!("invalid pattern in nested({:?}, {:?}): {}", open, close, err),
    }
}

/// Like [`nested`], transforming the inner text with `f`
pub fn nested_with<F, T, E>(open: &str, close: &str, f: F) -> Parser
where
    F: Fn(String) -> Result<T, E> + Send + Sync + 'static,
    T: Into<Value> + 'static,
    E: fmt::Display + 'static,
{
    nested(open, close).try_map(move |v| match v {
        Value::String(inner) => f(inner).map_err(|e| e.to_string()),
        other => Err(format!("expected a string, found {}", other.type_name())),
    })
}

/// Start building a repetition of `element`
pub fn seq(element: impl Into<Parser>) -> SeqBuilder {
    SeqBuilder {
        element: element.into(),
        separator: None,
        leading: false,
        trailing: false,
        reducer: None,
        name: None,
    }
}

/// Builder for sequence parsers, created by [`seq`]
pub struct SeqBuilder {
    element: Parser,
    separator: Option<Parser>,
    leading: bool,
    trailing: bool,
    reducer: Option<ReduceFn>,
    name: Option<String>,
}

impl SeqBuilder {
    /// Require `separator` between elements
    pub fn separator(mut self, separator: impl Into<Parser>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Require a separator before the first element
    ///
    /// A missing leading separator fails the whole sequence.
    pub fn leading(mut self) -> Self {
        self.leading = true;
        self
    }

    /// Require a separator after every element
    pub fn trailing(mut self) -> Self {
        self.trailing = true;
        self
    }

    /// Reduce the elements with `f` instead of collecting them
    ///
    /// Elements are parsed as `f` pulls them; whatever `f` leaves unpulled
    /// is not consumed.
    pub fn reduce<F, T, E>(mut self, f: F) -> Self
    where
        F: Fn(&mut Elements<'_>) -> Result<T, E> + Send + Sync + 'static,
        T: Into<Value> + 'static,
        E: fmt::Display + 'static,
    {
        let reducer: ReduceFn =
            Arc::new(move |elements: &mut Elements<'_>| -> Result<Value, String> {
                f(elements).map(Into::into).map_err(|e| e.to_string())
            });
        self.reducer = Some(reducer);
        self
    }

    /// Name the sequence for error messages
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Finish the sequence parser
    pub fn build(self) -> Parser {
        let parser = leaf(ChomperKind::Sequence(SequenceChomper::new(
            self.element.into_chomper(),
            self.separator.map(Parser::into_chomper),
            self.leading,
            self.trailing,
            self.reducer,
        )));
        match self.name {
            Some(name) => parser.name(name),
            None => parser,
        }
    }
}

impl From<SeqBuilder> for Parser {
    fn from(builder: SeqBuilder) -> Self {
        builder.build()
    }
}

// ============================================================================
// Recursion and dynamic grammars
// ============================================================================

/// Build a self-referential grammar
///
/// `build` receives a placeholder standing for the parser being defined
/// and returns the full grammar; the placeholder is then wired to that
/// grammar. The recursive occurrence must not be reached before some
/// input has been consumed.
///
/// The placeholder only refers back to the grammar weakly: keep the
/// returned parser (or a parser containing it) alive for as long as the
/// grammar is used.
///
/// # Example
///
/// ```rust
/// use fro::prelude::*;
///
/// // depth of balanced parentheses
/// let depth = tie(|inner| {
///     alt([
///         compose([regex(r"~\("), inner, regex(r"~\)")])
///             .get()
///             .map(|d| d.as_int().unwrap_or(0) + 1),
///         regex("").map(|_| 0i64),
///     ])
/// });
/// assert_eq!(depth.parse_one("((()))").unwrap(), Some(Value::int(3)));
/// ```
pub fn tie<F>(build: F) -> Parser
where
    F: FnOnce(Parser) -> Parser,
{
    let placeholder = Chomper::new(ChomperKind::Stub(StubChomper::new()));
    let built = build(Parser::from_chomper(placeholder.clone()));
    if let ChomperKind::Stub(stub) = placeholder.kind() {
        stub.set_delegate(built.chomper());
    }
    built
}

/// Build a recursive grammar one layer at a time
///
/// `build` is called again, with a fresh placeholder, each time parsing
/// reaches a recursive occurrence that has not been expanded yet.
pub fn chain<F>(build: F) -> Parser
where
    F: Fn(Parser) -> Parser + Send + Sync + 'static,
{
    let factory: BuildFn = Arc::new(build);
    leaf(ChomperKind::Lazy(LazyChomper::new(factory)))
}

/// Choose the grammar at parse time by calling `factory`
pub fn thunk<F>(factory: F) -> Parser
where
    F: Fn() -> Parser + Send + Sync + 'static,
{
    let factory: ThunkFn = Arc::new(factory);
    leaf(ChomperKind::Thunk(ThunkChomper::new(factory)))
}

/// Choose the grammar from the latest value produced by `dependee`
///
/// `dependee` must be a [`Parser::memo`] parser used earlier in the same
/// parse; `factory` receives `None` if it has not produced a value yet.
///
/// # Panics
///
/// Panics if `dependee` is not a memo parser.
pub fn dependent<F>(dependee: &Parser, factory: F) -> Parser
where
    F: Fn(Option<&Value>) -> Parser + Send + Sync + 'static,
{
    let id = match dependee.memo_id() {
        Some(id) => id,
        None => panic!("dependent() requires a memo parser, see Parser::memo"),
    };
    let factory: DependFn = Arc::new(factory);
    leaf(ChomperKind::Dependent(DependentChomper::new(id, factory)))
}

// ============================================================================
// Built-in parsers
// ============================================================================

fn convert<T>(value: Value) -> Result<T, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match value {
        Value::String(text) => text
            .parse::<T>()
            .map_err(|err| format!("cannot convert '{}': {}", text, err)),
        other => Err(format!("expected a string, found {}", other.type_name())),
    }
}

/// Signed integer, producing [`Value::Int`]
pub fn intp() -> Parser {
    regex(r"-?[0-9]+").try_map(convert::<i64>)
}

/// Non-negative integer, producing [`Value::Int`]
pub fn natp() -> Parser {
    regex(r"[0-9]+").try_map(convert::<i64>)
}

/// Positive integer (leading zeros allowed), producing [`Value::Int`]
pub fn posintp() -> Parser {
    regex(r"0*[1-9][0-9]*").try_map(convert::<i64>)
}

/// Decimal number with optional exponent, producing [`Value::Float`]
pub fn floatp() -> Parser {
    regex(r"((-?\.[0-9]+)|(-?[0-9]+(\.[0-9]*)?))(e[-+]?[0-9]+)?").try_map(convert::<f64>)
}

/// `true` or `false`, producing [`Value::Bool`]
pub fn boolp() -> Parser {
    regex("true|false").map(|v| v.as_str() == Some("true"))
}

// ============================================================================
// Conversions
// ============================================================================

impl From<&str> for Parser {
    /// Promote a pattern to a [`regex`] parser
    fn from(pattern: &str) -> Self {
        regex(pattern)
    }
}

impl From<String> for Parser {
    fn from(pattern: String) -> Self {
        regex(&pattern)
    }
}

impl From<&Parser> for Parser {
    fn from(parser: &Parser) -> Self {
        parser.clone()
    }
}
