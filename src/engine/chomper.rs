//! Chomper Tree
//!
//! A [`Chomper`] is one node of an immutable grammar tree. The behaviour of
//! a node lives in its [`ChomperKind`]; the flags around it (fertility,
//! name, quiet) are stored beside the shared kind so that renaming or
//! silencing a chomper clones the flags and never touches the original.
//!
//! Every chomp goes through [`Chomper::chomp`], which keeps the tracker's
//! name stack balanced and enforces the recursion-depth limit before
//! handing over to the variant.
//!
//! The chomp protocol:
//! - `Ok(Some(value))`: the chomper matched and advanced the state
//! - `Ok(None)`: recoverable failure, already reported to the tracker
//! - `Err(error)`: fatal failure that no combinator recovers from

use super::control::{
    DependentChomper, LazyChomper, MapChomper, MemoChomper, StubChomper, ThunkChomper,
};
use super::error::{ErrorKind, ErrorTracker, ParseError};
use super::nested::NestedChomper;
use super::parser::Parser;
use super::primitives::{GroupRegexChomper, RegexChomper, UntilChomper};
use super::sequence::{Elements, SequenceChomper};
use super::state::ChompState;
use super::structural::{AlternationChomper, CompositionChomper, OptionalChomper};
use super::value::Value;
use std::fmt;
use std::sync::{Arc, Weak};

/// Outcome of a single chomp
pub type ChompResult = Result<Option<Value>, ParseError>;

/// Caller-supplied value transformation
pub type MapFn = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

/// Caller-supplied sequence reducer
pub type ReduceFn = Arc<dyn Fn(&mut Elements<'_>) -> Result<Value, String> + Send + Sync>;

/// Caller-supplied reducer over the pieces consumed by `until`
pub type PiecesFn = Arc<dyn Fn(Vec<String>) -> Result<Value, String> + Send + Sync>;

/// Grammar factory receiving a recursive placeholder
pub type BuildFn = Arc<dyn Fn(Parser) -> Parser + Send + Sync>;

/// Grammar factory evaluated at chomp time
pub type ThunkFn = Arc<dyn Fn() -> Parser + Send + Sync>;

/// Grammar factory receiving a previously parsed value
pub type DependFn = Arc<dyn Fn(Option<&Value>) -> Parser + Send + Sync>;

/// The closed set of chomper behaviours
pub enum ChomperKind {
    /// Anchored regex match producing the matched text
    Regex(RegexChomper),
    /// Anchored regex match producing the capture groups
    GroupRegex(GroupRegexChomper),
    /// Everything up to a lookahead pattern, across chunks
    Until(UntilChomper),
    /// Ordered children, optionally separated
    Composition(CompositionChomper),
    /// First matching child wins
    Alternation(AlternationChomper),
    /// Repetition of an element, lazily reduced
    Sequence(SequenceChomper),
    /// Balanced open/close delimiters
    Nested(NestedChomper),
    /// Default value when the child fails
    Optional(OptionalChomper),
    /// Transformation of the child's value
    Map(MapChomper),
    /// Runs another chomper under different flags
    Delegate(Chomper),
    /// Back-edge of a cyclic grammar
    Stub(StubChomper),
    /// Grammar expanded on demand, one layer per recursion
    Lazy(LazyChomper),
    /// Grammar chosen at chomp time
    Thunk(ThunkChomper),
    /// Records the child's latest value for the current parse
    Memo(MemoChomper),
    /// Grammar chosen from a recorded value
    Dependent(DependentChomper),
}

impl ChomperKind {
    /// Short label of the variant
    pub fn label(&self) -> &'static str {
        match self {
            ChomperKind::Regex(_) => "regex",
            ChomperKind::GroupRegex(_) => "group_regex",
            ChomperKind::Until(_) => "until",
            ChomperKind::Composition(_) => "compose",
            ChomperKind::Alternation(_) => "alt",
            ChomperKind::Sequence(_) => "seq",
            ChomperKind::Nested(_) => "nested",
            ChomperKind::Optional(_) => "maybe",
            ChomperKind::Map(_) => "map",
            ChomperKind::Delegate(_) => "delegate",
            ChomperKind::Stub(_) => "stub",
            ChomperKind::Lazy(_) => "chain",
            ChomperKind::Thunk(_) => "thunk",
            ChomperKind::Memo(_) => "memo",
            ChomperKind::Dependent(_) => "dependent",
        }
    }

    fn chomp(&self, state: &mut ChompState<'_>, tracker: &mut ErrorTracker) -> ChompResult {
        match self {
            ChomperKind::Regex(c) => c.chomp(state, tracker),
            ChomperKind::GroupRegex(c) => c.chomp(state, tracker),
            ChomperKind::Until(c) => c.chomp(state, tracker),
            ChomperKind::Composition(c) => c.chomp(state, tracker),
            ChomperKind::Alternation(c) => c.chomp(state, tracker),
            ChomperKind::Sequence(c) => c.chomp(state, tracker),
            ChomperKind::Nested(c) => c.chomp(state, tracker),
            ChomperKind::Optional(c) => c.chomp(state, tracker),
            ChomperKind::Map(c) => c.chomp(state, tracker),
            ChomperKind::Delegate(c) => c.chomp(state, tracker),
            ChomperKind::Stub(c) => c.chomp(state, tracker),
            ChomperKind::Lazy(c) => c.chomp(state, tracker),
            ChomperKind::Thunk(c) => c.chomp(state, tracker),
            ChomperKind::Memo(c) => c.chomp(state, tracker),
            ChomperKind::Dependent(c) => c.chomp(state, tracker),
        }
    }
}

/// A node of a grammar tree
#[derive(Clone)]
pub struct Chomper {
    fertile: bool,
    name: Option<Arc<str>>,
    quiet: bool,
    kind: Arc<ChomperKind>,
}

impl Chomper {
    /// Create a fertile, unnamed, non-quiet chomper
    pub fn new(kind: ChomperKind) -> Self {
        Self {
            fertile: true,
            name: None,
            quiet: false,
            kind: Arc::new(kind),
        }
    }

    /// Copy with a different fertility flag
    pub fn with_fertile(&self, fertile: bool) -> Self {
        Self {
            fertile,
            ..self.clone()
        }
    }

    /// Copy with a different name
    pub fn with_name(&self, name: Option<Arc<str>>) -> Self {
        Self {
            name,
            ..self.clone()
        }
    }

    /// Copy with a different quiet flag
    pub fn with_quiet(&self, quiet: bool) -> Self {
        Self {
            quiet,
            ..self.clone()
        }
    }

    /// Wrap `kind` under the flags of `self`
    pub fn restyle(&self, kind: ChomperKind) -> Self {
        Self {
            fertile: self.fertile,
            name: self.name.clone(),
            quiet: self.quiet,
            kind: Arc::new(kind),
        }
    }

    /// Whether the value is kept by a parent composition
    #[inline]
    pub fn fertile(&self) -> bool {
        self.fertile
    }

    /// Name used to qualify error messages
    #[inline]
    pub fn name(&self) -> Option<&Arc<str>> {
        self.name.as_ref()
    }

    /// Whether a failed root parse yields no value instead of an error
    #[inline]
    pub fn quiet(&self) -> bool {
        self.quiet
    }

    /// The behaviour of this node
    #[inline]
    pub fn kind(&self) -> &ChomperKind {
        &self.kind
    }

    /// Non-owning handle, used for grammar back-edges
    pub fn downgrade(&self) -> WeakChomper {
        WeakChomper {
            fertile: self.fertile,
            name: self.name.clone(),
            quiet: self.quiet,
            kind: Arc::downgrade(&self.kind),
        }
    }

    /// Attempt to consume a prefix of the remaining input
    pub fn chomp(&self, state: &mut ChompState<'_>, tracker: &mut ErrorTracker) -> ChompResult {
        if !state.enter() {
            return Err(tracker.fatal(
                ErrorKind::RecursionLimit,
                state.location(),
                format!("Maximum recursion depth exceeded in {}", self.kind.label()),
            ));
        }
        log_trace!("chomp {} at {}", self.kind.label(), state.location());

        if let Some(name) = &self.name {
            tracker.offer_name(name);
        }
        let result = self.kind.chomp(state, tracker);
        if let Some(name) = &self.name {
            tracker.revoke_name(name);
        }

        state.exit();
        result
    }
}

impl fmt::Debug for Chomper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chomper")
            .field("kind", &self.kind.label())
            .field("fertile", &self.fertile)
            .field("name", &self.name)
            .field("quiet", &self.quiet)
            .finish()
    }
}

/// A [`Chomper`] that does not keep its kind alive
#[derive(Clone)]
pub struct WeakChomper {
    fertile: bool,
    name: Option<Arc<str>>,
    quiet: bool,
    kind: Weak<ChomperKind>,
}

impl WeakChomper {
    /// Recover the chomper if the grammar it points into is still alive
    pub fn upgrade(&self) -> Option<Chomper> {
        self.kind.upgrade().map(|kind| Chomper {
            fertile: self.fertile,
            name: self.name.clone(),
            quiet: self.quiet,
            kind,
        })
    }
}

/// Turn a caller error into the fatal application error of a chomper span
pub(crate) fn application_error(
    tracker: &ErrorTracker,
    start: super::location::Location,
    message: String,
) -> ParseError {
    tracker.fatal(ErrorKind::Application, start, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits() -> Chomper {
        let regex = RegexChomper::new("[0-9]+").unwrap();
        Chomper::new(ChomperKind::Regex(regex))
    }

    #[test]
    fn test_flag_copies_share_kind() {
        let base = digits();
        let named = base.with_name(Some(Arc::from("num")));
        let quiet = named.with_quiet(true);

        assert!(base.name().is_none());
        assert_eq!(named.name().map(|n| &**n), Some("num"));
        assert!(!named.quiet());
        assert!(quiet.quiet());
        assert!(Arc::ptr_eq(&base.kind, &quiet.kind));
    }

    #[test]
    fn test_chomp_balances_names() {
        let chomper = digits().with_name(Some(Arc::from("num")));
        let mut state = ChompState::single("x");
        let mut tracker = ErrorTracker::new();

        assert_eq!(chomper.chomp(&mut state, &mut tracker).unwrap(), None);
        assert!(tracker.current_name().is_none());
        let err = tracker.retrieve_error().unwrap();
        assert_eq!(err.messages[0].name.as_deref(), Some("num"));
    }

    #[test]
    fn test_depth_limit_is_fatal() {
        let chomper = digits();
        let mut state = ChompState::new(vec!["1".to_string()], 1);
        assert!(state.enter());
        let mut tracker = ErrorTracker::new();
        let err = chomper.chomp(&mut state, &mut tracker).unwrap_err();
        assert_eq!(err.kind, ErrorKind::RecursionLimit);
    }

    #[test]
    fn test_weak_handle_dies_with_grammar() {
        let chomper = digits();
        let weak = chomper.downgrade();
        assert!(weak.upgrade().is_some());
        drop(chomper);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_debug_shows_label() {
        let rendered = format!("{:?}", digits());
        assert!(rendered.contains("regex"));
    }
}
