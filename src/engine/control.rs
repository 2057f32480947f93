//! Value and control combinators
//!
//! Map transforms values. Stub and Lazy make recursive grammars possible:
//! a stub is a single-assignment back-edge wired once the grammar around
//! it exists, while a lazy chomper expands its grammar one layer at a time
//! on demand. Thunk and Dependent pick their grammar while parsing.

use super::chomper::{
    application_error, BuildFn, ChompResult, Chomper, ChomperKind, DependFn, MapFn, ThunkFn,
    WeakChomper,
};
use super::error::{ErrorKind, ErrorTracker};
use super::parser::Parser;
use super::state::{ChompState, MemoId};
use std::sync::OnceLock;

/// Applies a caller function to the child's value
pub struct MapChomper {
    child: Chomper,
    func: MapFn,
}

impl MapChomper {
    /// Create a map
    pub fn new(child: Chomper, func: MapFn) -> Self {
        Self { child, func }
    }

    pub(crate) fn chomp(&self, state: &mut ChompState<'_>, tracker: &mut ErrorTracker) -> ChompResult {
        let start = state.location();
        match self.child.chomp(state, tracker)? {
            Some(value) => match (self.func)(value) {
                Ok(mapped) => Ok(Some(mapped)),
                Err(msg) => Err(application_error(tracker, start, msg)),
            },
            None => Ok(None),
        }
    }
}

/// Placeholder for a recursive occurrence, wired exactly once
///
/// The stub only holds a weak reference to its target: the target is the
/// grammar that contains the stub, and a strong edge would leak the cycle.
#[derive(Default)]
pub struct StubChomper {
    target: OnceLock<WeakChomper>,
}

impl StubChomper {
    /// Create an unwired stub
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire the stub to `target`
    ///
    /// # Panics
    ///
    /// Panics if the stub was already wired.
    pub fn set_delegate(&self, target: &Chomper) {
        if self.target.set(target.downgrade()).is_err() {
            panic!("cannot set a stub's delegate twice");
        }
        log_debug!("tie wired to {:?}", target);
    }

    /// Whether the stub has been wired
    pub fn is_wired(&self) -> bool {
        self.target.get().is_some()
    }

    pub(crate) fn chomp(&self, state: &mut ChompState<'_>, tracker: &mut ErrorTracker) -> ChompResult {
        let message = match self.target.get() {
            None => "Stub chomper has no delegate",
            Some(weak) => match weak.upgrade() {
                Some(target) => return target.chomp(state, tracker),
                None => "Stub chomper outlived its grammar",
            },
        };
        Err(tracker.fatal(ErrorKind::Misuse, state.location(), message))
    }
}

/// Grammar built on first use, with a fresh lazy placeholder for recursion
pub struct LazyChomper {
    factory: BuildFn,
    built: OnceLock<Chomper>,
}

impl LazyChomper {
    /// Create a lazy chomper
    pub fn new(factory: BuildFn) -> Self {
        Self {
            factory,
            built: OnceLock::new(),
        }
    }

    fn expand(&self) -> &Chomper {
        self.built.get_or_init(|| {
            log_debug!("expanding lazy grammar layer");
            let placeholder = Chomper::new(ChomperKind::Lazy(LazyChomper::new(self.factory.clone())));
            (self.factory)(Parser::from_chomper(placeholder)).into_chomper()
        })
    }

    pub(crate) fn chomp(&self, state: &mut ChompState<'_>, tracker: &mut ErrorTracker) -> ChompResult {
        self.expand().chomp(state, tracker)
    }
}

/// Grammar produced by a factory at every chomp
pub struct ThunkChomper {
    factory: ThunkFn,
}

impl ThunkChomper {
    /// Create a thunk
    pub fn new(factory: ThunkFn) -> Self {
        Self { factory }
    }

    pub(crate) fn chomp(&self, state: &mut ChompState<'_>, tracker: &mut ErrorTracker) -> ChompResult {
        (self.factory)().into_chomper().chomp(state, tracker)
    }
}

/// Records the child's most recent value in the parse state
pub struct MemoChomper {
    id: MemoId,
    child: Chomper,
}

impl MemoChomper {
    /// Create a memo with a fresh id
    pub fn new(child: Chomper) -> Self {
        Self {
            id: MemoId::fresh(),
            child,
        }
    }

    /// Id under which values are recorded
    pub fn id(&self) -> MemoId {
        self.id
    }

    pub(crate) fn chomp(&self, state: &mut ChompState<'_>, tracker: &mut ErrorTracker) -> ChompResult {
        let result = self.child.chomp(state, tracker)?;
        if let Some(value) = &result {
            state.remember(self.id, value.clone());
        }
        Ok(result)
    }
}

/// Grammar chosen from the latest value recorded by a memo
pub struct DependentChomper {
    dependee: MemoId,
    factory: DependFn,
}

impl DependentChomper {
    /// Create a dependent chomper
    pub fn new(dependee: MemoId, factory: DependFn) -> Self {
        Self { dependee, factory }
    }

    pub(crate) fn chomp(&self, state: &mut ChompState<'_>, tracker: &mut ErrorTracker) -> ChompResult {
        let next = (self.factory)(state.recall(self.dependee));
        next.into_chomper().chomp(state, tracker)
    }
}
