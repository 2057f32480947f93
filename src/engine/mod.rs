//! Chomper engine for Fro
//!
//! Everything that makes up a parse: the grammar tree, the per-parse state
//! and error tracker, the combinators and the public construction API.
//!
//! # Module Organization
//!
//! ## Positions and State
//! - [`location`] - Chunk/column positions and their ordering
//! - [`state`] - The mutable cursor of one parse call
//!
//! ## Error Handling
//! - [`error`] - Farthest-failure tracking and located parse errors
//!
//! ## Chompers
//! - [`chomper`] - The grammar tree and chomp dispatch
//! - [`primitives`] - Regex, group regex and `until`
//! - [`structural`] - Composition, alternation and optional
//! - [`sequence`] - Lazily reduced repetition
//! - [`nested`] - Balanced delimiters
//! - [`control`] - Map, stubs, lazy expansion, thunks and dependent grammars
//!
//! ## Public API
//! - [`parser`] - The [`Parser`] handle and [`ParserConfig`]
//! - [`parser_dsl`] - Grammar construction functions and built-in parsers
//! - [`value`] - Produced values
//! - [`boxed`] - Caller-owned state for thunk grammars
//! - [`parallel`] - Batch parsing across threads

// ============================================================================
// Module Declarations
// ============================================================================

pub mod boxed;
pub mod chomper;
pub mod control;
pub mod error;
pub mod location;
pub mod nested;
pub mod parallel;
pub mod parser;
pub mod parser_dsl;
pub mod primitives;
pub mod regex_cache;
pub mod sequence;
pub mod state;
pub mod structural;
pub mod value;

// ============================================================================
// Re-exports
// ============================================================================

pub use boxed::BoxedValue;
pub use chomper::{ChompResult, Chomper, ChomperKind};
pub use error::{ErrorKind, ErrorMessage, ErrorTracker, ParseError};
pub use location::Location;
pub use parser::{Parser, ParserConfig, DEFAULT_MAX_RECURSION_DEPTH};
pub use parser_dsl::SeqBuilder;
pub use sequence::Elements;
pub use state::{ChompState, Mark, MemoId};
pub use value::Value;
