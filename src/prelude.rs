//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from
//! fro. Importing it with a wildcard brings a complete grammar-building
//! vocabulary into scope:
//!
//! ```
//! use fro::prelude::*;
//! ```
//!
//! # Re-exported Items
//!
//! ## Core Types
//! - [`Parser`] - Immutable, shareable parser
//! - [`ParserConfig`] - Per-parse limits
//! - [`Value`] - Produced value
//! - [`ParseError`] - Located parse error
//! - [`ErrorKind`] - What ended a failed parse
//!
//! ## Construction
//! - [`regex()`], [`group_regex()`], [`until()`] - Primitive parsers
//! - [`compose()`], [`compose_sep()`], [`alt()`], [`seq()`], [`nested()`] - Structure
//! - [`tie()`], [`chain()`] - Recursive grammars
//! - [`thunk()`], [`dependent()`] - Grammars chosen while parsing
//! - [`intp()`], [`natp()`], [`posintp()`], [`floatp()`], [`boolp()`] - Built-in tokens
//!
//! ## Helpers
//! - [`Elements`] - Lazily parsed sequence elements, for reducers
//! - [`BoxedValue`] - Caller-owned state for thunk grammars

// ============================================================================
// Core Types
// ============================================================================

pub use crate::engine::{ErrorKind, ParseError, Parser, ParserConfig, Value};

// ============================================================================
// Construction
// ============================================================================

pub use crate::engine::parser_dsl::{
    alt, boolp, chain, compose, compose_sep, dependent, floatp, group_regex, intp, natp, nested,
    nested_with, posintp, regex, seq, thunk, tie, try_group_regex, try_regex, until, until_with,
    SeqBuilder,
};

// ============================================================================
// Helpers
// ============================================================================

pub use crate::engine::{BoxedValue, Elements};
