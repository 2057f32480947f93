//! Fro - Regex-Driven Parser Combinators
//!
//! Fro builds parsers out of small composable "chompers": regular
//! expressions, compositions, alternations, repetitions, balanced
//! delimiters and value transformations. It provides:
//! - Parsing over a sequence of chunks (typically lines), supplied lazily
//! - Farthest-failure error reporting with 1-based line/column and context
//! - Fertile/infertile values, so punctuation drops out of results
//! - Self-referential grammars via `tie` and `chain`
//! - Grammars chosen while parsing via `thunk` and `dependent`
//!
//! ## Quick Start
//!
//! ```rust
//! use fro::prelude::*;
//!
//! // "(1, 2)" -> [1, 2]
//! let pair = compose([
//!     regex(r"~\("),
//!     seq(intp().strip()).separator("~,").build(),
//!     regex(r"~\)"),
//! ])
//! .get();
//!
//! let value = pair.parse_one("(1, 2)").unwrap().unwrap();
//! assert_eq!(value, Value::from(vec![1i64, 2]));
//! ```
//!
//! ## Errors
//!
//! ```rust
//! use fro::prelude::*;
//!
//! let list = compose([regex(r"~\["), seq(intp()).separator("~,").build(), regex(r"~\]")]);
//! let err = list.parse_one("[1,2,X]").unwrap_err();
//! assert_eq!((err.line(), err.column()), (1, 6));
//! println!("{}", err);
//! ```
//!
//! ## Feature Flags
//!
//! - `logging` - Enable debug logging using the `log` crate
//! - `parallel` - Parse batches of inputs with rayon

// Lint configuration for production quality
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]
#![allow(clippy::module_inception)]

/// Logging macros - no-op when logging feature is disabled
#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Logging macros - use log crate when logging feature is enabled
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! log_trace {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

// Prelude module for convenient imports
pub mod prelude;

pub mod engine;

/// Re-export commonly used types for convenience
pub use engine::{
    parser_dsl::{
        alt, boolp, chain, compose, compose_sep, dependent, floatp, group_regex, intp, natp,
        nested, nested_with, posintp, regex, seq, thunk, tie, try_group_regex, try_regex, until,
        until_with,
    },
    BoxedValue, Elements, ErrorKind, Location, ParseError, Parser, ParserConfig, SeqBuilder,
    Value,
};
