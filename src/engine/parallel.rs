//! Parallel parsing support
//!
//! A [`Parser`] is immutable and `Send + Sync`, and each parse owns its
//! own state and error tracker, so independent inputs can be parsed
//! concurrently with one shared grammar.
//!
//! # Feature Flag
//!
//! Inputs are parsed with rayon when the `parallel` feature is enabled:
//!
//! ```toml
//! [dependencies]
//! fro = { version = "0.1", features = ["parallel"] }
//! ```
//!
//! Without the feature the same functions parse sequentially.
//!
//! # Example
//!
//! ```rust
//! use fro::prelude::*;
//! use fro::engine::parallel::parse_batch_parallel;
//!
//! let list = seq(intp()).separator("~,").build();
//! let results = parse_batch_parallel(&list, &["1,2", "3", "x"]);
//!
//! assert_eq!(results.len(), 3);
//! assert!(results[0].is_ok());
//! assert!(results[2].is_err());
//! ```

use super::error::ParseError;
use super::parser::{Parser, ParserConfig};
use super::value::Value;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Outcome of one parse in a batch
pub type BatchResult = Result<Option<Value>, ParseError>;

/// Parse multiple inputs in parallel
///
/// Each input is split into line chunks as by [`Parser::parse_str`].
///
/// # Arguments
/// * `parser` - The grammar to use for all inputs
/// * `inputs` - Slice of input strings
///
/// # Returns
/// Vector of results in the same order as inputs
pub fn parse_batch_parallel(parser: &Parser, inputs: &[&str]) -> Vec<BatchResult> {
    parse_batch_with_config(parser, inputs, &ParserConfig::default())
}

/// Parse multiple inputs in parallel under `config`
#[cfg(feature = "rayon")]
pub fn parse_batch_with_config(
    parser: &Parser,
    inputs: &[&str],
    config: &ParserConfig,
) -> Vec<BatchResult> {
    inputs
        .par_iter()
        .map(|input| parse_lines(parser, input, config))
        .collect()
}

/// Parse multiple inputs sequentially (fallback when rayon is not available)
#[cfg(not(feature = "rayon"))]
pub fn parse_batch_with_config(
    parser: &Parser,
    inputs: &[&str],
    config: &ParserConfig,
) -> Vec<BatchResult> {
    inputs
        .iter()
        .map(|input| parse_lines(parser, input, config))
        .collect()
}

/// Parse multiple owned inputs in parallel
#[cfg(feature = "rayon")]
pub fn parse_batch_parallel_owned(parser: &Parser, inputs: Vec<String>) -> Vec<BatchResult> {
    let config = ParserConfig::default();
    inputs
        .into_par_iter()
        .map(|input| parse_lines(parser, &input, &config))
        .collect()
}

/// Parse multiple owned inputs sequentially (fallback)
#[cfg(not(feature = "rayon"))]
pub fn parse_batch_parallel_owned(parser: &Parser, inputs: Vec<String>) -> Vec<BatchResult> {
    let config = ParserConfig::default();
    inputs
        .into_iter()
        .map(|input| parse_lines(parser, &input, &config))
        .collect()
}

fn parse_lines(parser: &Parser, input: &str, config: &ParserConfig) -> BatchResult {
    parser.parse_with_config(super::parser::split_lines(input), config)
}
