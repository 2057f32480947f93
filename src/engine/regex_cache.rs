//! Pattern compilation cache
//!
//! Grammars built from string literals tend to repeat the same small set
//! of patterns (separators, whitespace, punctuation). Compiled patterns
//! are cached per thread and shared by cheap `Regex` clones.

use hashbrown::HashMap;
use regex::{Captures, Match, Regex};
use std::cell::RefCell;

thread_local! {
    /// Compiled patterns, keyed by source text
    static REGEX_CACHE: RefCell<HashMap<String, Regex>> = RefCell::new(HashMap::new());
}

/// Compile `pattern`, reusing an earlier compilation on this thread
///
/// # Arguments
/// * `pattern` - Regex source, unanchored
///
/// # Returns
/// * `Ok(Regex)` if the pattern is valid
/// * `Err(regex::Error)` describing why the pattern was rejected
#[inline]
pub fn get_or_compile(pattern: &str) -> Result<Regex, regex::Error> {
    REGEX_CACHE.with(|cache| {
        if let Some(regex) = cache.borrow().get(pattern) {
            return Ok(regex.clone());
        }

        let regex = Regex::new(pattern)?;
        cache
            .borrow_mut()
            .insert(pattern.to_string(), regex.clone());
        Ok(regex)
    })
}

/// Match `regex` starting exactly at `column` of `haystack`
///
/// The text before `column` stays visible as context, so `^`, `\A` and
/// `\b` see the real start of the chunk rather than the column.
#[inline]
pub fn match_at<'h>(regex: &Regex, haystack: &'h str, column: usize) -> Option<Match<'h>> {
    regex
        .find_at(haystack, column)
        .filter(|m| m.start() == column)
}

/// Like [`match_at`], producing the capture groups
#[inline]
pub fn captures_at<'h>(regex: &Regex, haystack: &'h str, column: usize) -> Option<Captures<'h>> {
    regex
        .captures_at(haystack, column)
        .filter(|caps| caps.get(0).map_or(false, |m| m.start() == column))
}

/// Drop every cached pattern on this thread
pub fn clear_cache() {
    REGEX_CACHE.with(|cache| cache.borrow_mut().clear());
}

/// Number of patterns cached on this thread
pub fn cache_size() -> usize {
    REGEX_CACHE.with(|cache| cache.borrow().len())
}
