//! Chomp State
//!
//! [`ChompState`] is the cursor threaded through one parse call. It pulls
//! chunks lazily from the caller's iterator, so input can be supplied
//! incrementally, and only ever keeps the current chunk in memory.
//!
//! Positions move forward with [`ChompState::advance_to`], which rolls
//! onto the next chunk once the current one is fully consumed. Rollback
//! is chunk-local: a [`Mark`] taken in an earlier chunk can no longer be
//! restored, and [`ChompState::rollback`] reports that as a failed
//! lookahead.

use super::error::{ErrorTracker, ParseError};
use super::location::Location;
use super::value::Value;
use hashbrown::HashMap;
use std::iter::Peekable;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identity of a memoizing chomper
///
/// Ids are process-unique, so values recorded by different memo chompers
/// never collide inside one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoId(u64);

impl MemoId {
    /// Allocate a fresh id
    pub fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        MemoId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A restorable position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    /// Chunk the mark was taken in
    pub chunk_index: usize,
    /// Byte column within that chunk
    pub column: usize,
}

type ChunkIter<'i> = Box<dyn Iterator<Item = String> + 'i>;

/// Mutable position of one parse call
pub struct ChompState<'i> {
    chunks: Peekable<ChunkIter<'i>>,
    current: Arc<str>,
    chunk_index: usize,
    column: usize,
    memos: HashMap<MemoId, Value>,
    depth: usize,
    max_depth: usize,
}

impl<'i> ChompState<'i> {
    /// Create a state over a sequence of chunks
    ///
    /// Leading empty chunks are skipped; an empty sequence behaves like a
    /// single empty chunk. A `max_depth` of 0 disables the recursion limit.
    pub fn new<I>(chunks: I, max_depth: usize) -> Self
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: 'i,
    {
        let boxed: ChunkIter<'i> = Box::new(chunks.into_iter());
        let mut chunks = boxed.peekable();
        let current: Arc<str> = chunks.next().map(Arc::from).unwrap_or_else(|| Arc::from(""));
        let mut state = Self {
            chunks,
            current,
            chunk_index: 0,
            column: 0,
            memos: HashMap::new(),
            depth: 0,
            max_depth,
        };
        state.advance_to(0);
        state
    }

    /// Create a state over a single chunk
    pub fn single(text: &str) -> ChompState<'static> {
        ChompState::new(std::iter::once(text.to_string()), 0)
    }

    /// Text of the current chunk
    #[inline]
    pub fn current(&self) -> &Arc<str> {
        &self.current
    }

    /// Unconsumed remainder of the current chunk
    #[inline]
    pub fn rest(&self) -> &str {
        &self.current[self.column..]
    }

    /// Byte column inside the current chunk
    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Index of the current chunk (0-based)
    #[inline]
    pub fn chunk_index(&self) -> usize {
        self.chunk_index
    }

    /// Current location
    pub fn location(&self) -> Location {
        Location::new(self.chunk_index, self.column, Arc::clone(&self.current))
    }

    /// Whether every chunk has been consumed
    pub fn at_end(&mut self) -> bool {
        self.column == self.current.len() && self.chunks.peek().is_none()
    }

    /// Move forward to `column` in the current chunk
    ///
    /// When the chunk is fully consumed the state rolls onto the start of
    /// the next non-empty chunk, if there is one.
    ///
    /// # Panics
    ///
    /// Panics if `column` lies before the current column or past the end
    /// of the chunk.
    pub fn advance_to(&mut self, column: usize) {
        assert!(
            column >= self.column && column <= self.current.len(),
            "cannot advance column from {} to {} (chunk length {})",
            self.column,
            column,
            self.current.len()
        );
        self.column = column;
        while self.column == self.current.len() {
            match self.chunks.next() {
                Some(next) => {
                    self.current = Arc::from(next);
                    self.chunk_index += 1;
                    self.column = 0;
                }
                None => break,
            }
        }
    }

    /// Move back to `column` in the current chunk
    ///
    /// # Panics
    ///
    /// Panics if `column` lies after the current column.
    pub fn reset_to(&mut self, column: usize) {
        assert!(
            column <= self.column,
            "cannot reset column from {} to {}",
            self.column,
            column
        );
        self.column = column;
    }

    /// Snapshot the current position
    #[inline]
    pub fn mark(&self) -> Mark {
        Mark {
            chunk_index: self.chunk_index,
            column: self.column,
        }
    }

    /// Restore a position taken with [`ChompState::mark`]
    ///
    /// Fails with a failed-lookahead error if the state has since moved
    /// into a later chunk.
    pub fn rollback(&mut self, mark: Mark, tracker: &ErrorTracker) -> Result<(), ParseError> {
        if mark.chunk_index != self.chunk_index {
            log_debug!(
                "failed lookahead: chunk {} -> {}",
                mark.chunk_index,
                self.chunk_index
            );
            return Err(tracker.failed_lookahead(self.location()));
        }
        self.reset_to(mark.column);
        Ok(())
    }

    /// Enter one level of chomper nesting
    ///
    /// Returns `false` when the depth limit would be exceeded.
    #[inline]
    pub fn enter(&mut self) -> bool {
        if self.max_depth != 0 && self.depth >= self.max_depth {
            return false;
        }
        self.depth += 1;
        true
    }

    /// Leave one level of chomper nesting
    #[inline]
    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Record the latest value produced by a memoizing chomper
    pub fn remember(&mut self, id: MemoId, value: Value) {
        self.memos.insert(id, value);
    }

    /// Latest value produced by a memoizing chomper in this parse
    pub fn recall(&self, id: MemoId) -> Option<&Value> {
        self.memos.get(&id)
    }
}
