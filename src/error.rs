//! Error types surfaced by the public allocator API.
//!
//! `alloc`, `free`, and `realloc` deliberately do *not* get a typed error:
//! per the allocator's failure semantics, out-of-memory, a double-free, and
//! degenerate zero-size requests are all representable as `None`/no-op, the
//! same report-and-continue contract the allocator has always had. Giving
//! them a `thiserror` enum each would be richer than the contract promises.

/// Failure to bring a fresh buffer under management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    /// The buffer is smaller than an arena header plus one region header.
    #[error("buffer too small: have {capacity} bytes, need at least {required}")]
    BufferTooSmall {
        /// The buffer's actual length in bytes.
        capacity: usize,
        /// The minimum length required to host the arena and region headers.
        required: usize,
    },
    /// The buffer is large enough for the headers but leaves no room for a
    /// payload once the first region is aligned.
    #[error("no room left for a payload region after the arena header")]
    NoPayloadRoom,
}

/// Failure to resume management of a buffer previously initialized by this
/// allocator (or a bit-compatible one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AttachError {
    /// The buffer's magic field does not match, so it was never initialized
    /// by this allocator (or the layout has drifted incompatibly).
    #[error("magic mismatch: buffer was not initialized by this allocator")]
    MagicMismatch,
    /// The arena header's recorded capacity does not match the buffer
    /// actually handed in.
    #[error("capacity mismatch: header says {header_capacity}, buffer is {actual_len}")]
    CapacityMismatch {
        /// Capacity recorded in the arena header.
        header_capacity: u32,
        /// Actual length of the buffer passed to `attach`.
        actual_len: usize,
    },
}

/// A structural invariant that [`crate::Arena::validate`] found violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The sum of physical region sizes does not cover the buffer exactly.
    #[error("physical list does not exhaustively cover the buffer")]
    Coverage,
    /// Two physically adjacent regions are both free (a missed coalesce).
    #[error("two physically adjacent regions are both free")]
    AdjacentFree,
    /// The set of free-flagged regions and the set reachable from the
    /// free-index root disagree.
    #[error("free index and free-flagged regions disagree")]
    IndexMismatch,
    /// The free index is not a valid red-black tree.
    #[error("free index violates red-black tree properties")]
    RedBlack,
    /// The free index's in-order traversal is not strictly ascending by
    /// `(size, offset)`.
    #[error("free index is not ordered by (size, offset)")]
    Order,
}
