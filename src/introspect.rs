//! Read-only traversals of an [`Arena`](crate::Arena)'s structure.
//!
//! These exist for tests and debugging; they never mutate allocator state
//! (beyond harmless call-stack usage during traversal) and are safe to call
//! between any two public calls.

use crate::arena::Arena;
use crate::error::ValidationError;
use crate::offset::NULL_OFFSET;
use crate::tree;

/// One entry of a physical-list walk: `(offset, size, free?, prev, next)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalRecord {
    /// Offset of this region's header, relative to the buffer.
    pub offset: u32,
    /// Total size of the region, header included.
    pub size: u32,
    /// Whether the region is currently free.
    pub free: bool,
    /// Offset of the previous physical region, or 0 if this is the first.
    pub prev: u32,
    /// Offset of the next physical region, or 0 if this is the last.
    pub next: u32,
}

/// Color of a free-index node, as seen from the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeColor {
    /// Red node.
    Red,
    /// Black node.
    Black,
}

/// One entry of a free-index in-order walk: `(offset, size, color)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeRecord {
    /// Offset of this region's header, relative to the buffer.
    pub offset: u32,
    /// Total size of the region, header included.
    pub size: u32,
    /// Red-black color of this node.
    pub color: NodeColor,
}

impl<'a> Arena<'a> {
    /// Walk the physical region list in address order, calling `visit` once
    /// per region (free or allocated).
    pub fn walk_physical(&self, mut visit: impl FnMut(PhysicalRecord)) {
        let buf = self.buf();
        let mut cur = self.first_block_offset();
        while cur != NULL_OFFSET {
            let h = unsafe { buf.header(cur) };
            visit(PhysicalRecord {
                offset: cur,
                size: h.size,
                free: h.is_free(),
                prev: h.prev_phys_off,
                next: h.next_phys_off,
            });
            cur = h.next_phys_off;
        }
    }

    /// Walk the free index in ascending `(size, offset)` order, calling
    /// `visit` once per free region.
    pub fn walk_free_index(&self, mut visit: impl FnMut(FreeRecord)) {
        let buf = self.buf();
        tree::inorder_walk(&buf, tree::root(&buf), &mut |off| {
            let h = unsafe { buf.header(off) };
            let color = if h.color() == crate::header::Color::Red {
                NodeColor::Red
            } else {
                NodeColor::Black
            };
            visit(FreeRecord { offset: off, size: h.size, color });
        });
    }

    /// Re-check every structural invariant documented for this allocator:
    /// exhaustive, non-overlapping physical coverage; no two physically
    /// adjacent free regions; the free index containing exactly the
    /// free-flagged regions; red-black validity; and `(size, offset)`
    /// ordering of the free index.
    ///
    /// Intended for tests and property checks, not for a hot path — it is
    /// `O(n log n)` in the region count.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let buf = self.buf();

        let mut covered = 0u64;
        let mut free_count = 0u32;
        let mut prev_was_free = false;
        let mut cur = self.first_block_offset();
        while cur != NULL_OFFSET {
            let h = unsafe { buf.header(cur) };
            covered += u64::from(h.size);

            if h.is_free() {
                if prev_was_free {
                    return Err(ValidationError::AdjacentFree);
                }
                if !tree::contains(&buf, h.size, cur) {
                    return Err(ValidationError::IndexMismatch);
                }
                free_count += 1;
            }
            prev_was_free = h.is_free();
            cur = h.next_phys_off;
        }

        let expected = u64::from(self.capacity()) - u64::from(self.first_block_offset());
        if covered != expected {
            return Err(ValidationError::Coverage);
        }

        if !tree::satisfies_red_black(&buf) {
            return Err(ValidationError::RedBlack);
        }

        match tree::check_order_and_count(&buf) {
            Some(indexed_count) if indexed_count == free_count => {}
            Some(_) => return Err(ValidationError::IndexMismatch),
            None => return Err(ValidationError::Order),
        }

        Ok(())
    }
}
