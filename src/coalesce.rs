//! Coalesce engine: merging a freshly freed region with any free physical
//! neighbors.
//!
//! Per the resolved open question in the design notes, `coalesce` always
//! removes any free neighbor it absorbs from the free index *before*
//! merging, and never inserts its own result — the caller inserts exactly
//! once, after `coalesce` returns, whatever the final survivor is. This
//! keeps "regions with the free flag set" and "regions reachable from the
//! free-index root" in lockstep at every step, rather than relying on a
//! shrink-then-coalesce caller to paper over a double-insert.

use crate::list;
use crate::offset::{Buf, NULL_OFFSET, Offset};
use crate::tree;

/// Merge `b` (already marked free, not yet indexed) with any free physical
/// neighbors. Returns the offset of the surviving region, which the caller
/// must insert into the free index — `b` if no merge happened, or `b`'s
/// free predecessor if the merge walked backwards.
pub(crate) fn coalesce(buf: &Buf, mut b: Offset) -> Offset {
    let next_off = unsafe { buf.header(b).next_phys_off };
    if next_off != NULL_OFFSET && unsafe { buf.header(next_off).is_free() } {
        tree::delete(buf, next_off);
        let next_size = unsafe { buf.header(next_off).size };
        list::unlink(buf, next_off);
        unsafe { buf.header_mut(b).size += next_size };
    }

    let prev_off = unsafe { buf.header(b).prev_phys_off };
    if prev_off != NULL_OFFSET && unsafe { buf.header(prev_off).is_free() } {
        tree::delete(buf, prev_off);
        let b_size = unsafe { buf.header(b).size };
        list::unlink(buf, b);
        unsafe { buf.header_mut(prev_off).size += b_size };
        b = prev_off;
    }

    b
}
