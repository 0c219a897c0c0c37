//! Split engine: carving the unused tail off a selected free region.

use crate::header::{HEADER_SIZE, RegionHeader};
use crate::list;
use crate::offset::{Buf, MIN_ALIGN, Offset};
use crate::tree;

/// Shrink the free region `b` to exactly `needed` bytes (header included),
/// splicing the leftover tail back into the physical list and free index as
/// a new free region, provided the tail would itself be a valid region.
///
/// Returns the offset the caller should allocate from — always `b` itself;
/// `b`'s size may or may not have changed depending on whether a split
/// actually happened.
pub(crate) fn split(buf: &Buf, b: Offset, needed: u32) -> Offset {
    let b_size = unsafe { buf.header(b).size };
    if (b_size as usize) < needed as usize + HEADER_SIZE + MIN_ALIGN {
        // Not enough room left over to host a region of its own; hand the
        // whole block to the caller instead of fragmenting it further.
        return b;
    }

    let remaining = b_size - needed;
    let tail_off = b + needed;

    unsafe {
        buf.header_mut(b).size = needed;
        let tail = buf.header_mut(tail_off);
        *tail = RegionHeader::zeroed();
        tail.size = remaining;
        tail.free_flag = 1;
    }

    list::insert_after(buf, b, tail_off);
    tree::insert(buf, tail_off);

    b
}
