//! Physical region list: the doubly-linked, address-order thread running
//! through every region in the buffer, free or allocated.
//!
//! Every header carries `prev_phys_off`/`next_phys_off` regardless of its
//! free/allocated state, unlike the tree-link fields which only matter for
//! free regions. `0` means "no neighbor in that direction".

use crate::offset::{Buf, NULL_OFFSET, Offset};

/// Splice `node` into the list immediately after `after`.
///
/// `node`'s own `prev_phys_off`/`next_phys_off` are overwritten; `after`
/// must already be a member of the list.
pub(crate) fn insert_after(buf: &Buf, after: Offset, node: Offset) {
    let next = unsafe { buf.header(after).next_phys_off };
    unsafe {
        let n = buf.header_mut(node);
        n.prev_phys_off = after;
        n.next_phys_off = next;
    }
    if next != NULL_OFFSET {
        unsafe { buf.header_mut(next).prev_phys_off = node };
    }
    unsafe { buf.header_mut(after).next_phys_off = node };
}

/// Remove `node` from the list, joining its neighbors.
///
/// `node`'s own `prev_phys_off`/`next_phys_off` are left stale; the caller
/// is expected to be folding `node`'s size into a surviving neighbor right
/// after this call, as `coalesce` does.
pub(crate) fn unlink(buf: &Buf, node: Offset) {
    let prev = unsafe { buf.header(node).prev_phys_off };
    let next = unsafe { buf.header(node).next_phys_off };
    if prev != NULL_OFFSET {
        unsafe { buf.header_mut(prev).next_phys_off = next };
    }
    if next != NULL_OFFSET {
        unsafe { buf.header_mut(next).prev_phys_off = prev };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::RegionHeader;
    use core::ptr::NonNull;

    fn region_at(buf: &Buf, off: Offset) {
        unsafe { *buf.header_mut(off) = RegionHeader::zeroed() };
    }

    #[test]
    fn insert_after_splices_into_the_middle() {
        let mut storage = vec![0u8; 256];
        let base = NonNull::new(storage.as_mut_ptr()).unwrap();
        let buf = Buf::new(base, storage.len());
        let (a, b, c) = (16, 48, 80);
        for off in [a, b, c] {
            region_at(&buf, off);
        }

        unsafe {
            buf.header_mut(a).next_phys_off = c;
            buf.header_mut(c).prev_phys_off = a;
        }

        insert_after(&buf, a, b);

        unsafe {
            assert_eq!(buf.header(a).next_phys_off, b);
            assert_eq!(buf.header(b).prev_phys_off, a);
            assert_eq!(buf.header(b).next_phys_off, c);
            assert_eq!(buf.header(c).prev_phys_off, b);
        }
    }

    #[test]
    fn unlink_joins_neighbors_and_handles_list_ends() {
        let mut storage = vec![0u8; 256];
        let base = NonNull::new(storage.as_mut_ptr()).unwrap();
        let buf = Buf::new(base, storage.len());
        let (a, b, c) = (16, 48, 80);
        for off in [a, b, c] {
            region_at(&buf, off);
        }
        unsafe {
            buf.header_mut(a).next_phys_off = b;
            buf.header_mut(b).prev_phys_off = a;
            buf.header_mut(b).next_phys_off = c;
            buf.header_mut(c).prev_phys_off = b;
        }

        unlink(&buf, b);
        unsafe {
            assert_eq!(buf.header(a).next_phys_off, c);
            assert_eq!(buf.header(c).prev_phys_off, a);
        }

        unlink(&buf, c);
        unsafe {
            assert_eq!(buf.header(a).next_phys_off, NULL_OFFSET);
        }
    }
}
