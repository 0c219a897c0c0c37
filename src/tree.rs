//! Free-region index: a red-black tree over free regions keyed by
//! `(size, offset)`, threaded in place through the same headers that make
//! up the physical list.
//!
//! All operations are the standard CLRS rotations/insert/delete, adapted to
//! work over buffer offsets instead of pointers. The one place this departs
//! from a textbook pointer implementation: the tree has no sentinel node, so
//! a node's "null child" has no header to read a parent pointer back out of.
//! Every helper below that would normally chase `x.parent` for a possibly-null
//! `x` instead receives the parent as an explicit argument, carried through
//! the loop by the caller. See [`delete_fixup`].

use crate::header::Color;
use crate::offset::{Buf, NULL_OFFSET, Offset};

#[inline]
fn left_of(buf: &Buf, off: Offset) -> Offset {
    if off == NULL_OFFSET {
        NULL_OFFSET
    } else {
        unsafe { buf.header(off).left_off }
    }
}

#[inline]
fn right_of(buf: &Buf, off: Offset) -> Offset {
    if off == NULL_OFFSET {
        NULL_OFFSET
    } else {
        unsafe { buf.header(off).right_off }
    }
}

#[inline]
fn parent_of(buf: &Buf, off: Offset) -> Offset {
    if off == NULL_OFFSET {
        NULL_OFFSET
    } else {
        unsafe { buf.header(off).parent_off }
    }
}

#[inline]
fn set_left(buf: &Buf, off: Offset, child: Offset) {
    if off != NULL_OFFSET {
        unsafe { buf.header_mut(off).left_off = child };
    }
}

#[inline]
fn set_right(buf: &Buf, off: Offset, child: Offset) {
    if off != NULL_OFFSET {
        unsafe { buf.header_mut(off).right_off = child };
    }
}

#[inline]
fn set_parent(buf: &Buf, off: Offset, parent: Offset) {
    if off != NULL_OFFSET {
        unsafe { buf.header_mut(off).parent_off = parent };
    }
}

#[inline]
fn color_of(buf: &Buf, off: Offset) -> Color {
    // The absent null child counts as black, as in any RB tree with an
    // implicit sentinel.
    if off == NULL_OFFSET {
        Color::Black
    } else {
        unsafe { buf.header(off).color() }
    }
}

#[inline]
fn set_color(buf: &Buf, off: Offset, color: Color) {
    if off != NULL_OFFSET {
        unsafe { buf.header_mut(off).set_color(color) };
    }
}

#[inline]
fn size_of_region(buf: &Buf, off: Offset) -> u32 {
    unsafe { buf.header(off).size }
}

#[inline]
pub(crate) fn root(buf: &Buf) -> Offset {
    unsafe { buf.arena_header().free_root }
}

#[inline]
fn set_root(buf: &Buf, off: Offset) {
    unsafe { buf.arena_header_mut().free_root = off };
}

fn left_rotate(buf: &Buf, x: Offset) {
    let y = right_of(buf, x);
    if y == NULL_OFFSET {
        return;
    }
    let yl = left_of(buf, y);
    set_right(buf, x, yl);
    if yl != NULL_OFFSET {
        set_parent(buf, yl, x);
    }

    let xp = parent_of(buf, x);
    set_parent(buf, y, xp);
    if xp == NULL_OFFSET {
        set_root(buf, y);
    } else if left_of(buf, xp) == x {
        set_left(buf, xp, y);
    } else {
        set_right(buf, xp, y);
    }

    set_left(buf, y, x);
    set_parent(buf, x, y);
}

fn right_rotate(buf: &Buf, x: Offset) {
    let y = left_of(buf, x);
    if y == NULL_OFFSET {
        return;
    }
    let yr = right_of(buf, y);
    set_left(buf, x, yr);
    if yr != NULL_OFFSET {
        set_parent(buf, yr, x);
    }

    let xp = parent_of(buf, x);
    set_parent(buf, y, xp);
    if xp == NULL_OFFSET {
        set_root(buf, y);
    } else if left_of(buf, xp) == x {
        set_left(buf, xp, y);
    } else {
        set_right(buf, xp, y);
    }

    set_right(buf, y, x);
    set_parent(buf, x, y);
}

fn insert_fixup(buf: &Buf, mut node: Offset) {
    while parent_of(buf, node) != NULL_OFFSET && color_of(buf, parent_of(buf, node)) == Color::Red {
        let parent = parent_of(buf, node);
        let grandparent = parent_of(buf, parent);
        if grandparent == NULL_OFFSET {
            break;
        }

        if parent == left_of(buf, grandparent) {
            let uncle = right_of(buf, grandparent);
            if color_of(buf, uncle) == Color::Red {
                set_color(buf, parent, Color::Black);
                set_color(buf, uncle, Color::Black);
                set_color(buf, grandparent, Color::Red);
                node = grandparent;
            } else {
                let mut n = node;
                let mut p = parent;
                let mut g = grandparent;
                if n == right_of(buf, p) {
                    n = p;
                    left_rotate(buf, n);
                    p = parent_of(buf, n);
                    g = parent_of(buf, p);
                }
                set_color(buf, p, Color::Black);
                if g != NULL_OFFSET {
                    set_color(buf, g, Color::Red);
                    right_rotate(buf, g);
                }
                node = n;
            }
        } else {
            let uncle = left_of(buf, grandparent);
            if color_of(buf, uncle) == Color::Red {
                set_color(buf, parent, Color::Black);
                set_color(buf, uncle, Color::Black);
                set_color(buf, grandparent, Color::Red);
                node = grandparent;
            } else {
                let mut n = node;
                let mut p = parent;
                let mut g = grandparent;
                if n == left_of(buf, p) {
                    n = p;
                    right_rotate(buf, n);
                    p = parent_of(buf, n);
                    g = parent_of(buf, p);
                }
                set_color(buf, p, Color::Black);
                if g != NULL_OFFSET {
                    set_color(buf, g, Color::Red);
                    left_rotate(buf, g);
                }
                node = n;
            }
        }
    }

    let r = root(buf);
    set_color(buf, r, Color::Black);
}

/// Insert the free region at `z` into the tree, keyed by `(size, offset)`.
///
/// `z` must not already be a member of the tree; its tree-link fields are
/// overwritten unconditionally.
pub(crate) fn insert(buf: &Buf, z: Offset) {
    unsafe { buf.header_mut(z).clear_tree_links() };
    set_color(buf, z, Color::Red);

    if root(buf) == NULL_OFFSET {
        set_root(buf, z);
        set_color(buf, z, Color::Black);
        set_parent(buf, z, NULL_OFFSET);
        return;
    }

    let mut y = NULL_OFFSET;
    let mut x = root(buf);
    let z_size = size_of_region(buf, z);

    while x != NULL_OFFSET {
        y = x;
        let x_size = size_of_region(buf, x);
        x = if z_size < x_size {
            left_of(buf, x)
        } else if z_size > x_size {
            right_of(buf, x)
        } else if z < x {
            // Tie-break by offset: lowest address goes left, giving
            // deterministic placement and a reproducible best-fit pick
            // among equal-size candidates.
            left_of(buf, x)
        } else {
            right_of(buf, x)
        };
    }

    set_parent(buf, z, y);
    if z < y {
        set_left(buf, y, z);
    } else {
        set_right(buf, y, z);
    }

    insert_fixup(buf, z);
}

fn transplant(buf: &Buf, u: Offset, v: Offset) {
    let pu = parent_of(buf, u);
    if pu == NULL_OFFSET {
        set_root(buf, v);
    } else if left_of(buf, pu) == u {
        set_left(buf, pu, v);
    } else {
        set_right(buf, pu, v);
    }
    set_parent(buf, v, pu);
}

fn minimum(buf: &Buf, mut n: Offset) -> Offset {
    while left_of(buf, n) != NULL_OFFSET {
        n = left_of(buf, n);
    }
    n
}

/// Delete-fixup, rebalancing after removing a black node.
///
/// `x` is the node that moved into the deleted spot (possibly null); `parent`
/// is `x`'s parent, carried explicitly because a null `x` has no header to
/// read a parent pointer out of. This is the one place the reference C
/// source papers over with a "last known parent" field; threading the value
/// through the loop instead keeps the null-child case unremarkable, even
/// when that null child is the root.
fn delete_fixup(buf: &Buf, mut x: Offset, mut parent: Offset) {
    while x != root(buf) && color_of(buf, x) == Color::Black {
        if parent == NULL_OFFSET {
            break;
        }

        if x == left_of(buf, parent) {
            let mut w = right_of(buf, parent);
            if color_of(buf, w) == Color::Red {
                set_color(buf, w, Color::Black);
                set_color(buf, parent, Color::Red);
                left_rotate(buf, parent);
                w = right_of(buf, parent);
            }
            if color_of(buf, left_of(buf, w)) == Color::Black && color_of(buf, right_of(buf, w)) == Color::Black {
                set_color(buf, w, Color::Red);
                x = parent;
                parent = parent_of(buf, parent);
            } else {
                if color_of(buf, right_of(buf, w)) == Color::Black {
                    set_color(buf, left_of(buf, w), Color::Black);
                    set_color(buf, w, Color::Red);
                    right_rotate(buf, w);
                    w = right_of(buf, parent);
                }
                set_color(buf, w, color_of(buf, parent));
                set_color(buf, parent, Color::Black);
                set_color(buf, right_of(buf, w), Color::Black);
                left_rotate(buf, parent);
                x = root(buf);
                parent = NULL_OFFSET;
            }
        } else {
            let mut w = left_of(buf, parent);
            if color_of(buf, w) == Color::Red {
                set_color(buf, w, Color::Black);
                set_color(buf, parent, Color::Red);
                right_rotate(buf, parent);
                w = left_of(buf, parent);
            }
            if color_of(buf, right_of(buf, w)) == Color::Black && color_of(buf, left_of(buf, w)) == Color::Black {
                set_color(buf, w, Color::Red);
                x = parent;
                parent = parent_of(buf, parent);
            } else {
                if color_of(buf, left_of(buf, w)) == Color::Black {
                    set_color(buf, right_of(buf, w), Color::Black);
                    set_color(buf, w, Color::Red);
                    left_rotate(buf, w);
                    w = left_of(buf, parent);
                }
                set_color(buf, w, color_of(buf, parent));
                set_color(buf, parent, Color::Black);
                set_color(buf, left_of(buf, w), Color::Black);
                right_rotate(buf, parent);
                x = root(buf);
                parent = NULL_OFFSET;
            }
        }
    }

    if x != NULL_OFFSET {
        set_color(buf, x, Color::Black);
    }
}

/// Remove the free region at `z` from the tree. `z`'s tree-link fields are
/// considered dead once this returns.
pub(crate) fn delete(buf: &Buf, z: Offset) {
    let mut y = z;
    let mut y_original_color = color_of(buf, y);
    let x: Offset;
    let x_parent: Offset;

    if left_of(buf, z) == NULL_OFFSET {
        x = right_of(buf, z);
        x_parent = parent_of(buf, z);
        transplant(buf, z, x);
    } else if right_of(buf, z) == NULL_OFFSET {
        x = left_of(buf, z);
        x_parent = parent_of(buf, z);
        transplant(buf, z, x);
    } else {
        y = minimum(buf, right_of(buf, z));
        y_original_color = color_of(buf, y);
        x = right_of(buf, y);

        if parent_of(buf, y) == z {
            x_parent = y;
        } else {
            x_parent = parent_of(buf, y);
            transplant(buf, y, x);
            set_right(buf, y, right_of(buf, z));
            set_parent(buf, right_of(buf, y), y);
        }

        transplant(buf, z, y);
        set_left(buf, y, left_of(buf, z));
        set_parent(buf, left_of(buf, y), y);
        set_color(buf, y, color_of(buf, z));
    }

    if y_original_color == Color::Black {
        delete_fixup(buf, x, x_parent);
    }
}

/// Find the least `(size, offset)` free region with `size >= needed`, or
/// `NULL_OFFSET` if none exists.
pub(crate) fn find_best(buf: &Buf, needed: u32) -> Offset {
    let mut cur = root(buf);
    let mut best = NULL_OFFSET;
    while cur != NULL_OFFSET {
        if size_of_region(buf, cur) >= needed {
            best = cur;
            cur = left_of(buf, cur);
        } else {
            cur = right_of(buf, cur);
        }
    }
    best
}

/// In-order traversal of the subtree rooted at `start`, visiting every node
/// exactly once in ascending `(size, offset)` order.
///
/// Recursive, same shape as the reference source's `rb_inorder_print`.
/// Stack depth is bounded by the tree's height, which is O(log F) for any
/// red-black tree, so this does not need a heap-allocated frontier.
pub(crate) fn inorder_walk<F: FnMut(Offset)>(buf: &Buf, start: Offset, visit: &mut F) {
    if start == NULL_OFFSET {
        return;
    }
    inorder_walk(buf, left_of(buf, start), visit);
    visit(start);
    inorder_walk(buf, right_of(buf, start), visit);
}

/// `true` if the region at `target` (with the given size) is reachable from
/// the free-index root by ordinary `(size, offset)` BST descent.
///
/// Used by [`crate::Arena::validate`] to cross-check that every physically
/// free region is indexed, without needing a heap-allocated visited set.
pub(crate) fn contains(buf: &Buf, size: u32, target: Offset) -> bool {
    let mut cur = root(buf);
    while cur != NULL_OFFSET {
        let cur_size = size_of_region(buf, cur);
        if cur_size == size && cur == target {
            return true;
        }
        cur = if (size, target) < (cur_size, cur) {
            left_of(buf, cur)
        } else {
            right_of(buf, cur)
        };
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::RegionHeader;
    use core::ptr::NonNull;

    /// Lay out `count` fake regions of the given sizes at fixed, non-
    /// overlapping offsets starting right after the arena header, each
    /// wide enough to host a header plus a little payload, with no
    /// physical-list links (the tree doesn't consult them).
    fn fixture(storage: &mut [u8], sizes: &[u32]) -> (Buf, Vec<Offset>) {
        let stride = (size_of::<RegionHeader>() + 16) as u32;
        let base = NonNull::new(storage.as_mut_ptr()).unwrap();
        let buf = Buf::new(base, storage.len());
        unsafe { buf.arena_header_mut().free_root = NULL_OFFSET };

        let mut offsets = Vec::new();
        let mut off = stride; // offset 0 is reserved for the arena header
        for &size in sizes {
            unsafe {
                let h = buf.header_mut(off);
                *h = RegionHeader::zeroed();
                h.size = size;
            }
            offsets.push(off);
            off += stride;
        }
        (buf, offsets)
    }

    #[test]
    fn insert_then_inorder_is_sorted_by_size_then_offset() {
        let mut storage = vec![0u8; 4096];
        let sizes = [40, 10, 30, 10, 50, 20];
        let (buf, offsets) = fixture(&mut storage, &sizes);
        for &off in &offsets {
            insert(&buf, off);
        }

        let mut seen = Vec::new();
        inorder_walk(&buf, root(&buf), &mut |off| seen.push(size_of_region(&buf, off)));
        let mut expected = sizes.to_vec();
        expected.sort_unstable();
        assert_eq!(seen, expected);
        assert!(satisfies_red_black(&buf));
        assert_eq!(check_order_and_count(&buf), Some(sizes.len() as u32));
    }

    #[test]
    fn find_best_returns_smallest_sufficient_region() {
        let mut storage = vec![0u8; 4096];
        let (buf, offsets) = fixture(&mut storage, &[40, 10, 30, 50, 20]);
        for &off in &offsets {
            insert(&buf, off);
        }

        let best = find_best(&buf, 25);
        assert_eq!(size_of_region(&buf, best), 30);
        assert_eq!(find_best(&buf, 51), NULL_OFFSET);
        assert_eq!(find_best(&buf, 1), offsets[1]); // size 10, lowest offset among ties
    }

    #[test]
    fn delete_preserves_red_black_and_order() {
        let mut storage = vec![0u8; 8192];
        let sizes: Vec<u32> = (1..=31).collect();
        let (buf, offsets) = fixture(&mut storage, &sizes);
        for &off in &offsets {
            insert(&buf, off);
        }

        for &off in offsets.iter().step_by(2) {
            delete(&buf, off);
            assert!(satisfies_red_black(&buf));
        }

        let remaining = sizes.len() - offsets.iter().step_by(2).count();
        assert_eq!(check_order_and_count(&buf), Some(remaining as u32));
    }

    #[test]
    fn contains_matches_membership() {
        let mut storage = vec![0u8; 4096];
        let (buf, offsets) = fixture(&mut storage, &[40, 10, 30]);
        for &off in &offsets {
            insert(&buf, off);
        }
        assert!(contains(&buf, 30, offsets[2]));
        delete(&buf, offsets[2]);
        assert!(!contains(&buf, 30, offsets[2]));
    }
}

/// Checks the two red-black properties that aren't structural by
/// construction: no red node has a red child, and every root-to-null path
/// has the same black-node count. Returns `false` on the first violation.
pub(crate) fn satisfies_red_black(buf: &Buf) -> bool {
    let r = root(buf);
    if r != NULL_OFFSET && color_of(buf, r) != Color::Black {
        return false;
    }
    black_height(buf, r).is_some()
}

fn black_height(buf: &Buf, node: Offset) -> Option<u32> {
    if node == NULL_OFFSET {
        return Some(0);
    }
    if color_of(buf, node) == Color::Red
        && (color_of(buf, left_of(buf, node)) == Color::Red || color_of(buf, right_of(buf, node)) == Color::Red)
    {
        return None;
    }
    let left_height = black_height(buf, left_of(buf, node))?;
    let right_height = black_height(buf, right_of(buf, node))?;
    if left_height != right_height {
        return None;
    }
    Some(left_height + u32::from(color_of(buf, node) == Color::Black))
}

/// Counts the free index and checks that an in-order walk yields strictly
/// ascending `(size, offset)` keys. Returns `None` on the first inversion.
pub(crate) fn check_order_and_count(buf: &Buf) -> Option<u32> {
    let mut count = 0u32;
    let mut prev: Option<(u32, Offset)> = None;
    let mut ok = true;
    inorder_walk(buf, root(buf), &mut |off| {
        let key = (size_of_region(buf, off), off);
        if let Some(p) = prev {
            if p >= key {
                ok = false;
            }
        }
        prev = Some(key);
        count += 1;
    });
    ok.then_some(count)
}
