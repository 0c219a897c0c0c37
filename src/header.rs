//! On-disk (in-buffer) record layout for the arena and its regions.
//!
//! Both records are `#[repr(C)]` with plain integer fields laid out
//! explicitly so a buffer produced by this allocator is reproducible
//! byte-for-byte by any compatible implementation targeting the same
//! (little-endian) byte order.

use crate::offset::{NULL_OFFSET, Offset};

/// Well-known constant identifying a buffer initialized by this allocator.
pub(crate) const MAGIC: u32 = 0xC0FE_BABE;

/// Fixed record at the start of the buffer.
#[repr(C)]
pub(crate) struct ArenaHeader {
    pub(crate) magic: u32,
    pub(crate) capacity: u32,
    pub(crate) free_root: Offset,
    pub(crate) first_block: Offset,
}

/// Fixed record placed immediately before every region's payload.
///
/// `color`, `left_off`, `right_off` and `parent_off` are only meaningful
/// while the region is free; treat them as undefined for an allocated
/// region rather than relying on them being zeroed (the split/coalesce
/// engine never bothers to clear them on the allocate transition).
///
/// Padded to 32 bytes (a multiple of [`crate::offset::MIN_ALIGN`]) so that
/// payloads immediately following a header are naturally aligned.
#[repr(C)]
pub(crate) struct RegionHeader {
    pub(crate) size: u32,
    pub(crate) free_flag: u8,
    color: u8,
    _pad: [u8; 2],
    pub(crate) left_off: Offset,
    pub(crate) right_off: Offset,
    pub(crate) parent_off: Offset,
    pub(crate) prev_phys_off: Offset,
    pub(crate) next_phys_off: Offset,
    _reserved: u32,
}

pub(crate) const HEADER_SIZE: usize = size_of::<RegionHeader>();
pub(crate) const ARENA_HEADER_SIZE: usize = size_of::<ArenaHeader>();

/// Red-black tree node color. Free regions only.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Color {
    Black = 0,
    Red = 1,
}

impl RegionHeader {
    pub(crate) const fn zeroed() -> Self {
        Self {
            size: 0,
            free_flag: 0,
            color: Color::Black as u8,
            _pad: [0; 2],
            left_off: NULL_OFFSET,
            right_off: NULL_OFFSET,
            parent_off: NULL_OFFSET,
            prev_phys_off: NULL_OFFSET,
            next_phys_off: NULL_OFFSET,
            _reserved: 0,
        }
    }

    #[inline]
    pub(crate) const fn is_free(&self) -> bool {
        self.free_flag != 0
    }

    #[inline]
    pub(crate) fn color(&self) -> Color {
        if self.color == Color::Red as u8 {
            Color::Red
        } else {
            Color::Black
        }
    }

    #[inline]
    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color as u8;
    }

    #[inline]
    pub(crate) fn clear_tree_links(&mut self) {
        self.left_off = NULL_OFFSET;
        self.right_off = NULL_OFFSET;
        self.parent_off = NULL_OFFSET;
    }
}
