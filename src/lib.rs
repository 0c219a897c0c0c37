//! # Buffer-Resident Best-Fit Allocator
//!
//! A dynamic memory allocator that manages a single caller-supplied
//! contiguous byte buffer — no operating-system heap, no global state. It
//! hands out payload pointers into that buffer via `alloc`, `free`, and
//! `realloc`, tracking free space in a red-black tree keyed by region size
//! so that allocation is a best-fit search rather than a linear scan.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                  Arena (public surface)                │
//! │      init / attach · alloc · free · realloc            │
//! └───────────────────────┬────────────────────────────────┘
//!                         │
//! ┌───────────────────────▼────────────────────────────────┐
//! │              Split / Coalesce Engine                   │
//! │   carves a tail off a selected free region; merges a    │
//! │   freed region back into its free physical neighbors    │
//! └───────────┬─────────────────────────────┬───────────────┘
//!             │                             │
//! ┌───────────▼───────────┐      ┌──────────▼────────────────┐
//! │  Physical Region List  │      │   Free-Region Index        │
//! │  (address-ordered,     │      │   (red-black tree, keyed   │
//! │   doubly linked)        │      │    by (size, offset))      │
//! └───────────┬────────────┘      └──────────┬─────────────────┘
//!             └──────────────┬───────────────┘
//!                            ▼
//!                caller-supplied byte buffer
//! ```
//!
//! Both structures are threaded in place through the same per-region header
//! that sits immediately before every payload; there is no auxiliary
//! heap-allocated bookkeeping anywhere in this crate.
//!
//! ## Usage
//!
//! ```rust
//! use arena_alloc::Arena;
//!
//! let mut storage = [0u8; 2048];
//! let mut arena = Arena::init(&mut storage).expect("buffer is big enough");
//!
//! let p = arena.alloc(64).expect("allocation succeeds");
//! unsafe { p.as_ptr().write_bytes(0xAB, 64) };
//!
//! let p = arena.realloc(Some(p), 128).expect("grow succeeds");
//! arena.free(Some(p));
//! ```
//!
//! ## Concurrency
//!
//! The allocator is single-threaded and fully synchronous by contract: no
//! operation suspends, retries, or touches an internal lock. A caller
//! needing concurrent access must wrap every call (and the buffer itself)
//! in its own mutual exclusion one layer up.
//!
//! ## Persistent layout
//!
//! The arena header and every region header are `#[repr(C)]` records of
//! plain integers, with `0` reserved to mean "no region". A buffer handed to
//! [`Arena::init`] once can later be handed to [`Arena::attach`] — by this
//! process or a bit-compatible one — and resumed without re-initializing,
//! provided the magic and capacity fields still agree.

#![cfg_attr(not(any(test, doctest)), no_std)]

mod arena;
mod coalesce;
pub mod error;
mod header;
pub mod introspect;
mod list;
mod offset;
mod split;
mod tree;

pub use arena::Arena;
pub use error::{AttachError, InitError};
pub use offset::MIN_ALIGN;
