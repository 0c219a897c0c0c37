//! Structural scenarios over a 2048-byte buffer, min alignment 8.
//!
//! Mirrors the allocator's documented seed suite: a fresh buffer, a
//! three-allocation sequence, freeing the middle and then everything,
//! re-allocating into the resulting single free region, and growing an
//! allocation in place against a free tail.

use arena_alloc::Arena;

#[test]
fn s1_fresh_init_is_a_single_free_region() {
    let mut storage = [0u8; 2048];
    let arena = Arena::init(&mut storage).unwrap();
    arena.validate().unwrap();

    let mut regions = Vec::new();
    arena.walk_physical(|r| regions.push(r));
    assert_eq!(regions.len(), 1);
    assert!(regions[0].free);
    assert_eq!(regions[0].size, arena.capacity() - arena.first_block_offset());

    let mut free_nodes = Vec::new();
    arena.walk_free_index(|r| free_nodes.push(r));
    assert_eq!(free_nodes.len(), 1);
    assert_eq!(free_nodes[0].color, arena_alloc::introspect::NodeColor::Black);
}

#[test]
fn s2_three_alloc_sequence_leaves_a_single_free_tail() {
    let mut storage = [0u8; 2048];
    let mut arena = Arena::init(&mut storage).unwrap();
    let initial_free = arena.capacity() - arena.first_block_offset();

    let a = arena.alloc(64).unwrap();
    let b = arena.alloc(120).unwrap();
    let c = arena.alloc(40).unwrap();
    arena.validate().unwrap();

    let mut regions = Vec::new();
    arena.walk_physical(|r| regions.push(r));
    assert_eq!(regions.len(), 4);
    assert!(!regions[0].free && !regions[1].free && !regions[2].free);
    assert!(regions[3].free);

    let consumed: u32 = regions[0].size + regions[1].size + regions[2].size;
    assert_eq!(regions[3].size, initial_free - consumed);

    assert_ne!(a, b);
    assert_ne!(b, c);
}

#[test]
fn s3_freeing_the_middle_region_does_not_coalesce() {
    let mut storage = [0u8; 2048];
    let mut arena = Arena::init(&mut storage).unwrap();
    let _a = arena.alloc(64).unwrap();
    let b = arena.alloc(120).unwrap();
    let _c = arena.alloc(40).unwrap();

    arena.free(Some(b));
    arena.validate().unwrap();

    let mut regions = Vec::new();
    arena.walk_physical(|r| regions.push(r));
    assert_eq!(regions.len(), 4);
    assert!(!regions[0].free); // a
    assert!(regions[1].free); // freed b
    assert!(!regions[2].free); // c
    assert!(regions[3].free); // tail

    let mut free_nodes = Vec::new();
    arena.walk_free_index(|r| free_nodes.push(r));
    assert_eq!(free_nodes.len(), 2);
}

#[test]
fn s4_freeing_all_three_restores_a_single_free_region() {
    let mut storage = [0u8; 2048];
    let mut arena = Arena::init(&mut storage).unwrap();
    let a = arena.alloc(64).unwrap();
    let b = arena.alloc(120).unwrap();
    let c = arena.alloc(40).unwrap();

    arena.free(Some(a));
    arena.free(Some(b));
    arena.free(Some(c));
    arena.validate().unwrap();

    let mut regions = Vec::new();
    arena.walk_physical(|r| regions.push(r));
    assert_eq!(regions.len(), 1);
    assert!(regions[0].free);
    assert_eq!(regions[0].size, arena.capacity() - arena.first_block_offset());

    let mut free_nodes = Vec::new();
    arena.walk_free_index(|r| free_nodes.push(r));
    assert_eq!(free_nodes.len(), 1);
}

#[test]
fn s5_reallocating_after_full_free_reuses_the_first_offset() {
    let mut storage = [0u8; 2048];
    let mut arena = Arena::init(&mut storage).unwrap();
    let a = arena.alloc(64).unwrap();
    let b = arena.alloc(120).unwrap();
    let c = arena.alloc(40).unwrap();

    arena.free(Some(a));
    arena.free(Some(b));
    arena.free(Some(c));

    let reused = arena.alloc(200).unwrap();
    arena.validate().unwrap();
    assert_eq!(reused, a);
}

#[test]
fn s6_realloc_grows_in_place_against_a_free_tail() {
    let mut storage = [0u8; 2048];
    let mut arena = Arena::init(&mut storage).unwrap();
    let p = arena.alloc(64).unwrap();
    unsafe { p.as_ptr().write(0x5A) };

    let original_region_size = {
        let mut size = 0;
        arena.walk_physical(|r| {
            if !r.free {
                size = r.size;
            }
        });
        size
    };

    let grown = arena.realloc(Some(p), 128).unwrap();
    arena.validate().unwrap();

    assert_eq!(grown, p, "grow-in-place must not move the payload pointer");
    assert_eq!(unsafe { grown.as_ptr().read() }, 0x5A, "sentinel byte survives the grow");

    let mut regions = Vec::new();
    arena.walk_physical(|r| regions.push(r));
    assert_eq!(regions.len(), 2);
    assert!(regions[0].size > original_region_size, "region must have grown");
    assert!(regions[1].free, "the tail shrinks but stays free");
}
