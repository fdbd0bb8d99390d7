//! Cut algorithm tests for Block

use glam::DVec3;
use tui_stacker::core::{Block, BlockId, CutOutcome, Direction, SimpleRng};
use tui_stacker::types::CutKind;

const ACCURACY: f64 = 0.2;

fn target_at(x: f64, width: f64) -> Block {
    let mut b = Block::with_scale(BlockId(0), DVec3::new(width, 2.0, 10.0));
    b.set_position(DVec3::new(x, 0.0, 0.0));
    b
}

fn moving_at(x: f64, width: f64) -> Block {
    let mut b = Block::with_scale(BlockId(1), DVec3::new(width, 2.0, 10.0));
    b.set_position(DVec3::new(x, 2.0, 0.0));
    b.set_direction(Direction::PosX);
    b
}

#[test]
fn test_aligned_drop_is_perfect() {
    let target = target_at(0.0, 10.0);
    let mut current = moving_at(0.0, 10.0);

    assert_eq!(current.cut(&target, ACCURACY), CutOutcome::Perfect);
    assert_eq!(current.scale(), DVec3::new(10.0, 2.0, 10.0));
    assert_eq!(current.position(), DVec3::new(0.0, 2.0, 0.0));
}

#[test]
fn test_small_shortfall_snaps_onto_target() {
    let target = target_at(1.0, 10.0);
    let mut current = moving_at(1.125, 10.0);

    assert_eq!(current.cut(&target, ACCURACY), CutOutcome::Perfect);
    assert_eq!(current.position().x, 1.0);
    assert_eq!(current.scale().x, 10.0);
}

#[test]
fn test_partial_overlap_chops_off_overhang() {
    let target = target_at(0.0, 10.0);
    let mut current = moving_at(7.0, 10.0);

    let outcome = current.cut(&target, ACCURACY);
    assert_eq!(
        outcome,
        CutOutcome::Chopped {
            position: DVec3::new(8.5, 2.0, 0.0),
            scale: DVec3::new(7.0, 2.0, 10.0),
        }
    );
    assert_eq!(current.scale().x, 3.0);
    assert_eq!(current.position().x, 3.5);
}

#[test]
fn test_overhang_on_negative_side_falls_on_negative_side() {
    let target = target_at(0.0, 10.0);
    let mut current = moving_at(-7.0, 10.0);

    match current.cut(&target, ACCURACY) {
        CutOutcome::Chopped { position, scale } => {
            assert_eq!(position.x, -8.5);
            assert_eq!(scale.x, 7.0);
        }
        other => panic!("expected a chop, got {:?}", other),
    }
    assert_eq!(current.position().x, -3.5);
}

#[test]
fn test_no_overlap_is_a_miss() {
    let target = target_at(0.0, 10.0);
    let mut current = moving_at(15.0, 10.0);

    assert_eq!(current.cut(&target, ACCURACY), CutOutcome::Missed);
    // A miss leaves the block untouched.
    assert_eq!(current.position().x, 15.0);
    assert_eq!(current.scale().x, 10.0);
}

#[test]
fn test_touching_edges_is_not_a_miss() {
    let target = target_at(0.0, 10.0);
    let mut current = moving_at(10.0, 10.0);

    let outcome = current.cut(&target, ACCURACY);
    assert_eq!(outcome.kind(), CutKind::Chopped);
    assert_eq!(current.scale().x, 0.0);
    assert_eq!(current.position().x, 5.0);
}

#[test]
fn test_shortfall_equal_to_accuracy_is_chopped() {
    let target = target_at(0.0, 10.0);
    let mut current = moving_at(0.25, 10.0);

    let outcome = current.cut(&target, 0.25);
    assert_eq!(outcome.kind(), CutKind::Chopped);
    assert_eq!(current.scale().x, 9.75);
}

#[test]
fn test_narrow_target_bounds_the_survivor() {
    // Current spans 2..8, target spans -1..5.
    let target = target_at(2.0, 6.0);
    let mut current = moving_at(5.0, 6.0);

    match current.cut(&target, ACCURACY) {
        CutOutcome::Chopped { position, scale } => {
            assert_eq!(current.scale().x, 3.0);
            assert_eq!(current.position().x, 3.5);
            assert_eq!(scale.x, 3.0);
            assert_eq!(position.x, 6.5);
        }
        other => panic!("expected a chop, got {:?}", other),
    }
}

#[test]
fn test_chop_conserves_extent_across_offsets() {
    let target = target_at(0.0, 10.0);
    for step in -19..=19 {
        let x = step as f64 * 0.5;
        let mut current = moving_at(x, 10.0);
        let left = x - 5.0;
        let right = x + 5.0;

        match current.cut(&target, ACCURACY) {
            CutOutcome::Chopped { position, scale } => {
                assert_eq!(current.scale().x + scale.x, 10.0, "x = {}", x);

                // Survivor and fragment tile the original block exactly.
                let s0 = current.position().x - current.scale().x / 2.0;
                let s1 = current.position().x + current.scale().x / 2.0;
                let f0 = position.x - scale.x / 2.0;
                let f1 = position.x + scale.x / 2.0;
                let (lo, hi) = if f0 < s0 { (f0, s1) } else { (s0, f1) };
                assert_eq!((lo, hi), (left, right), "x = {}", x);

                // The survivor never leaves the target.
                assert!(s0 >= -5.0 && s1 <= 5.0, "x = {}", x);
            }
            CutOutcome::Perfect => assert_eq!(x, 0.0),
            CutOutcome::Missed => panic!("offset {} overlaps the target", x),
        }
    }
}

#[test]
fn test_chop_conserves_extent_for_irregular_sizes() {
    const TOLERANCE: f64 = 1e-9;
    let mut rng = SimpleRng::new(20_241);

    let mut chops = 0;
    for _ in 0..5_000 {
        let width = 0.05 + rng.next_f64() * 19.95;
        let anchor = (rng.next_f64() - 0.5) * 40.0;
        let offset = (rng.next_f64() - 0.5) * 2.5 * width;
        let x = anchor + offset;
        let target = target_at(anchor, width);
        let mut current = moving_at(x, width);

        match current.cut(&target, ACCURACY) {
            CutOutcome::Chopped { position, scale } => {
                chops += 1;
                let total = current.scale().x + scale.x;
                assert!((total - width).abs() < TOLERANCE, "w {} d {}", width, offset);

                let s0 = current.position().x - current.scale().x / 2.0;
                let s1 = current.position().x + current.scale().x / 2.0;
                let f0 = position.x - scale.x / 2.0;
                let f1 = position.x + scale.x / 2.0;
                let (lo, hi) = if f0 < s0 { (f0, s1) } else { (s0, f1) };
                let left = x - width / 2.0;
                assert!((lo - left).abs() < TOLERANCE, "w {} d {}", width, offset);
                assert!((hi - (left + width)).abs() < TOLERANCE, "w {} d {}", width, offset);

                let t0 = anchor - width / 2.0;
                assert!(s0 >= t0 - TOLERANCE && s1 <= t0 + width + TOLERANCE);
                assert_eq!(current.position().y, 2.0);
                assert_eq!(current.scale().z, 10.0);
            }
            CutOutcome::Perfect => assert!(offset.abs() < ACCURACY + TOLERANCE),
            CutOutcome::Missed => assert!(offset.abs() > width - TOLERANCE),
        }
    }
    assert!(chops > 1_000);
}

#[test]
fn test_zero_width_survivor_is_still_playable() {
    // Edges touch: the survivor keeps no width on X.
    let target = target_at(0.0, 10.0);
    let mut current = moving_at(10.0, 10.0);
    assert_eq!(current.cut(&target, ACCURACY).kind(), CutKind::Chopped);
    assert_eq!(current.scale().x, 0.0);
    assert_eq!(current.position().x, 5.0);

    // The next block moves on Z, where the full depth is left.
    let mut next = Block::with_scale(BlockId(2), current.scale());
    next.set_position(DVec3::new(5.0, 4.0, 3.0));
    next.set_direction(Direction::PosZ);
    assert_eq!(next.cut(&current, ACCURACY).kind(), CutKind::Chopped);
    assert_eq!(next.scale(), DVec3::new(0.0, 2.0, 7.0));

    // Back on X, an exact hit still lands.
    let mut exact = Block::with_scale(BlockId(3), current.scale());
    exact.set_position(DVec3::new(5.0, 4.0, 0.0));
    exact.set_direction(Direction::NegX);
    assert_eq!(exact.cut(&current, ACCURACY), CutOutcome::Perfect);

    let mut off = Block::with_scale(BlockId(4), current.scale());
    off.set_position(DVec3::new(5.001, 4.0, 0.0));
    off.set_direction(Direction::NegX);
    assert_eq!(off.cut(&current, ACCURACY), CutOutcome::Missed);
}

#[test]
fn test_z_axis_cut_leaves_x_and_y_alone() {
    let target = Block::with_scale(BlockId(0), DVec3::new(4.0, 2.0, 10.0));
    let mut current = Block::with_scale(BlockId(1), DVec3::new(4.0, 2.0, 10.0));
    current.set_position(DVec3::new(0.0, 2.0, 6.0));
    current.set_direction(Direction::NegZ);

    let outcome = current.cut(&target, ACCURACY);
    assert_eq!(outcome.kind(), CutKind::Chopped);
    assert_eq!(current.scale(), DVec3::new(4.0, 2.0, 4.0));
    assert_eq!(current.position(), DVec3::new(0.0, 2.0, 3.0));
}
