/// Tests for AABB: empty sentinel, contain (union), transforms and predicates

use super::*;
use glam::Vec3;

// ============================================================================
// Helper Functions
// ============================================================================

/// Unit box with its minimum corner at `origin`
fn unit_box(origin: Vec3) -> AABB {
    AABB::new(origin, origin + Vec3::ONE)
}

fn sample_bounds() -> Vec<AABB> {
    vec![
        unit_box(Vec3::ZERO),
        unit_box(Vec3::new(5.0, -2.0, 0.5)),
        AABB::new(Vec3::new(-3.0, 0.0, 0.0), Vec3::new(-2.5, 0.25, 9.0)),
        AABB::EMPTY,
        unit_box(Vec3::new(0.0, 0.0, -7.0)),
    ]
}

// ============================================================================
// Tests: Empty sentinel
// ============================================================================

#[test]
fn test_empty_is_default() {
    assert_eq!(AABB::default(), AABB::EMPTY);
    assert_eq!(AABB::empty(), AABB::EMPTY);
    assert!(AABB::EMPTY.is_empty());
}

#[test]
fn test_only_canonical_sentinel_is_empty() {
    // An inverted box that is not the sentinel is not considered empty
    let inverted = AABB::new(Vec3::ONE, Vec3::ZERO);
    assert!(!inverted.is_empty());
    assert_ne!(inverted, AABB::EMPTY);

    let degenerate = AABB::new(Vec3::ZERO, Vec3::ZERO);
    assert!(!degenerate.is_empty());
}

#[test]
fn test_from_points() {
    let points = [
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::new(-1.0, 5.0, 0.0),
        Vec3::new(0.0, -4.0, 8.0),
    ];
    let bound = AABB::from_points(&points);
    assert_eq!(bound.min, Vec3::new(-1.0, -4.0, 0.0));
    assert_eq!(bound.max, Vec3::new(1.0, 5.0, 8.0));

    let none: [Vec3; 0] = [];
    assert_eq!(AABB::from_points(&none), AABB::EMPTY);
}

// ============================================================================
// Tests: Contain
// ============================================================================

#[test]
fn test_contain_empty_identity() {
    for x in sample_bounds() {
        assert_eq!(AABB::EMPTY.contain(&x), x);
        assert_eq!(x.contain(&AABB::EMPTY), x);
    }
    assert_eq!(AABB::EMPTY.contain(&AABB::EMPTY), AABB::EMPTY);
}

#[test]
fn test_contain_union() {
    let a = unit_box(Vec3::ZERO);
    let b = unit_box(Vec3::new(3.0, 0.0, -2.0));
    let u = a.contain(&b);
    assert_eq!(u.min, Vec3::new(0.0, 0.0, -2.0));
    assert_eq!(u.max, Vec3::new(4.0, 1.0, 1.0));
    assert!(u.contains(&a));
    assert!(u.contains(&b));
}

#[test]
fn test_contain_commutative() {
    let bounds = sample_bounds();
    for a in &bounds {
        for b in &bounds {
            assert_eq!(a.contain(b), b.contain(a));
        }
    }
}

#[test]
fn test_contain_fold_order_independent() {
    let bounds = sample_bounds();
    let forward = bounds.iter().fold(AABB::EMPTY, |acc, b| acc.contain(b));
    let backward = bounds.iter().rev().fold(AABB::EMPTY, |acc, b| acc.contain(b));

    let mut rotated = bounds.clone();
    rotated.rotate_left(2);
    let rotated = rotated.iter().fold(AABB::EMPTY, |acc, b| acc.contain(b));

    assert_eq!(forward, backward);
    assert_eq!(forward, rotated);
}

#[test]
fn test_contain_associative() {
    let bounds = sample_bounds();
    let (a, b, c) = (bounds[0], bounds[1], bounds[2]);
    assert_eq!(a.contain(&b).contain(&c), a.contain(&b.contain(&c)));
}

// ============================================================================
// Tests: Predicates
// ============================================================================

#[test]
fn test_contains() {
    let outer = AABB::new(Vec3::splat(-5.0), Vec3::splat(5.0));
    let inner = unit_box(Vec3::ZERO);

    assert!(outer.contains(&inner));
    assert!(!inner.contains(&outer));
    assert!(outer.contains(&AABB::EMPTY));
    assert!(!AABB::EMPTY.contains(&inner));
}

#[test]
fn test_center_and_size() {
    let aabb = AABB::new(Vec3::new(-2.0, 0.0, 2.0), Vec3::new(2.0, 4.0, 3.0));
    assert_eq!(aabb.center(), Some(Vec3::new(0.0, 2.0, 2.5)));
    assert_eq!(aabb.size(), Vec3::new(4.0, 4.0, 1.0));
    assert_eq!(AABB::EMPTY.center(), None);
    assert_eq!(AABB::EMPTY.size(), Vec3::ZERO);
}
