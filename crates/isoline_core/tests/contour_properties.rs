//! Integration tests for contour extraction
//!
//! These tests drive the CPU generator end to end and check the
//! properties any correct extraction must have:
//! 1. Uniform fields produce no segments
//! 2. Counts are even, bounded and deterministic
//! 3. Saddle cells resolve by their center value
//! 4. Threshold ties never produce invalid points

use approx::assert_relative_eq;
use isoline_core::{
    classify, CpuIsolineGenerator, GridGeometry, Point2, PointBuffer, ScalarField,
};

fn extract(field: &ScalarField, iso: f32) -> (u32, Vec<Point2>) {
    let (nx, ny) = field.dimensions();
    let mut generator = CpuIsolineGenerator::new(nx, ny).unwrap();
    let mut output = PointBuffer::new();
    let count = generator.update(field, &mut output, iso).unwrap();
    (count, output.valid(count).to_vec())
}

fn ripple(nx: u32, ny: u32) -> ScalarField {
    ScalarField::from_fn(nx, ny, |x, y| {
        let u = x as f32 / nx as f32;
        let v = y as f32 / ny as f32;
        (u * 9.0).sin() * (v * 7.0).cos() + 0.3 * (u * v * 20.0).sin()
    })
}

// ==================== Uniform Fields ====================

#[test]
fn test_constant_field_emits_nothing() {
    let field = ScalarField::constant(16, 12, 3.0);
    for iso in [-1.0, 0.0, 2.999, 3.0, 3.001, 100.0] {
        let (count, _) = extract(&field, iso);
        assert_eq!(count, 0, "iso {} should produce no segments", iso);
    }
}

// ==================== Concrete Scenarios ====================

#[test]
fn test_single_peak_diamond() {
    let field = ScalarField::new(
        3,
        3,
        vec![
            0.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 0.0,
        ],
    )
    .unwrap();

    let (count, points) = extract(&field, 0.5);
    assert_eq!(count, 8);

    // Every crossing lies halfway between the peak and a neighbor
    let third = 1.0 / 3.0;
    let expected = [
        Point2::new(0.5 * third, third),
        Point2::new(1.5 * third, third),
        Point2::new(third, 0.5 * third),
        Point2::new(third, 1.5 * third),
    ];
    for p in &points {
        assert!(
            expected.iter().any(|e| (e.x - p.x).abs() < 1e-5 && (e.y - p.y).abs() < 1e-5),
            "unexpected crossing {:?}", p
        );
    }

    // Closed loop: every crossing is shared by exactly two segment ends
    for e in &expected {
        let uses = points
            .iter()
            .filter(|p| (e.x - p.x).abs() < 1e-5 && (e.y - p.y).abs() < 1e-5)
            .count();
        assert_eq!(uses, 2);
    }
}

#[test]
fn test_linear_ramp_is_straight_line() {
    // Value grows along x only: contour is a vertical line
    let field = ScalarField::from_fn(8, 5, |x, _| x as f32);
    let (count, points) = extract(&field, 2.5);

    // One segment per row of cells
    assert_eq!(count, 2 * 4);
    for p in &points {
        assert_relative_eq!(p.x, 2.5 / 8.0, epsilon = 1e-6);
    }
}

// ==================== Invariants ====================

#[test]
fn test_count_even_and_bounded() {
    let field = ripple(40, 30);
    let grid = GridGeometry::new(40, 30);
    for iso in [-0.8, -0.3, 0.0, 0.2, 0.7] {
        let (count, points) = extract(&field, iso);
        assert_eq!(count % 2, 0);
        assert!(count as usize <= grid.max_points());
        assert!(points.iter().all(|p| p.is_finite()));
    }
}

#[test]
fn test_update_is_idempotent() {
    let field = ripple(33, 21);
    let mut generator = CpuIsolineGenerator::new(33, 21).unwrap();
    let mut output = PointBuffer::new();

    let first = generator.update(&field, &mut output, 0.1).unwrap();
    let second = generator.update(&field, &mut output, 0.1).unwrap();
    assert_eq!(first, second);
    assert!(first > 0);
}

#[test]
fn test_field_refresh_between_updates() {
    let mut field = ScalarField::constant(5, 5, 0.0);
    let mut generator = CpuIsolineGenerator::new(5, 5).unwrap();
    let mut output = PointBuffer::new();

    assert_eq!(generator.update(&field, &mut output, 0.5).unwrap(), 0);

    field.values_mut()[12] = 1.0;
    assert_eq!(generator.update(&field, &mut output, 0.5).unwrap(), 8);
}

#[test]
fn test_count_matches_cell_classification() {
    // Sum of per-cell segment counts from the classifier alone
    let field = ripple(25, 25);
    let grid = GridGeometry::new(25, 25);
    let iso = 0.15;

    let mut expected = 0u32;
    for y in 0..grid.cells_y() {
        for x in 0..grid.cells_x() {
            let corners = [
                field.value(x, y),
                field.value(x + 1, y),
                field.value(x + 1, y + 1),
                field.value(x, y + 1),
            ];
            let code = classify(corners, iso);
            expected += 2 * isoline_core::lookup_tables::segment_count(code.index()) as u32;
        }
    }

    let (count, _) = extract(&field, iso);
    assert_eq!(count, expected);
}

#[test]
fn test_complement_field_same_count() {
    let field = ripple(30, 30);
    let negated = ScalarField::from_fn(30, 30, |x, y| -field.value(x, y));
    // Inside and outside swap; only exact ties could disagree
    let (a, _) = extract(&field, 0.25);
    let (b, _) = extract(&negated, -0.25);
    assert_eq!(a, b);
}

// ==================== Saddles and Ties ====================

#[test]
fn test_saddle_resolution_flips_with_center() {
    // Case 10 cell: top-left and bottom-right inside
    let joined = ScalarField::new(2, 2, vec![1.0, 0.0, 0.0, 1.0]).unwrap();
    let split = ScalarField::new(2, 2, vec![0.6, 0.0, 0.0, 0.6]).unwrap();

    let (count_joined, pts_joined) = extract(&joined, 0.5);
    let (count_split, pts_split) = extract(&split, 0.5);
    assert_eq!(count_joined, 4);
    assert_eq!(count_split, 4);

    // Joined center: the first segment runs top edge -> right edge
    assert_relative_eq!(pts_joined[1].x, 0.5);
    // Split center: the first segment runs top edge -> left edge
    assert_relative_eq!(pts_split[1].x, 0.0);
}

#[test]
fn test_threshold_ties_never_nan() {
    // Checkerboard of exact threshold values and zeros
    let field = ScalarField::from_fn(20, 20, |x, y| if (x + y) % 2 == 0 { 0.5 } else { 0.0 });
    let (count, points) = extract(&field, 0.5);
    assert!(count > 0);
    assert!(points.iter().all(|p| p.is_finite()));

    let all_tied = ScalarField::constant(20, 20, 0.5);
    assert_eq!(extract(&all_tied, 0.5).0, 0);
}
