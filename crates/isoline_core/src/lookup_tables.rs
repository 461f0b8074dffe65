//! Lookup tables for marching-squares cells
//!
//! Corner and edge numbering:
//!
//! ```text
//!  c0---e0---c1
//!   |        |
//!  e3        e1
//!   |        |
//!  c3---e2---c2
//! ```
//!
//! The case code has bit 3 for c0, bit 2 for c1, bit 1 for c2 and bit 0
//! for c3, so case 1 is the bottom-left corner alone and case 8 the
//! top-left corner alone. Cases `n` and `15 - n` share a topology.

/// Corner pair for each edge, in interpolation direction
pub const EDGE_CORNERS: [[usize; 2]; 4] = [
    [0, 1], // e0: top
    [1, 2], // e1: right
    [3, 2], // e2: bottom
    [0, 3], // e3: left
];

/// Case-code bit contributed by each corner
pub const CORNER_BITS: [u8; 4] = [8, 4, 2, 1];

/// Corner offsets from the cell center, in half-cell units
pub const CORNER_OFFSETS: [[f32; 2]; 4] = [
    [-1.0, -1.0], // c0: top-left
    [1.0, -1.0],  // c1: top-right
    [1.0, 1.0],   // c2: bottom-right
    [-1.0, 1.0],  // c3: bottom-left
];

/// Edge pairs to connect for each case, `-1` terminated.
///
/// Saddle cases 5 and 10 hold the topology used when the cell center is
/// outside the contour. When the center is inside, the complementary row
/// (`15 - code`) applies instead.
pub const SEGMENT_TABLE: [[i8; 4]; 16] = [
    [-1, -1, -1, -1], // 0
    [3, 2, -1, -1],   // 1
    [2, 1, -1, -1],   // 2
    [3, 1, -1, -1],   // 3
    [0, 1, -1, -1],   // 4
    [0, 1, 3, 2],     // 5 (saddle)
    [0, 2, -1, -1],   // 6
    [0, 3, -1, -1],   // 7
    [0, 3, -1, -1],   // 8
    [0, 2, -1, -1],   // 9
    [0, 3, 2, 1],     // 10 (saddle)
    [0, 1, -1, -1],   // 11
    [3, 1, -1, -1],   // 12
    [2, 1, -1, -1],   // 13
    [3, 2, -1, -1],   // 14
    [-1, -1, -1, -1], // 15
];

/// Number of segments a case emits
pub const fn segment_count(case_idx: usize) -> usize {
    let row = SEGMENT_TABLE[case_idx];
    if row[0] < 0 {
        0
    } else if row[2] < 0 {
        1
    } else {
        2
    }
}

/// Bitmask of edges crossed by the contour for a case
pub const fn crossed_edges(case_idx: usize) -> u8 {
    let mut mask = 0u8;
    let mut edge_idx = 0;

    while edge_idx < 4 {
        let a = CORNER_BITS[EDGE_CORNERS[edge_idx][0]] as usize;
        let b = CORNER_BITS[EDGE_CORNERS[edge_idx][1]] as usize;
        let a_inside = case_idx & a != 0;
        let b_inside = case_idx & b != 0;
        if a_inside != b_inside {
            mask |= 1 << edge_idx;
        }
        edge_idx += 1;
    }

    mask
}

/// True for the two ambiguous diagonal cases
#[inline]
pub const fn is_saddle(case_idx: usize) -> bool {
    case_idx == 5 || case_idx == 10
}
