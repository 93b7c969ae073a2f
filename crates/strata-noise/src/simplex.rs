//! 2D simplex noise over a skewed triangular lattice.

use crate::permutation::{PermutationTable, lattice};

/// Skew factor `(sqrt(3) - 1) / 2`.
const F2: f64 = 0.366_025_403_784_438_6;
/// Unskew factor `(3 - sqrt(3)) / 6`.
const G2: f64 = 0.211_324_865_405_187_1;

/// Input pre-scale that keeps simplex amplitude comparable to the other noise kinds.
const INPUT_SCALE: f64 = 0.5;

/// Maps the low three bits of `hash` onto eight gradient directions and returns the
/// dot product with `(x, y)`.
#[inline]
fn grad(hash: i32, x: f64, y: f64) -> f64 {
    let h = hash & 7;
    let (u, v) = if h < 4 { (x, y) } else { (y, x) };
    let u = if h & 1 != 0 { -u } else { u };
    let v = if h & 2 != 0 { -2.0 * v } else { 2.0 * v };
    u + v
}

/// Offset of the middle simplex corner for local coordinates `(x0, y0)`.
///
/// `x0 >= y0` selects the lower triangle `(1, 0)`; otherwise the upper triangle `(0, 1)`.
/// Ties on the diagonal always resolve to the lower triangle.
#[inline]
pub fn simplex_corner_offset(x0: f64, y0: f64) -> (i64, i64) {
    if x0 >= y0 { (1, 0) } else { (0, 1) }
}

/// Contribution `(0.5 - d^2)^4 * grad` of one corner, zero outside its radius.
#[inline]
fn corner(hash: i32, x: f64, y: f64) -> f64 {
    let t = 0.5 - x * x - y * y;
    if t < 0.0 {
        0.0
    } else {
        let t2 = t * t;
        t2 * t2 * grad(hash, x, y)
    }
}

/// Sample simplex noise at `(x, y)`. The result lies in `[-1, 1]`.
pub fn simplex(table: &PermutationTable, x: f64, y: f64) -> f64 {
    let x = x * INPUT_SCALE;
    let y = y * INPUT_SCALE;

    let s = (x + y) * F2;
    let i = lattice(x + s);
    let j = lattice(y + s);

    let t = (i + j) as f64 * G2;
    let x0 = x - (i as f64 - t);
    let y0 = y - (j as f64 - t);

    let (i1, j1) = simplex_corner_offset(x0, y0);

    let x1 = x0 - i1 as f64 + G2;
    let y1 = y0 - j1 as f64 + G2;
    let x2 = x0 - 1.0 + 2.0 * G2;
    let y2 = y0 - 1.0 + 2.0 * G2;

    let n0 = corner(table.lookup_2d(i, j), x0, y0);
    let n1 = corner(table.lookup_2d(i + i1, j + j1), x1, y1);
    let n2 = corner(table.lookup_2d(i + 1, j + 1), x2, y2);

    40.0 * (n0 + n1 + n2)
}
