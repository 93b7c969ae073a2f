//! Classic 2D gradient noise hashed through a [`PermutationTable`].

use crate::permutation::{PermutationTable, lattice};

/// Quintic fade curve `6t^5 - 15t^4 + 10t^3`.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of `(x, y)` with one of four diagonal gradients picked by the low two bits.
#[inline]
fn grad(hash: i32, x: f64, y: f64) -> f64 {
    match hash & 3 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        _ => -x - y,
    }
}

/// Sample Perlin noise at `(x, y)`.
///
/// The raw gradient sum lies in `[-1, 1]`; it is remapped to `[0, 1]` so the value can be
/// used directly as a height without an offset. Lattice points sample exactly `0.5`.
pub fn perlin(table: &PermutationTable, x: f64, y: f64) -> f64 {
    let xi = lattice(x);
    let yi = lattice(y);
    let xf = x - libm::floor(x);
    let yf = y - libm::floor(y);

    let u = fade(xf);
    let v = fade(yf);

    let aa = table.lookup_2d(xi, yi);
    let ab = table.lookup_2d(xi, yi + 1);
    let ba = table.lookup_2d(xi + 1, yi);
    let bb = table.lookup_2d(xi + 1, yi + 1);

    let bottom = lerp(u, grad(aa, xf, yf), grad(ba, xf - 1.0, yf));
    let top = lerp(u, grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0));
    let n = lerp(v, bottom, top);

    ((n + 1.0) * 0.5).clamp(0.0, 1.0)
}
