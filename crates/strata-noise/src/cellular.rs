//! Cellular noise: Voronoi (Poisson-distributed feature points) and Worley (jittered grid).
//!
//! Both return squared distances to the nearest feature point, so values are
//! non-negative and grow toward cell borders.

use crate::permutation::{PermutationTable, lattice};

/// Input pre-scale that keeps Voronoi amplitude comparable to the other noise kinds.
const VORONOI_SCALE: f64 = 0.75;

/// Worley jitter step and centring offset.
const K: f64 = 1.0 / 7.0;
const KO: f64 = 3.0 / 7.0;
/// Cell-centre offsets of the three neighbouring columns/rows.
const OFFSET_F: [f64; 3] = [-0.5, 0.5, 1.5];

#[inline]
fn distance2(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    (ax - bx) * (ax - bx) + (ay - by) * (ay - by)
}

#[inline]
fn frac(v: f64) -> f64 {
    v - libm::floor(v)
}

#[inline]
fn modulo(x: f64, y: f64) -> f64 {
    x - y * libm::floor(x / y)
}

/// Number of feature points in a cube for a uniform random `value` in `[0, 1]`,
/// following a Poisson distribution with mean ~4. Always between 1 and 9.
fn feature_point_count(value: f64) -> usize {
    const CUMULATIVE: [f64; 8] = [
        0.091_578_194_427_205_8,
        0.238_103_305_510_735,
        0.433_470_120_288_774,
        0.628_836_935_299_644,
        0.785_130_387_122_075,
        0.889_326_021_747_972,
        0.948_866_384_324_819,
        0.978_636_565_613_243,
    ];
    CUMULATIVE
        .iter()
        .position(|&threshold| value < threshold)
        .map_or(9, |i| i + 1)
}

/// Insert `value` into the ascending triple, dropping it if it exceeds every slot.
fn insert_sorted(slots: &mut [f64; 3], value: f64) {
    for i in (0..3).rev() {
        if value > slots[i] {
            break;
        }
        let displaced = slots[i];
        slots[i] = value;
        if i + 1 < 3 {
            slots[i + 1] = displaced;
        }
    }
}

/// Fold a candidate into the running minimum triple `f[0] <= f[1] <= f[2]`.
#[inline]
fn update_minimums(f: &mut [f64; 3], d: f64) {
    if d < f[0] {
        f[2] = f[1];
        f[1] = f[0];
        f[0] = d;
    } else if d < f[1] {
        f[2] = f[1];
        f[1] = d;
    } else if d < f[2] {
        f[2] = d;
    }
}

/// The three nearest squared feature-point distances around `(x, y)`, ascending.
///
/// Searches the 3x3 block of unit cubes around the sample. Every cube holds at
/// least one feature point, so all nine cubes contribute at least nine candidates
/// and every slot ends up finite.
pub fn voronoi_distances(table: &PermutationTable, x: f64, y: f64) -> [f64; 3] {
    let x = x * VORONOI_SCALE;
    let y = y * VORONOI_SCALE;
    let inverse = table.inverse();

    let eval_x = lattice(x);
    let eval_y = lattice(y);

    let mut distances = [f64::INFINITY; 3];

    for i in -1..=1 {
        for j in -1..=1 {
            let cube_x = eval_x + i;
            let cube_y = eval_y + j;

            let mut last = table.lookup_2d(cube_x, cube_y);
            let count = feature_point_count(last as f64 * inverse);

            for _ in 0..count {
                last = table.lookup(last as i64);
                let offset_x = last as f64 * inverse;
                last = table.lookup(last as i64);
                let offset_y = last as f64 * inverse;

                let feature_x = offset_x + cube_x as f64;
                let feature_y = offset_y + cube_y as f64;
                insert_sorted(&mut distances, distance2(x, y, feature_x, feature_y));
            }
        }
    }

    distances
}

/// Squared distance to the nearest Voronoi feature point.
pub fn voronoi(table: &PermutationTable, x: f64, y: f64) -> f64 {
    voronoi_distances(table, x, y)[0]
}

/// The running minimum triple `F0 <= F1 <= F2` over the nine jittered Worley points
/// of the 3x3 neighbourhood around `(x, y)`.
pub fn worley_distances(table: &PermutationTable, x: f64, y: f64) -> [f64; 3] {
    let pi0 = lattice(x);
    let pi1 = lattice(y);
    let pf0 = frac(x);
    let pf1 = frac(y);

    let columns = [
        table.lookup(pi0 - 1),
        table.lookup(pi0),
        table.lookup(pi0 + 1),
    ];

    let mut f = [f64::INFINITY; 3];

    for (i, &column) in columns.iter().enumerate() {
        for (row, offset_y) in OFFSET_F.iter().enumerate() {
            let p = table.lookup_2d(column as i64, pi1 - 1 + row as i64) as f64;
            let jitter_x = frac(p * K) - KO;
            let jitter_y = modulo(libm::floor(p * K), 7.0) * K - KO;
            let d = distance2(pf0, pf1, OFFSET_F[i] + jitter_x, offset_y + jitter_y);
            update_minimums(&mut f, d);
        }
    }

    f
}

/// Squared distance to the nearest Worley point (`F0`).
pub fn worley(table: &PermutationTable, x: f64, y: f64) -> f64 {
    worley_distances(table, x, y)[0]
}
