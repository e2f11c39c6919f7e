//! Moving Lines between a plane and contiguous scratch arrays.
//!
//! A Line is addressed by the index of its `q0` sample and the distance
//! `across` between its samples; `N / 2` samples on either side of the edge
//! are read. Out-of-plane accesses panic through slice indexing, they are
//! never clamped.

#[cfg(feature = "simd")]
use crate::deblock::Direction;
#[cfg(feature = "simd")]
use crate::simd_impl::LANES;

/// Turns rows into columns.
#[cfg(any(test, feature = "simd"))]
pub fn transpose<const R: usize, const C: usize>(block: &[[u8; C]; R]) -> [[u8; R]; C] {
    let mut out = [[0; R]; C];
    for (r, row) in block.iter().enumerate() {
        for (c, &sample) in row.iter().enumerate() {
            out[c][r] = sample;
        }
    }
    out
}

/// Gathers the `N` samples of one Line, outermost p sample first.
#[inline]
pub fn read_line<const N: usize>(buf: &[u8], edge: usize, across: usize) -> [u8; N] {
    let first = edge - N / 2 * across;
    let mut line = [0; N];
    for (k, sample) in line.iter_mut().enumerate() {
        *sample = buf[first + k * across];
    }
    line
}

/// Scatters a Line back, skipping the `keep` outermost samples on each side
/// (the filter in question never changes them).
#[inline]
pub fn write_line<const N: usize>(
    buf: &mut [u8],
    edge: usize,
    across: usize,
    line: &[u8; N],
    keep: usize,
) {
    let first = edge - N / 2 * across;
    for (k, &sample) in line.iter().enumerate().take(N - keep).skip(keep) {
        buf[first + k * across] = sample;
    }
}

/// Gathers `LANES` consecutive Lines into one vector per sample position.
///
/// Along a horizontal edge every sample position is already a contiguous run
/// of `LANES` samples in its own row. Along a vertical edge every Line is a
/// contiguous run of `N` samples, so a `LANES` x `N` block is read and
/// transposed.
#[cfg(feature = "simd")]
pub fn load_lanes<const N: usize>(
    buf: &[u8],
    edge: usize,
    stride: usize,
    dir: Direction,
) -> [[u8; LANES]; N] {
    match dir {
        Direction::Horizontal => {
            let first = edge - N / 2 * stride;
            let mut lanes = [[0; LANES]; N];
            for (k, lane) in lanes.iter_mut().enumerate() {
                let start = first + k * stride;
                lane.copy_from_slice(&buf[start..start + LANES]);
            }
            lanes
        }
        Direction::Vertical => {
            let first = edge - N / 2;
            let mut rows = [[0; N]; LANES];
            for (i, row) in rows.iter_mut().enumerate() {
                let start = first + i * stride;
                row.copy_from_slice(&buf[start..start + N]);
            }
            transpose(&rows)
        }
    }
}

/// Inverse of `load_lanes`, skipping the `keep` outermost sample positions on
/// each side.
#[cfg(feature = "simd")]
pub fn store_lanes<const N: usize>(
    buf: &mut [u8],
    edge: usize,
    stride: usize,
    dir: Direction,
    lanes: &[[u8; LANES]; N],
    keep: usize,
) {
    match dir {
        Direction::Horizontal => {
            let first = edge - N / 2 * stride;
            for (k, lane) in lanes.iter().enumerate().take(N - keep).skip(keep) {
                let start = first + k * stride;
                buf[start..start + LANES].copy_from_slice(lane);
            }
        }
        Direction::Vertical => {
            let first = edge - N / 2;
            let rows: [[u8; N]; LANES] = transpose(lanes);
            for (i, row) in rows.iter().enumerate() {
                let start = first + i * stride;
                buf[start + keep..start + N - keep].copy_from_slice(&row[keep..N - keep]);
            }
        }
    }
}
