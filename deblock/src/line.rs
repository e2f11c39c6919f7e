//! The filters applied to a single Line crossing an edge.
//!
//! A Line is the run of samples perpendicular to the edge, ordered from the
//! outermost p sample to the outermost q sample. These are the reference
//! kernels: the SIMD path must agree with them bit for bit, and whatever does
//! not fill a whole batch of lanes is processed here.

use crate::mask::{chroma_mask, LumaMask};
use crate::params::is_filtered;

/// `p3, p2, p1, p0, q0, q1, q2, q3`
pub type LumaLine = [u8; 8];

/// `p1, p0, q0, q1`
pub type ChromaLine = [u8; 4];

/// Sample positions within a `LumaLine`.
pub mod luma {
    pub const P3: usize = 0;
    pub const P2: usize = 1;
    pub const P1: usize = 2;
    pub const P0: usize = 3;
    pub const Q0: usize = 4;
    pub const Q1: usize = 5;
    pub const Q2: usize = 6;
    pub const Q3: usize = 7;
}

/// Sample positions within a `ChromaLine`.
pub mod chroma {
    pub const P1: usize = 0;
    pub const P0: usize = 1;
    pub const Q0: usize = 2;
    pub const Q1: usize = 3;
}

/// Saturates to the sample range.
#[inline]
fn clip1(x: i16) -> u8 {
    x.clamp(0, 255) as u8
}

/// Clips x to the range +/- lim, `lim` being non-negative.
#[inline]
fn clip3(x: i16, lim: i16) -> i16 {
    x.clamp(-lim, lim)
}

/// The clipped correction moving `p0` and `q0` towards each other, shared by
/// the luma and chroma normal filters.
#[inline]
fn normal_delta(p1: i16, p0: i16, q0: i16, q1: i16, tc: i16) -> i16 {
    clip3((4 * (q0 - p0) + (p1 - q1) + 4) >> 3, tc)
}

/// Normal (boundary strength 1-3) luma filter.
///
/// A negative `tc0` leaves the Line alone. Only `p1..=q1` can change.
pub fn luma_normal(line: &mut LumaLine, alpha: u8, beta: u8, tc0: i16) {
    debug_assert!(tc0 <= 255);

    if !is_filtered(tc0) {
        return;
    }

    let mask = LumaMask::new(line, alpha, beta);
    if !mask.filter {
        return;
    }

    let [_, p2, p1, p0, q0, q1, q2, _] = (*line).map(i16::from);

    let tc = tc0 + i16::from(mask.ap) + i16::from(mask.aq);
    let delta = normal_delta(p1, p0, q0, q1, tc);
    let avg = (p0 + q0 + 1) >> 1;

    line[luma::P0] = clip1(p0 + delta);
    line[luma::Q0] = clip1(q0 - delta);

    if mask.ap {
        line[luma::P1] = clip1(p1 + clip3((p2 + avg - 2 * p1) >> 1, tc0));
    }
    if mask.aq {
        line[luma::Q1] = clip1(q1 + clip3((q2 + avg - 2 * q1) >> 1, tc0));
    }
}

/// Both candidate updates of one side of a strong luma edge, `x` being the
/// side being written and `y` the opposite one. Returns `(x0, x1, x2)`.
#[inline]
fn strong_side(x: [i16; 4], y0: i16, y1: i16, three_tap: bool) -> (u8, u8, u8) {
    let [x3, x2, x1, x0] = x;

    let full = (
        (x2 + 2 * x1 + 2 * x0 + 2 * y0 + y1 + 4) >> 3,
        (x2 + x1 + x0 + y0 + 2) >> 2,
        (2 * x3 + 3 * x2 + x1 + x0 + y0 + 4) >> 3,
    );
    let short = ((2 * x1 + x0 + y1 + 2) >> 2, x1, x2);

    // All of these are rounded weighted averages of samples, so they stay in range.
    let (n0, n1, n2) = if three_tap { full } else { short };
    (n0 as u8, n1 as u8, n2 as u8)
}

/// Strong (boundary strength 4) luma filter for intra edges.
///
/// Only `p2..=q2` can change.
pub fn luma_intra(line: &mut LumaLine, alpha: u8, beta: u8) {
    let mask = LumaMask::new(line, alpha, beta);
    if !mask.filter {
        return;
    }

    let [p3, p2, p1, p0, q0, q1, q2, q3] = (*line).map(i16::from);

    let near = (p0 - q0).abs() < (i16::from(alpha) >> 2) + 2;

    let (np0, np1, np2) = strong_side([p3, p2, p1, p0], q0, q1, near && mask.ap);
    let (nq0, nq1, nq2) = strong_side([q3, q2, q1, q0], p0, p1, near && mask.aq);

    line[luma::P2] = np2;
    line[luma::P1] = np1;
    line[luma::P0] = np0;
    line[luma::Q0] = nq0;
    line[luma::Q1] = nq1;
    line[luma::Q2] = nq2;
}

/// Normal (boundary strength 1-3) chroma filter.
///
/// `tc` is used exactly as given; a negative value leaves the Line alone. Only
/// `p0` and `q0` can change.
pub fn chroma_normal(line: &mut ChromaLine, alpha: u8, beta: u8, tc: i16) {
    debug_assert!(tc <= 255);

    if !is_filtered(tc) || !chroma_mask(line, alpha, beta) {
        return;
    }

    let [p1, p0, q0, q1] = (*line).map(i16::from);
    let delta = normal_delta(p1, p0, q0, q1, tc);

    line[chroma::P0] = clip1(p0 + delta);
    line[chroma::Q0] = clip1(q0 - delta);
}

/// Strong (boundary strength 4) chroma filter. Only `p0` and `q0` can change.
pub fn chroma_intra(line: &mut ChromaLine, alpha: u8, beta: u8) {
    if !chroma_mask(line, alpha, beta) {
        return;
    }

    let [p1, p0, q0, q1] = (*line).map(i16::from);

    line[chroma::P0] = ((2 * p1 + p0 + q1 + 2) >> 2) as u8;
    line[chroma::Q0] = ((2 * q1 + q0 + p1 + 2) >> 2) as u8;
}
