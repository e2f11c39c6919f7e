//! The threshold test deciding whether a Line crossing an edge is filtered.
//!
//! `alpha` and `beta` are constant along a macroblock edge, but the samples are
//! not, so the test runs once per Line.

use crate::line::{chroma, luma, ChromaLine, LumaLine};

/// `|p0 - q0| < alpha && |p1 - p0| < beta && |q1 - q0| < beta`
///
/// A zero `alpha` or `beta` can never be satisfied, which is how the
/// boundary-strength stage switches an edge off.
#[inline]
pub fn filter_edge(p1: u8, p0: u8, q0: u8, q1: u8, alpha: u8, beta: u8) -> bool {
    p0.abs_diff(q0) < alpha && p1.abs_diff(p0) < beta && q1.abs_diff(q0) < beta
}

/// Mask of one luma Line: the edge test plus the flatness flags of both sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LumaMask {
    /// The Line passes `filter_edge`.
    pub filter: bool,

    /// `|p2 - p0| < beta`
    pub ap: bool,

    /// `|q2 - q0| < beta`
    pub aq: bool,
}

impl LumaMask {
    #[inline]
    pub fn new(line: &LumaLine, alpha: u8, beta: u8) -> Self {
        let p2 = line[luma::P2];
        let p1 = line[luma::P1];
        let p0 = line[luma::P0];
        let q0 = line[luma::Q0];
        let q1 = line[luma::Q1];
        let q2 = line[luma::Q2];

        Self {
            filter: filter_edge(p1, p0, q0, q1, alpha, beta),
            ap: p2.abs_diff(p0) < beta,
            aq: q2.abs_diff(q0) < beta,
        }
    }
}

/// Chroma Lines have no `ap`/`aq`, only the edge test.
#[inline]
pub fn chroma_mask(line: &ChromaLine, alpha: u8, beta: u8) -> bool {
    filter_edge(
        line[chroma::P1],
        line[chroma::P0],
        line[chroma::Q0],
        line[chroma::Q1],
        alpha,
        beta,
    )
}
