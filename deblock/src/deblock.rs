//! Rust implementation of the H.264 in-loop deblocking filter.
//!
//! Every entry point filters one macroblock edge in place. The plane is given
//! as a sample slice together with its row stride, and the edge by the index
//! of the `q0` sample of its first Line. The caller has already decided the
//! edge's boundary strength and looked up `alpha`, `beta` and `tc0`; it is
//! also responsible for filtering edges that share samples in the order the
//! standard prescribes.

#[cfg(feature = "simd")]
use itertools::izip;

use crate::line::{self, ChromaLine, LumaLine};
use crate::params::{is_filtered, EdgeParams, Tc0, TC0_GROUPS};
use crate::transpose::{read_line, write_line};

#[cfg(feature = "simd")]
use crate::simd_impl::{self, ChromaLanes, LumaLanes, LANES};
#[cfg(feature = "simd")]
use crate::transpose::{load_lanes, store_lanes};

/// Orientation of the edge being filtered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// An edge between horizontally adjacent blocks. Its Lines are rows, and
    /// successive Lines are `stride` samples apart.
    Vertical,

    /// An edge between vertically adjacent blocks. Its Lines are columns, the
    /// samples of one Line are `stride` apart, and successive Lines are
    /// adjacent.
    Horizontal,
}

impl Direction {
    /// Returns the distance between the samples of one Line, and the distance
    /// between successive Lines.
    #[inline]
    pub fn steps(self, stride: usize) -> (usize, usize) {
        match self {
            Direction::Vertical => (1, stride),
            Direction::Horizontal => (stride, 1),
        }
    }
}

/// The plane and length of a macroblock edge.
///
/// Every shape has four `tc0` groups; they differ in how many Lines each
/// group covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeShape {
    /// 16 luma Lines.
    Luma,

    /// 8 luma Lines, for field macroblocks next to frame macroblocks (MBAFF).
    LumaField,

    /// 8 chroma Lines: any 4:2:0 edge, or a horizontal 4:2:2 edge.
    Chroma,

    /// 4 chroma Lines (MBAFF).
    ChromaField,

    /// 16 chroma Lines of a vertical 4:2:2 edge.
    Chroma422,

    /// 8 chroma Lines of a vertical 4:2:2 edge (MBAFF).
    Chroma422Field,
}

impl EdgeShape {
    /// Lines sharing one `tc0` entry.
    pub fn group_lines(self) -> usize {
        match self {
            EdgeShape::Luma | EdgeShape::Chroma422 => 4,
            EdgeShape::LumaField | EdgeShape::Chroma | EdgeShape::Chroma422Field => 2,
            EdgeShape::ChromaField => 1,
        }
    }

    /// Lines along the whole edge.
    pub fn lines(self) -> usize {
        self.group_lines() * TC0_GROUPS
    }

    pub fn is_luma(self) -> bool {
        matches!(self, EdgeShape::Luma | EdgeShape::LumaField)
    }

    /// Samples read on each side of the edge.
    pub fn reach(self) -> usize {
        if self.is_luma() {
            4
        } else {
            2
        }
    }
}

/// The `tc0` entry of each of the `LANES` Lines starting at `first`.
#[cfg(feature = "simd")]
#[inline]
fn lane_tc0(tc0: &Tc0, group_lines: usize, first: usize) -> [i16; LANES] {
    let mut lanes = [0; LANES];
    for (lane, i) in izip!(lanes.iter_mut(), first..) {
        *lane = tc0[i / group_lines];
    }
    lanes
}

/// Normal luma filtering of `TC0_GROUPS * group_lines` Lines.
fn luma_edge(
    buf: &mut [u8],
    edge: usize,
    stride: usize,
    dir: Direction,
    group_lines: usize,
    params: EdgeParams,
    tc0: &Tc0,
) {
    debug_assert!(tc0.iter().all(|&t| t <= 255));

    if params.is_disabled() || !tc0.iter().any(|&t| is_filtered(t)) {
        return;
    }

    let EdgeParams { alpha, beta } = params;
    let lines = group_lines * TC0_GROUPS;
    let (across, along) = dir.steps(stride);

    #[cfg(feature = "simd")]
    let first_scalar = {
        for first in (0..lines / LANES).map(|batch| batch * LANES) {
            let tc = lane_tc0(tc0, group_lines, first);
            if !tc.iter().any(|&t| is_filtered(t)) {
                continue;
            }

            let at = edge + first * along;
            let mut lanes: LumaLanes = load_lanes(buf, at, stride, dir);
            simd_impl::luma_normal(&mut lanes, alpha, beta, tc);
            store_lanes(buf, at, stride, dir, &lanes, 2);
        }
        lines / LANES * LANES
    };
    #[cfg(not(feature = "simd"))]
    let first_scalar = 0;

    for i in first_scalar..lines {
        let tc = tc0[i / group_lines];
        if !is_filtered(tc) {
            continue;
        }

        let at = edge + i * along;
        let mut samples: LumaLine = read_line(buf, at, across);
        line::luma_normal(&mut samples, alpha, beta, tc);
        write_line(buf, at, across, &samples, 2);
    }
}

/// Strong luma filtering of `lines` Lines.
fn luma_intra_edge(
    buf: &mut [u8],
    edge: usize,
    stride: usize,
    dir: Direction,
    lines: usize,
    params: EdgeParams,
) {
    if params.is_disabled() {
        return;
    }

    let EdgeParams { alpha, beta } = params;
    let (across, along) = dir.steps(stride);

    #[cfg(feature = "simd")]
    let first_scalar = {
        for first in (0..lines / LANES).map(|batch| batch * LANES) {
            let at = edge + first * along;
            let mut lanes: LumaLanes = load_lanes(buf, at, stride, dir);
            simd_impl::luma_intra(&mut lanes, alpha, beta);
            store_lanes(buf, at, stride, dir, &lanes, 1);
        }
        lines / LANES * LANES
    };
    #[cfg(not(feature = "simd"))]
    let first_scalar = 0;

    for i in first_scalar..lines {
        let at = edge + i * along;
        let mut samples: LumaLine = read_line(buf, at, across);
        line::luma_intra(&mut samples, alpha, beta);
        write_line(buf, at, across, &samples, 1);
    }
}

/// Normal chroma filtering of `TC0_GROUPS * group_lines` Lines.
fn chroma_edge(
    buf: &mut [u8],
    edge: usize,
    stride: usize,
    dir: Direction,
    group_lines: usize,
    params: EdgeParams,
    tc0: &Tc0,
) {
    debug_assert!(tc0.iter().all(|&t| t <= 255));

    if params.is_disabled() || !tc0.iter().any(|&t| is_filtered(t)) {
        return;
    }

    let EdgeParams { alpha, beta } = params;
    let lines = group_lines * TC0_GROUPS;
    let (across, along) = dir.steps(stride);

    #[cfg(feature = "simd")]
    let first_scalar = {
        for first in (0..lines / LANES).map(|batch| batch * LANES) {
            let tc = lane_tc0(tc0, group_lines, first);
            if !tc.iter().any(|&t| is_filtered(t)) {
                continue;
            }

            let at = edge + first * along;
            let mut lanes: ChromaLanes = load_lanes(buf, at, stride, dir);
            simd_impl::chroma_normal(&mut lanes, alpha, beta, tc);
            store_lanes(buf, at, stride, dir, &lanes, 1);
        }
        lines / LANES * LANES
    };
    #[cfg(not(feature = "simd"))]
    let first_scalar = 0;

    for i in first_scalar..lines {
        let tc = tc0[i / group_lines];
        if !is_filtered(tc) {
            continue;
        }

        let at = edge + i * along;
        let mut samples: ChromaLine = read_line(buf, at, across);
        line::chroma_normal(&mut samples, alpha, beta, tc);
        write_line(buf, at, across, &samples, 1);
    }
}

/// Strong chroma filtering of `lines` Lines.
fn chroma_intra_edge(
    buf: &mut [u8],
    edge: usize,
    stride: usize,
    dir: Direction,
    lines: usize,
    params: EdgeParams,
) {
    if params.is_disabled() {
        return;
    }

    let EdgeParams { alpha, beta } = params;
    let (across, along) = dir.steps(stride);

    #[cfg(feature = "simd")]
    let first_scalar = {
        for first in (0..lines / LANES).map(|batch| batch * LANES) {
            let at = edge + first * along;
            let mut lanes: ChromaLanes = load_lanes(buf, at, stride, dir);
            simd_impl::chroma_intra(&mut lanes, alpha, beta);
            store_lanes(buf, at, stride, dir, &lanes, 1);
        }
        lines / LANES * LANES
    };
    #[cfg(not(feature = "simd"))]
    let first_scalar = 0;

    for i in first_scalar..lines {
        let at = edge + i * along;
        let mut samples: ChromaLine = read_line(buf, at, across);
        line::chroma_intra(&mut samples, alpha, beta);
        write_line(buf, at, across, &samples, 1);
    }
}

/// Applies the normal (boundary strength 1-3) filter to an edge of any shape.
///
/// Groups whose `tc0` entry is negative are left untouched. For chroma shapes
/// `tc0` is used as given, so it must already include the `+1` the standard
/// adds for chroma.
pub fn filter_normal(
    buf: &mut [u8],
    edge: usize,
    stride: usize,
    dir: Direction,
    shape: EdgeShape,
    params: EdgeParams,
    tc0: &Tc0,
) {
    let group_lines = shape.group_lines();
    if shape.is_luma() {
        luma_edge(buf, edge, stride, dir, group_lines, params, tc0);
    } else {
        chroma_edge(buf, edge, stride, dir, group_lines, params, tc0);
    }
}

/// Applies the strong (boundary strength 4) filter to an edge of any shape.
pub fn filter_intra(
    buf: &mut [u8],
    edge: usize,
    stride: usize,
    dir: Direction,
    shape: EdgeShape,
    params: EdgeParams,
) {
    if shape.is_luma() {
        luma_intra_edge(buf, edge, stride, dir, shape.lines(), params);
    } else {
        chroma_intra_edge(buf, edge, stride, dir, shape.lines(), params);
    }
}

/// Normal filtering of a 16-Line luma edge, four Lines per `tc0` entry.
pub fn filter_luma(
    buf: &mut [u8],
    edge: usize,
    stride: usize,
    dir: Direction,
    alpha: u8,
    beta: u8,
    tc0: &Tc0,
) {
    let params = EdgeParams::new(alpha, beta);
    filter_normal(buf, edge, stride, dir, EdgeShape::Luma, params, tc0);
}

/// Strong filtering of a 16-Line luma edge.
pub fn filter_luma_intra(
    buf: &mut [u8],
    edge: usize,
    stride: usize,
    dir: Direction,
    alpha: u8,
    beta: u8,
) {
    let params = EdgeParams::new(alpha, beta);
    filter_intra(buf, edge, stride, dir, EdgeShape::Luma, params);
}

/// Normal filtering of an 8-Line chroma edge, two Lines per `tc0` entry.
pub fn filter_chroma(
    buf: &mut [u8],
    edge: usize,
    stride: usize,
    dir: Direction,
    alpha: u8,
    beta: u8,
    tc0: &Tc0,
) {
    let params = EdgeParams::new(alpha, beta);
    filter_normal(buf, edge, stride, dir, EdgeShape::Chroma, params, tc0);
}

/// Strong filtering of an 8-Line chroma edge.
pub fn filter_chroma_intra(
    buf: &mut [u8],
    edge: usize,
    stride: usize,
    dir: Direction,
    alpha: u8,
    beta: u8,
) {
    let params = EdgeParams::new(alpha, beta);
    filter_intra(buf, edge, stride, dir, EdgeShape::Chroma, params);
}

/// Normal filtering of an 8-Line luma edge between a field and a frame
/// macroblock, two Lines per `tc0` entry.
pub fn filter_luma_mbaff(
    buf: &mut [u8],
    edge: usize,
    stride: usize,
    dir: Direction,
    alpha: u8,
    beta: u8,
    tc0: &Tc0,
) {
    let params = EdgeParams::new(alpha, beta);
    filter_normal(buf, edge, stride, dir, EdgeShape::LumaField, params, tc0);
}

pub fn filter_luma_intra_mbaff(
    buf: &mut [u8],
    edge: usize,
    stride: usize,
    dir: Direction,
    alpha: u8,
    beta: u8,
) {
    let params = EdgeParams::new(alpha, beta);
    filter_intra(buf, edge, stride, dir, EdgeShape::LumaField, params);
}

/// Normal filtering of a 4-Line chroma edge, one Line per `tc0` entry.
pub fn filter_chroma_mbaff(
    buf: &mut [u8],
    edge: usize,
    stride: usize,
    dir: Direction,
    alpha: u8,
    beta: u8,
    tc0: &Tc0,
) {
    let params = EdgeParams::new(alpha, beta);
    filter_normal(buf, edge, stride, dir, EdgeShape::ChromaField, params, tc0);
}

pub fn filter_chroma_intra_mbaff(
    buf: &mut [u8],
    edge: usize,
    stride: usize,
    dir: Direction,
    alpha: u8,
    beta: u8,
) {
    let params = EdgeParams::new(alpha, beta);
    filter_intra(buf, edge, stride, dir, EdgeShape::ChromaField, params);
}

/// Normal filtering of a 16-Line vertical 4:2:2 chroma edge, four Lines per
/// `tc0` entry. Horizontal 4:2:2 edges are 8 Lines long and use
/// `filter_chroma`.
pub fn filter_chroma422(
    buf: &mut [u8],
    edge: usize,
    stride: usize,
    dir: Direction,
    alpha: u8,
    beta: u8,
    tc0: &Tc0,
) {
    let params = EdgeParams::new(alpha, beta);
    filter_normal(buf, edge, stride, dir, EdgeShape::Chroma422, params, tc0);
}

pub fn filter_chroma422_intra(
    buf: &mut [u8],
    edge: usize,
    stride: usize,
    dir: Direction,
    alpha: u8,
    beta: u8,
) {
    let params = EdgeParams::new(alpha, beta);
    filter_intra(buf, edge, stride, dir, EdgeShape::Chroma422, params);
}
