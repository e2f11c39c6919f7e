//! The Line filters of `crate::line`, run on eight Lines at once.
//!
//! Each vector holds one sample position (say, `p1`) of eight neighbouring
//! Lines. Masks follow the `wide` convention: a `true` lane is all `1` bits,
//! which is numerically `-1`, and a `false` lane is zero. Every candidate
//! update is computed for all lanes and then selected with `blend`.

use std::ops::Shr;
use wide::{i16x8, CmpGt, CmpLt};

use crate::line::{chroma, luma};

/// Number of Lines processed together.
pub const LANES: usize = 8;

/// One byte vector per `LumaLine` position, `p3` first.
pub type LumaLanes = [[u8; LANES]; 8];

/// One byte vector per `ChromaLine` position, `p1` first.
pub type ChromaLanes = [[u8; LANES]; 4];

/// Utility mimicking `i16::clamp` for `i16x8` - see: https://github.com/Lokathor/wide/issues/131
#[inline]
fn clamp_simd(x: i16x8, min: i16x8, max: i16x8) -> i16x8 {
    x.max(min).min(max)
}

/// Upcasts eight samples into a vector.
#[inline]
fn into_simd16(a: &[u8; LANES]) -> i16x8 {
    i16x8::from((*a).map(i16::from))
}

/// Narrows a vector back into samples. Every lane must already be in `0..=255`.
#[inline]
fn from_simd16(v: i16x8) -> [u8; LANES] {
    (*v.as_array_ref()).map(|s| s as u8)
}

/// Lanes where `|a - b| < limit`.
#[inline]
fn abs_diff_lt(a: i16x8, b: i16x8, limit: i16x8) -> i16x8 {
    (a - b).abs().cmp_lt(limit)
}

/// Same as `mask::filter_edge`, but evaluates eight Lines in parallel.
#[inline]
fn filter_edge_simd(
    p1: i16x8,
    p0: i16x8,
    q0: i16x8,
    q1: i16x8,
    alpha: i16x8,
    beta: i16x8,
) -> i16x8 {
    abs_diff_lt(p0, q0, alpha) & abs_diff_lt(p1, p0, beta) & abs_diff_lt(q1, q0, beta)
}

/// Same as the shared `p0`/`q0` correction of the scalar normal filters.
#[inline]
fn normal_delta_simd(p1: i16x8, p0: i16x8, q0: i16x8, q1: i16x8, tc: i16x8) -> i16x8 {
    let delta: i16x8 = (4 * (q0 - p0) + (p1 - q1) + i16x8::splat(4)).shr(3);
    clamp_simd(delta, -tc, tc)
}

#[inline]
fn clip1_simd(x: i16x8) -> i16x8 {
    clamp_simd(x, i16x8::ZERO, i16x8::splat(255))
}

/// Same as `line::luma_normal`, with a `tc0` entry per Line.
pub fn luma_normal(lanes: &mut LumaLanes, alpha: u8, beta: u8, tc0: [i16; LANES]) {
    let p2 = into_simd16(&lanes[luma::P2]);
    let p1 = into_simd16(&lanes[luma::P1]);
    let p0 = into_simd16(&lanes[luma::P0]);
    let q0 = into_simd16(&lanes[luma::Q0]);
    let q1 = into_simd16(&lanes[luma::Q1]);
    let q2 = into_simd16(&lanes[luma::Q2]);

    let alpha = i16x8::splat(alpha.into());
    let beta = i16x8::splat(beta.into());
    let tc0 = i16x8::from(tc0);

    let mask = filter_edge_simd(p1, p0, q0, q1, alpha, beta) & tc0.cmp_gt(i16x8::splat(-1));
    let ap = abs_diff_lt(p2, p0, beta);
    let aq = abs_diff_lt(q2, q0, beta);

    // Subtracting a `true` lane adds one.
    let tc = tc0 - ap - aq;
    let delta = normal_delta_simd(p1, p0, q0, q1, tc);
    let avg: i16x8 = (p0 + q0 + i16x8::splat(1)).shr(1);

    let new_p0 = clip1_simd(p0 + delta);
    let new_q0 = clip1_simd(q0 - delta);
    let p1_step: i16x8 = (p2 + avg - 2 * p1).shr(1);
    let q1_step: i16x8 = (q2 + avg - 2 * q1).shr(1);
    let new_p1 = clip1_simd(p1 + clamp_simd(p1_step, -tc0, tc0));
    let new_q1 = clip1_simd(q1 + clamp_simd(q1_step, -tc0, tc0));

    lanes[luma::P1] = from_simd16((mask & ap).blend(new_p1, p1));
    lanes[luma::P0] = from_simd16(mask.blend(new_p0, p0));
    lanes[luma::Q0] = from_simd16(mask.blend(new_q0, q0));
    lanes[luma::Q1] = from_simd16((mask & aq).blend(new_q1, q1));
}

/// Same as `line::luma_intra`.
pub fn luma_intra(lanes: &mut LumaLanes, alpha: u8, beta: u8) {
    let p3 = into_simd16(&lanes[luma::P3]);
    let p2 = into_simd16(&lanes[luma::P2]);
    let p1 = into_simd16(&lanes[luma::P1]);
    let p0 = into_simd16(&lanes[luma::P0]);
    let q0 = into_simd16(&lanes[luma::Q0]);
    let q1 = into_simd16(&lanes[luma::Q1]);
    let q2 = into_simd16(&lanes[luma::Q2]);
    let q3 = into_simd16(&lanes[luma::Q3]);

    let near = i16x8::splat((i16::from(alpha) >> 2) + 2);
    let alpha = i16x8::splat(alpha.into());
    let beta = i16x8::splat(beta.into());
    let two = i16x8::splat(2);
    let four = i16x8::splat(4);

    let mask = filter_edge_simd(p1, p0, q0, q1, alpha, beta);
    let near = abs_diff_lt(p0, q0, near);
    let strong_p = mask & near & abs_diff_lt(p2, p0, beta);
    let strong_q = mask & near & abs_diff_lt(q2, q0, beta);

    let p0_full: i16x8 = (p2 + 2 * p1 + 2 * p0 + 2 * q0 + q1 + four).shr(3);
    let p1_full: i16x8 = (p2 + p1 + p0 + q0 + two).shr(2);
    let p2_full: i16x8 = (2 * p3 + 3 * p2 + p1 + p0 + q0 + four).shr(3);
    let p0_short: i16x8 = (2 * p1 + p0 + q1 + two).shr(2);

    let q0_full: i16x8 = (q2 + 2 * q1 + 2 * q0 + 2 * p0 + p1 + four).shr(3);
    let q1_full: i16x8 = (q2 + q1 + q0 + p0 + two).shr(2);
    let q2_full: i16x8 = (2 * q3 + 3 * q2 + q1 + q0 + p0 + four).shr(3);
    let q0_short: i16x8 = (2 * q1 + q0 + p1 + two).shr(2);

    lanes[luma::P2] = from_simd16(strong_p.blend(p2_full, p2));
    lanes[luma::P1] = from_simd16(strong_p.blend(p1_full, p1));
    lanes[luma::P0] = from_simd16(mask.blend(strong_p.blend(p0_full, p0_short), p0));
    lanes[luma::Q0] = from_simd16(mask.blend(strong_q.blend(q0_full, q0_short), q0));
    lanes[luma::Q1] = from_simd16(strong_q.blend(q1_full, q1));
    lanes[luma::Q2] = from_simd16(strong_q.blend(q2_full, q2));
}

/// Same as `line::chroma_normal`, with a `tc` entry per Line.
pub fn chroma_normal(lanes: &mut ChromaLanes, alpha: u8, beta: u8, tc: [i16; LANES]) {
    let p1 = into_simd16(&lanes[chroma::P1]);
    let p0 = into_simd16(&lanes[chroma::P0]);
    let q0 = into_simd16(&lanes[chroma::Q0]);
    let q1 = into_simd16(&lanes[chroma::Q1]);

    let alpha = i16x8::splat(alpha.into());
    let beta = i16x8::splat(beta.into());
    let tc = i16x8::from(tc);

    let mask = filter_edge_simd(p1, p0, q0, q1, alpha, beta) & tc.cmp_gt(i16x8::splat(-1));
    let delta = normal_delta_simd(p1, p0, q0, q1, tc);

    lanes[chroma::P0] = from_simd16(mask.blend(clip1_simd(p0 + delta), p0));
    lanes[chroma::Q0] = from_simd16(mask.blend(clip1_simd(q0 - delta), q0));
}

/// Same as `line::chroma_intra`.
pub fn chroma_intra(lanes: &mut ChromaLanes, alpha: u8, beta: u8) {
    let p1 = into_simd16(&lanes[chroma::P1]);
    let p0 = into_simd16(&lanes[chroma::P0]);
    let q0 = into_simd16(&lanes[chroma::Q0]);
    let q1 = into_simd16(&lanes[chroma::Q1]);

    let alpha = i16x8::splat(alpha.into());
    let beta = i16x8::splat(beta.into());
    let two = i16x8::splat(2);

    let mask = filter_edge_simd(p1, p0, q0, q1, alpha, beta);

    let new_p0: i16x8 = (2 * p1 + p0 + q1 + two).shr(2);
    let new_q0: i16x8 = (2 * q1 + q0 + p1 + two).shr(2);

    lanes[chroma::P0] = from_simd16(mask.blend(new_p0, p0));
    lanes[chroma::Q0] = from_simd16(mask.blend(new_q0, q0));
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::line;
    use crate::params::TC0_SKIP;
    use crate::transpose::transpose;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaChaRng;

    /// Eight Lines around a shared level with a random step and noise, so
    /// that some lanes pass the masks and some do not.
    fn random_lines<R: Rng, const N: usize>(ra: &mut R) -> [[u8; N]; LANES] {
        let base: u8 = ra.gen();
        let mut lines = [[0; N]; LANES];
        for line in lines.iter_mut() {
            let step = (ra.gen::<u8>() % 32) as i16 - 16;
            for (k, s) in line.iter_mut().enumerate() {
                let side = if k < N / 2 { 0 } else { step };
                let noise = (ra.gen::<u8>() % 9) as i16 - 4;
                *s = (base as i16 + side + noise).clamp(0, 255) as u8;
            }
        }
        lines
    }

    fn random_tc<R: Rng>(ra: &mut R) -> [i16; LANES] {
        let mut tc = [0; LANES];
        for t in tc.iter_mut() {
            *t = match ra.gen::<u8>() % 4 {
                0 => TC0_SKIP,
                _ => (ra.gen::<u8>() % 26) as i16,
            };
        }
        tc
    }

    #[test]
    fn test_luma_matches_scalar() {
        let mut ra = ChaChaRng::from_seed([3; 32]);

        for _ in 0..5000 {
            let lines: [[u8; 8]; LANES] = random_lines(&mut ra);
            let alpha = ra.gen::<u8>() % 80;
            let beta = ra.gen::<u8>() % 24;
            let tc0 = random_tc(&mut ra);

            let mut normal = transpose(&lines);
            luma_normal(&mut normal, alpha, beta, tc0);
            let mut intra = transpose(&lines);
            luma_intra(&mut intra, alpha, beta);

            let mut expected_normal = lines;
            let mut expected_intra = lines;
            for i in 0..LANES {
                line::luma_normal(&mut expected_normal[i], alpha, beta, tc0[i]);
                line::luma_intra(&mut expected_intra[i], alpha, beta);
            }

            assert_eq!(normal, transpose(&expected_normal));
            assert_eq!(intra, transpose(&expected_intra));
        }
    }

    #[test]
    fn test_chroma_matches_scalar() {
        let mut ra = ChaChaRng::from_seed([4; 32]);

        for _ in 0..5000 {
            let lines: [[u8; 4]; LANES] = random_lines(&mut ra);
            let alpha = ra.gen::<u8>() % 80;
            let beta = ra.gen::<u8>() % 24;
            let tc = random_tc(&mut ra);

            let mut normal = transpose(&lines);
            chroma_normal(&mut normal, alpha, beta, tc);
            let mut intra = transpose(&lines);
            chroma_intra(&mut intra, alpha, beta);

            let mut expected_normal = lines;
            let mut expected_intra = lines;
            for i in 0..LANES {
                line::chroma_normal(&mut expected_normal[i], alpha, beta, tc[i]);
                line::chroma_intra(&mut expected_intra[i], alpha, beta);
            }

            assert_eq!(normal, transpose(&expected_normal));
            assert_eq!(intra, transpose(&expected_intra));
        }
    }

    #[test]
    fn test_worked_luma_line_in_every_lane() {
        // delta = 1, tC = 4, and both p1 and q1 move.
        let lines = [[90, 94, 92, 96, 100, 98, 96, 94]; LANES];

        let mut lanes = transpose(&lines);
        luma_normal(&mut lanes, 20, 10, [2; LANES]);
        assert_eq!(lanes, transpose(&[[90, 94, 94, 97, 99, 97, 96, 94]; LANES]));

        // Lanes with a skipped group keep their samples.
        let mut lanes = transpose(&lines);
        let mut tc0 = [2; LANES];
        tc0[3] = TC0_SKIP;
        luma_normal(&mut lanes, 20, 10, tc0);
        let mut expected = [[90, 94, 94, 97, 99, 97, 96, 94]; LANES];
        expected[3] = lines[3];
        assert_eq!(lanes, transpose(&expected));
    }

    #[test]
    fn test_saturation_near_range_ends() {
        // The same two saturating Lines as in the scalar tests, in every lane.
        let high = [255, 255, 255, 255, 255, 245, 245, 245];
        let low = [0, 0, 0, 0, 0, 10, 10, 10];
        let lines = [high, low, high, low, high, low, high, low];

        let mut lanes = transpose(&lines);
        luma_normal(&mut lanes, 10, 20, [4; LANES]);

        let high = [255, 255, 255, 255, 254, 249, 245, 245];
        let low = [0, 0, 0, 0, 1, 6, 10, 10];
        assert_eq!(
            lanes,
            transpose(&[high, low, high, low, high, low, high, low])
        );
    }
}
