//! Per-edge parameters handed down by the boundary-strength stage.

/// Number of `tc0` groups along every macroblock edge, regardless of how many
/// Lines the edge has.
pub const TC0_GROUPS: usize = 4;

/// `tc0` entry marking its group of Lines as not filtered (boundary strength 0).
///
/// Any negative entry is treated the same way.
pub const TC0_SKIP: i16 = -1;

/// Clipping strengths of the normal filters, one per group of Lines.
pub type Tc0 = [i16; TC0_GROUPS];

/// The `alpha` and `beta` thresholds of one macroblock edge.
///
/// Both are derived externally from the quantization parameter; a zero in
/// either one means the edge is not filtered at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeParams {
    /// Threshold for the step across the edge, `|p0 - q0|`.
    pub alpha: u8,

    /// Threshold for the activity on either side, `|p1 - p0|` and `|q1 - q0|`.
    pub beta: u8,
}

impl EdgeParams {
    pub fn new(alpha: u8, beta: u8) -> Self {
        Self { alpha, beta }
    }

    /// No Line of an edge with these thresholds can pass the mask.
    pub fn is_disabled(&self) -> bool {
        self.alpha == 0 || self.beta == 0
    }
}

/// Whether a group with this `tc0` entry gets filtered.
#[inline]
pub fn is_filtered(tc0: i16) -> bool {
    tc0 >= 0
}

/// Finds the first `tc0` entry that is neither a strength in `0..=255` nor the
/// skip sentinel.
pub fn find_invalid_tc0(tc0: &Tc0) -> Option<(usize, i16)> {
    tc0.iter()
        .copied()
        .enumerate()
        .find(|&(_, t)| !(TC0_SKIP..=255).contains(&t))
}
