//! Rust implementation of the H.264 (ITU-T H.264 clause 8.7) in-loop
//! deblocking filter for 8-bit samples.
//!
//! This crate only applies the filtering equations to one macroblock edge at a
//! time. Deriving boundary strengths, looking up `alpha`, `beta` and `tc0`, and
//! walking the edges of a picture in the right order is up to the decoder or
//! encoder using it.

pub mod deblock;
pub mod error;
pub mod line;
pub mod mask;
pub mod params;
pub mod plane;

#[cfg(feature = "simd")]
mod simd_impl;
mod transpose;

pub use crate::deblock::{
    filter_chroma, filter_chroma422, filter_chroma422_intra, filter_chroma_intra,
    filter_chroma_intra_mbaff, filter_chroma_mbaff, filter_intra, filter_luma, filter_luma_intra,
    filter_luma_intra_mbaff, filter_luma_mbaff, filter_normal, Direction, EdgeShape,
};
pub use crate::error::{DeblockError, Result};
pub use crate::params::{EdgeParams, Tc0, TC0_SKIP};
pub use crate::plane::{Filter, PlaneMut};
