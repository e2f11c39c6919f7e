//! A bounds-checked view of one sample plane.
//!
//! The entry points in `crate::deblock` trust their caller: a bad index panics
//! halfway through an edge. `PlaneMut` checks the whole neighbourhood of an
//! edge up front and reports problems as `DeblockError`s instead, without
//! touching any sample.

use log::{debug, trace};

use crate::deblock::{filter_intra, filter_normal, Direction, EdgeShape};
use crate::error::{DeblockError, Result};
use crate::params::{find_invalid_tc0, EdgeParams, Tc0};

/// Which filter to run on an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    /// Boundary strength 1 to 3.
    Normal { tc0: Tc0 },

    /// Boundary strength 4.
    Intra,
}

/// A mutable plane of 8-bit samples, borrowed from the caller.
#[derive(Debug)]
pub struct PlaneMut<'a> {
    data: &'a mut [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> PlaneMut<'a> {
    /// Wraps `data`, whose rows are `stride` samples apart and of which the
    /// first `width` samples belong to the plane.
    pub fn new(data: &'a mut [u8], width: usize, height: usize, stride: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(DeblockError::EmptyPlane { width, height });
        }

        if stride < width {
            return Err(DeblockError::StrideTooSmall { stride, width });
        }

        // The last row need not be padded out to the full stride.
        if data.len() < (height - 1) * stride + width {
            return Err(DeblockError::BufferTooSmall {
                len: data.len(),
                height,
                stride,
            });
        }

        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The samples of row `y` inside the plane width, if the plane has one.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }

        let start = y * self.stride;
        Some(&self.data[start..start + self.width])
    }

    /// Checks that every sample of an edge starting at `(x, y)` lies inside
    /// the plane. `(x, y)` is the `q0` sample of the first Line.
    fn check_edge(&self, x: usize, y: usize, dir: Direction, shape: EdgeShape) -> Result<()> {
        let reach = shape.reach();
        let lines = shape.lines();

        // (position across the edge, extent across, position along, extent along)
        let (across, across_len, along, along_len) = match dir {
            Direction::Vertical => (x, self.width, y, self.height),
            Direction::Horizontal => (y, self.height, x, self.width),
        };

        // Coordinates come from the caller and may be anywhere up to `usize::MAX`.
        let fits = across >= reach
            && across.checked_add(reach).map_or(false, |end| end <= across_len)
            && along.checked_add(lines).map_or(false, |end| end <= along_len);
        if fits {
            Ok(())
        } else {
            Err(DeblockError::EdgeOutOfBounds {
                x,
                y,
                dir,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Filters one edge in place.
    ///
    /// Nothing is modified when an error is returned.
    pub fn filter_edge(
        &mut self,
        x: usize,
        y: usize,
        dir: Direction,
        shape: EdgeShape,
        params: EdgeParams,
        filter: Filter,
    ) -> Result<()> {
        if let Err(e) = self.check_edge(x, y, dir, shape) {
            debug!("rejecting {:?} {:?} edge: {}", shape, dir, e);
            return Err(e);
        }

        if let Filter::Normal { tc0 } = filter {
            if let Some((index, value)) = find_invalid_tc0(&tc0) {
                let e = DeblockError::InvalidTc0 { index, value };
                debug!("rejecting {:?} {:?} edge: {}", shape, dir, e);
                return Err(e);
            }
        }

        trace!(
            "deblocking {:?} {:?} edge at ({}, {}), {:?}, {:?}",
            shape,
            dir,
            x,
            y,
            params,
            filter
        );

        // Within the buffer, since (x, y) is now inside the plane.
        let edge = y * self.stride + x;
        match filter {
            Filter::Normal { tc0 } => {
                filter_normal(self.data, edge, self.stride, dir, shape, params, &tc0)
            }
            Filter::Intra => filter_intra(self.data, edge, self.stride, dir, shape, params),
        }

        Ok(())
    }
}
