//! Rank-4 dimension descriptors and scratch-buffer sizing.
//!
//! The kernel library consumes tensor shapes as flattened quadruples in a
//! fixed layout: NHWC for activations, OHWI for filters. Rank is fixed at 4;
//! anything else is a contract violation from upstream shape inference.

use snafu::ensure;

use crate::error::{RankMismatchSnafu, Result};

/// Ordered rank-4 shape descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dims4(pub [i32; 4]);

impl Dims4 {
    /// Convert an inferred shape into a kernel dimension quadruple.
    pub fn from_shape(shape: &[usize]) -> Result<Self> {
        ensure!(shape.len() == 4, RankMismatchSnafu { rank: shape.len(), shape: shape.to_vec() });
        Ok(Self([shape[0] as i32, shape[1] as i32, shape[2] as i32, shape[3] as i32]))
    }

    pub fn as_array(&self) -> [i32; 4] {
        self.0
    }
}

/// Im2col scratch requirement of the s8 convolution wrapper, in bytes:
/// two rows of `C_in * K_h * K_w` 16-bit elements.
///
/// A zero-sized product means the kernel requests no buffer.
pub fn conv2d_scratch_size(input_channels: usize, filter_h: usize, filter_w: usize) -> usize {
    2 * input_channels * filter_h * filter_w * size_of::<i16>()
}
