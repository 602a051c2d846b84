//! Fixed-point rescale arithmetic.
//!
//! The target kernel library applies real-valued rescale factors as a signed
//! Q31 multiplier plus a power-of-two shift: `real ≈ multiplier * 2^(shift - 31)`
//! with the multiplier normalized into `[2^30, 2^31)` (a fraction in
//! `[0.5, 1)` scaled by `2^31`). Raw integer outputs are compared bit-exact
//! against that library downstream, so rounding direction and normalization
//! here must not drift.

/// Left shift applied by the elementwise-add kernel before rescaling both
/// inputs. Frozen numeric convention of the kernel ABI revision.
pub const ADD_LEFT_SHIFT: i32 = 20;

/// Softmax beta, fixed by the kernel revision.
pub const SOFTMAX_BETA: f64 = 1.0;

/// Integer bits of the softmax input fixed-point format.
pub const SOFTMAX_INPUT_BITS: i32 = 5;

/// Integer bits of the softmax scaled-diff fixed-point format.
pub const SOFTMAX_SCALED_DIFF_BITS: i32 = 5;

/// Approximate a real rescale factor as a Q31 multiplier and shift.
///
/// Returns `(multiplier, shift)` with `real ≈ multiplier * 2^(shift - 31)`.
/// The significand is rounded to nearest; a round-up to exactly `2^31` is
/// renormalized by halving the multiplier and bumping the shift. The
/// degenerate input `0.0` maps to `(0, 0)`.
pub fn fixed_point_multiplier_shift(real: f64) -> (i32, i32) {
    if real == 0.0 {
        return (0, 0);
    }

    let (significand, mut shift) = libm::frexp(real);
    let mut significand_q31 = libm::round(significand * (1i64 << 31) as f64) as i64;

    if significand_q31 == 1i64 << 31 {
        significand_q31 /= 2;
        shift += 1;
    }

    (significand_q31 as i32, shift)
}

/// Rescale parameters for the elementwise-add kernel.
///
/// Both inputs are brought into a common dynamic range of twice the larger
/// input scale, pre-shifted left by [`ADD_LEFT_SHIFT`] bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddParams {
    pub input_0_offset: i32,
    pub input_0_multiplier: i32,
    pub input_0_shift: i32,
    pub input_1_offset: i32,
    pub input_1_multiplier: i32,
    pub input_1_shift: i32,
    pub left_shift: i32,
    pub output_multiplier: i32,
    pub output_shift: i32,
}

pub fn add_params(scale_0: f64, zero_point_0: i32, scale_1: f64, zero_point_1: i32, output_scale: f64) -> AddParams {
    let max_input_scale = scale_0.max(scale_1);
    let twice_max_input_scale = 2.0 * max_input_scale;

    let (input_0_multiplier, input_0_shift) = fixed_point_multiplier_shift(scale_0 / twice_max_input_scale);
    let (input_1_multiplier, input_1_shift) = fixed_point_multiplier_shift(scale_1 / twice_max_input_scale);
    let (output_multiplier, output_shift) =
        fixed_point_multiplier_shift(twice_max_input_scale / ((1i64 << ADD_LEFT_SHIFT) as f64 * output_scale));

    AddParams {
        input_0_offset: -zero_point_0,
        input_0_multiplier,
        input_0_shift,
        input_1_offset: -zero_point_1,
        input_1_multiplier,
        input_1_shift,
        left_shift: ADD_LEFT_SHIFT,
        output_multiplier,
        output_shift,
    }
}

/// Rescale parameters for the elementwise-mul kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MulParams {
    pub input_0_offset: i32,
    pub input_1_offset: i32,
    pub output_multiplier: i32,
    pub output_shift: i32,
}

pub fn mul_params(scale_0: f64, zero_point_0: i32, scale_1: f64, zero_point_1: i32, output_scale: f64) -> MulParams {
    let (output_multiplier, output_shift) = fixed_point_multiplier_shift(scale_0 * scale_1 / output_scale);

    MulParams {
        input_0_offset: -zero_point_0,
        input_1_offset: -zero_point_1,
        output_multiplier,
        output_shift,
    }
}

/// Rescale parameters for the s8 softmax kernel.
///
/// `diff_min` is the most negative pre-shift input difference the kernel can
/// still represent; inputs below it are clipped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftmaxParams {
    pub multiplier: i32,
    pub shift: i32,
    pub diff_min: i32,
}

pub fn softmax_params(input_scale: f64) -> SoftmaxParams {
    let mut beta_multiplier = SOFTMAX_BETA * input_scale * (1i64 << (31 - SOFTMAX_INPUT_BITS)) as f64;
    // Overflow guard: clamp below the largest representable Q31 value.
    beta_multiplier = beta_multiplier.min(((1i64 << 31) - 1) as f64);
    let (multiplier, shift) = fixed_point_multiplier_shift(beta_multiplier);

    let mut diff_min: i32 = (1 << SOFTMAX_SCALED_DIFF_BITS) - 1;
    diff_min <<= 31 - SOFTMAX_SCALED_DIFF_BITS;
    diff_min >>= shift;
    diff_min = -diff_min;

    SoftmaxParams { multiplier, shift, diff_min }
}
