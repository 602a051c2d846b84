//! Properties of the Q31 multiplier/shift approximation.

use proptest::prelude::*;

use crate::quant::{add_params, fixed_point_multiplier_shift};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// The reconstructed value `multiplier * 2^(shift - 31)` matches the real
    /// input to within half a unit of the rounded significand.
    #[test]
    fn approximation_is_within_rounding_error(real in 1e-20f64..1e20) {
        let (multiplier, shift) = fixed_point_multiplier_shift(real);
        let approx = multiplier as f64 * 2f64.powi(shift - 31);
        // Rounding the significand to 31 bits perturbs the value by at most
        // half of 2^(shift - 31).
        prop_assert!((approx - real).abs() <= 2f64.powi(shift - 32),
            "real {} approximated as {} (multiplier {}, shift {})",
            real, approx, multiplier, shift);
    }

    /// A nonzero multiplier is always normalized into [2^30, 2^31).
    #[test]
    fn multiplier_is_normalized(real in 1e-300f64..1e300) {
        let (multiplier, _) = fixed_point_multiplier_shift(real);
        prop_assert!(multiplier >= 1 << 30, "unnormalized multiplier {}", multiplier);
        prop_assert!(multiplier as i64 <= i32::MAX as i64);
    }

    /// Scale factors below one keep the shift non-positive, except for a
    /// round-up to exactly 1.0 which carries into shift 1.
    #[test]
    fn sub_unit_scales_shift_down(real in 1e-300f64..1.0) {
        let (_, shift) = fixed_point_multiplier_shift(real);
        prop_assert!(shift <= 1, "shift {} for sub-unit scale {}", shift, real);
    }

    /// Equal input scales with zero offsets rescale both add inputs
    /// identically.
    #[test]
    fn symmetric_add_inputs_rescale_identically(scale in 1e-6f64..1e6, output_scale in 1e-6f64..1e6) {
        let params = add_params(scale, 0, scale, 0, output_scale);
        prop_assert_eq!(params.input_0_multiplier, params.input_1_multiplier);
        prop_assert_eq!(params.input_0_shift, params.input_1_shift);
        prop_assert_eq!(params.input_0_offset, 0);
        prop_assert_eq!(params.input_1_offset, 0);
    }

    /// Zero points pass through negated, independent of the scales.
    #[test]
    fn add_offsets_negate_zero_points(zp_0 in -128i32..=127, zp_1 in -128i32..=127) {
        let params = add_params(0.5, zp_0, 0.25, zp_1, 1.0);
        prop_assert_eq!(params.input_0_offset, -zp_0);
        prop_assert_eq!(params.input_1_offset, -zp_1);
    }
}
