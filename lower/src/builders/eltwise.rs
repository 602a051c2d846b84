//! Elementwise add/mul → s8 elementwise kernel call specs.
//!
//! Both patterns are a single call with 8 positional arguments: two input
//! tensors followed by (scale, zero_point) pairs for input 0, input 1, and
//! the output.

use mcunn_graph::{Arg, ExternCallSpec, Param, ParamBits};
use smallvec::{SmallVec, smallvec};

use super::{const_float, const_int, nth_arg, tensor_type};
use crate::decompose::EltwiseCall;
use crate::error::{Error, Result};
use crate::quant::{add_params, mul_params};

/// Kernel symbol of the s8 elementwise multiply. Frozen ABI.
pub const MUL_SYMBOL: &str = "arm_elementwise_mul_s8";

/// Kernel symbol of the s8 elementwise add. Frozen ABI.
pub const ADD_SYMBOL: &str = "arm_elementwise_add_s8";

struct EltwiseScalars {
    scale_0: f64,
    zero_point_0: i32,
    scale_1: f64,
    zero_point_1: i32,
    output_scale: f64,
    output_zero_point: i32,
    /// Flattened element count of the output tensor.
    tensor_size: i32,
}

fn extract(pattern: &EltwiseCall, op: &'static str) -> Result<EltwiseScalars> {
    let call = pattern.call.as_call().ok_or(Error::MissingAttrs { op })?;

    let scalars = EltwiseScalars {
        scale_0: const_float(nth_arg(call, 2, op)?, "input 0 scale")?,
        zero_point_0: const_int(nth_arg(call, 3, op)?, "input 0 zero point")?,
        scale_1: const_float(nth_arg(call, 4, op)?, "input 1 scale")?,
        zero_point_1: const_int(nth_arg(call, 5, op)?, "input 1 zero point")?,
        output_scale: const_float(nth_arg(call, 6, op)?, "output scale")?,
        output_zero_point: const_int(nth_arg(call, 7, op)?, "output zero point")?,
        tensor_size: tensor_type(&pattern.call, "elementwise output")?.num_elements() as i32,
    };

    Ok(scalars)
}

fn eltwise_signature() -> SmallVec<[Param; 8]> {
    smallvec![
        Param::new("input_0", ParamBits::W8),
        Param::new("input_1", ParamBits::W8),
        Param::new("output", ParamBits::W8),
    ]
}

/// Build the extern-call spec for a `qnn.mul` pattern.
pub fn build_mul(pattern: &EltwiseCall) -> Result<ExternCallSpec> {
    let scalars = extract(pattern, "qnn.mul")?;
    let params =
        mul_params(scalars.scale_0, scalars.zero_point_0, scalars.scale_1, scalars.zero_point_1, scalars.output_scale);

    Ok(ExternCallSpec {
        target_symbol: MUL_SYMBOL,
        signature: eltwise_signature(),
        args: smallvec![
            Arg::Str(MUL_SYMBOL.to_string()),
            Arg::Param("input_0"),
            Arg::Param("input_1"),
            Arg::Int(params.input_0_offset),
            Arg::Int(params.input_1_offset),
            Arg::Param("output"),
            Arg::Int(scalars.output_zero_point),
            Arg::Int(params.output_multiplier),
            Arg::Int(params.output_shift),
            Arg::Int(i8::MIN as i32),
            Arg::Int(i8::MAX as i32),
            Arg::Int(scalars.tensor_size),
        ],
        scratch: None,
    })
}

/// Build the extern-call spec for a `qnn.add` pattern.
pub fn build_add(pattern: &EltwiseCall) -> Result<ExternCallSpec> {
    let scalars = extract(pattern, "qnn.add")?;
    let params =
        add_params(scalars.scale_0, scalars.zero_point_0, scalars.scale_1, scalars.zero_point_1, scalars.output_scale);

    Ok(ExternCallSpec {
        target_symbol: ADD_SYMBOL,
        signature: eltwise_signature(),
        args: smallvec![
            Arg::Str(ADD_SYMBOL.to_string()),
            Arg::Param("input_0"),
            Arg::Param("input_1"),
            Arg::Int(params.input_0_offset),
            Arg::Int(params.input_0_multiplier),
            Arg::Int(params.input_0_shift),
            Arg::Int(params.input_1_offset),
            Arg::Int(params.input_1_multiplier),
            Arg::Int(params.input_1_shift),
            Arg::Int(params.left_shift),
            Arg::Param("output"),
            Arg::Int(scalars.output_zero_point),
            Arg::Int(params.output_multiplier),
            Arg::Int(params.output_shift),
            Arg::Int(i8::MIN as i32),
            Arg::Int(i8::MAX as i32),
            Arg::Int(scalars.tensor_size),
        ],
        scratch: None,
    })
}
