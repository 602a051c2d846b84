//! Softmax chain → s8 softmax kernel call spec.

use mcunn_graph::{Arg, ExternCallSpec, Param, ParamBits};
use smallvec::smallvec;

use super::{const_float, nth_arg, tensor_type};
use crate::decompose::SoftmaxChain;
use crate::error::{Error, RankMismatchSnafu, Result};
use crate::quant::softmax_params;

/// Kernel symbol of the s8 softmax. Frozen ABI.
pub const SOFTMAX_SYMBOL: &str = "arm_softmax_s8";

/// Build the extern-call spec for a decomposed softmax chain.
///
/// The kernel consumes the tensor as `num_rows` rows of `row_size` elements:
/// the trailing dimension is the softmax axis, everything before it is
/// flattened. Works for any rank ≥ 1.
pub fn build_softmax(chain: &SoftmaxChain) -> Result<ExternCallSpec> {
    let dequantize = chain.dequantize.as_call().ok_or(Error::MissingAttrs { op: "qnn.dequantize" })?;
    let input_scale = const_float(nth_arg(dequantize, 1, "qnn.dequantize")?, "dequantize input scale")?;

    let shape = &tensor_type(&chain.quantize, "softmax output")?.shape;
    let Some((&row_size, leading)) = shape.split_last() else {
        return RankMismatchSnafu { rank: 0usize, shape: Vec::new() }.fail();
    };
    let num_rows: usize = leading.iter().product();

    let params = softmax_params(input_scale);

    Ok(ExternCallSpec {
        target_symbol: SOFTMAX_SYMBOL,
        signature: smallvec![Param::new("input", ParamBits::W8), Param::new("output", ParamBits::W8)],
        args: smallvec![
            Arg::Str(SOFTMAX_SYMBOL.to_string()),
            Arg::Param("input"),
            Arg::Int(num_rows as i32),
            Arg::Int(row_size as i32),
            Arg::Int(params.multiplier),
            Arg::Int(params.shift),
            Arg::Int(params.diff_min),
            Arg::Param("output"),
        ],
        scratch: None,
    })
}
