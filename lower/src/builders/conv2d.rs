//! Conv2d chain → s8 convolution wrapper call spec.
//!
//! Per-channel requantization multipliers and shifts arrive pre-quantized as
//! constant tensors from upstream passes; this builder threads them through
//! as opaque buffer parameters and only derives the scalar offsets itself.

use mcunn_graph::{Arg, Call, CallAttrs, Conv2dAttrs, ExternCallSpec, Param, ParamBits, ScratchBuffer};
use smallvec::{SmallVec, smallvec};
use tracing::trace;

use super::{ScratchNamer, const_int, nth_arg, tensor_type};
use crate::decompose::Conv2dChain;
use crate::dims::{Dims4, conv2d_scratch_size};
use crate::error::{Error, MissingAttrsSnafu, Result};

/// Kernel symbol of the s8 convolution wrapper. Frozen ABI.
pub const CONV2D_SYMBOL: &str = "arm_convolve_wrapper_s8";

/// Clip bounds when no clip call was matched: the full signed-8-bit range.
const DEFAULT_CLIP: (i32, i32) = (-128, 127);

fn chain_call<'a>(expr: &'a std::rc::Rc<mcunn_graph::Expr>, op: &'static str) -> Result<&'a Call> {
    expr.as_call().ok_or(Error::MissingAttrs { op })
}

fn push_dims(args: &mut SmallVec<[Arg; 16]>, dims: Dims4) {
    args.extend(dims.as_array().into_iter().map(Arg::Int));
}

/// Build the extern-call spec for a decomposed conv2d chain.
///
/// The bias parameter is omitted from both signature and argument list when
/// the chain has no bias-add call, but the bias dimension quadruple
/// `(1, 1, 1, output_channels)` is always emitted: the kernel ABI expects
/// the struct slot regardless.
pub fn build_conv2d(chain: &Conv2dChain, scratch: &mut ScratchNamer) -> Result<ExternCallSpec> {
    let conv = chain_call(&chain.conv2d, "qnn.conv2d")?;
    let CallAttrs::Conv2d(Conv2dAttrs { strides, padding, dilation }) = conv.attrs else {
        return MissingAttrsSnafu { op: "qnn.conv2d" }.fail();
    };

    let requantize = chain_call(&chain.requantize, "qnn.requantize")?;
    let input_offset = -const_int(nth_arg(conv, 2, "qnn.conv2d")?, "input zero point")?;
    let output_offset = const_int(nth_arg(requantize, 4, "qnn.requantize")?, "output zero point")?;

    let (clip_min, clip_max) = match &chain.clip {
        Some(clip) => {
            let clip_call = chain_call(clip, "clip")?;
            let CallAttrs::Clip { min, max } = clip_call.attrs else {
                return MissingAttrsSnafu { op: "clip" }.fail();
            };
            (min, max)
        }
        None => DEFAULT_CLIP,
    };

    let input_shape = &tensor_type(nth_arg(conv, 0, "qnn.conv2d")?, "conv2d input")?.shape;
    let filter_shape = &tensor_type(nth_arg(conv, 1, "qnn.conv2d")?, "conv2d filter")?.shape;
    let output_shape = &tensor_type(&chain.conv2d, "conv2d output")?.shape;

    let input_dims = Dims4::from_shape(input_shape)?;
    let filter_dims = Dims4::from_shape(filter_shape)?;
    let output_dims = Dims4::from_shape(output_shape)?;
    // ABI padding: the bias dims slot is filled whether or not a bias exists.
    let bias_dims = Dims4([1, 1, 1, filter_shape[0] as i32]);

    let scratch_size = conv2d_scratch_size(input_shape[3], filter_shape[1], filter_shape[2]);
    let (scratch_name, scratch_buffer) = if scratch_size != 0 {
        let name = scratch.next_name();
        trace!(buffer = %name, size_bytes = scratch_size, "conv2d scratch buffer");
        (name.clone(), Some(ScratchBuffer { name, size_bytes: scratch_size }))
    } else {
        ("NULL".to_string(), None)
    };

    let mut signature: SmallVec<[Param; 8]> = smallvec![
        Param::new("input", ParamBits::W8),
        Param::new("filter", ParamBits::W8),
        Param::new("multiplier", ParamBits::W32),
        Param::new("scale", ParamBits::W32),
    ];
    if chain.bias_add.is_some() {
        signature.push(Param::new("bias", ParamBits::W32));
    }
    signature.push(Param::new("shift", ParamBits::W32));
    signature.push(Param::new("output", ParamBits::W8));

    let mut args: SmallVec<[Arg; 16]> = smallvec![
        Arg::Str(CONV2D_SYMBOL.to_string()),
        Arg::Param("input"),
        Arg::Param("filter"),
        Arg::Param("multiplier"),
    ];
    if chain.bias_add.is_some() {
        args.push(Arg::Param("bias"));
    }
    args.push(Arg::Param("shift"));
    args.push(Arg::Param("output"));

    args.push(Arg::Str(scratch_name));
    args.push(Arg::Int(scratch_size as i32));

    args.extend([
        Arg::Int(input_offset),
        Arg::Int(output_offset),
        Arg::Int(strides[1]),
        Arg::Int(strides[0]),
        Arg::Int(padding[1]),
        Arg::Int(padding[0]),
        Arg::Int(dilation[1]),
        Arg::Int(dilation[0]),
        Arg::Int(clip_min),
        Arg::Int(clip_max),
    ]);

    push_dims(&mut args, input_dims);
    push_dims(&mut args, filter_dims);
    push_dims(&mut args, bias_dims);
    push_dims(&mut args, output_dims);

    Ok(ExternCallSpec { target_symbol: CONV2D_SYMBOL, signature, args, scratch: scratch_buffer })
}
