use mcunn_graph::{Arg, ExternCallSpec, ParamBits, ScratchBuffer};

use crate::builders::{CONV2D_SYMBOL, ScratchNamer, build_conv2d};
use crate::decompose::conv2d_chain;
use crate::test::helpers::conv2d_body;

fn build(with_bias: bool, with_clip: bool) -> ExternCallSpec {
    let chain = conv2d_chain(&conv2d_body(&[1, 4, 4, 8], &[4, 3, 3, 8], with_bias, with_clip)).unwrap();
    build_conv2d(&chain, &mut ScratchNamer::new()).unwrap()
}

fn dims_tail(spec: &ExternCallSpec, from: usize) -> Vec<i32> {
    spec.args[from..]
        .iter()
        .map(|arg| match arg {
            Arg::Int(v) => *v,
            other => panic!("expected literal int in dims block, got {other:?}"),
        })
        .collect()
}

#[test]
fn with_bias_and_clip() {
    let spec = build(true, true);
    assert_eq!(spec.target_symbol, CONV2D_SYMBOL);

    let names: Vec<_> = spec.signature.iter().map(|p| p.name).collect();
    assert_eq!(names, ["input", "filter", "multiplier", "scale", "bias", "shift", "output"]);
    assert_eq!(spec.signature[0].bits, ParamBits::W8);
    assert_eq!(spec.signature[2].bits, ParamBits::W32);

    // 2 * C_in * K_h * K_w * sizeof(i16) = 2 * 8 * 3 * 3 * 2
    assert_eq!(spec.scratch, Some(ScratchBuffer { name: "context_buffer_0".into(), size_bytes: 288 }));

    assert_eq!(
        &spec.args[..19],
        [
            Arg::Str(CONV2D_SYMBOL.into()),
            Arg::Param("input"),
            Arg::Param("filter"),
            Arg::Param("multiplier"),
            Arg::Param("bias"),
            Arg::Param("shift"),
            Arg::Param("output"),
            Arg::Str("context_buffer_0".into()),
            Arg::Int(288),
            Arg::Int(-4),  // input_offset = -input_zero_point
            Arg::Int(7),   // output_offset
            Arg::Int(2),   // stride_w
            Arg::Int(1),   // stride_h
            Arg::Int(4),   // pad_w
            Arg::Int(3),   // pad_h
            Arg::Int(1),   // dilation_w
            Arg::Int(1),   // dilation_h
            Arg::Int(-100),
            Arg::Int(100),
        ]
    );

    // input NHWC, filter OHWI, bias ABI padding, output NHWC
    assert_eq!(dims_tail(&spec, 19), [1, 4, 4, 8, 4, 3, 3, 8, 1, 1, 1, 4, 1, 4, 4, 4]);
}

#[test]
fn without_bias_keeps_bias_dims() {
    let spec = build(false, true);

    let names: Vec<_> = spec.signature.iter().map(|p| p.name).collect();
    assert_eq!(names, ["input", "filter", "multiplier", "scale", "shift", "output"]);
    assert!(!spec.args.contains(&Arg::Param("bias")));

    // One fewer buffer arg shifts every scalar left by one.
    assert_eq!(spec.args[6], Arg::Str("context_buffer_0".into()));
    assert_eq!(dims_tail(&spec, 18), [1, 4, 4, 8, 4, 3, 3, 8, 1, 1, 1, 4, 1, 4, 4, 4]);
}

#[test]
fn without_clip_defaults_to_full_s8_range() {
    let spec = build(true, false);
    assert_eq!(&spec.args[17..19], [Arg::Int(-128), Arg::Int(127)]);
}

#[test]
fn zero_scratch_product_emits_null_sentinel() {
    let chain = conv2d_chain(&conv2d_body(&[1, 4, 4, 0], &[4, 3, 3, 0], true, true)).unwrap();
    let mut namer = ScratchNamer::new();
    let spec = build_conv2d(&chain, &mut namer).unwrap();

    assert!(spec.scratch.is_none());
    assert_eq!(spec.args[7], Arg::Str("NULL".into()));
    assert_eq!(spec.args[8], Arg::Int(0));
    // The counter must not advance for skipped buffers.
    assert_eq!(namer.next_name(), "context_buffer_0");
}

#[test]
fn scratch_names_are_unique_within_a_pass() {
    let chain = conv2d_chain(&conv2d_body(&[1, 4, 4, 8], &[4, 3, 3, 8], true, true)).unwrap();
    let mut namer = ScratchNamer::new();

    let first = build_conv2d(&chain, &mut namer).unwrap();
    let second = build_conv2d(&chain, &mut namer).unwrap();
    assert_eq!(first.scratch.unwrap().name, "context_buffer_0");
    assert_eq!(second.scratch.unwrap().name, "context_buffer_1");
}
