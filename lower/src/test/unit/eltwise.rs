use mcunn_graph::{Arg, QnnOp};

use crate::builders::{ADD_SYMBOL, MUL_SYMBOL, build_add, build_mul};
use crate::decompose::eltwise_call;
use crate::quant::ADD_LEFT_SHIFT;
use crate::test::helpers::eltwise_body;

#[test]
fn mul_argument_order() {
    let body = eltwise_body(QnnOp::QnnMul, &[1, 2, 2, 2], 0.5, 1, 0.5, 2, 0.25, 3);
    let spec = build_mul(&eltwise_call(&body, QnnOp::QnnMul).unwrap()).unwrap();

    assert_eq!(spec.target_symbol, MUL_SYMBOL);
    let names: Vec<_> = spec.signature.iter().map(|p| p.name).collect();
    assert_eq!(names, ["input_0", "input_1", "output"]);

    assert_eq!(
        spec.args.as_slice(),
        [
            Arg::Str(MUL_SYMBOL.into()),
            Arg::Param("input_0"),
            Arg::Param("input_1"),
            Arg::Int(-1), // negated input 0 zero point
            Arg::Int(-2), // negated input 1 zero point
            Arg::Param("output"),
            Arg::Int(3),
            Arg::Int(1 << 30), // 0.5 * 0.5 / 0.25 = 1.0
            Arg::Int(1),
            Arg::Int(-128),
            Arg::Int(127),
            Arg::Int(8), // flattened element count
        ]
    );
}

#[test]
fn add_argument_order() {
    let body = eltwise_body(QnnOp::QnnAdd, &[1, 2, 2, 2], 0.5, 0, 0.25, 0, 1.0, 0);
    let spec = build_add(&eltwise_call(&body, QnnOp::QnnAdd).unwrap()).unwrap();

    assert_eq!(spec.target_symbol, ADD_SYMBOL);
    assert_eq!(
        spec.args.as_slice(),
        [
            Arg::Str(ADD_SYMBOL.into()),
            Arg::Param("input_0"),
            Arg::Param("input_1"),
            Arg::Int(0),
            Arg::Int(1 << 30), // 0.5 / (2 * 0.5)
            Arg::Int(0),
            Arg::Int(0),
            Arg::Int(1 << 30), // 0.25 / (2 * 0.5)
            Arg::Int(-1),
            Arg::Int(ADD_LEFT_SHIFT),
            Arg::Param("output"),
            Arg::Int(0),
            Arg::Int(1 << 30), // 1.0 / (2^20 * 1.0)
            Arg::Int(-19),
            Arg::Int(-128),
            Arg::Int(127),
            Arg::Int(8),
        ]
    );
}

#[test]
fn add_with_unequal_scales_derives_distinct_pairs() {
    let body = eltwise_body(QnnOp::QnnAdd, &[1, 2, 2, 2], 0.5, 0, 0.25, 0, 1.0, 0);
    let spec = build_add(&eltwise_call(&body, QnnOp::QnnAdd).unwrap()).unwrap();

    // offsets zero, but the two (multiplier, shift) pairs must differ
    let (in0, in1) = ((&spec.args[4], &spec.args[5]), (&spec.args[7], &spec.args[8]));
    assert_ne!(in0, in1);
    assert_eq!(spec.args[3], Arg::Int(0));
    assert_eq!(spec.args[6], Arg::Int(0));
}
