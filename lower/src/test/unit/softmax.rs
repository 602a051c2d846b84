use mcunn_graph::Arg;

use crate::builders::{SOFTMAX_SYMBOL, build_softmax};
use crate::decompose::softmax_chain;
use crate::test::helpers::softmax_body;

#[test]
fn flattens_leading_dims_into_rows() {
    let chain = softmax_chain(&softmax_body(&[1, 2, 3, 10], 1.0 / 256.0)).unwrap();
    let spec = build_softmax(&chain).unwrap();

    assert_eq!(spec.target_symbol, SOFTMAX_SYMBOL);
    assert!(spec.scratch.is_none());

    let names: Vec<_> = spec.signature.iter().map(|p| p.name).collect();
    assert_eq!(names, ["input", "output"]);

    assert_eq!(
        spec.args.as_slice(),
        [
            Arg::Str(SOFTMAX_SYMBOL.into()),
            Arg::Param("input"),
            Arg::Int(6),  // num_rows = 1 * 2 * 3
            Arg::Int(10), // row_size = trailing dim
            Arg::Int(1 << 30),
            Arg::Int(19),
            Arg::Int(-3968),
            Arg::Param("output"),
        ]
    );
}

#[test]
fn rank_one_shape_is_a_single_row() {
    let chain = softmax_chain(&softmax_body(&[12], 1.0 / 256.0)).unwrap();
    let spec = build_softmax(&chain).unwrap();
    assert_eq!(spec.args[2], Arg::Int(1));
    assert_eq!(spec.args[3], Arg::Int(12));
}

#[test]
fn rows_times_row_size_covers_the_tensor() {
    for shape in [&[2, 5][..], &[1, 2, 3, 10][..], &[4, 4, 4][..]] {
        let chain = softmax_chain(&softmax_body(shape, 0.02)).unwrap();
        let spec = build_softmax(&chain).unwrap();
        let (Arg::Int(rows), Arg::Int(row_size)) = (&spec.args[2], &spec.args[3]) else {
            panic!("rows/row_size must be literal ints");
        };
        assert_eq!((rows * row_size) as usize, shape.iter().product::<usize>());
    }
}
