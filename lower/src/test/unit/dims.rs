use test_case::test_case;

use crate::dims::{Dims4, conv2d_scratch_size};
use crate::error::Error;

#[test]
fn from_shape_preserves_order() {
    let dims = Dims4::from_shape(&[1, 4, 4, 8]).unwrap();
    assert_eq!(dims.as_array(), [1, 4, 4, 8]);
}

#[test_case(&[] ; "rank 0")]
#[test_case(&[16] ; "rank 1")]
#[test_case(&[1, 2, 3] ; "rank 3")]
#[test_case(&[1, 2, 3, 4, 5] ; "rank 5")]
fn from_shape_rejects_other_ranks(shape: &[usize]) {
    let err = Dims4::from_shape(shape).unwrap_err();
    assert_eq!(err, Error::RankMismatch { rank: shape.len(), shape: shape.to_vec() });
}

#[test_case(8, 3, 3, 288 ; "eight channels 3x3")]
#[test_case(1, 1, 1, 4 ; "single channel 1x1")]
#[test_case(3, 5, 5, 300 ; "rgb 5x5")]
#[test_case(0, 3, 3, 0 ; "zero channels request no buffer")]
fn scratch_sizes(input_channels: usize, filter_h: usize, filter_w: usize, expected: usize) {
    assert_eq!(conv2d_scratch_size(input_channels, filter_h, filter_w), expected);
}
