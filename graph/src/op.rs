//! Operator vocabulary and per-call attributes.
//!
//! The vocabulary is closed: these are the only operator names the upstream
//! partitioner places inside subgraphs tagged for this backend. String forms
//! follow the QNN dialect spelling.

/// Operators that can appear inside a partitioned quantized subgraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::AsRefStr, strum::IntoStaticStr, strum::EnumString)]
pub enum QnnOp {
    #[strum(serialize = "qnn.conv2d")]
    QnnConv2d,
    #[strum(serialize = "nn.bias_add")]
    BiasAdd,
    #[strum(serialize = "qnn.requantize")]
    Requantize,
    #[strum(serialize = "clip")]
    Clip,
    #[strum(serialize = "qnn.quantize")]
    Quantize,
    #[strum(serialize = "qnn.dequantize")]
    Dequantize,
    #[strum(serialize = "nn.softmax")]
    Softmax,
    #[strum(serialize = "qnn.add")]
    QnnAdd,
    #[strum(serialize = "qnn.mul")]
    QnnMul,
}

/// Conv2d attributes, reduced to integers by upstream constant folding.
///
/// Pairs are stored `[height, width]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conv2dAttrs {
    pub strides: [i32; 2],
    pub padding: [i32; 2],
    pub dilation: [i32; 2],
}

/// Attribute set attached to an operator call.
///
/// Each operator that carries attributes gets its own variant; operators
/// without attributes use `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CallAttrs {
    None,
    Conv2d(Conv2dAttrs),
    BiasAdd { axis: i32 },
    Clip { min: i32, max: i32 },
    Requantize { axis: i32 },
    Softmax { axis: i32 },
}
