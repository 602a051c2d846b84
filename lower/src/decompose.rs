//! Structural decomposition of composite subgraph bodies.
//!
//! Given the root call of a tagged subgraph, these decoders classify it into
//! one of a closed set of operator chains and extract the constituent calls.
//! Optional chain members (bias-add, clip) are included or omitted per
//! variant. Malformed chains yield typed [`Error::PatternMismatch`] failures;
//! upstream matching is supposed to make these unreachable in production, so
//! the rewriter treats any failure as fatal.

use std::rc::Rc;

use mcunn_graph::{Call, Callee, Expr, ExprKind, QnnOp};

use crate::error::{ArityMismatchSnafu, Error, PatternMismatchSnafu, Result};

/// Recognized composite pattern.
#[derive(Debug, Clone)]
pub enum Pattern {
    Conv2d(Conv2dChain),
    Softmax(SoftmaxChain),
    Mul(EltwiseCall),
    Add(EltwiseCall),
}

/// Quantized convolution chain: `conv2d → [bias_add] → requantize → [clip]`.
///
/// Exactly one terminal call; absent optional members imply the documented
/// defaults (no bias argument at all, clip bounds of the full s8 range).
#[derive(Debug, Clone)]
pub struct Conv2dChain {
    pub conv2d: Rc<Expr>,
    pub bias_add: Option<Rc<Expr>>,
    pub requantize: Rc<Expr>,
    pub clip: Option<Rc<Expr>>,
}

/// Fixed 3-deep softmax chain: `quantize ∘ softmax ∘ dequantize`.
#[derive(Debug, Clone)]
pub struct SoftmaxChain {
    pub quantize: Rc<Expr>,
    pub softmax: Rc<Expr>,
    pub dequantize: Rc<Expr>,
}

/// Single elementwise call with 8 positional arguments: two inputs plus
/// three (scale, zero_point) pairs.
#[derive(Debug, Clone)]
pub struct EltwiseCall {
    pub call: Rc<Expr>,
}

/// Number of positional arguments of `qnn.add` / `qnn.mul`.
pub const ELTWISE_ARITY: usize = 8;

pub(crate) fn describe(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Var { name } => format!("variable `{name}`"),
        ExprKind::Const(value) => format!("constant {value:?}"),
        ExprKind::TensorConst { name } => format!("constant tensor `{name}`"),
        ExprKind::Call(call) => match &call.callee {
            Callee::Op(op) => format!("call to `{op}`"),
            Callee::Func(_) => "call to an inline function".to_string(),
            Callee::Global(name) => format!("call to global `{name}`"),
        },
    }
}

/// Expect a call to a named operator at a given chain position.
fn op_call<'a>(expr: &'a Rc<Expr>, expected: &'static str, position: &'static str) -> Result<(&'a Call, QnnOp)> {
    match &expr.kind {
        ExprKind::Call(call) => match call.callee {
            Callee::Op(op) => Ok((call, op)),
            _ => PatternMismatchSnafu { position, expected, found: describe(expr) }.fail(),
        },
        _ => PatternMismatchSnafu { position, expected, found: describe(expr) }.fail(),
    }
}

/// Expect a specific operator at a given chain position.
fn expect_op<'a>(expr: &'a Rc<Expr>, op: QnnOp, position: &'static str) -> Result<&'a Call> {
    let name: &'static str = op.into();
    let (call, found) = op_call(expr, name, position)?;
    if found == op {
        Ok(call)
    } else {
        PatternMismatchSnafu { position, expected: name, found: describe(expr) }.fail()
    }
}

/// First argument of a call, as the next link in a chain.
fn sole_input<'a>(call: &'a Call, op: &'static str) -> Result<&'a Rc<Expr>> {
    call.args.first().ok_or(Error::ArityMismatch { op, expected: 1, found: 0 })
}

/// Decompose a conv2d chain rooted at either a clip or a requantize call.
pub fn conv2d_chain(root: &Rc<Expr>) -> Result<Conv2dChain> {
    let (root_call, root_op) = op_call(root, "clip or qnn.requantize", "conv2d chain root")?;

    let (clip, requantize) = if root_op == QnnOp::Clip {
        (Some(root.clone()), sole_input(root_call, "clip")?.clone())
    } else {
        (None, root.clone())
    };

    let requantize_call = expect_op(&requantize, QnnOp::Requantize, "conv2d chain root")?;
    let requantize_input = sole_input(requantize_call, "qnn.requantize")?.clone();

    let (input_call, input_op) = op_call(&requantize_input, "nn.bias_add or qnn.conv2d", "requantize input")?;
    let (bias_add, conv2d) = if input_op == QnnOp::BiasAdd {
        (Some(requantize_input.clone()), sole_input(input_call, "nn.bias_add")?.clone())
    } else {
        (None, requantize_input.clone())
    };

    expect_op(&conv2d, QnnOp::QnnConv2d, "bias_add input")?;

    Ok(Conv2dChain { conv2d, bias_add, requantize, clip })
}

/// Decompose the fixed softmax chain.
pub fn softmax_chain(root: &Rc<Expr>) -> Result<SoftmaxChain> {
    let quantize_call = expect_op(root, QnnOp::Quantize, "softmax chain root")?;
    let softmax = sole_input(quantize_call, "qnn.quantize")?.clone();
    let softmax_call = expect_op(&softmax, QnnOp::Softmax, "quantize input")?;
    let dequantize = sole_input(softmax_call, "nn.softmax")?.clone();
    expect_op(&dequantize, QnnOp::Dequantize, "softmax input")?;

    Ok(SoftmaxChain { quantize: root.clone(), softmax, dequantize })
}

/// Decompose a single-call elementwise pattern (`qnn.add` / `qnn.mul`).
pub fn eltwise_call(root: &Rc<Expr>, op: QnnOp) -> Result<EltwiseCall> {
    let call = expect_op(root, op, "elementwise pattern root")?;
    let name: &'static str = op.into();
    snafu::ensure!(
        call.args.len() == ELTWISE_ARITY,
        ArityMismatchSnafu { op: name, expected: ELTWISE_ARITY, found: call.args.len() }
    );

    Ok(EltwiseCall { call: root.clone() })
}
