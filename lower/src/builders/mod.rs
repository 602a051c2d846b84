//! Extern-call-spec builders, one per recognized pattern variant.
//!
//! Builders are pure functions from a decomposed pattern (plus sizing and
//! quant-param helpers) to an [`ExternCallSpec`]. They never attempt partial
//! recovery: a missing or malformed attribute means the subgraph was
//! mistagged upstream, and the typed error aborts the pass.

mod conv2d;
mod eltwise;
mod softmax;

pub use conv2d::{CONV2D_SYMBOL, build_conv2d};
pub use eltwise::{ADD_SYMBOL, MUL_SYMBOL, build_add, build_mul};
pub use softmax::{SOFTMAX_SYMBOL, build_softmax};

use std::rc::Rc;

use mcunn_graph::{Call, ConstValue, Expr, TensorType};

use crate::error::{Error, NonConstScalarSnafu, Result};

/// Allocates scratch-buffer names unique within one rewrite pass.
///
/// Threaded through the rewrite context rather than held globally, so the
/// numbering restarts on every pass run and builders stay testable in
/// isolation.
#[derive(Debug, Default)]
pub struct ScratchNamer {
    next_id: u32,
}

impl ScratchNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh buffer name; advances only when called.
    pub fn next_name(&mut self) -> String {
        let name = format!("context_buffer_{}", self.next_id);
        self.next_id += 1;
        name
    }
}

pub(crate) fn nth_arg<'a>(call: &'a Call, index: usize, op: &'static str) -> Result<&'a Rc<Expr>> {
    call.args.get(index).ok_or(Error::ArityMismatch { op, expected: index + 1, found: call.args.len() })
}

pub(crate) fn const_int(expr: &Rc<Expr>, what: &'static str) -> Result<i32> {
    match expr.const_value() {
        Some(ConstValue::Int(value)) => Ok(value as i32),
        _ => NonConstScalarSnafu { what, expected: "integer" }.fail(),
    }
}

pub(crate) fn const_float(expr: &Rc<Expr>, what: &'static str) -> Result<f64> {
    match expr.const_value() {
        Some(ConstValue::Float(value)) => Ok(value),
        _ => NonConstScalarSnafu { what, expected: "float" }.fail(),
    }
}

pub(crate) fn tensor_type<'a>(expr: &'a Rc<Expr>, what: &'static str) -> Result<&'a TensorType> {
    expr.tensor_type().ok_or(Error::MissingType { what })
}
