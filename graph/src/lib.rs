//! Host-program boundary model for the mcunn lowering pass.
//!
//! This crate defines the small slice of the host graph representation the
//! lowering pass needs to see: typed operator calls with constant-folded
//! attributes, partitioned functions carrying backend/composite tags, the
//! module container, and the lowered-kernel artifacts the pass registers.
//!
//! # Module Organization
//!
//! - [`types`] - Scalar dtypes, folded constant values, tensor types
//! - [`op`] - Operator vocabulary and per-call attributes
//! - [`expr`] - Expression nodes and id-based identity keys
//! - [`module`] - Functions, function attributes, and the module container
//! - [`kernel`] - Extern-call specs and materialized kernel callables

pub mod expr;
pub mod kernel;
pub mod module;
pub mod op;
pub mod types;


pub use expr::{Call, Callee, Expr, ExprKey, ExprKind};
pub use kernel::{Arg, ExternCall, ExternCallSpec, KernelBody, KernelFn, Param, ParamBits, ScratchBuffer};
pub use module::{FuncAttrs, Function, Module};
pub use op::{CallAttrs, Conv2dAttrs, QnnOp};
pub use types::{ConstValue, DType, TensorType};
