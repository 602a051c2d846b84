//! Functions, partitioner attributes, and the module container.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::expr::Expr;
use crate::kernel::KernelFn;

/// Function attributes attached by the upstream partitioner.
#[derive(Debug, Clone, Default)]
pub struct FuncAttrs {
    /// Backend tag; subgraphs owned by this pass carry `"cmsis-nn"`.
    pub compiler: Option<String>,
    /// Composite pattern tag on the inner function of a partitioned call.
    pub composite: Option<String>,
    /// Global name pre-assigned for the replacement callable.
    pub global_symbol: Option<String>,
}

#[derive(Debug)]
pub struct Function {
    /// Parameter variables, in call-argument order.
    pub params: Vec<Rc<Expr>>,
    pub body: Rc<Expr>,
    pub attrs: FuncAttrs,
}

impl Function {
    pub fn new(params: Vec<Rc<Expr>>, body: Rc<Expr>) -> Self {
        Self { params, body, attrs: FuncAttrs::default() }
    }

    pub fn with_attrs(params: Vec<Rc<Expr>>, body: Rc<Expr>, attrs: FuncAttrs) -> Self {
        Self { params, body, attrs }
    }
}

/// A whole program: the entry function plus kernels registered by lowering.
///
/// Kernel registration is keyed by global symbol; `BTreeMap` keeps emission
/// order deterministic.
#[derive(Debug)]
pub struct Module {
    pub main: Function,
    pub kernels: BTreeMap<String, KernelFn>,
}

impl Module {
    pub fn new(main: Function) -> Self {
        Self { main, kernels: BTreeMap::new() }
    }

    pub fn kernel(&self, global_symbol: &str) -> Option<&KernelFn> {
        self.kernels.get(global_symbol)
    }
}
