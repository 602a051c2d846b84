//! Module rewriter: one memoized traversal replacing tagged subgraphs.
//!
//! Each node is visited exactly once; results are cached by stable node id,
//! so shared subgraphs keep their sharing instead of being duplicated. Calls
//! whose callee function carries this backend's compiler tag are dispatched
//! by composite tag to the matching builder, registered as kernels, and
//! replaced by a global call; everything else is structurally copied with
//! rewritten children.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use mcunn_graph::{Call, CallAttrs, Callee, Expr, ExprKey, Function, KernelFn, Module, QnnOp};
use smallvec::SmallVec;
use tracing::debug;

use crate::BACKEND_TAG;
use crate::builders::{ScratchNamer, build_add, build_conv2d, build_mul, build_softmax};
use crate::decompose::{self, Pattern, describe};
use crate::error::{MissingGlobalSymbolSnafu, PatternMismatchSnafu, Result, UnknownCompositeSnafu};

/// Composite tags the upstream partitioner assigns. Closed vocabulary.
pub const CONV2D_COMPOSITE: &str = "cmsis-nn.qnn_conv2d";
pub const SOFTMAX_COMPOSITE: &str = "cmsis-nn.qnn_softmax";
pub const MUL_COMPOSITE: &str = "cmsis-nn.qnn_mul";
pub const ADD_COMPOSITE: &str = "cmsis-nn.qnn_add";

struct Rewriter {
    /// Already-rewritten nodes, keyed by stable id.
    memo: HashMap<ExprKey, Rc<Expr>>,
    /// Pass-scoped scratch-buffer naming.
    scratch: ScratchNamer,
    /// Kernels registered during this pass.
    kernels: BTreeMap<String, KernelFn>,
}

impl Rewriter {
    fn new() -> Self {
        Self { memo: HashMap::new(), scratch: ScratchNamer::new(), kernels: BTreeMap::new() }
    }

    fn visit(&mut self, expr: &Rc<Expr>) -> Result<Rc<Expr>> {
        let key = ExprKey(expr.clone());
        if let Some(done) = self.memo.get(&key) {
            return Ok(done.clone());
        }

        let result = match expr.as_call() {
            Some(call) => self.visit_call(expr, call)?,
            None => expr.clone(),
        };

        self.memo.insert(key, result.clone());
        Ok(result)
    }

    fn visit_call(&mut self, expr: &Rc<Expr>, call: &Call) -> Result<Rc<Expr>> {
        if let Callee::Func(func) = &call.callee
            && func.attrs.compiler.as_deref() == Some(BACKEND_TAG)
        {
            return self.lower_partitioned(expr, call, func);
        }

        // Untagged: rewrite children, rebuild only if something changed.
        let (args, changed) = self.visit_args(&call.args)?;
        if changed {
            Ok(Expr::call_expr(call.callee.clone(), args, call.attrs, expr.ty.clone()))
        } else {
            Ok(expr.clone())
        }
    }

    fn visit_args(&mut self, args: &[Rc<Expr>]) -> Result<(SmallVec<[Rc<Expr>; 4]>, bool)> {
        let mut rewritten = SmallVec::with_capacity(args.len());
        let mut changed = false;
        for arg in args {
            let new_arg = self.visit(arg)?;
            changed |= !Rc::ptr_eq(&new_arg, arg);
            rewritten.push(new_arg);
        }
        Ok((rewritten, changed))
    }

    /// Lower one partitioned call: decompose the composite body, build the
    /// call spec, register the kernel, and substitute a global call.
    fn lower_partitioned(&mut self, expr: &Rc<Expr>, call: &Call, func: &Rc<Function>) -> Result<Rc<Expr>> {
        let inner = func.body.as_call().ok_or_else(|| {
            PatternMismatchSnafu {
                position: "partitioned function body",
                expected: "a composite function call",
                found: describe(&func.body),
            }
            .build()
        })?;
        let Callee::Func(composite) = &inner.callee else {
            return PatternMismatchSnafu {
                position: "partitioned function body",
                expected: "a composite function callee",
                found: describe(&func.body),
            }
            .fail();
        };

        let tag = composite.attrs.composite.clone().unwrap_or_default();
        let global_symbol = func.attrs.global_symbol.clone().ok_or_else(|| MissingGlobalSymbolSnafu.build())?;

        let pattern = match tag.as_str() {
            CONV2D_COMPOSITE => Pattern::Conv2d(decompose::conv2d_chain(&composite.body)?),
            SOFTMAX_COMPOSITE => Pattern::Softmax(decompose::softmax_chain(&composite.body)?),
            MUL_COMPOSITE => Pattern::Mul(decompose::eltwise_call(&composite.body, QnnOp::QnnMul)?),
            ADD_COMPOSITE => Pattern::Add(decompose::eltwise_call(&composite.body, QnnOp::QnnAdd)?),
            _ => return UnknownCompositeSnafu { tag }.fail(),
        };

        let spec = match &pattern {
            Pattern::Conv2d(chain) => build_conv2d(chain, &mut self.scratch)?,
            Pattern::Softmax(chain) => build_softmax(chain)?,
            Pattern::Mul(call) => build_mul(call)?,
            Pattern::Add(call) => build_add(call)?,
        };

        debug!(
            global_symbol = %global_symbol,
            composite = %tag,
            kernel = spec.target_symbol,
            "lowered partitioned subgraph"
        );

        self.kernels.insert(global_symbol.clone(), KernelFn::from_spec(global_symbol.clone(), spec));

        let (args, _) = self.visit_args(&call.args)?;
        Ok(Expr::call_expr(Callee::Global(global_symbol), args, CallAttrs::None, expr.ty.clone()))
    }
}

/// Traversal entry point: rewrite every tagged subgraph in the program.
///
/// Deterministic and single-threaded; the scratch-buffer counter starts at
/// zero on every invocation. Either the whole program is rewritten or the
/// first contract violation is returned and the input is discarded.
pub fn rewrite(module: Module) -> Result<Module> {
    let mut rewriter = Rewriter::new();
    let body = rewriter.visit(&module.main.body)?;

    let main = Function { params: module.main.params, body, attrs: module.main.attrs };
    let mut kernels = module.kernels;
    kernels.extend(rewriter.kernels);

    Ok(Module { main, kernels })
}
