//! Expression nodes of the host operator graph.
//!
//! Nodes are immutable and reference-counted; structural sharing in the
//! graph is expressed through shared `Rc`s. Every node carries a stable
//! process-unique id so rewrite memoization can key on identity without
//! relying on pointer values.

use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

use crate::module::Function;
use crate::op::{CallAttrs, QnnOp};
use crate::types::{ConstValue, TensorType};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Immutable expression node with a stable id.
#[derive(Debug)]
pub struct Expr {
    pub id: u64,
    pub kind: ExprKind,
    /// Type annotation supplied by upstream inference. Scalar constants may
    /// omit it.
    pub ty: Option<TensorType>,
}

#[derive(Debug)]
pub enum ExprKind {
    /// Function parameter or free tensor variable.
    Var { name: String },
    /// Folded scalar constant.
    Const(ConstValue),
    /// Opaque constant tensor (weights, per-channel multiplier/shift, ...).
    /// The pass threads these through without reading their contents.
    TensorConst { name: String },
    Call(Call),
}

/// An operator call: callee, ordered arguments, folded attributes.
#[derive(Debug)]
pub struct Call {
    pub callee: Callee,
    pub args: SmallVec<[Rc<Expr>; 4]>,
    pub attrs: CallAttrs,
}

#[derive(Debug, Clone)]
pub enum Callee {
    /// A named operator from the closed vocabulary.
    Op(QnnOp),
    /// An inline function (partitioned or composite subgraph).
    Func(Rc<Function>),
    /// A module-level global, referenced by name.
    Global(String),
}

impl Expr {
    fn next_id() -> u64 {
        NEXT_ID.fetch_add(1, Ordering::Relaxed)
    }

    fn new(kind: ExprKind, ty: Option<TensorType>) -> Rc<Self> {
        Rc::new(Self { id: Self::next_id(), kind, ty })
    }

    pub fn var(name: impl Into<String>, ty: TensorType) -> Rc<Self> {
        Self::new(ExprKind::Var { name: name.into() }, Some(ty))
    }

    pub fn int(value: i64) -> Rc<Self> {
        Self::new(ExprKind::Const(ConstValue::Int(value)), None)
    }

    pub fn float(value: f64) -> Rc<Self> {
        Self::new(ExprKind::Const(ConstValue::Float(value)), None)
    }

    pub fn tensor_const(name: impl Into<String>, ty: TensorType) -> Rc<Self> {
        Self::new(ExprKind::TensorConst { name: name.into() }, Some(ty))
    }

    /// Call to a named operator.
    pub fn call(op: QnnOp, args: SmallVec<[Rc<Expr>; 4]>, attrs: CallAttrs, ty: TensorType) -> Rc<Self> {
        Self::new(ExprKind::Call(Call { callee: Callee::Op(op), args, attrs }), Some(ty))
    }

    /// Call with an arbitrary callee; used for function invocations and for
    /// rebuilding calls during rewriting.
    pub fn call_expr(
        callee: Callee,
        args: SmallVec<[Rc<Expr>; 4]>,
        attrs: CallAttrs,
        ty: Option<TensorType>,
    ) -> Rc<Self> {
        Self::new(ExprKind::Call(Call { callee, args, attrs }), ty)
    }

    pub fn as_call(&self) -> Option<&Call> {
        match &self.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Operator name if this is a call to a named operator.
    pub fn op(&self) -> Option<QnnOp> {
        match self.as_call()?.callee {
            Callee::Op(op) => Some(op),
            _ => None,
        }
    }

    pub fn const_value(&self) -> Option<ConstValue> {
        match &self.kind {
            ExprKind::Const(value) => Some(*value),
            _ => None,
        }
    }

    pub fn tensor_type(&self) -> Option<&TensorType> {
        self.ty.as_ref()
    }
}

/// Wrapper for `Rc<Expr>` that implements `Hash`/`Eq` on the stable id.
///
/// Lets `Rc<Expr>` serve as a memoization key without hashing the whole
/// subtree and without depending on allocation addresses.
#[derive(Clone)]
pub struct ExprKey(pub Rc<Expr>);

impl std::fmt::Debug for ExprKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ExprKey(id={})", self.0.id)
    }
}

impl PartialEq for ExprKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for ExprKey {}

impl Hash for ExprKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}
