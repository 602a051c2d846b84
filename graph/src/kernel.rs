//! Lowered-kernel artifacts.
//!
//! An [`ExternCallSpec`] is the builder output for one recognized subgraph:
//! the target symbol, the opaque buffer signature, the flattened argument
//! list, and an optional scratch-buffer requirement. It is created once and
//! consumed exactly once to materialize a [`KernelFn`] registered in the
//! module. Symbol names and argument orders here are a frozen ABI contract
//! with the external fixed-point kernel library.

use smallvec::SmallVec;

/// Bit-width tag of an opaque buffer parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamBits {
    W8,
    W32,
}

/// Opaque buffer parameter in a kernel signature.
///
/// Names are fixed per kernel variant, so they live as static strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub bits: ParamBits,
}

impl Param {
    pub const fn new(name: &'static str, bits: ParamBits) -> Self {
        Self { name, bits }
    }
}

/// One argument of the extern call.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Reference to a signature parameter by name.
    Param(&'static str),
    /// Literal 32-bit integer.
    Int(i32),
    /// Literal string (the target symbol, or a scratch-buffer name).
    Str(String),
}

/// Named transient allocation required for one kernel invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchBuffer {
    pub name: String,
    pub size_bytes: usize,
}

/// Builder output: everything needed to materialize one callable unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternCallSpec {
    pub target_symbol: &'static str,
    pub signature: SmallVec<[Param; 8]>,
    /// Ordered argument list; the first entry is the literal target symbol.
    pub args: SmallVec<[Arg; 16]>,
    pub scratch: Option<ScratchBuffer>,
}

/// Single opaque external invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternCall {
    pub args: SmallVec<[Arg; 16]>,
}

impl ExternCall {
    /// The literal kernel symbol, when present as the leading argument.
    pub fn target_symbol(&self) -> Option<&str> {
        match self.args.first() {
            Some(Arg::Str(symbol)) => Some(symbol),
            _ => None,
        }
    }
}

/// Body of a materialized kernel: one extern call, optionally wrapped in a
/// scoped scratch allocation. Single entry, single exit.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelBody {
    pub scratch: Option<ScratchBuffer>,
    pub call: ExternCall,
}

/// Callable unit registered in the module under a unique global symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelFn {
    pub global_symbol: String,
    pub signature: SmallVec<[Param; 8]>,
    pub body: KernelBody,
}

impl KernelFn {
    /// Materialize a callable unit from a builder spec.
    pub fn from_spec(global_symbol: String, spec: ExternCallSpec) -> Self {
        Self {
            global_symbol,
            signature: spec.signature,
            body: KernelBody { scratch: spec.scratch, call: ExternCall { args: spec.args } },
        }
    }
}
