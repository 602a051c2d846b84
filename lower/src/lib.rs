//! Lowering pass for partitioned quantized subgraphs.
//!
//! Subgraphs tagged by an upstream partitioner as belonging to this backend
//! are decomposed into a closed set of operator chains, their rescale factors
//! are converted to integer multiplier/shift pairs matching the s8 kernel
//! library's fixed-point convention, and each subgraph invocation is replaced
//! by a call to a freshly registered extern-call kernel.
//!
//! # Module Organization
//!
//! - [`quant`] - Fixed-point multiplier/shift math and per-operator rescale derivations
//! - [`dims`] - Rank-4 dimension descriptors and scratch-buffer sizing
//! - [`decompose`] - Structural decomposition of composite call chains
//! - [`builders`] - Per-variant extern-call-spec builders
//! - [`rewrite`] - The memoized module traversal
//! - [`error`] - Error types and result handling
//!
//! The pass is a deterministic, single-threaded, in-memory transformation:
//! [`rewrite`](rewrite::rewrite) either fully rewrites the program or returns
//! the first contract violation it encounters.

pub mod builders;
pub mod decompose;
pub mod dims;
pub mod error;
pub mod quant;
pub mod rewrite;

#[cfg(test)]
mod test;

pub use decompose::{Conv2dChain, EltwiseCall, Pattern, SoftmaxChain};
pub use dims::Dims4;
pub use error::{Error, Result};
pub use rewrite::rewrite;

/// Backend tag the upstream partitioner attaches to subgraphs this pass owns.
pub const BACKEND_TAG: &str = "cmsis-nn";
