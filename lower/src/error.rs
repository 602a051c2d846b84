use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Contract violations surfaced by the lowering pass.
///
/// All of these indicate an inconsistency between the upstream partitioner /
/// type inference and this pass. They are typed so malformed inputs can be
/// exercised in tests, but the production path treats every variant as fatal:
/// the pass propagates the first error and rewrites nothing.
#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Kernel dimension descriptors are fixed at rank 4.
    #[snafu(display("rank mismatch: kernel layout requires rank-4 shapes, got rank {rank} ({shape:?})"))]
    RankMismatch { rank: usize, shape: Vec<usize> },

    /// A tagged subgraph does not decompose into the expected call chain.
    #[snafu(display("pattern mismatch at {position}: expected {expected}, found {found}"))]
    PatternMismatch { position: &'static str, expected: &'static str, found: String },

    /// Composite tag outside the closed pattern vocabulary.
    #[snafu(display("unknown composite tag {tag:?} on a subgraph tagged for this backend"))]
    UnknownComposite { tag: String },

    /// Partitioned function without a pre-assigned replacement name.
    #[snafu(display("partitioned function is missing its global_symbol attribute"))]
    MissingGlobalSymbol,

    /// Missing tensor type annotation where one is required.
    #[snafu(display("missing type annotation on {what}"))]
    MissingType { what: &'static str },

    /// Argument that should have been folded to a scalar constant upstream.
    #[snafu(display("expected a folded {expected} scalar for {what}"))]
    NonConstScalar { what: &'static str, expected: &'static str },

    /// Call with the wrong number of positional arguments.
    #[snafu(display("{op} expects at least {expected} arguments, found {found}"))]
    ArityMismatch { op: &'static str, expected: usize, found: usize },

    /// Call whose attribute variant does not match its operator.
    #[snafu(display("missing or mismatched attributes on {op}"))]
    MissingAttrs { op: &'static str },
}
