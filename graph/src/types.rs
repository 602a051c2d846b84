//! Scalar types, folded constants, and tensor type annotations.

use smallvec::SmallVec;

/// Scalar element types that appear at the s8 kernel boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Int8,
    Int16,
    Int32,
    Float32,
}

impl DType {
    /// Bit width of one element.
    pub fn bits(self) -> u8 {
        match self {
            Self::Int8 => 8,
            Self::Int16 => 16,
            Self::Int32 | Self::Float32 => 32,
        }
    }
}

/// A scalar value already reduced by upstream constant folding.
///
/// Non-tensor call arguments (zero points, scales, clip bounds) arrive in
/// this form; the lowering pass never folds anything itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstValue {
    Int(i64),
    Float(f64),
}

/// Tensor type annotation supplied by upstream type inference.
///
/// Shapes of any rank are representable here; the rank-4 layout contract is
/// enforced where shapes cross into kernel dimension descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorType {
    pub shape: SmallVec<[usize; 4]>,
    pub dtype: DType,
}

impl TensorType {
    pub fn new(shape: impl IntoIterator<Item = usize>, dtype: DType) -> Self {
        Self { shape: shape.into_iter().collect(), dtype }
    }

    /// Total element count of the flattened tensor.
    pub fn num_elements(&self) -> usize {
        self.shape.iter().product()
    }
}
