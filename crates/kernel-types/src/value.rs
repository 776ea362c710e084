//! Boxed kernel arguments.

use thiserror::Error;

use crate::{ScalarType, TensorMeta};

/// Errors from tensor construction and resizing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TensorError {
    #[error("tensor of sizes {sizes:?} needs {expected} elements, got {actual}")]
    ShapeMismatch {
        sizes: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    #[error("tensor rank {0} exceeds the supported maximum of {max}", max = Tensor::MAX_DIMS)]
    TooManyDims(usize),

    #[error("tensor of sizes {0:?} has more elements than fit in usize")]
    TooLarge(Vec<usize>),
}

/// Element count for `sizes`, checking rank and overflow.
fn checked_numel(sizes: &[usize]) -> Result<usize, TensorError> {
    if sizes.len() > Tensor::MAX_DIMS {
        return Err(TensorError::TooManyDims(sizes.len()));
    }
    sizes
        .iter()
        .try_fold(1usize, |acc, &size| acc.checked_mul(size))
        .ok_or_else(|| TensorError::TooLarge(sizes.to_vec()))
}

/// Dense tensor with contiguous storage.
///
/// Element values are stored widened to `f64`; `dtype` records the logical
/// element type that kernels dispatch and specialize on.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    dtype: ScalarType,
    sizes: Vec<usize>,
    dim_order: Vec<u8>,
    data: Vec<f64>,
}

impl Tensor {
    /// Highest rank a tensor may have.
    pub const MAX_DIMS: usize = 16;

    /// Create a contiguous tensor from its elements.
    pub fn new(dtype: ScalarType, sizes: Vec<usize>, data: Vec<f64>) -> Result<Self, TensorError> {
        let expected = checked_numel(&sizes)?;
        if expected != data.len() {
            return Err(TensorError::ShapeMismatch {
                sizes,
                expected,
                actual: data.len(),
            });
        }
        let dim_order = (0..sizes.len()).map(|d| d as u8).collect();
        Ok(Self {
            dtype,
            sizes,
            dim_order,
            data,
        })
    }

    /// Zero-filled contiguous tensor.
    pub fn zeros(dtype: ScalarType, sizes: Vec<usize>) -> Result<Self, TensorError> {
        let numel = checked_numel(&sizes)?;
        Self::new(dtype, sizes, vec![0.0; numel])
    }

    /// Rank-0 tensor holding one value.
    pub fn scalar(dtype: ScalarType, value: f64) -> Self {
        Self {
            dtype,
            sizes: Vec::new(),
            dim_order: Vec::new(),
            data: vec![value],
        }
    }

    pub fn dtype(&self) -> ScalarType {
        self.dtype
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn dim_order(&self) -> &[u8] {
        &self.dim_order
    }

    pub fn dim(&self) -> usize {
        self.sizes.len()
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Dtype and dim order, as used for kernel key lookup.
    pub fn meta(&self) -> TensorMeta {
        TensorMeta::new(self.dtype, self.dim_order.clone())
    }

    /// Resize to `sizes`, resetting the dim order to contiguous.
    ///
    /// Existing elements are kept when the element count is unchanged and
    /// zeroed otherwise.
    pub fn resize(&mut self, sizes: &[usize]) -> Result<(), TensorError> {
        let numel = checked_numel(sizes)?;
        if numel != self.data.len() {
            self.data = vec![0.0; numel];
        }
        self.sizes = sizes.to_vec();
        self.dim_order = (0..sizes.len()).map(|d| d as u8).collect();
        Ok(())
    }
}

/// A kernel argument.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EValue {
    #[default]
    None,
    Int(i64),
    Double(f64),
    Bool(bool),
    Tensor(Tensor),
}

impl EValue {
    /// Tag name used in failure messages.
    pub fn tag(&self) -> &'static str {
        match self {
            EValue::None => "None",
            EValue::Int(_) => "Int",
            EValue::Double(_) => "Double",
            EValue::Bool(_) => "Bool",
            EValue::Tensor(_) => "Tensor",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, EValue::None)
    }

    pub fn as_tensor(&self) -> Option<&Tensor> {
        match self {
            EValue::Tensor(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_tensor_mut(&mut self) -> Option<&mut Tensor> {
        match self {
            EValue::Tensor(t) => Some(t),
            _ => None,
        }
    }

    /// Numeric scalar value; ints and bools are widened.
    pub fn to_scalar(&self) -> Option<f64> {
        match self {
            EValue::Int(v) => Some(*v as f64),
            EValue::Double(v) => Some(*v),
            EValue::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            EValue::None | EValue::Tensor(_) => None,
        }
    }
}

impl From<Tensor> for EValue {
    fn from(tensor: Tensor) -> Self {
        EValue::Tensor(tensor)
    }
}

impl From<i64> for EValue {
    fn from(value: i64) -> Self {
        EValue::Int(value)
    }
}

impl From<f64> for EValue {
    fn from(value: f64) -> Self {
        EValue::Double(value)
    }
}

impl From<bool> for EValue {
    fn from(value: bool) -> Self {
        EValue::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_shape_checked() {
        let err = Tensor::new(ScalarType::Float, vec![2, 3], vec![0.0; 5]).unwrap_err();
        assert_eq!(
            err,
            TensorError::ShapeMismatch {
                sizes: vec![2, 3],
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn test_tensor_meta_is_contiguous() {
        let t = Tensor::zeros(ScalarType::Double, vec![2, 2, 2]).unwrap();
        assert_eq!(t.meta(), TensorMeta::contiguous(ScalarType::Double, 3));
        assert_eq!(t.numel(), 8);
    }

    #[test]
    fn test_resize_keeps_or_zeroes() {
        let mut t = Tensor::new(ScalarType::Float, vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        t.resize(&[4]).unwrap();
        assert_eq!(t.data(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(t.sizes(), &[4]);

        t.resize(&[3]).unwrap();
        assert_eq!(t.data(), &[0.0, 0.0, 0.0]);
        assert_eq!(t.dim_order(), &[0]);
    }

    #[test]
    fn test_overflowing_sizes_rejected() {
        let sizes = vec![usize::MAX, 2];
        assert_eq!(
            Tensor::new(ScalarType::Float, sizes.clone(), vec![]),
            Err(TensorError::TooLarge(sizes.clone()))
        );
        assert_eq!(
            Tensor::zeros(ScalarType::Float, sizes.clone()),
            Err(TensorError::TooLarge(sizes.clone()))
        );

        let mut t = Tensor::scalar(ScalarType::Float, 1.0);
        assert_eq!(t.resize(&sizes), Err(TensorError::TooLarge(sizes)));
        assert_eq!(t.data(), &[1.0]);
        assert!(t.sizes().is_empty());
    }

    #[test]
    fn test_empty_tensor() {
        let t = Tensor::zeros(ScalarType::Float, vec![0, 4]).unwrap();
        assert_eq!(t.numel(), 0);
        assert_eq!(t.dim(), 2);
    }

    #[test]
    fn test_evalue_scalars() {
        assert_eq!(EValue::from(3_i64).to_scalar(), Some(3.0));
        assert_eq!(EValue::from(true).to_scalar(), Some(1.0));
        assert_eq!(EValue::None.to_scalar(), None);
        assert_eq!(EValue::default().tag(), "None");
    }
}
