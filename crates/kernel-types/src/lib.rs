// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Kernel value and key types
//!
//! This crate defines the **pure data types** shared by every stage of kernel
//! registration:
//! - `edge-kernel-registry` (descriptors, lookup and dispatch)
//! - `edge-kernel-codegen` (key validation before emitting a registration unit)
//! - `edge-kernel-macros` (token generation for `#[kernel]`)
//! - kernel libraries such as `edge-portable-kernels`
//!
//! # Architecture
//!
//! - **Boxed arguments**: every kernel receives its arguments as a mutable slice
//!   of [`EValue`], with the output argument(s) last.
//! - **Specialization keys**: a [`KernelKey`] describes the dtype and dim order
//!   of each tensor argument a kernel was specialized for. Keys are `const`
//!   constructible so kernel tables can live in `static` items.
//! - **Failure reporting**: kernels never panic on bad input. They record a
//!   [`KernelFailure`] on the [`KernelRuntimeContext`] and return.
//!
//! # Examples
//!
//! ```rust
//! use edge_kernel_types::{KernelKey, ScalarType, TensorMeta};
//!
//! let metas = [TensorMeta::contiguous(ScalarType::Float, 2)];
//! assert_eq!(TensorMeta::key_for(&metas), "v1/6;0,1");
//!
//! let key = KernelKey::new("v1/6;0,1");
//! assert!(key.matches(&TensorMeta::key_for(&metas)));
//! ```

pub mod context;
pub mod key;
pub mod prelude;
pub mod scalar_type;
pub mod value;

pub use context::{KernelFailure, KernelRuntimeContext};
pub use key::{KernelKey, KeyError, TensorMeta};
pub use scalar_type::ScalarType;
pub use value::{EValue, Tensor, TensorError};

/// Signature shared by every kernel implementation.
///
/// Arguments are passed positionally; by convention the out-variant kernels
/// receive their output tensor as the final argument.
pub type OpFunction = fn(&mut KernelRuntimeContext, &mut [EValue]);
