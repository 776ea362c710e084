//! Kernel type prelude for convenience imports
//!
//! Re-exports everything a kernel implementation file usually needs.
//!
//! # Usage
//!
//! ```rust
//! use edge_kernel_types::prelude::*;
//!
//! fn neg_out(ctx: &mut KernelRuntimeContext, args: &mut [EValue]) {
//!     if args.len() != 2 {
//!         ctx.fail(KernelFailure::ArgumentCount { expected: 2, actual: args.len() });
//!     }
//! }
//! # let _: OpFunction = neg_out;
//! ```

pub use crate::{
    EValue, KernelFailure, KernelKey, KernelRuntimeContext, OpFunction, ScalarType, Tensor,
    TensorMeta,
};
