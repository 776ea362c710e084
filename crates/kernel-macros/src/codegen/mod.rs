//! Code generation for kernel registration.
//!
//! Two registration shapes are generated: a single `STATIC_KERNELS` slice
//! entry for `#[kernel]`, and a full registration unit for
//! `register_kernels!`.

pub(crate) mod static_slice;
pub(crate) mod table;
