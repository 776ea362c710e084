//! Portable reference kernels.
//!
//! Kernels live in [`ops`]; the operator table is generated at build time
//! from `functions.yaml`. Call [`register_all_kernels`] once before resolving
//! operators through `edge_kernel_registry`.

pub mod ops;

mod generated {
    include!(concat!(env!("OUT_DIR"), "/register_kernels.rs"));
}

pub use generated::{kernels, register_all_kernels, register_all_kernels_into};
