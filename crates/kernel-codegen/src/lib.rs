//! Registration unit generator.
//!
//! Emits the Rust source of a kernel registration unit: a module fragment
//! that imports the kernel implementations, holds a `static` kernel table in
//! declaration order, and exposes an idempotent `register_all_kernels()`.
//!
//! # Inputs
//!
//! - **Imports**: module paths glob-imported at the top of the unit, so the
//!   kernel function paths can be written relative to them.
//! - **Kernel entries**: `(operator, optional kernel key, function path)`
//!   triples, usually loaded from a YAML [`KernelManifest`].
//!
//! # Outputs
//!
//! - [`RegistrationUnit::to_tokens`] for proc-macro expansion
//! - [`RegistrationUnit::render`] for formatted source written by build
//!   scripts and the `gen_registration` tool
//!
//! ```rust
//! use edge_kernel_codegen::{KernelEntry, RegistrationUnit};
//!
//! let unit = RegistrationUnit::new(vec![KernelEntry::new("aten::add", "add_kernel")?])
//!     .with_import("crate::ops")?;
//! let source = unit.render()?;
//! assert!(source.contains("Kernel::new(\"aten::add\", add_kernel)"));
//! # Ok::<(), edge_kernel_codegen::CodegenError>(())
//! ```

mod error;
mod manifest;
mod unit;

pub use error::{CodegenError, CodegenResult};
pub use manifest::{KernelBinding, KernelManifest, OperatorKernels};
pub use unit::{KernelEntry, RegistrationUnit, parse_path};
