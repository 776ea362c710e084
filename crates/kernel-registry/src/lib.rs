//! Operator Kernel Registry.
//!
//! Maps operator identifiers (e.g. `aten::add.out`) to the kernels that
//! implement them. Kernels are queried at execution time by operator name and
//! the dtype/dim-order of their tensor arguments.
//!
//! # Architecture
//!
//! Kernels reach the registry through one of two paths:
//!
//! 1. **Generated tables**: a registration unit (emitted by
//!    `edge-kernel-codegen` or the `register_kernels!` macro) holds a
//!    `static` kernel table and a [`Registration`]. Calling its
//!    `register_all_kernels()` hands the table to [`register_kernels`]
//!    exactly once.
//! 2. **Link-time slice**: functions annotated with `#[kernel]` are collected
//!    into [`STATIC_KERNELS`] via [`linkme::distributed_slice`], and
//!    [`register_static_kernels`] registers the whole slice once.
//!
//! Both paths end in [`OperatorRegistry::register_kernels`], which accepts or
//! rejects a batch as a whole.
//!
//! # Example Lookup
//!
//! ```ignore
//! use edge_kernel_registry::{get_op_function, TensorMeta, ScalarType};
//!
//! let metas = [TensorMeta::contiguous(ScalarType::Float, 2); 3];
//! let op = get_op_function("aten::add.out", &metas)?;
//! op(&mut ctx, &mut args);
//! ```

mod error;
mod kernel;
mod registration;
mod registry;

pub use edge_kernel_types::{
    EValue, KernelFailure, KernelKey, KernelRuntimeContext, OpFunction, ScalarType, Tensor,
    TensorMeta,
};
pub use linkme;

pub use error::{Error, Result};
pub use kernel::Kernel;
pub use registration::Registration;
pub use registry::{OperatorRegistry, RegistryConfig};

use std::sync::{LazyLock, OnceLock};

use linkme::distributed_slice;

/// Distributed slice collecting `#[kernel]` registrations.
///
/// Populated at link time. Entries are unordered; use a generated table when
/// registration order matters.
#[distributed_slice]
pub static STATIC_KERNELS: [Kernel];

static GLOBAL: OnceLock<OperatorRegistry> = OnceLock::new();

static STATIC_REGISTRATION: LazyLock<Registration> =
    LazyLock::new(|| Registration::new(&STATIC_KERNELS));

/// The process-wide registry, created with the default config on first use.
pub fn global() -> &'static OperatorRegistry {
    GLOBAL.get_or_init(|| OperatorRegistry::new(RegistryConfig::default()))
}

/// Create the process-wide registry with a specific config.
///
/// Fails if `config` is invalid or the registry was already created, either
/// by an earlier call or by any use of [`global`].
pub fn init_global(config: RegistryConfig) -> Result<&'static OperatorRegistry> {
    config.validate()?;
    let mut fresh = Some(config);
    let registry = GLOBAL.get_or_init(|| {
        OperatorRegistry::new(fresh.take().unwrap_or_default())
    });
    match fresh {
        None => Ok(registry),
        Some(_) => Err(Error::Config(
            "global operator registry is already initialized".to_string(),
        )),
    }
}

/// Register a batch of kernels with the global registry.
///
/// See [`OperatorRegistry::register_kernels`].
pub fn register_kernels(kernels: &[Kernel]) -> Result<usize> {
    global().register_kernels(kernels)
}

/// Register every `#[kernel]` in [`STATIC_KERNELS`] with the global registry.
///
/// Runs once per process; later calls return the first outcome.
pub fn register_static_kernels() -> Result<usize> {
    STATIC_REGISTRATION.register()
}

/// Look up a kernel in the global registry.
pub fn get_op_function(name: &str, metas: &[TensorMeta]) -> Result<OpFunction> {
    global().get_op_function(name, metas)
}

/// Whether the global registry can serve `name` for the given arguments.
pub fn has_op_function(name: &str, metas: &[TensorMeta]) -> bool {
    global().has_op_function(name, metas)
}

/// All kernels in the global registry, in registration order.
pub fn registered_kernels() -> Vec<Kernel> {
    global().registered_kernels()
}

/// Distinct operator names in the global registry, in registration order.
pub fn operator_names() -> Vec<&'static str> {
    global().operator_names()
}
