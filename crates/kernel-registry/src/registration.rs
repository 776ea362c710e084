//! Once-only hand-off of a kernel table to a registry.

use std::sync::OnceLock;

use crate::{Error, Kernel, OperatorRegistry, Result};

/// Runtime half of a generated registration unit.
///
/// Wraps a `'static` kernel table and registers it at most once. Every later
/// call naming the same registry returns the outcome of that first attempt,
/// whether it succeeded or not, and never touches the registry again. A call
/// naming a different registry fails with [`Error::AlreadyRegistered`].
///
/// ```rust
/// use edge_kernel_registry::{EValue, Kernel, KernelRuntimeContext, OperatorRegistry, Registration, RegistryConfig};
///
/// fn noop(_: &mut KernelRuntimeContext, _: &mut [EValue]) {}
///
/// static KERNELS_TO_REGISTER: [Kernel; 1] = [Kernel::new("demo::noop", noop)];
/// static REGISTRATION: Registration = Registration::new(&KERNELS_TO_REGISTER);
///
/// let registry = OperatorRegistry::new(RegistryConfig::default());
/// assert_eq!(REGISTRATION.register_into(&registry), Ok(1));
/// assert_eq!(REGISTRATION.register_into(&registry), Ok(1));
/// assert_eq!(registry.len(), 1);
/// ```
pub struct Registration {
    kernels: &'static [Kernel],
    attempt: OnceLock<Attempt>,
}

/// The single registration attempt and the registry it went to.
struct Attempt {
    registry: usize,
    outcome: Result<usize>,
}

fn registry_id(registry: &OperatorRegistry) -> usize {
    std::ptr::from_ref(registry).addr()
}

impl Registration {
    pub const fn new(kernels: &'static [Kernel]) -> Self {
        Self {
            kernels,
            attempt: OnceLock::new(),
        }
    }

    /// The kernel table, in declaration order.
    pub fn kernels(&self) -> &'static [Kernel] {
        self.kernels
    }

    /// Register the table with the global registry.
    pub fn register(&self) -> Result<usize> {
        self.register_into(crate::global())
    }

    /// Register the table with `registry`.
    ///
    /// Only the first call performs registration. Later calls replay its
    /// outcome when they name the same registry and fail with
    /// [`Error::AlreadyRegistered`] otherwise.
    pub fn register_into(&self, registry: &OperatorRegistry) -> Result<usize> {
        let target = registry_id(registry);
        let attempt = self.attempt.get_or_init(|| Attempt {
            registry: target,
            outcome: registry.register_kernels(self.kernels),
        });
        if attempt.registry != target {
            return Err(Error::AlreadyRegistered {
                kernels: self.kernels.len(),
            });
        }
        attempt.outcome.clone()
    }

    /// Whether the registration attempt has already run.
    pub fn is_registered(&self) -> bool {
        self.attempt.get().is_some()
    }
}
