use std::fmt;

use edge_kernel_types::{KernelKey, OpFunction};

/// Descriptor for a registered kernel.
///
/// Constructible in `const` context so kernel tables can be `static` items.
#[derive(Clone, Copy)]
pub struct Kernel {
    /// Operator identifier (e.g. `"aten::add.out"`)
    pub name: &'static str,
    /// Specialization key, [`KernelKey::DEFAULT`] for the fallback kernel
    pub kernel_key: KernelKey,
    /// The implementation
    pub op: OpFunction,
}

impl Kernel {
    /// Fallback kernel for `name`.
    pub const fn new(name: &'static str, op: OpFunction) -> Self {
        Self {
            name,
            kernel_key: KernelKey::DEFAULT,
            op,
        }
    }

    /// Kernel specialized for the tensor arguments described by `kernel_key`.
    pub const fn with_key(name: &'static str, kernel_key: KernelKey, op: OpFunction) -> Self {
        Self {
            name,
            kernel_key,
            op,
        }
    }

    /// Whether this is the operator's fallback kernel.
    pub fn is_fallback(&self) -> bool {
        self.kernel_key.is_fallback()
    }
}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("name", &self.name)
            .field("kernel_key", &self.kernel_key.as_str())
            .finish_non_exhaustive()
    }
}
