//! Registry errors.
//!
//! # Error Categories
//!
//! - **Registration errors**: [`Error::DuplicateKernel`], [`Error::InvalidKernelKey`],
//!   [`Error::CapacityExceeded`]. A batch that produces one of these is
//!   rejected as a whole.
//! - **Lookup errors**: [`Error::OperatorMissing`]
//! - **Setup errors**: [`Error::Config`], [`Error::Poisoned`],
//!   [`Error::AlreadyRegistered`]
//!
//! Errors are `Clone` so a [`crate::Registration`] can hand the outcome of its
//! single registration attempt to every caller.

use edge_kernel_types::KeyError;
use thiserror::Error;

/// Registry result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while registering or looking up kernels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A kernel with the same operator name and key is already registered,
    /// or appears twice in the same batch.
    #[error("kernel '{name}' with key {key} is already registered")]
    DuplicateKernel {
        /// Operator name.
        name: String,
        /// Kernel key, `<default>` for the fallback kernel.
        key: String,
    },

    /// A kernel key string failed to parse.
    #[error("kernel '{name}' has an invalid key: {source}")]
    InvalidKernelKey {
        /// Operator name.
        name: String,
        #[source]
        source: KeyError,
    },

    /// The batch would grow the registry past its configured capacity.
    #[error(
        "cannot register {requested} kernels: {registered} of {capacity} slots already in use"
    )]
    CapacityExceeded {
        requested: usize,
        registered: usize,
        capacity: usize,
    },

    /// No kernel serves the operator for the requested arguments.
    #[error("no kernel registered for operator '{name}' with key {key}")]
    OperatorMissing {
        /// Operator name.
        name: String,
        /// Lookup key built from the tensor arguments.
        key: String,
    },

    /// A thread panicked while holding the registry lock.
    #[error("operator registry lock poisoned")]
    Poisoned,

    /// A registration unit already handed its table to a different registry.
    #[error("kernel table of {kernels} kernels was already registered with another registry")]
    AlreadyRegistered { kernels: usize },

    /// Invalid or late registry configuration.
    #[error("registry config: {0}")]
    Config(String),
}
