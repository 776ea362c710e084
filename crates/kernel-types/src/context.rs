//! Per-call kernel runtime context.

use thiserror::Error;

/// Reason a kernel call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelFailure {
    /// Wrong number of arguments for the operator schema.
    #[error("expected {expected} arguments, got {actual}")]
    ArgumentCount { expected: usize, actual: usize },

    /// An argument had the wrong kind of value.
    #[error("argument {index}: expected {expected}, got {actual}")]
    ArgumentType {
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },

    /// Argument values are individually valid but incompatible.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The kernel does not handle the given dtype.
    #[error("unsupported dtype: {0}")]
    UnsupportedDtype(String),
}

/// Context handed to every kernel call.
///
/// Kernels record failures here instead of panicking; the caller inspects
/// [`KernelRuntimeContext::failure_state`] after the call returns.
#[derive(Debug, Default)]
pub struct KernelRuntimeContext {
    failure: Option<KernelFailure>,
}

impl KernelRuntimeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure. A later failure replaces an earlier one.
    pub fn fail(&mut self, failure: KernelFailure) {
        tracing::debug!(%failure, "kernel call failed");
        self.failure = Some(failure);
    }

    pub fn failure_state(&self) -> Option<&KernelFailure> {
        self.failure.as_ref()
    }

    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    /// Clear and return the recorded failure.
    pub fn take_failure(&mut self) -> Option<KernelFailure> {
        self.failure.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_records_latest() {
        let mut ctx = KernelRuntimeContext::new();
        assert!(ctx.is_ok());

        ctx.fail(KernelFailure::InvalidArgument("first".into()));
        ctx.fail(KernelFailure::ArgumentCount {
            expected: 3,
            actual: 1,
        });

        assert_eq!(
            ctx.failure_state(),
            Some(&KernelFailure::ArgumentCount {
                expected: 3,
                actual: 1
            })
        );
        assert!(ctx.take_failure().is_some());
        assert!(ctx.is_ok());
    }
}
