//! Argument unpacking shared by the portable kernels.

use edge_kernel_registry::{EValue, KernelFailure, KernelRuntimeContext, ScalarType, Tensor};
use tracing::trace;

pub(super) fn check_arg_count(
    ctx: &mut KernelRuntimeContext,
    args: &[EValue],
    expected: usize,
) -> bool {
    if args.len() != expected {
        ctx.fail(KernelFailure::ArgumentCount {
            expected,
            actual: args.len(),
        });
        return false;
    }
    true
}

pub(super) fn tensor_arg<'a>(
    ctx: &mut KernelRuntimeContext,
    args: &'a [EValue],
    index: usize,
) -> Option<&'a Tensor> {
    let tensor = args[index].as_tensor();
    if tensor.is_none() {
        ctx.fail(KernelFailure::ArgumentType {
            index,
            expected: "Tensor",
            actual: args[index].tag(),
        });
    }
    tensor
}

pub(super) fn scalar_arg(
    ctx: &mut KernelRuntimeContext,
    args: &[EValue],
    index: usize,
) -> Option<f64> {
    let value = args[index].to_scalar();
    if value.is_none() {
        ctx.fail(KernelFailure::ArgumentType {
            index,
            expected: "Scalar",
            actual: args[index].tag(),
        });
    }
    value
}

/// Reject dtypes the arithmetic kernels do not handle.
pub(super) fn check_arithmetic_dtype(ctx: &mut KernelRuntimeContext, dtype: ScalarType) -> bool {
    if dtype == ScalarType::Bool {
        ctx.fail(KernelFailure::UnsupportedDtype(dtype.to_string()));
        return false;
    }
    true
}

/// Write `data` into the out tensor at `args[index]`, resizing it to `sizes`.
///
/// The out tensor must already exist and carry `dtype`.
pub(super) fn write_out(
    ctx: &mut KernelRuntimeContext,
    args: &mut [EValue],
    index: usize,
    dtype: ScalarType,
    sizes: &[usize],
    data: Vec<f64>,
) {
    let actual = args[index].tag();
    let Some(out) = args[index].as_tensor_mut() else {
        ctx.fail(KernelFailure::ArgumentType {
            index,
            expected: "Tensor",
            actual,
        });
        return;
    };
    if out.dtype() != dtype {
        ctx.fail(KernelFailure::InvalidArgument(format!(
            "out tensor has dtype {}, expected {}",
            out.dtype(),
            dtype
        )));
        return;
    }
    trace!(index, ?sizes, %dtype, "writing kernel output");
    if let Err(e) = out.resize(sizes) {
        ctx.fail(KernelFailure::InvalidArgument(e.to_string()));
        return;
    }
    out.data_mut().copy_from_slice(&data);
}
