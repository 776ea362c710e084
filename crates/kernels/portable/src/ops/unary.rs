//! Elementwise unary out-variant kernels.

use edge_kernel_registry::{EValue, KernelRuntimeContext};

use super::support::{check_arg_count, check_arithmetic_dtype, tensor_arg, write_out};

/// `aten::neg.out(self, out)`: `out = -self`
pub fn neg_out(ctx: &mut KernelRuntimeContext, args: &mut [EValue]) {
    if !check_arg_count(ctx, args, 2) {
        return;
    }
    let Some(input) = tensor_arg(ctx, args, 0).cloned() else {
        return;
    };
    if !check_arithmetic_dtype(ctx, input.dtype()) {
        return;
    }
    let data = input.data().iter().map(|v| -v).collect();
    write_out(ctx, args, 1, input.dtype(), input.sizes(), data);
}
