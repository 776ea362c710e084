//! Elementwise binary out-variant kernels.
//!
//! `other` may either match `self` in shape or be a rank-0 tensor, which is
//! broadcast across `self`.

use edge_kernel_registry::{EValue, KernelFailure, KernelRuntimeContext, Tensor};

use super::support::{check_arg_count, check_arithmetic_dtype, scalar_arg, tensor_arg, write_out};

/// Validated operands of a binary kernel.
struct Operands {
    lhs: Tensor,
    rhs: Tensor,
}

fn operands(ctx: &mut KernelRuntimeContext, args: &[EValue]) -> Option<Operands> {
    let lhs = tensor_arg(ctx, args, 0)?.clone();
    let rhs = tensor_arg(ctx, args, 1)?.clone();

    if lhs.dtype() != rhs.dtype() {
        ctx.fail(KernelFailure::InvalidArgument(format!(
            "dtype mismatch: {} and {}",
            lhs.dtype(),
            rhs.dtype()
        )));
        return None;
    }
    if !check_arithmetic_dtype(ctx, lhs.dtype()) {
        return None;
    }
    if rhs.dim() != 0 && lhs.sizes() != rhs.sizes() {
        ctx.fail(KernelFailure::InvalidArgument(format!(
            "shape mismatch: {:?} and {:?}",
            lhs.sizes(),
            rhs.sizes()
        )));
        return None;
    }
    Some(Operands { lhs, rhs })
}

fn alpha_arg(ctx: &mut KernelRuntimeContext, args: &[EValue], operands: &Operands) -> Option<f64> {
    let alpha = scalar_arg(ctx, args, 2)?;
    if operands.lhs.dtype().is_integral() && alpha.fract() != 0.0 {
        ctx.fail(KernelFailure::InvalidArgument(format!(
            "alpha {} is not integral for {} tensors",
            alpha,
            operands.lhs.dtype()
        )));
        return None;
    }
    Some(alpha)
}

fn apply(operands: &Operands, f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    let rhs = operands.rhs.data();
    operands
        .lhs
        .data()
        .iter()
        .enumerate()
        .map(|(i, &a)| {
            let b = if operands.rhs.dim() == 0 { rhs[0] } else { rhs[i] };
            f(a, b)
        })
        .collect()
}

fn finish(ctx: &mut KernelRuntimeContext, args: &mut [EValue], operands: &Operands, data: Vec<f64>) {
    let out_index = args.len() - 1;
    write_out(
        ctx,
        args,
        out_index,
        operands.lhs.dtype(),
        operands.lhs.sizes(),
        data,
    );
}

/// `aten::add.out(self, other, alpha, out)`: `out = self + alpha * other`
pub fn add_out(ctx: &mut KernelRuntimeContext, args: &mut [EValue]) {
    if !check_arg_count(ctx, args, 4) {
        return;
    }
    let Some(operands) = operands(ctx, args) else {
        return;
    };
    let Some(alpha) = alpha_arg(ctx, args, &operands) else {
        return;
    };
    let data = apply(&operands, |a, b| a + alpha * b);
    finish(ctx, args, &operands, data);
}

/// `aten::add.out` specialized for three contiguous 1-d float tensors.
///
/// Skips broadcasting; shapes must match exactly.
pub fn add_out_float_1d(ctx: &mut KernelRuntimeContext, args: &mut [EValue]) {
    if !check_arg_count(ctx, args, 4) {
        return;
    }
    let Some(operands) = operands(ctx, args) else {
        return;
    };
    if operands.lhs.sizes() != operands.rhs.sizes() {
        ctx.fail(KernelFailure::InvalidArgument(
            "1-d float kernel requires equal lengths".to_string(),
        ));
        return;
    }
    let Some(alpha) = alpha_arg(ctx, args, &operands) else {
        return;
    };
    let data = operands
        .lhs
        .data()
        .iter()
        .zip(operands.rhs.data())
        .map(|(a, b)| a + alpha * b)
        .collect();
    finish(ctx, args, &operands, data);
}

/// `aten::sub.out(self, other, alpha, out)`: `out = self - alpha * other`
pub fn sub_out(ctx: &mut KernelRuntimeContext, args: &mut [EValue]) {
    if !check_arg_count(ctx, args, 4) {
        return;
    }
    let Some(operands) = operands(ctx, args) else {
        return;
    };
    let Some(alpha) = alpha_arg(ctx, args, &operands) else {
        return;
    };
    let data = apply(&operands, |a, b| a - alpha * b);
    finish(ctx, args, &operands, data);
}

/// `aten::mul.out(self, other, out)`: `out = self * other`
pub fn mul_out(ctx: &mut KernelRuntimeContext, args: &mut [EValue]) {
    if !check_arg_count(ctx, args, 3) {
        return;
    }
    let Some(operands) = operands(ctx, args) else {
        return;
    };
    let data = apply(&operands, |a, b| a * b);
    finish(ctx, args, &operands, data);
}

#[cfg(test)]
mod tests {
    use super::*;
    use edge_kernel_registry::ScalarType;

    fn tensor(dtype: ScalarType, data: &[f64]) -> EValue {
        EValue::Tensor(Tensor::new(dtype, vec![data.len()], data.to_vec()).unwrap())
    }

    fn out(dtype: ScalarType) -> EValue {
        EValue::Tensor(Tensor::zeros(dtype, vec![0]).unwrap())
    }

    fn out_data(args: &[EValue]) -> &[f64] {
        args.last().unwrap().as_tensor().unwrap().data()
    }

    #[test]
    fn test_add_with_alpha() {
        let mut ctx = KernelRuntimeContext::new();
        let mut args = [
            tensor(ScalarType::Float, &[1.0, 2.0, 3.0]),
            tensor(ScalarType::Float, &[10.0, 20.0, 30.0]),
            EValue::Double(0.5),
            out(ScalarType::Float),
        ];
        add_out(&mut ctx, &mut args);
        assert!(ctx.is_ok());
        assert_eq!(out_data(&args), &[6.0, 12.0, 18.0]);
    }

    #[test]
    fn test_sub_broadcasts_rank0() {
        let mut ctx = KernelRuntimeContext::new();
        let mut args = [
            tensor(ScalarType::Long, &[5.0, 6.0]),
            EValue::Tensor(Tensor::scalar(ScalarType::Long, 2.0)),
            EValue::Int(2),
            out(ScalarType::Long),
        ];
        sub_out(&mut ctx, &mut args);
        assert!(ctx.is_ok());
        assert_eq!(out_data(&args), &[1.0, 2.0]);
    }

    #[test]
    fn test_mul() {
        let mut ctx = KernelRuntimeContext::new();
        let mut args = [
            tensor(ScalarType::Double, &[1.5, -2.0]),
            tensor(ScalarType::Double, &[2.0, 3.0]),
            out(ScalarType::Double),
        ];
        mul_out(&mut ctx, &mut args);
        assert!(ctx.is_ok());
        assert_eq!(out_data(&args), &[3.0, -6.0]);
    }

    #[test]
    fn test_fractional_alpha_on_integers() {
        let mut ctx = KernelRuntimeContext::new();
        let mut args = [
            tensor(ScalarType::Int, &[1.0]),
            tensor(ScalarType::Int, &[1.0]),
            EValue::Double(0.5),
            out(ScalarType::Int),
        ];
        add_out(&mut ctx, &mut args);
        assert!(matches!(
            ctx.failure_state(),
            Some(KernelFailure::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_argument_failures() {
        let mut ctx = KernelRuntimeContext::new();
        let mut args = [tensor(ScalarType::Float, &[1.0]), EValue::Int(1)];
        add_out(&mut ctx, &mut args);
        assert_eq!(
            ctx.take_failure(),
            Some(KernelFailure::ArgumentCount {
                expected: 4,
                actual: 2
            })
        );

        let mut args = [
            tensor(ScalarType::Float, &[1.0]),
            EValue::Int(1),
            out(ScalarType::Float),
        ];
        mul_out(&mut ctx, &mut args);
        assert_eq!(
            ctx.take_failure(),
            Some(KernelFailure::ArgumentType {
                index: 1,
                expected: "Tensor",
                actual: "Int"
            })
        );

        let mut args = [
            tensor(ScalarType::Float, &[1.0, 2.0]),
            tensor(ScalarType::Float, &[1.0, 2.0, 3.0]),
            out(ScalarType::Float),
        ];
        mul_out(&mut ctx, &mut args);
        assert!(matches!(
            ctx.take_failure(),
            Some(KernelFailure::InvalidArgument(_))
        ));

        let mut args = [
            tensor(ScalarType::Bool, &[1.0]),
            tensor(ScalarType::Bool, &[0.0]),
            out(ScalarType::Bool),
        ];
        mul_out(&mut ctx, &mut args);
        assert!(matches!(
            ctx.take_failure(),
            Some(KernelFailure::UnsupportedDtype(_))
        ));
    }

    #[test]
    fn test_out_dtype_checked() {
        let mut ctx = KernelRuntimeContext::new();
        let mut args = [
            tensor(ScalarType::Float, &[1.0]),
            tensor(ScalarType::Float, &[2.0]),
            out(ScalarType::Double),
        ];
        mul_out(&mut ctx, &mut args);
        assert!(matches!(
            ctx.failure_state(),
            Some(KernelFailure::InvalidArgument(_))
        ));
        assert_eq!(out_data(&args), &[] as &[f64]);
    }
}
