// Generated registration of the portable kernels

use edge_kernel_registry::{
    EValue, Error, KernelRuntimeContext, OperatorRegistry, ScalarType, Tensor, TensorMeta,
};
use edge_portable_kernels::{kernels, ops, register_all_kernels, register_all_kernels_into};

fn float_vector(data: &[f64]) -> EValue {
    EValue::Tensor(Tensor::new(ScalarType::Float, vec![data.len()], data.to_vec()).unwrap())
}

#[test]
fn test_table_follows_manifest_order() {
    let names: Vec<_> = kernels().iter().map(|k| k.name).collect();
    assert_eq!(
        names,
        vec![
            "aten::add.out",
            "aten::add.out",
            "aten::sub.out",
            "aten::mul.out",
            "aten::neg.out",
        ]
    );
    assert!(kernels()[0].is_fallback());
    assert_eq!(kernels()[1].kernel_key.as_str(), Some("v1/6;0|6;0|6;0"));
}

// The unit's one registration goes to the global registry in
// `test_global_registration_dispatches`; local registries take the table
// directly so tests stay independent of execution order.

#[test]
fn test_table_registers_into_local_registry() {
    let registry = OperatorRegistry::default();
    assert_eq!(registry.register_kernels(kernels()), Ok(kernels().len()));
    assert_eq!(
        registry.operator_names(),
        vec!["aten::add.out", "aten::sub.out", "aten::mul.out", "aten::neg.out"]
    );

    let floats = vec![TensorMeta::contiguous(ScalarType::Float, 1); 3];
    let op = registry.get_op_function("aten::add.out", &floats).unwrap();
    assert_eq!(op as usize, ops::add_out_float_1d as usize);

    let longs = vec![TensorMeta::contiguous(ScalarType::Long, 1); 3];
    let op = registry.get_op_function("aten::add.out", &longs).unwrap();
    assert_eq!(op as usize, ops::add_out as usize);
}

#[test]
fn test_global_registration_dispatches() {
    let count = register_all_kernels().unwrap();
    assert_eq!(count, kernels().len());
    assert_eq!(register_all_kernels(), Ok(count));

    let local = OperatorRegistry::default();
    assert_eq!(
        register_all_kernels_into(&local),
        Err(Error::AlreadyRegistered { kernels: count })
    );
    assert!(local.is_empty());

    let op = edge_kernel_registry::get_op_function("aten::mul.out", &[]).unwrap();
    let mut args = [
        float_vector(&[1.0, 2.0, 3.0]),
        float_vector(&[4.0, 5.0, 6.0]),
        float_vector(&[]),
    ];
    let mut ctx = KernelRuntimeContext::new();
    op(&mut ctx, &mut args);

    assert!(ctx.is_ok());
    assert_eq!(args[2].as_tensor().unwrap().data(), &[4.0, 10.0, 18.0]);
}

#[test]
fn test_kernel_failure_reported_through_context() {
    let registry = OperatorRegistry::default();
    registry.register_kernels(kernels()).unwrap();

    let op = registry.get_op_function("aten::neg.out", &[]).unwrap();
    let mut args = [EValue::Int(3), float_vector(&[])];
    let mut ctx = KernelRuntimeContext::new();
    op(&mut ctx, &mut args);

    assert!(!ctx.is_ok());
    assert!(ctx.failure_state().is_some());
}
