use edge_kernel_macros::register_kernels;
use edge_kernel_registry::{EValue, KernelRuntimeContext};

fn add_out(_ctx: &mut KernelRuntimeContext, _args: &mut [EValue]) {}

register_kernels! {
    "aten::add.out" [key = "v1/6;0,0"] => add_out,
}

fn main() {
    let _ = add_out;
}
