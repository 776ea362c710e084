use edge_kernel_macros::kernel;
use edge_kernel_registry::{EValue, KernelRuntimeContext};

#[kernel(name = "aten::add.out", key = "v2/6;0")]
pub fn add_out(_ctx: &mut KernelRuntimeContext, _args: &mut [EValue]) {}

fn main() {
    let _ = add_out;
}
