use edge_kernel_macros::kernel;
use edge_kernel_registry::KernelRuntimeContext;

#[kernel(name = "aten::neg.out")]
pub fn neg_out(_ctx: &mut KernelRuntimeContext) {}

fn main() {
    let _ = neg_out;
}
