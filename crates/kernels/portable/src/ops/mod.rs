//! Kernel implementations referenced by `functions.yaml`.

mod binary;
mod support;
mod unary;

pub use binary::{add_out, add_out_float_1d, mul_out, sub_out};
pub use unary::neg_out;
