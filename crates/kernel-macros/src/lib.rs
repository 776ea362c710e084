//! Proc-macros for registering operator kernels.
//!
//! # Usage
//!
//! ```ignore
//! use edge_kernel_macros::{kernel, register_kernels};
//! use edge_kernel_registry::{EValue, KernelRuntimeContext};
//!
//! /// Collected at link time into `STATIC_KERNELS`
//! #[kernel(name = "custom::relu.out")]
//! pub fn relu_out(ctx: &mut KernelRuntimeContext, args: &mut [EValue]) {
//!     // ...
//! }
//!
//! /// Expanded in place into a kernel table and `register_all_kernels()`
//! mod registration {
//!     use super::ops::*;
//!
//!     edge_kernel_macros::register_kernels! {
//!         "aten::add.out" => add_out,
//!         "aten::add.out" [key = "v1/6;0|6;0|6;0"] => add_out_float,
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, parse_macro_input};

mod codegen;
mod parsing;
mod validation;

use codegen::{static_slice::generate_static_registration, table::generate_table};
use parsing::{KernelArgs, KernelTable};
use validation::{validate_key, validate_kernel_fn, validate_operator};

/// Register a function as the kernel for an operator.
///
/// The function is kept as written and a descriptor for it is added to
/// `edge_kernel_registry::STATIC_KERNELS`. Call
/// `edge_kernel_registry::register_static_kernels()` once at startup to move
/// every collected kernel into the global registry.
///
/// # Arguments
///
/// - `name = "..."` (required): operator identifier, e.g. `"aten::add.out"`
/// - `key = "..."` (optional): specialization key; omit for the fallback kernel
///
/// # Errors
///
/// Compile-time errors are emitted when:
/// - `name` is missing, empty, or contains whitespace
/// - `key` is not a valid kernel key
/// - the function does not take exactly `(ctx, args)` or returns a value
#[proc_macro_attribute]
pub fn kernel(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as KernelArgs);
    let func = parse_macro_input!(item as ItemFn);

    let expanded = generate_kernel_registration(&args, &func);

    match expanded {
        Ok(tokens) => tokens.into(),
        Err(e) => {
            let error = e.to_compile_error();
            quote! {
                #func
                #error
            }
            .into()
        }
    }
}

fn generate_kernel_registration(
    args: &KernelArgs,
    func: &ItemFn,
) -> syn::Result<proc_macro2::TokenStream> {
    validate_operator(&args.name)?;
    if let Some(key) = &args.key {
        validate_key(key)?;
    }
    validate_kernel_fn(func)?;

    let registration = generate_static_registration(args, func);
    Ok(quote! {
        #func

        #registration
    })
}

/// Expand a kernel table into a registration unit.
///
/// Emits, in the invoking module, a `static` kernel table in the order
/// written, plus `kernels()`, `register_all_kernels()` and
/// `register_all_kernels_into(registry)`. Registration runs once per load.
/// Invoke it at most once per module.
///
/// ```ignore
/// register_kernels! {
///     use crate::ops;
///     "aten::add" => add_kernel,
///     "aten::add" [key = "v1/6;0|6;0"] => add_kernel_float,
/// }
/// ```
///
/// Each leading `use module;` glob-imports `module` into the unit. An empty
/// invocation produces an empty table.
#[proc_macro]
pub fn register_kernels(input: TokenStream) -> TokenStream {
    let table = parse_macro_input!(input as KernelTable);

    match generate_table(&table) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
