//! Link-time registration for `#[kernel]` functions.
//!
//! Generates the distributed slice entry that places a kernel descriptor in
//! `edge_kernel_registry::STATIC_KERNELS`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ItemFn;

use crate::parsing::KernelArgs;

/// Generate the `STATIC_KERNELS` entry for a kernel function
pub(crate) fn generate_static_registration(args: &KernelArgs, func: &ItemFn) -> TokenStream {
    let fn_name = &func.sig.ident;
    let name = &args.name;
    let descriptor_name = format_ident!("__KERNEL_{}", fn_name.to_string().to_uppercase());

    let descriptor = match &args.key {
        Some(key) => quote! {
            ::edge_kernel_registry::Kernel::with_key(
                #name,
                ::edge_kernel_registry::KernelKey::new(#key),
                #fn_name,
            )
        },
        None => quote! {
            ::edge_kernel_registry::Kernel::new(#name, #fn_name)
        },
    };

    quote! {
        #[allow(non_upper_case_globals)]
        #[::edge_kernel_registry::linkme::distributed_slice(::edge_kernel_registry::STATIC_KERNELS)]
        #[linkme(crate = ::edge_kernel_registry::linkme)]
        static #descriptor_name: ::edge_kernel_registry::Kernel = #descriptor;
    }
}
