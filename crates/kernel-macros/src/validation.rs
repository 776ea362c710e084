//! Signature and literal validation for kernel registrations.

use edge_kernel_types::KernelKey;
use syn::{ItemFn, LitStr, ReturnType};

/// Validate that `func` has the kernel calling convention:
/// `fn(ctx: &mut KernelRuntimeContext, args: &mut [EValue])`.
///
/// Parameter types are checked by the compiler when the function is coerced
/// to `OpFunction`; this only rejects shapes that could never coerce, with a
/// clearer message.
pub(crate) fn validate_kernel_fn(func: &ItemFn) -> syn::Result<()> {
    let sig = &func.sig;

    if sig.inputs.len() != 2 {
        let message = format!(
            "kernel functions take exactly two parameters \
             `(ctx: &mut KernelRuntimeContext, args: &mut [EValue])`, found {}",
            sig.inputs.len()
        );
        return Err(if sig.inputs.is_empty() {
            syn::Error::new_spanned(&sig.ident, message)
        } else {
            syn::Error::new_spanned(&sig.inputs, message)
        });
    }
    if let Some(receiver) = sig.receiver() {
        return Err(syn::Error::new_spanned(
            receiver,
            "kernel functions cannot take `self`",
        ));
    }
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "kernel functions cannot be async",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "kernel functions cannot be generic",
        ));
    }
    if let ReturnType::Type(_, ty) = &sig.output {
        return Err(syn::Error::new_spanned(
            ty,
            "kernel functions report failures through the context and return nothing",
        ));
    }
    Ok(())
}

/// Validate an operator name literal.
pub(crate) fn validate_operator(name: &LitStr) -> syn::Result<()> {
    let value = name.value();
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(syn::Error::new_spanned(
            name,
            "operator names must be non-empty and contain no whitespace",
        ));
    }
    Ok(())
}

/// Validate a kernel key literal.
pub(crate) fn validate_key(key: &LitStr) -> syn::Result<()> {
    KernelKey::parse(&key.value())
        .map(|_| ())
        .map_err(|e| syn::Error::new_spanned(key, e.to_string()))
}
