//! Registration unit expansion for `register_kernels!`.

use edge_kernel_codegen::{KernelEntry, RegistrationUnit};
use proc_macro2::{Span, TokenStream};

use crate::parsing::KernelTable;
use crate::validation::{validate_key, validate_operator};

/// Expand a kernel table into a registration unit
///
/// Literals are validated here first so errors point at the offending
/// token; whole-table checks (duplicates) are left to the generator.
pub(crate) fn generate_table(table: &KernelTable) -> syn::Result<TokenStream> {
    let mut entries = Vec::with_capacity(table.entries.len());
    for entry in &table.entries {
        validate_operator(&entry.operator)?;
        if let Some(key) = &entry.key {
            validate_key(key)?;
        }
        entries.push(KernelEntry {
            operator: entry.operator.value(),
            kernel_key: entry.key.as_ref().map(|k| k.value()),
            function: entry.function.clone(),
        });
    }

    table
        .imports
        .iter()
        .cloned()
        .fold(RegistrationUnit::new(entries), RegistrationUnit::with_import_path)
        .to_tokens()
        .map_err(|e| syn::Error::new(Span::call_site(), e.to_string()))
}
