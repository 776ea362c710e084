//! Registration unit model and token generation.

use std::collections::HashSet;

use edge_kernel_types::KernelKey;
use proc_macro2::TokenStream;
use quote::quote;
use syn::Path;

use crate::{CodegenError, CodegenResult};

const BANNER: &str = "// @generated by edge-kernel-codegen. Do not edit by hand.\n\n";

/// Parse a Rust path such as `crate::ops::add_out`.
pub fn parse_path(path: &str) -> CodegenResult<Path> {
    syn::parse_str::<Path>(path.trim()).map_err(|e| CodegenError::InvalidPath {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// One row of the generated kernel table.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelEntry {
    /// Operator identifier (e.g. `"aten::add.out"`)
    pub operator: String,
    /// Specialization key, `None` for the fallback kernel
    pub kernel_key: Option<String>,
    /// Path to the kernel function
    pub function: Path,
}

impl KernelEntry {
    /// Fallback kernel entry.
    pub fn new(operator: impl Into<String>, function: &str) -> CodegenResult<Self> {
        Ok(Self {
            operator: operator.into(),
            kernel_key: None,
            function: parse_path(function)?,
        })
    }

    /// Attach a specialization key.
    pub fn with_key(mut self, kernel_key: impl Into<String>) -> Self {
        self.kernel_key = Some(kernel_key.into());
        self
    }

    fn validate(&self) -> CodegenResult<()> {
        if self.operator.is_empty() || self.operator.chars().any(char::is_whitespace) {
            return Err(CodegenError::InvalidOperatorName(self.operator.clone()));
        }
        if let Some(key) = &self.kernel_key {
            KernelKey::parse(key).map_err(|source| CodegenError::InvalidKernelKey {
                operator: self.operator.clone(),
                key: key.clone(),
                source,
            })?;
        }
        Ok(())
    }

    fn descriptor_tokens(&self, registry: &Path) -> TokenStream {
        let operator = &self.operator;
        let function = &self.function;
        match &self.kernel_key {
            Some(key) => quote! {
                #registry::Kernel::with_key(#operator, #registry::KernelKey::new(#key), #function)
            },
            None => quote! {
                #registry::Kernel::new(#operator, #function)
            },
        }
    }
}

/// A complete registration unit.
///
/// Entries are emitted in the order they were given. An empty unit is valid
/// and produces a zero-length table.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationUnit {
    imports: Vec<Path>,
    kernels: Vec<KernelEntry>,
    registry_crate: Path,
}

impl RegistrationUnit {
    pub fn new(kernels: Vec<KernelEntry>) -> Self {
        Self {
            imports: Vec::new(),
            kernels,
            registry_crate: syn::parse_quote!(::edge_kernel_registry),
        }
    }

    /// Glob-import `module` at the top of the unit.
    pub fn with_import(self, module: &str) -> CodegenResult<Self> {
        Ok(self.with_import_path(parse_path(module)?))
    }

    /// Same as [`with_import`](Self::with_import) for an already parsed path.
    pub fn with_import_path(mut self, module: Path) -> Self {
        self.imports.push(module);
        self
    }

    /// Path the unit uses to reach the registry crate.
    ///
    /// Defaults to `::edge_kernel_registry`.
    pub fn with_registry_crate(mut self, path: &str) -> CodegenResult<Self> {
        self.registry_crate = parse_path(path)?;
        Ok(self)
    }

    pub fn imports(&self) -> &[Path] {
        &self.imports
    }

    pub fn kernels(&self) -> &[KernelEntry] {
        &self.kernels
    }

    pub fn registry_crate(&self) -> &Path {
        &self.registry_crate
    }

    /// Check operator names, kernel keys and `(operator, key)` uniqueness.
    pub fn validate(&self) -> CodegenResult<()> {
        let mut seen = HashSet::new();
        for entry in &self.kernels {
            entry.validate()?;
            if !seen.insert((entry.operator.as_str(), entry.kernel_key.as_deref())) {
                return Err(CodegenError::DuplicateEntry {
                    operator: entry.operator.clone(),
                    key: entry
                        .kernel_key
                        .clone()
                        .unwrap_or_else(|| "<default>".to_string()),
                });
            }
        }
        Ok(())
    }

    /// Emit the unit as tokens.
    pub fn to_tokens(&self) -> CodegenResult<TokenStream> {
        self.validate()?;

        let registry = &self.registry_crate;
        let imports = self.imports.iter().map(|module| {
            quote! {
                #[allow(unused_imports)]
                use #module::*;
            }
        });
        let count = self.kernels.len();
        let descriptors = self
            .kernels
            .iter()
            .map(|entry| entry.descriptor_tokens(registry));

        Ok(quote! {
            #(#imports)*

            static KERNELS_TO_REGISTER: [#registry::Kernel; #count] = [
                #(#descriptors),*
            ];

            static REGISTRATION: #registry::Registration =
                #registry::Registration::new(&KERNELS_TO_REGISTER);

            /// Kernels in this unit, in declaration order.
            pub fn kernels() -> &'static [#registry::Kernel] {
                REGISTRATION.kernels()
            }

            /// Register this unit's kernels with the global operator registry.
            ///
            /// Only the first call registers; later calls return its outcome.
            pub fn register_all_kernels() -> #registry::Result<usize> {
                REGISTRATION.register()
            }

            /// Register this unit's kernels with `registry` instead of the global one.
            ///
            /// Fails if the unit already registered with a different registry.
            pub fn register_all_kernels_into(
                registry: &#registry::OperatorRegistry,
            ) -> #registry::Result<usize> {
                REGISTRATION.register_into(registry)
            }
        })
    }

    /// Emit the unit as formatted Rust source.
    pub fn render(&self) -> CodegenResult<String> {
        let tokens = self.to_tokens()?;
        let file: syn::File =
            syn::parse2(tokens).map_err(|e| CodegenError::Render(e.to_string()))?;
        Ok(format!("{}{}", BANNER, prettyplease::unparse(&file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edge_kernel_types::KeyError;

    fn entry(operator: &str, function: &str) -> KernelEntry {
        KernelEntry::new(operator, function).unwrap()
    }

    #[test]
    fn test_single_kernel_unit() {
        let unit = RegistrationUnit::new(vec![entry("aten::add", "add_kernel")]);
        let source = unit.render().unwrap();

        assert!(source.starts_with("// @generated"));
        assert!(source.contains("static KERNELS_TO_REGISTER: [::edge_kernel_registry::Kernel; 1usize]"));
        assert!(source.contains("::edge_kernel_registry::Kernel::new(\"aten::add\", add_kernel)"));
        assert!(source.contains("pub fn register_all_kernels()"));
    }

    #[test]
    fn test_empty_unit() {
        let unit = RegistrationUnit::new(Vec::new());
        let source = unit.render().unwrap();

        assert!(source.contains("[::edge_kernel_registry::Kernel; 0usize] = []"));
        assert!(source.contains("&KERNELS_TO_REGISTER"));
        syn::parse_file(&source).unwrap();
    }

    #[test]
    fn test_entries_keep_declaration_order() {
        let unit = RegistrationUnit::new(vec![
            entry("aten::sub.out", "sub_out"),
            entry("aten::add.out", "add_out"),
            entry("aten::mul.out", "mul_out"),
        ]);
        let source = unit.render().unwrap();

        let sub = source.find("aten::sub.out").unwrap();
        let add = source.find("aten::add.out").unwrap();
        let mul = source.find("aten::mul.out").unwrap();
        assert!(sub < add && add < mul);
    }

    #[test]
    fn test_keyed_entry_and_imports() {
        let unit = RegistrationUnit::new(vec![
            entry("aten::add.out", "add_out"),
            entry("aten::add.out", "add_out_float").with_key("v1/6;0|6;0|6;0"),
        ])
        .with_import("crate::ops")
        .unwrap()
        .with_registry_crate("crate::registry")
        .unwrap();

        let source = unit.render().unwrap();
        assert!(source.contains("use crate::ops::*;"));
        assert!(source.contains("crate::registry::KernelKey::new(\"v1/6;0|6;0|6;0\")"));
        assert!(!source.contains("edge_kernel_registry"));
    }

    #[test]
    fn test_rendered_source_parses() {
        let unit = RegistrationUnit::new(vec![
            entry("aten::add.out", "ops::add_out"),
            entry("aten::neg.out", "ops::neg_out").with_key("v1/6;0|6;0"),
        ]);
        let source = unit.render().unwrap();
        let file = syn::parse_file(&source).unwrap();
        assert_eq!(file.items.len(), 5);
    }

    #[test]
    fn test_duplicate_entries_rejected() {
        let unit = RegistrationUnit::new(vec![
            entry("aten::add.out", "add_out"),
            entry("aten::add.out", "add_out_again"),
        ]);
        assert!(matches!(
            unit.render(),
            Err(CodegenError::DuplicateEntry { ref key, .. }) if key == "<default>"
        ));
    }

    #[test]
    fn test_same_operator_different_keys_allowed() {
        let unit = RegistrationUnit::new(vec![
            entry("aten::add.out", "add_out").with_key("v1/6;0"),
            entry("aten::add.out", "add_out_double").with_key("v1/7;0"),
        ]);
        assert!(unit.validate().is_ok());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            KernelEntry::new("aten::add", "not a path"),
            Err(CodegenError::InvalidPath { .. })
        ));

        let unit = RegistrationUnit::new(vec![entry("aten add", "add_out")]);
        assert!(matches!(
            unit.validate(),
            Err(CodegenError::InvalidOperatorName(_))
        ));

        let unit = RegistrationUnit::new(vec![entry("aten::add", "add_out").with_key("v2/6;0")]);
        assert!(matches!(
            unit.to_tokens(),
            Err(CodegenError::InvalidKernelKey { .. })
        ));
    }

    #[test]
    fn test_non_canonical_key_rejected() {
        let unit = RegistrationUnit::new(vec![
            entry("aten::add.out", "add_out").with_key("v1/+06;00"),
            entry("aten::add.out", "add_out_float").with_key("v1/6;0"),
        ]);
        assert!(matches!(
            unit.render(),
            Err(CodegenError::InvalidKernelKey {
                source: KeyError::NonCanonical { .. },
                ..
            })
        ));
    }
}
