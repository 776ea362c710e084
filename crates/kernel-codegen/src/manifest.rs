//! YAML kernel manifest loading.
//!
//! ```yaml
//! imports:
//!   - crate::ops
//! kernels:
//!   - op: aten::add.out
//!     kernels:
//!       - kernel_name: add_out
//!       - kernel_name: add_out_float
//!         kernel_key: "v1/6;0,1|6;0,1|6;0,1"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CodegenError, CodegenResult, KernelEntry, RegistrationUnit};

/// A kernel manifest: the generator's input file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelManifest {
    /// Modules glob-imported by the generated unit.
    #[serde(default)]
    pub imports: Vec<String>,

    /// Path to the registry crate, if not `::edge_kernel_registry`.
    #[serde(default)]
    pub registry_crate: Option<String>,

    /// Operators and their kernels, in registration order.
    #[serde(default)]
    pub kernels: Vec<OperatorKernels>,
}

/// Kernels implementing one operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorKernels {
    pub op: String,
    #[serde(default)]
    pub kernels: Vec<KernelBinding>,
}

/// One kernel function bound to an operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelBinding {
    /// Path to the kernel function, relative to the manifest imports.
    pub kernel_name: String,
    /// Specialization key; omitted for the fallback kernel.
    #[serde(default)]
    pub kernel_key: Option<String>,
}

impl KernelManifest {
    /// Load a manifest from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> CodegenResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a manifest from a YAML string. An empty document is an empty
    /// manifest.
    pub fn from_yaml(yaml: &str) -> CodegenResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let manifest: KernelManifest = serde_yaml::from_str(yaml)?;
        Ok(manifest)
    }

    /// Number of kernel bindings across all operators.
    pub fn kernel_count(&self) -> usize {
        self.kernels.iter().map(|op| op.kernels.len()).sum()
    }

    /// Build the registration unit described by this manifest.
    ///
    /// Entries are flattened in manifest order: operators in listed order,
    /// and each operator's kernels in listed order.
    pub fn to_unit(&self) -> CodegenResult<RegistrationUnit> {
        let mut entries = Vec::with_capacity(self.kernel_count());
        for op in &self.kernels {
            if op.kernels.is_empty() {
                return Err(CodegenError::NoKernels(op.op.clone()));
            }
            for binding in &op.kernels {
                let entry = KernelEntry::new(op.op.clone(), &binding.kernel_name)?;
                entries.push(match &binding.kernel_key {
                    Some(key) => entry.with_key(key.clone()),
                    None => entry,
                });
            }
        }

        let mut unit = RegistrationUnit::new(entries);
        for module in &self.imports {
            unit = unit.with_import(module)?;
        }
        if let Some(registry) = &self.registry_crate {
            unit = unit.with_registry_crate(registry)?;
        }
        unit.validate()?;
        Ok(unit)
    }
}
