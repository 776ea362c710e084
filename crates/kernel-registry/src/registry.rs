//! Operator registry storage and lookup.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use edge_kernel_types::{KernelKey, OpFunction, TensorMeta};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use crate::{Error, Kernel, Result};

/// Registry configuration.
///
/// ```yaml
/// max_kernels: 4000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Upper bound on the number of registered kernels.
    #[serde(default = "default_max_kernels")]
    pub max_kernels: usize,
}

fn default_max_kernels() -> usize {
    RegistryConfig::DEFAULT_MAX_KERNELS
}

impl RegistryConfig {
    pub const DEFAULT_MAX_KERNELS: usize = 2000;

    /// Parse a config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: RegistryConfig =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs no registry can work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_kernels == 0 {
            return Err(Error::Config("max_kernels must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Load a config from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_kernels: Self::DEFAULT_MAX_KERNELS,
        }
    }
}

/// Kernels registered for a single operator.
#[derive(Debug, Default)]
struct OperatorEntry {
    fallback: Option<OpFunction>,
    specialized: HashMap<&'static str, OpFunction>,
}

impl OperatorEntry {
    fn contains(&self, key: KernelKey) -> bool {
        match key.as_str() {
            Some(key) => self.specialized.contains_key(key),
            None => self.fallback.is_some(),
        }
    }

    fn insert(&mut self, kernel: &Kernel) {
        match kernel.kernel_key.as_str() {
            Some(key) => {
                self.specialized.insert(key, kernel.op);
            }
            None => self.fallback = Some(kernel.op),
        }
    }

    fn resolve(&self, lookup_key: &str) -> Option<OpFunction> {
        self.specialized.get(lookup_key).copied().or(self.fallback)
    }
}

#[derive(Debug, Default)]
struct RegistryTable {
    kernels: Vec<Kernel>,
    operators: IndexMap<&'static str, OperatorEntry>,
}

impl RegistryTable {
    fn contains(&self, kernel: &Kernel) -> bool {
        self.operators
            .get(kernel.name)
            .is_some_and(|entry| entry.contains(kernel.kernel_key))
    }
}

/// Registry of operator kernels.
///
/// Lookups take a shared lock and may run concurrently; registration takes
/// the exclusive lock.
#[derive(Debug)]
pub struct OperatorRegistry {
    config: RegistryConfig,
    table: RwLock<RegistryTable>,
}

impl OperatorRegistry {
    /// Create an empty registry.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            table: RwLock::new(RegistryTable::default()),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register a batch of kernels.
    ///
    /// The batch is validated before anything is inserted: every key must
    /// parse, no `(name, key)` pair may already be registered or repeat
    /// within the batch, and the batch must fit in the configured capacity.
    /// On error the registry is left unchanged.
    ///
    /// Returns the number of kernels added. An empty batch is accepted and
    /// adds nothing.
    pub fn register_kernels(&self, kernels: &[Kernel]) -> Result<usize> {
        if kernels.is_empty() {
            trace!("empty kernel batch, nothing to register");
            return Ok(0);
        }

        let mut table = self.write()?;
        if let Err(e) = self.validate_batch(&table, kernels) {
            error!(error = %e, batch = kernels.len(), "rejected kernel batch");
            return Err(e);
        }

        for kernel in kernels {
            table
                .operators
                .entry(kernel.name)
                .or_default()
                .insert(kernel);
            table.kernels.push(*kernel);
        }

        debug!(
            added = kernels.len(),
            total = table.kernels.len(),
            "registered kernel batch"
        );
        Ok(kernels.len())
    }

    fn validate_batch(&self, table: &RegistryTable, kernels: &[Kernel]) -> Result<()> {
        let registered = table.kernels.len();
        if registered + kernels.len() > self.config.max_kernels {
            return Err(Error::CapacityExceeded {
                requested: kernels.len(),
                registered,
                capacity: self.config.max_kernels,
            });
        }

        let mut seen: HashSet<(&'static str, KernelKey)> = HashSet::new();
        for kernel in kernels {
            kernel
                .kernel_key
                .validate()
                .map_err(|source| Error::InvalidKernelKey {
                    name: kernel.name.to_string(),
                    source,
                })?;

            let repeated = !seen.insert((kernel.name, kernel.kernel_key));
            if repeated || table.contains(kernel) {
                return Err(Error::DuplicateKernel {
                    name: kernel.name.to_string(),
                    key: kernel.kernel_key.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Find the kernel serving `name` for arguments described by `metas`.
    ///
    /// A kernel whose key exactly matches the arguments wins; otherwise the
    /// operator's fallback kernel is used.
    pub fn get_op_function(&self, name: &str, metas: &[TensorMeta]) -> Result<OpFunction> {
        let lookup_key = TensorMeta::key_for(metas);
        let table = self.read()?;
        let found = table
            .operators
            .get(name)
            .and_then(|entry| entry.resolve(&lookup_key));

        trace!(operator = name, key = %lookup_key, found = found.is_some(), "kernel lookup");
        found.ok_or(Error::OperatorMissing {
            name: name.to_string(),
            key: lookup_key,
        })
    }

    /// Whether a kernel serves `name` for the given arguments.
    pub fn has_op_function(&self, name: &str, metas: &[TensorMeta]) -> bool {
        self.get_op_function(name, metas).is_ok()
    }

    /// Whether any kernel is registered under `name`.
    pub fn contains_operator(&self, name: &str) -> bool {
        self.read()
            .map(|table| table.operators.contains_key(name))
            .unwrap_or(false)
    }

    /// All kernels, in registration order.
    pub fn registered_kernels(&self) -> Vec<Kernel> {
        self.read()
            .map(|table| table.kernels.clone())
            .unwrap_or_default()
    }

    /// Distinct operator names, in order of first registration.
    pub fn operator_names(&self) -> Vec<&'static str> {
        self.read()
            .map(|table| table.operators.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Number of registered kernels.
    pub fn len(&self) -> usize {
        self.read().map(|table| table.kernels.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, RegistryTable>> {
        self.table.read().map_err(|_| Error::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RegistryTable>> {
        self.table.write().map_err(|_| Error::Poisoned)
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

// ============================================================================
// Tests
// ============================================================================
