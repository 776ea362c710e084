//! Edge Kernel Tools
//!
//! CLI tools for generating kernel registration units.

use std::path::Path;

use edge_kernel_codegen::{CodegenResult, KernelManifest};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize logging with a default filter.
///
/// Use `RUST_LOG` environment variable to override the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,edge_kernel_tools=debug,edge_kernel_codegen=info")
    });

    fmt().with_env_filter(filter).with_target(false).init();
}

/// Render the registration unit described by the manifest at `manifest`.
///
/// `registry_crate` overrides both the manifest's `registry_crate` and the
/// generator default.
pub fn generate(manifest: &Path, registry_crate: Option<&str>) -> CodegenResult<String> {
    let manifest = KernelManifest::load(manifest)?;
    debug!(
        operators = manifest.kernels.len(),
        kernels = manifest.kernel_count(),
        "loaded kernel manifest"
    );

    let mut unit = manifest.to_unit()?;
    if let Some(path) = registry_crate {
        unit = unit.with_registry_crate(path)?;
    }
    unit.render()
}

/// Whether `existing` already holds exactly `rendered`.
///
/// A missing file counts as stale.
pub fn is_up_to_date(existing: &Path, rendered: &str) -> CodegenResult<bool> {
    match std::fs::read_to_string(existing) {
        Ok(current) => Ok(current == rendered),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
