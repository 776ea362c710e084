//! Generates the registration unit for the kernels listed in `functions.yaml`.

use std::path::PathBuf;

use edge_kernel_codegen::{CodegenError, KernelManifest};

fn env_path(var: &str) -> Result<PathBuf, CodegenError> {
    std::env::var_os(var)
        .map(PathBuf::from)
        .ok_or_else(|| CodegenError::Io(std::io::Error::other(format!("{var} is not set"))))
}

fn main() -> Result<(), CodegenError> {
    let manifest_path = env_path("CARGO_MANIFEST_DIR")?.join("functions.yaml");
    println!("cargo:rerun-if-changed={}", manifest_path.display());

    let unit = KernelManifest::load(&manifest_path)?.to_unit()?;
    let source = unit.render()?;
    std::fs::write(env_path("OUT_DIR")?.join("register_kernels.rs"), source)?;
    Ok(())
}
