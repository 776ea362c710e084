//! Registration unit generator.
//!
//! Renders the kernel table listed in a YAML manifest into a Rust module
//! exposing `kernels()` and `register_all_kernels()`.
//!
//! Usage: `gen_registration <manifest> [--output FILE] [--registry-crate PATH] [--check]`

use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "gen_registration")]
#[command(about = "Generate a kernel registration unit from a manifest")]
struct Args {
    /// Path to the kernel manifest (YAML)
    manifest: PathBuf,

    /// Write the unit here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path the generated code uses to reach the registry crate
    #[arg(long)]
    registry_crate: Option<String>,

    /// Compare against --output and fail if it is out of date
    #[arg(long, requires = "output")]
    check: bool,
}

fn main() {
    edge_kernel_tools::init_logging();

    let args = Args::parse();

    if !args.manifest.is_file() {
        error!("Manifest '{}' does not exist", args.manifest.display());
        process::exit(1);
    }

    info!("Generating registration unit from: {}", args.manifest.display());

    let rendered =
        match edge_kernel_tools::generate(&args.manifest, args.registry_crate.as_deref()) {
            Ok(rendered) => rendered,
            Err(e) => {
                error!("Generation failed: {}", e);
                process::exit(1);
            }
        };

    let Some(output) = args.output else {
        print!("{}", rendered);
        return;
    };

    if args.check {
        match edge_kernel_tools::is_up_to_date(&output, &rendered) {
            Ok(true) => info!("'{}' is up to date", output.display()),
            Ok(false) => {
                error!("'{}' is stale, regenerate it", output.display());
                process::exit(1);
            }
            Err(e) => {
                error!("Failed to read '{}': {}", output.display(), e);
                process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = std::fs::write(&output, &rendered) {
        error!("Failed to write '{}': {}", output.display(), e);
        process::exit(1);
    }
    info!("Wrote {}", output.display());
}
