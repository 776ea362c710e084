use edge_kernel_types::KeyError;
use thiserror::Error;

/// Errors that can occur while loading a manifest or emitting a unit.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Failed to read a manifest or write generated source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the manifest YAML.
    #[error("failed to parse kernel manifest YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A function, import or registry path is not a valid Rust path.
    #[error("invalid Rust path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    /// An operator name is empty or contains whitespace.
    #[error("invalid operator name '{0}'")]
    InvalidOperatorName(String),

    /// A manifest operator lists no kernels.
    #[error("operator '{0}' lists no kernels")]
    NoKernels(String),

    /// A kernel key failed to parse.
    #[error("operator '{operator}' has invalid kernel key '{key}': {source}")]
    InvalidKernelKey {
        operator: String,
        key: String,
        #[source]
        source: KeyError,
    },

    /// The same operator and key appear twice in one unit.
    #[error("operator '{operator}' has more than one kernel for key {key}")]
    DuplicateEntry { operator: String, key: String },

    /// The emitted tokens did not form a valid Rust file.
    #[error("generated unit is not valid Rust: {0}")]
    Render(String),
}

/// Result type for codegen operations.
pub type CodegenResult<T> = Result<T, CodegenError>;
