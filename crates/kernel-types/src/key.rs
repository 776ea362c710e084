//! Kernel specialization keys.
//!
//! A key describes the tensor arguments a kernel was specialized for:
//!
//! ```text
//! v1/<dtype>;<dim_order>|<dtype>;<dim_order>|...
//! ```
//!
//! `dtype` is a [`ScalarType`] code and `dim_order` a comma separated
//! permutation of the tensor's dimension indices. `v1/6;0,1|6;0,1` names a
//! kernel taking two contiguous 2-d float tensors.
//!
//! Kernels registered without a key are the operator's fallback and match
//! any lookup that no specialized kernel satisfies.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ScalarType;

const VERSION_PREFIX: &str = "v1/";

/// Errors produced while parsing a kernel key string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Key exceeds [`KernelKey::MAX_LEN`].
    #[error("kernel key is {len} bytes, longer than the {max} byte limit")]
    TooLong { len: usize, max: usize },

    /// Key does not start with the `v1/` version prefix.
    #[error("kernel key '{0}' is missing the 'v1/' version prefix")]
    MissingVersion(String),

    /// An entry is not of the form `<dtype>;<dim_order>`.
    #[error("malformed kernel key entry '{0}'")]
    MalformedEntry(String),

    /// The dtype code does not name a known scalar type.
    #[error("unknown dtype code '{0}' in kernel key")]
    UnknownDtype(String),

    /// The dim order is not a permutation of `0..n`.
    #[error("invalid dim order '{0}' in kernel key")]
    InvalidDimOrder(String),

    /// The key parses but is not spelled the way lookups build it, so no
    /// lookup could ever match it.
    #[error("kernel key '{key}' is not in canonical form, expected '{canonical}'")]
    NonCanonical { key: String, canonical: String },
}

/// Dtype and dim order of one tensor argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TensorMeta {
    pub dtype: ScalarType,
    pub dim_order: Vec<u8>,
}

impl TensorMeta {
    pub fn new(dtype: ScalarType, dim_order: Vec<u8>) -> Self {
        Self { dtype, dim_order }
    }

    /// Meta for a contiguous tensor of `ndim` dimensions.
    pub fn contiguous(dtype: ScalarType, ndim: u8) -> Self {
        let dim_order = (0..ndim).collect();
        Self { dtype, dim_order }
    }

    /// Build the lookup key string for a list of tensor arguments.
    ///
    /// ```rust
    /// use edge_kernel_types::{ScalarType, TensorMeta};
    ///
    /// let metas = [
    ///     TensorMeta::contiguous(ScalarType::Float, 4),
    ///     TensorMeta::contiguous(ScalarType::Long, 1),
    /// ];
    /// assert_eq!(TensorMeta::key_for(&metas), "v1/6;0,1,2,3|4;0");
    /// ```
    pub fn key_for(metas: &[TensorMeta]) -> String {
        let entries: Vec<String> = metas.iter().map(TensorMeta::key_entry).collect();
        format!("{}{}", VERSION_PREFIX, entries.join("|"))
    }

    fn key_entry(&self) -> String {
        let dims: Vec<String> = self.dim_order.iter().map(|d| d.to_string()).collect();
        format!("{};{}", self.dtype.code(), dims.join(","))
    }
}

/// Specialization key attached to a registered kernel.
///
/// `KernelKey::DEFAULT` marks the fallback kernel of an operator. Specialized
/// keys wrap a `'static` key string so kernel tables stay `const`
/// constructible; use [`KernelKey::parse`] to validate one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KernelKey(Option<&'static str>);

impl KernelKey {
    /// The fallback key.
    pub const DEFAULT: KernelKey = KernelKey(None);

    /// Longest key string accepted by [`KernelKey::parse`].
    pub const MAX_LEN: usize = 64;

    /// Wrap a specialized key string. The string is not validated here.
    pub const fn new(key: &'static str) -> Self {
        Self(Some(key))
    }

    /// Whether this is the fallback key.
    pub const fn is_fallback(&self) -> bool {
        self.0.is_none()
    }

    /// The key string, `None` for the fallback key.
    pub const fn as_str(&self) -> Option<&'static str> {
        self.0
    }

    /// Whether this specialized key equals the given lookup key.
    ///
    /// The fallback key never matches here; fallback resolution is a
    /// separate step in the registry.
    pub fn matches(&self, lookup: &str) -> bool {
        self.0 == Some(lookup)
    }

    /// Validate this key. The fallback key always validates.
    pub fn validate(&self) -> Result<(), KeyError> {
        match self.0 {
            Some(key) => Self::parse(key).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Parse a key string into its tensor metas.
    ///
    /// `"v1/"` with no entries is valid and describes an operator with no
    /// tensor arguments. The key must be exactly what
    /// [`TensorMeta::key_for`] builds for the parsed metas: `v1/06;0` or
    /// `v1/+6;0` are rejected.
    pub fn parse(key: &str) -> Result<Vec<TensorMeta>, KeyError> {
        if key.len() > Self::MAX_LEN {
            return Err(KeyError::TooLong {
                len: key.len(),
                max: Self::MAX_LEN,
            });
        }
        let body = key
            .strip_prefix(VERSION_PREFIX)
            .ok_or_else(|| KeyError::MissingVersion(key.to_string()))?;
        if body.is_empty() {
            return Ok(Vec::new());
        }

        let metas = body
            .split('|')
            .map(parse_entry)
            .collect::<Result<Vec<_>, _>>()?;

        let canonical = TensorMeta::key_for(&metas);
        if canonical != key {
            return Err(KeyError::NonCanonical {
                key: key.to_string(),
                canonical,
            });
        }
        Ok(metas)
    }
}

impl fmt::Display for KernelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(key) => f.write_str(key),
            None => f.write_str("<default>"),
        }
    }
}

fn parse_entry(entry: &str) -> Result<TensorMeta, KeyError> {
    let (dtype, dims) = entry
        .split_once(';')
        .ok_or_else(|| KeyError::MalformedEntry(entry.to_string()))?;

    let dtype = dtype
        .parse::<i64>()
        .ok()
        .and_then(ScalarType::from_code)
        .ok_or_else(|| KeyError::UnknownDtype(dtype.to_string()))?;

    let dim_order = if dims.is_empty() {
        Vec::new()
    } else {
        dims.split(',')
            .map(|d| d.parse::<u8>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| KeyError::InvalidDimOrder(dims.to_string()))?
    };

    let mut seen = vec![false; dim_order.len()];
    for &d in &dim_order {
        match seen.get_mut(d as usize) {
            Some(slot) if !*slot => *slot = true,
            _ => return Err(KeyError::InvalidDimOrder(dims.to_string())),
        }
    }

    Ok(TensorMeta { dtype, dim_order })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_specialized_key() {
        let metas = KernelKey::parse("v1/6;0,1,2,3|6;0,2,3,1").unwrap();
        assert_eq!(metas.len(), 2);
        assert_eq!(metas[0], TensorMeta::contiguous(ScalarType::Float, 4));
        assert_eq!(metas[1].dim_order, vec![0, 2, 3, 1]);
    }

    #[test]
    fn test_parse_scalar_tensor_entry() {
        let metas = KernelKey::parse("v1/7;").unwrap();
        assert_eq!(metas, vec![TensorMeta::new(ScalarType::Double, vec![])]);
    }

    #[test]
    fn test_parse_no_tensor_arguments() {
        assert_eq!(KernelKey::parse("v1/").unwrap(), Vec::new());
        assert_eq!(TensorMeta::key_for(&[]), "v1/");
    }

    #[test]
    fn test_parse_rejects_bad_keys() {
        assert!(matches!(
            KernelKey::parse("6;0,1"),
            Err(KeyError::MissingVersion(_))
        ));
        assert!(matches!(
            KernelKey::parse("v1/6"),
            Err(KeyError::MalformedEntry(_))
        ));
        assert!(matches!(
            KernelKey::parse("v1/9;0"),
            Err(KeyError::UnknownDtype(_))
        ));
        assert!(matches!(
            KernelKey::parse("v1/6;0,0"),
            Err(KeyError::InvalidDimOrder(_))
        ));
        assert!(matches!(
            KernelKey::parse("v1/6;1,2"),
            Err(KeyError::InvalidDimOrder(_))
        ));
        assert!(matches!(
            KernelKey::parse("v1/6;a"),
            Err(KeyError::InvalidDimOrder(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_canonical_spelling() {
        for key in ["v1/+06;00", "v1/06;0", "v1/6;+0", "v1/6;0,01", "v1/6; 0"] {
            let result = KernelKey::parse(key);
            assert!(
                matches!(result, Err(KeyError::NonCanonical { .. }))
                    || matches!(result, Err(KeyError::InvalidDimOrder(_))),
                "{key} should be rejected, got {result:?}"
            );
        }
        assert_eq!(
            KernelKey::parse("v1/+06;00"),
            Err(KeyError::NonCanonical {
                key: "v1/+06;00".to_string(),
                canonical: "v1/6;0".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_rejects_long_key() {
        let long = format!("v1/{}", ["6;0,1,2,3"; 8].join("|"));
        assert!(long.len() > KernelKey::MAX_LEN);
        assert!(matches!(
            KernelKey::parse(&long),
            Err(KeyError::TooLong { max: 64, .. })
        ));
    }

    #[test]
    fn test_key_for_matches_parse() {
        let metas = vec![
            TensorMeta::contiguous(ScalarType::Float, 2),
            TensorMeta::new(ScalarType::Long, vec![1, 0]),
        ];
        let key = TensorMeta::key_for(&metas);
        assert_eq!(key, "v1/6;0,1|4;1,0");
        assert_eq!(KernelKey::parse(&key).unwrap(), metas);
    }

    #[test]
    fn test_fallback_key() {
        assert!(KernelKey::DEFAULT.is_fallback());
        assert!(!KernelKey::DEFAULT.matches("v1/"));
        assert!(KernelKey::DEFAULT.validate().is_ok());
        assert_eq!(KernelKey::DEFAULT.to_string(), "<default>");
        assert_eq!(KernelKey::default(), KernelKey::DEFAULT);
    }

    #[test]
    fn test_specialized_key_matches() {
        let key = KernelKey::new("v1/6;0");
        assert!(!key.is_fallback());
        assert!(key.matches("v1/6;0"));
        assert!(!key.matches("v1/7;0"));
        assert_eq!(key.as_str(), Some("v1/6;0"));
    }
}
