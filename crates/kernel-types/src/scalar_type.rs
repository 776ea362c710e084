//! Tensor element types and their stable integer codes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Element type of a tensor.
///
/// The discriminants are the integer codes used in kernel keys and must
/// never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum ScalarType {
    Byte = 0,
    Char = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Half = 5,
    Float = 6,
    Double = 7,
    Bool = 11,
}

impl ScalarType {
    /// All supported scalar types in code order.
    pub const ALL: [ScalarType; 9] = [
        ScalarType::Byte,
        ScalarType::Char,
        ScalarType::Short,
        ScalarType::Int,
        ScalarType::Long,
        ScalarType::Half,
        ScalarType::Float,
        ScalarType::Double,
        ScalarType::Bool,
    ];

    /// Integer code used in kernel keys.
    pub const fn code(self) -> i8 {
        self as i8
    }

    /// Look up a scalar type by its integer code.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| i64::from(ty.code()) == code)
    }

    /// Whether values of this type are floating point.
    pub fn is_floating_point(self) -> bool {
        matches!(self, ScalarType::Half | ScalarType::Float | ScalarType::Double)
    }

    /// Whether values of this type are integral (bool excluded).
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            ScalarType::Byte
                | ScalarType::Char
                | ScalarType::Short
                | ScalarType::Int
                | ScalarType::Long
        )
    }

    /// Short lowercase name, e.g. `"float"`.
    pub fn name(self) -> &'static str {
        match self {
            ScalarType::Byte => "byte",
            ScalarType::Char => "char",
            ScalarType::Short => "short",
            ScalarType::Int => "int",
            ScalarType::Long => "long",
            ScalarType::Half => "half",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
            ScalarType::Bool => "bool",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
