//! Data type registry for register templates.
//!
//! This module defines the [`DataType`] enum, the closed set of types a
//! template entry may name. Each type has a fixed byte width and a binary
//! layout described by its [`TypeKind`].
//!
//! # Types Overview
//!
//! | Name | Label | Bytes | Kind |
//! |------|-------|:-----:|------|
//! | `BIT1_BOOLEAN` | 1b boolean | 1 | [`TypeKind::Bool1`] |
//! | `BIT8` | 8 bits bool | 1 | [`TypeKind::Bool8`] |
//! | `B8_UINT` / `B8_INT` | 8b uint / int | 1 | [`TypeKind::UInt`] / [`TypeKind::Int`] |
//! | `B16_UINT` / `B16_INT` | 16b uint / int | 2 | [`TypeKind::UInt`] / [`TypeKind::Int`] |
//! | `B32_UINT` / `B32_INT` | 32b uint / int | 4 | [`TypeKind::UInt`] / [`TypeKind::Int`] |
//! | `B64_UINT` / `B64_INT` | 64b uint / int | 8 | [`TypeKind::UInt`] / [`TypeKind::Int`] |
//! | `B16_FLOAT` | 16b float | 2 | [`TypeKind::Float`] |
//! | `B32_FLOAT` | 32b float | 4 | [`TypeKind::Float`] |
//! | `B64_FLOAT` | 64b float | 8 | [`TypeKind::Float`] |
//! | `B8_STRING` .. `B64_STRING` | 8b .. 64b string | 1 .. 8 | [`TypeKind::Ascii`] |
//!
//! # Example
//!
//! ```
//! use modbus_regcodec::{DataType, TypeKind};
//!
//! let dt = DataType::lookup("B32_FLOAT").unwrap();
//! assert_eq!(dt, DataType::B32Float);
//! assert_eq!(dt.byte_length(), 4);
//! assert_eq!(dt.kind(), TypeKind::Float);
//!
//! assert!(DataType::lookup("B24_UINT").is_err());
//! ```

use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{CodecError, Result};

/// Binary layout family of a [`DataType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A single bit, shown as a boolean.
    Bool1,
    /// One byte shown as a binary digit string.
    Bool8,
    /// Big-endian unsigned integer.
    UInt,
    /// Big-endian two's-complement signed integer.
    Int,
    /// Big-endian IEEE-754 float.
    Float,
    /// Fixed-width text, one byte per character.
    Ascii,
}

/// Data types a template entry can declare.
///
/// The set is fixed; templates refer to these types by their canonical
/// upper-case name (see [`DataType::name`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// `BIT1_BOOLEAN` - one coil or discrete input.
    Bit1Boolean,
    /// `BIT8` - one byte shown as bits.
    Bit8,
    /// `B8_UINT`
    B8Uint,
    /// `B8_INT`
    B8Int,
    /// `B16_UINT` - one register, the default type.
    B16Uint,
    /// `B16_INT`
    B16Int,
    /// `B32_UINT`
    B32Uint,
    /// `B32_INT`
    B32Int,
    /// `B64_UINT`
    B64Uint,
    /// `B64_INT`
    B64Int,
    /// `B16_FLOAT` - IEEE-754 binary16.
    B16Float,
    /// `B32_FLOAT` - IEEE-754 binary32.
    B32Float,
    /// `B64_FLOAT` - IEEE-754 binary64.
    B64Float,
    /// `B8_STRING` - one character.
    B8String,
    /// `B16_STRING` - two characters.
    B16String,
    /// `B32_STRING` - four characters.
    B32String,
    /// `B64_STRING` - eight characters.
    B64String,
}

impl DataType {
    /// Every data type, in registry order.
    pub const ALL: [DataType; 17] = [
        DataType::Bit1Boolean,
        DataType::Bit8,
        DataType::B8Uint,
        DataType::B8Int,
        DataType::B16Uint,
        DataType::B16Int,
        DataType::B32Uint,
        DataType::B32Int,
        DataType::B64Uint,
        DataType::B64Int,
        DataType::B16Float,
        DataType::B32Float,
        DataType::B64Float,
        DataType::B8String,
        DataType::B16String,
        DataType::B32String,
        DataType::B64String,
    ];

    /// Resolves a canonical type name.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::UnknownType` if the name is not in the registry.
    /// Matching is exact and case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_regcodec::DataType;
    ///
    /// assert_eq!(DataType::lookup("B16_INT").unwrap(), DataType::B16Int);
    /// assert!(DataType::lookup("b16_int").is_err());
    /// ```
    pub fn lookup(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|dt| dt.name() == name)
            .ok_or_else(|| CodecError::unknown_type(name))
    }

    /// Returns the canonical name used in templates.
    pub fn name(self) -> &'static str {
        match self {
            DataType::Bit1Boolean => "BIT1_BOOLEAN",
            DataType::Bit8 => "BIT8",
            DataType::B8Uint => "B8_UINT",
            DataType::B8Int => "B8_INT",
            DataType::B16Uint => "B16_UINT",
            DataType::B16Int => "B16_INT",
            DataType::B32Uint => "B32_UINT",
            DataType::B32Int => "B32_INT",
            DataType::B64Uint => "B64_UINT",
            DataType::B64Int => "B64_INT",
            DataType::B16Float => "B16_FLOAT",
            DataType::B32Float => "B32_FLOAT",
            DataType::B64Float => "B64_FLOAT",
            DataType::B8String => "B8_STRING",
            DataType::B16String => "B16_STRING",
            DataType::B32String => "B32_STRING",
            DataType::B64String => "B64_STRING",
        }
    }

    /// Returns a short human-readable label.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_regcodec::DataType;
    ///
    /// assert_eq!(DataType::B32Uint.label(), "32b uint");
    /// ```
    pub fn label(self) -> &'static str {
        match self {
            DataType::Bit1Boolean => "1b boolean",
            DataType::Bit8 => "8 bits bool",
            DataType::B8Uint => "8b uint",
            DataType::B8Int => "8b int",
            DataType::B16Uint => "16b uint",
            DataType::B16Int => "16b int",
            DataType::B32Uint => "32b uint",
            DataType::B32Int => "32b int",
            DataType::B64Uint => "64b uint",
            DataType::B64Int => "64b int",
            DataType::B16Float => "16b float",
            DataType::B32Float => "32b float",
            DataType::B64Float => "64b float",
            DataType::B8String => "8b string",
            DataType::B16String => "16b string",
            DataType::B32String => "32b string",
            DataType::B64String => "64b string",
        }
    }

    /// Returns the number of bytes one value occupies.
    pub fn byte_length(self) -> usize {
        match self {
            DataType::Bit1Boolean
            | DataType::Bit8
            | DataType::B8Uint
            | DataType::B8Int
            | DataType::B8String => 1,
            DataType::B16Uint | DataType::B16Int | DataType::B16Float | DataType::B16String => 2,
            DataType::B32Uint | DataType::B32Int | DataType::B32Float | DataType::B32String => 4,
            DataType::B64Uint | DataType::B64Int | DataType::B64Float | DataType::B64String => 8,
        }
    }

    /// Returns the binary layout family.
    pub fn kind(self) -> TypeKind {
        match self {
            DataType::Bit1Boolean => TypeKind::Bool1,
            DataType::Bit8 => TypeKind::Bool8,
            DataType::B8Uint | DataType::B16Uint | DataType::B32Uint | DataType::B64Uint => {
                TypeKind::UInt
            }
            DataType::B8Int | DataType::B16Int | DataType::B32Int | DataType::B64Int => {
                TypeKind::Int
            }
            DataType::B16Float | DataType::B32Float | DataType::B64Float => TypeKind::Float,
            DataType::B8String
            | DataType::B16String
            | DataType::B32String
            | DataType::B64String => TypeKind::Ascii,
        }
    }
}

impl FromStr for DataType {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::lookup(s)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_every_name() {
        for dt in DataType::ALL {
            assert_eq!(DataType::lookup(dt.name()).unwrap(), dt);
        }
    }

    #[test]
    fn test_lookup_unknown() {
        match DataType::lookup("B128_FLOAT") {
            Err(CodecError::UnknownType { name }) => assert_eq!(name, "B128_FLOAT"),
            other => panic!("Expected UnknownType, got {:?}", other),
        }
    }

    #[test]
    fn test_byte_length_matches_suffix() {
        for dt in DataType::ALL {
            let name = dt.name();
            let expected = if name.starts_with("B64") {
                8
            } else if name.starts_with("B32") {
                4
            } else if name.starts_with("B16") {
                2
            } else {
                1
            };
            assert_eq!(dt.byte_length(), expected, "{}", name);
        }
    }

    #[test]
    fn test_kinds() {
        assert_eq!(DataType::Bit1Boolean.kind(), TypeKind::Bool1);
        assert_eq!(DataType::Bit8.kind(), TypeKind::Bool8);
        assert_eq!(DataType::B64Uint.kind(), TypeKind::UInt);
        assert_eq!(DataType::B8Int.kind(), TypeKind::Int);
        assert_eq!(DataType::B16Float.kind(), TypeKind::Float);
        assert_eq!(DataType::B32String.kind(), TypeKind::Ascii);
    }

    #[test]
    fn test_from_str_and_display() {
        let dt: DataType = "B64_STRING".parse().unwrap();
        assert_eq!(dt, DataType::B64String);
        assert_eq!(dt.to_string(), "B64_STRING");
    }

    #[test]
    fn test_serialize_as_name() {
        let json = serde_json::to_string(&DataType::B16Int).unwrap();
        assert_eq!(json, "\"B16_INT\"");
    }
}
