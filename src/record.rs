//! Record building: turning chunks into typed, labelled rows.
//!
//! A [`Record`] is one row handed to a renderer:
//! `(data type, register address, raw hex, decoded value, note)`.
//!
//! Decoding a single entry can fail when the response ran short or the bytes
//! do not form a valid value (for example invalid UTF-8 in a string field).
//! Such failures never abort a batch; the entry becomes a
//! [placeholder](Record::placeholder) row instead.
//!
//! # Example
//!
//! ```
//! use modbus_regcodec::{decode_value, DataType, Value};
//!
//! assert_eq!(decode_value(DataType::B16Int, &[0xfc, 0x19]).unwrap(), Value::Int(-999));
//! assert_eq!(
//!     decode_value(DataType::B64String, b"Unit23-A").unwrap(),
//!     Value::Text("Unit23-A".to_string())
//! );
//! assert!(decode_value(DataType::B32Uint, &[0xff, 0xff]).is_err());
//! ```

use log::debug;
use serde::Serialize;

use crate::chunk::{BitChunk, Chunk};
use crate::data_type::DataType;
use crate::error::{CodecError, Result};
use crate::utils::{f16_to_f32, format_bits8, group_hex};

/// Note attached to placeholder records.
pub const PLACEHOLDER_NOTE: &str = "item exists but no data";

/// Text shown for fields a record does not have.
pub const EMPTY_FIELD: &str = "-";

/// Hex digits per display group (one register).
const HEX_GROUP_WIDTH: usize = 4;

/// A decoded value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// `BIT1_BOOLEAN`
    Bool(bool),
    /// `BIT8`, as a binary digit string.
    Bits(String),
    /// Unsigned integers of any width.
    UInt(u64),
    /// Signed integers of any width.
    Int(i64),
    /// Floats of any width, widened to `f64`.
    Float(f64),
    /// Strings of any width.
    Text(String),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Bits(v) | Value::Text(v) => f.write_str(v),
            Value::UInt(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
        }
    }
}

/// One decoded row.
///
/// Placeholder rows have no address, raw data or value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Declared data type of the template entry.
    pub data_type: DataType,
    /// Absolute register (or bit) address.
    pub address: Option<u32>,
    /// Raw data: grouped hex for byte types, `0`/`1` for single bits.
    pub raw: Option<String>,
    /// Decoded value.
    pub value: Option<Value>,
    /// Note from the template entry.
    pub note: String,
}

impl Record {
    /// Creates the fallback row for an entry that could not be decoded.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_regcodec::{DataType, Record};
    ///
    /// let record = Record::placeholder(DataType::B32Float);
    /// assert_eq!(
    ///     record.fields(),
    ///     ["B32_FLOAT", "-", "-", "-", "item exists but no data"].map(String::from)
    /// );
    /// ```
    pub fn placeholder(data_type: DataType) -> Self {
        Self {
            data_type,
            address: None,
            raw: None,
            value: None,
            note: PLACEHOLDER_NOTE.to_string(),
        }
    }

    /// Returns whether this is a placeholder row.
    pub fn is_placeholder(&self) -> bool {
        self.value.is_none()
    }

    /// Returns the five display fields, with `-` for missing ones.
    pub fn fields(&self) -> [String; 5] {
        fn or_dash<T: ToString>(field: &Option<T>) -> String {
            field
                .as_ref()
                .map_or_else(|| EMPTY_FIELD.to_string(), ToString::to_string)
        }

        [
            self.data_type.name().to_string(),
            or_dash(&self.address),
            or_dash(&self.raw),
            or_dash(&self.value),
            self.note.clone(),
        ]
    }
}

/// Decodes the bytes of one entry as `data_type`.
///
/// Integers and floats are big-endian; strings are UTF-8. `BIT1_BOOLEAN`
/// reads one byte and is `true` when it is non-zero.
///
/// # Errors
///
/// - `CodecError::TruncatedChunk` if `bytes` is not exactly
///   [`byte_length`](DataType::byte_length) long
/// - `CodecError::MalformedBuffer` if a string field is not valid UTF-8
///
/// # Example
///
/// ```
/// use modbus_regcodec::{decode_value, DataType, Value};
///
/// let value = decode_value(DataType::B32Float, &[0x43, 0x7e, 0xe2, 0xc6]).unwrap();
/// assert_eq!(value, Value::Float(254.88583374023438));
///
/// let value = decode_value(DataType::Bit8, &[0x07]).unwrap();
/// assert_eq!(value, Value::Bits("0000111".to_string()));
/// ```
pub fn decode_value(data_type: DataType, bytes: &[u8]) -> Result<Value> {
    let value = match data_type {
        DataType::Bit1Boolean => Value::Bool(u8::from_be_bytes(exact(data_type, bytes)?) != 0),
        DataType::Bit8 => Value::Bits(format_bits8(u8::from_be_bytes(exact(data_type, bytes)?))),
        DataType::B8Uint => Value::UInt(u8::from_be_bytes(exact(data_type, bytes)?).into()),
        DataType::B8Int => Value::Int(i8::from_be_bytes(exact(data_type, bytes)?).into()),
        DataType::B16Uint => Value::UInt(u16::from_be_bytes(exact(data_type, bytes)?).into()),
        DataType::B16Int => Value::Int(i16::from_be_bytes(exact(data_type, bytes)?).into()),
        DataType::B32Uint => Value::UInt(u32::from_be_bytes(exact(data_type, bytes)?).into()),
        DataType::B32Int => Value::Int(i32::from_be_bytes(exact(data_type, bytes)?).into()),
        DataType::B64Uint => Value::UInt(u64::from_be_bytes(exact(data_type, bytes)?)),
        DataType::B64Int => Value::Int(i64::from_be_bytes(exact(data_type, bytes)?)),
        DataType::B16Float => {
            let bits = u16::from_be_bytes(exact(data_type, bytes)?);
            Value::Float(f16_to_f32(bits).into())
        }
        DataType::B32Float => Value::Float(f32::from_be_bytes(exact(data_type, bytes)?).into()),
        DataType::B64Float => Value::Float(f64::from_be_bytes(exact(data_type, bytes)?)),
        DataType::B8String
        | DataType::B16String
        | DataType::B32String
        | DataType::B64String => {
            if bytes.len() != data_type.byte_length() {
                return Err(CodecError::truncated(
                    data_type.name(),
                    data_type.byte_length(),
                    bytes.len(),
                ));
            }
            let text = std::str::from_utf8(bytes)
                .map_err(|e| CodecError::malformed(data_type.name(), e.to_string()))?;
            Value::Text(text.to_string())
        }
    };
    Ok(value)
}

fn exact<const N: usize>(data_type: DataType, bytes: &[u8]) -> Result<[u8; N]> {
    bytes
        .try_into()
        .map_err(|_| CodecError::truncated(data_type.name(), N, bytes.len()))
}

/// Adds a register offset to the first register, saturating at `u32::MAX`.
fn absolute_address(start_register: u32, offset: usize) -> u32 {
    let offset = u32::try_from(offset).unwrap_or(u32::MAX);
    start_register.saturating_add(offset)
}

/// Builds the record for a byte chunk.
///
/// The address is `start_register` plus the chunk's register offset
/// rounded down. Decode failures yield a placeholder.
///
/// # Example
///
/// ```
/// use modbus_regcodec::chunk::chunks;
/// use modbus_regcodec::{build_record, DataType};
///
/// let data = [0xfe, 0xfe, 0xfc, 0x19];
/// let chunk = chunks(&data, [2, 2], 2).nth(1).unwrap();
/// let record = build_record(DataType::B16Int, "setpoint", &chunk, 40001);
///
/// assert_eq!(
///     record.fields(),
///     ["B16_INT", "40002", "fc19", "-999", "setpoint"].map(String::from)
/// );
/// ```
pub fn build_record(
    data_type: DataType,
    note: &str,
    chunk: &Chunk<'_>,
    start_register: u32,
) -> Record {
    match decode_value(data_type, chunk.bytes()) {
        Ok(value) => Record {
            data_type,
            address: Some(absolute_address(start_register, chunk.offset().whole())),
            raw: Some(group_hex(&chunk.hex(), HEX_GROUP_WIDTH)),
            value: Some(value),
            note: note.to_string(),
        },
        Err(err) => {
            debug!(
                "{} at register offset {} has no data: {}",
                data_type,
                chunk.offset(),
                err
            );
            Record::placeholder(data_type)
        }
    }
}

/// Builds the record for one bit of a coil or discrete-input block.
///
/// The raw field is the bit itself (`0` or `1`).
///
/// # Example
///
/// ```
/// use modbus_regcodec::chunk::BitChunk;
/// use modbus_regcodec::{build_bit_record, DataType, Value};
///
/// let bit = BitChunk { value: true, address: 2 };
/// let record = build_bit_record(DataType::Bit1Boolean, "-", bit, 10001);
///
/// assert_eq!(record.address, Some(10003));
/// assert_eq!(record.raw.as_deref(), Some("1"));
/// assert_eq!(record.value, Some(Value::Bool(true)));
/// ```
pub fn build_bit_record(
    data_type: DataType,
    note: &str,
    bit: BitChunk,
    start_register: u32,
) -> Record {
    Record {
        data_type,
        address: Some(absolute_address(start_register, bit.address)),
        raw: Some(u8::from(bit.value).to_string()),
        value: Some(Value::Bool(bit.value)),
        note: note.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::chunks;

    #[test]
    fn test_decode_integers() {
        assert_eq!(decode_value(DataType::B8Uint, &[0xff]).unwrap(), Value::UInt(255));
        assert_eq!(decode_value(DataType::B8Int, &[0xff]).unwrap(), Value::Int(-1));
        assert_eq!(
            decode_value(DataType::B16Uint, &[0xfe, 0xfe]).unwrap(),
            Value::UInt(65278)
        );
        assert_eq!(
            decode_value(DataType::B32Uint, &[0xff; 4]).unwrap(),
            Value::UInt(4294967295)
        );
        assert_eq!(decode_value(DataType::B32Int, &[0xff; 4]).unwrap(), Value::Int(-1));
        assert_eq!(
            decode_value(DataType::B64Uint, &[0xff; 8]).unwrap(),
            Value::UInt(u64::MAX)
        );
        assert_eq!(
            decode_value(DataType::B64Int, &[0x80, 0, 0, 0, 0, 0, 0, 0]).unwrap(),
            Value::Int(i64::MIN)
        );
    }

    #[test]
    fn test_decode_floats() {
        assert_eq!(
            decode_value(DataType::B16Float, &[0x3c, 0x00]).unwrap(),
            Value::Float(1.0)
        );
        assert_eq!(
            decode_value(DataType::B32Float, &[0x42, 0x0a, 0xc3, 0x26]).unwrap(),
            Value::Float(34.690574645996094)
        );
        assert_eq!(
            decode_value(DataType::B64Float, &3.5f64.to_be_bytes()).unwrap(),
            Value::Float(3.5)
        );
    }

    #[test]
    fn test_decode_bits() {
        assert_eq!(
            decode_value(DataType::Bit8, &[0x00]).unwrap(),
            Value::Bits("0000000".to_string())
        );
        assert_eq!(
            decode_value(DataType::Bit1Boolean, &[0x00]).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            decode_value(DataType::Bit1Boolean, &[0x10]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_decode_strings() {
        assert_eq!(
            decode_value(DataType::B16String, b"Un").unwrap(),
            Value::Text("Un".to_string())
        );
        assert_eq!(
            decode_value(DataType::B8String, b"A").unwrap(),
            Value::Text("A".to_string())
        );
    }

    #[test]
    fn test_decode_truncated() {
        match decode_value(DataType::B64Float, &[0x40, 0x09]) {
            Err(CodecError::TruncatedChunk {
                data_type,
                expected,
                actual,
            }) => {
                assert_eq!(data_type, "B64_FLOAT");
                assert_eq!(expected, 8);
                assert_eq!(actual, 2);
            }
            other => panic!("Expected TruncatedChunk, got {:?}", other),
        }
        assert!(decode_value(DataType::B32String, b"ab").is_err());
        assert!(decode_value(DataType::B16Uint, &[]).is_err());
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let err = decode_value(DataType::B16String, &[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, CodecError::MalformedBuffer { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Int(-999).to_string(), "-999");
        assert_eq!(Value::Float(254.88583374023438).to_string(), "254.88583374023438");
        assert_eq!(Value::Bits("0000111".into()).to_string(), "0000111");
    }

    #[test]
    fn test_build_record_groups_hex() {
        let data = hex::decode("556e697432332d41").unwrap();
        let chunk = chunks(&data, [8], 2).next().unwrap();
        let record = build_record(DataType::B64String, "text label", &chunk, 40001);
        assert_eq!(
            record.fields(),
            ["B64_STRING", "40001", "556e 6974 3233 2d41", "Unit23-A", "text label"]
                .map(String::from)
        );
    }

    #[test]
    fn test_build_record_placeholder_on_short_chunk() {
        let data = [0x43, 0x7e];
        let chunk = chunks(&data, [4], 2).next().unwrap();
        let record = build_record(DataType::B32Float, "32 bit float", &chunk, 0);
        assert!(record.is_placeholder());
        assert_eq!(record, Record::placeholder(DataType::B32Float));
    }

    #[test]
    fn test_build_record_truncates_fractional_address() {
        let data = [0x01, 0x02, 0x03];
        let chunk = chunks(&data, [1, 1, 1], 2).nth(1).unwrap();
        let record = build_record(DataType::B8Uint, "-", &chunk, 100);
        assert_eq!(record.address, Some(100));
        assert_eq!(record.raw.as_deref(), Some("02"));
    }

    #[test]
    fn test_absolute_address_saturates() {
        assert_eq!(absolute_address(u32::MAX - 1, 5), u32::MAX);
        assert_eq!(absolute_address(40001, 4), 40005);
    }

    #[test]
    fn test_record_serializes() {
        let record = build_bit_record(
            DataType::Bit1Boolean,
            "pump",
            BitChunk {
                value: false,
                address: 0,
            },
            1,
        );
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"data_type":"BIT1_BOOLEAN","address":1,"raw":"0","value":false,"note":"pump"}"#
        );
    }
}
