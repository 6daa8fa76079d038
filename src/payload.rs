//! Register payload encoding for write requests.
//!
//! [`PayloadBuilder`] is the write-side counterpart of the decoder: values
//! are appended big-endian (byte and word order) and the result is split
//! into 16-bit registers ready for Write Single Register (0x06) or Write
//! Multiple Registers (0x10).
//!
//! # Example
//!
//! ```
//! use modbus_regcodec::PayloadBuilder;
//!
//! let registers = PayloadBuilder::new()
//!     .add_string("Unit23-A")
//!     .add_16bit_int(-999)
//!     .add_32bit_float(254.88583)
//!     .build();
//!
//! assert_eq!(
//!     registers,
//!     vec![0x556e, 0x6974, 0x3233, 0x2d41, 0xfc19, 0x437e, 0xe2c6]
//! );
//! ```

use crate::error::{CodecError, Result};
use crate::utils::{f32_to_f16, pack_bits};

/// Accumulates big-endian values into a register payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadBuilder {
    bytes: Vec<u8>,
}

impl PayloadBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the UTF-8 bytes of a string.
    pub fn add_string(&mut self, value: &str) -> &mut Self {
        self.bytes.extend_from_slice(value.as_bytes());
        self
    }

    /// Appends bits packed LSB first, 8 per byte.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_regcodec::PayloadBuilder;
    ///
    /// let bytes = PayloadBuilder::new()
    ///     .add_bits(&[false, true, true, true])
    ///     .to_bytes();
    /// assert_eq!(bytes, vec![0x0E, 0x00]);
    /// ```
    pub fn add_bits(&mut self, bits: &[bool]) -> &mut Self {
        self.bytes.extend(pack_bits(bits));
        self
    }

    /// Appends a bit string written most significant bit first.
    ///
    /// Spaces are ignored, so `"0000 0111"` is accepted.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::InvalidParameter` if the text contains anything
    /// other than `0`, `1` and spaces.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_regcodec::PayloadBuilder;
    ///
    /// let mut builder = PayloadBuilder::new();
    /// builder.add_bit_string("1110")?;
    /// assert_eq!(builder.build(), vec![0x0E00]);
    /// # Ok::<(), modbus_regcodec::CodecError>(())
    /// ```
    pub fn add_bit_string(&mut self, text: &str) -> Result<&mut Self> {
        let mut bits = parse_bit_string(text)?;
        bits.reverse();
        Ok(self.add_bits(&bits))
    }

    /// Appends an 8-bit signed integer.
    pub fn add_8bit_int(&mut self, value: i8) -> &mut Self {
        self.extend(value.to_be_bytes())
    }

    /// Appends an 8-bit unsigned integer.
    pub fn add_8bit_uint(&mut self, value: u8) -> &mut Self {
        self.extend(value.to_be_bytes())
    }

    /// Appends a 16-bit signed integer.
    pub fn add_16bit_int(&mut self, value: i16) -> &mut Self {
        self.extend(value.to_be_bytes())
    }

    /// Appends a 16-bit unsigned integer.
    pub fn add_16bit_uint(&mut self, value: u16) -> &mut Self {
        self.extend(value.to_be_bytes())
    }

    /// Appends a half-precision float, rounded to nearest even.
    pub fn add_16bit_float(&mut self, value: f32) -> &mut Self {
        self.extend(f32_to_f16(value).to_be_bytes())
    }

    /// Appends a 32-bit signed integer.
    pub fn add_32bit_int(&mut self, value: i32) -> &mut Self {
        self.extend(value.to_be_bytes())
    }

    /// Appends a 32-bit unsigned integer.
    pub fn add_32bit_uint(&mut self, value: u32) -> &mut Self {
        self.extend(value.to_be_bytes())
    }

    /// Appends a single-precision float.
    pub fn add_32bit_float(&mut self, value: f32) -> &mut Self {
        self.extend(value.to_be_bytes())
    }

    /// Appends a 64-bit signed integer.
    pub fn add_64bit_int(&mut self, value: i64) -> &mut Self {
        self.extend(value.to_be_bytes())
    }

    /// Appends a 64-bit unsigned integer.
    pub fn add_64bit_uint(&mut self, value: u64) -> &mut Self {
        self.extend(value.to_be_bytes())
    }

    /// Appends a double-precision float.
    pub fn add_64bit_float(&mut self, value: f64) -> &mut Self {
        self.extend(value.to_be_bytes())
    }

    fn extend<const N: usize>(&mut self, bytes: [u8; N]) -> &mut Self {
        self.bytes.extend_from_slice(&bytes);
        self
    }

    /// Returns the number of bytes appended so far.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns whether nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the payload bytes, zero-padded to a whole register.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.bytes.clone();
        if bytes.len() % 2 != 0 {
            bytes.push(0);
        }
        bytes
    }

    /// Returns the payload as registers.
    ///
    /// An odd trailing byte becomes the high byte of the last register.
    pub fn build(&self) -> Vec<u16> {
        self.to_bytes()
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect()
    }
}

/// Parses a string of `0`/`1` digits, ignoring spaces.
///
/// Bits are returned in text order.
///
/// # Errors
///
/// Returns `CodecError::InvalidParameter` on any other character.
///
/// # Example
///
/// ```
/// use modbus_regcodec::parse_bit_string;
///
/// assert_eq!(parse_bit_string("10 1")?, vec![true, false, true]);
/// assert!(parse_bit_string("102").is_err());
/// # Ok::<(), modbus_regcodec::CodecError>(())
/// ```
pub fn parse_bit_string(text: &str) -> Result<Vec<bool>> {
    text.chars()
        .filter(|&c| c != ' ')
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(CodecError::invalid_parameter(
                "bits",
                format!("'{}' is not 0 or 1", other),
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode;
    use crate::data_type::DataType;
    use crate::record::Value;
    use crate::template::TemplateEntry;

    #[test]
    fn test_integers_big_endian() {
        let registers = PayloadBuilder::new()
            .add_16bit_uint(0xfefe)
            .add_32bit_uint(4294967290)
            .add_32bit_int(i32::MIN)
            .build();
        assert_eq!(registers, vec![0xfefe, 0xffff, 0xfffa, 0x8000, 0x0000]);
    }

    #[test]
    fn test_8bit_values_share_a_register() {
        let registers = PayloadBuilder::new()
            .add_8bit_uint(0xff)
            .add_8bit_int(-1)
            .add_8bit_uint(0x07)
            .build();
        assert_eq!(registers, vec![0xffff, 0x0700]);
    }

    #[test]
    fn test_64bit_values() {
        let registers = PayloadBuilder::new().add_64bit_int(-2).build();
        assert_eq!(registers, vec![0xffff, 0xffff, 0xffff, 0xfffe]);

        let registers = PayloadBuilder::new().add_64bit_float(1.0).build();
        assert_eq!(registers, vec![0x3ff0, 0x0000, 0x0000, 0x0000]);

        let registers = PayloadBuilder::new().add_64bit_uint(1).build();
        assert_eq!(registers, vec![0, 0, 0, 1]);
    }

    #[test]
    fn test_16bit_float() {
        let registers = PayloadBuilder::new().add_16bit_float(-2.0).build();
        assert_eq!(registers, vec![0xc000]);
    }

    #[test]
    fn test_odd_string_padded() {
        let mut builder = PayloadBuilder::new();
        builder.add_string("abc");
        assert_eq!(builder.len(), 3);
        assert_eq!(builder.to_bytes(), b"abc\0".to_vec());
        assert_eq!(builder.build(), vec![0x6162, 0x6300]);
    }

    #[test]
    fn test_empty_builder() {
        let builder = PayloadBuilder::new();
        assert!(builder.is_empty());
        assert!(builder.build().is_empty());
    }

    #[test]
    fn test_add_bit_string() {
        let mut builder = PayloadBuilder::new();
        builder.add_bit_string("0000 0111").unwrap();
        builder.add_bit_string("1").unwrap();
        assert_eq!(builder.to_bytes(), vec![0x07, 0x01]);
    }

    #[test]
    fn test_add_bit_string_rejects_other_characters() {
        let mut builder = PayloadBuilder::new();
        let err = builder.add_bit_string("01|1").unwrap_err();
        assert!(matches!(err, CodecError::InvalidParameter { .. }));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_parse_bit_string() {
        assert!(parse_bit_string("").unwrap().is_empty());
        assert_eq!(parse_bit_string("  ").unwrap(), Vec::<bool>::new());
        assert_eq!(parse_bit_string("0 1").unwrap(), vec![false, true]);
    }

    #[test]
    fn test_payload_decodes_back() {
        let mut builder = PayloadBuilder::new();
        builder
            .add_string("Unit23-A")
            .add_16bit_uint(65535)
            .add_16bit_int(-999)
            .add_32bit_float(8.440971);
        let bytes = builder.to_bytes();

        let template = [
            TemplateEntry::of(DataType::B64String, "label"),
            TemplateEntry::of(DataType::B16Uint, "-"),
            TemplateEntry::of(DataType::B16Int, "-"),
            TemplateEntry::of(DataType::B32Float, "-"),
        ];
        let records = decode(&bytes, Some(&template), 40001, 0).unwrap();
        assert_eq!(records[0].value, Some(Value::Text("Unit23-A".to_string())));
        assert_eq!(records[1].value, Some(Value::UInt(65535)));
        assert_eq!(records[2].value, Some(Value::Int(-999)));
        assert_eq!(records[3].raw.as_deref(), Some("4107 0e38"));
    }
}
