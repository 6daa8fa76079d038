//! Read response unwrapping.
//!
//! The data part of a Modbus read response is a one-byte byte count followed
//! by the payload:
//!
//! | Component | Size | Description |
//! |-----------|------|-------------|
//! | Byte count | 1 byte | Number of payload bytes that follow |
//! | Payload | Variable | Packed bits or big-endian registers |
//!
//! A device that rejects a request answers with a single exception code
//! instead, which [`ReadResponse::from_bytes`] turns into
//! `CodecError::Exception`.
//!
//! # Example
//!
//! ```
//! use modbus_regcodec::{CodecError, ReadResponse};
//!
//! let response = ReadResponse::from_bytes(&[0x04, 0xfe, 0xfe, 0xfc, 0x19])?;
//! assert_eq!(response.payload(), &[0xfe, 0xfe, 0xfc, 0x19]);
//! assert_eq!(response.to_registers()?, vec![0xfefe, 0xfc19]);
//!
//! let err = ReadResponse::from_bytes(&[0x02]).unwrap_err();
//! assert!(matches!(err, CodecError::Exception { code: 2 }));
//! # Ok::<(), modbus_regcodec::CodecError>(())
//! ```

use log::warn;

use crate::error::{CodecError, Result};

/// A successful read response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResponse {
    /// Byte count declared by the device.
    pub byte_count: u8,
    /// Payload bytes actually received.
    pub data: Vec<u8>,
}

impl ReadResponse {
    /// Parses the data part of a read response.
    ///
    /// When the declared byte count disagrees with the bytes received, a
    /// warning is logged and the received bytes are kept as the payload.
    ///
    /// # Errors
    ///
    /// - `CodecError::InvalidResponse` if `data` is empty
    /// - `CodecError::Exception` if `data` is a single exception code
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        match data {
            [] => Err(CodecError::invalid_response("empty response")),
            [code] => Err(CodecError::Exception { code: *code }),
            [byte_count, payload @ ..] => {
                if usize::from(*byte_count) != payload.len() {
                    warn!(
                        "Response declares {} bytes but carries {}",
                        byte_count,
                        payload.len()
                    );
                }
                Ok(Self {
                    byte_count: *byte_count,
                    data: payload.to_vec(),
                })
            }
        }
    }

    /// Returns the payload, without the byte count.
    pub fn payload(&self) -> &[u8] {
        &self.data
    }

    /// Returns whether the declared byte count matches the payload length.
    pub fn is_complete(&self) -> bool {
        usize::from(self.byte_count) == self.data.len()
    }

    /// Converts the payload to registers (big-endian u16 values).
    ///
    /// # Errors
    ///
    /// Returns an error if the payload length is odd.
    pub fn to_registers(&self) -> Result<Vec<u16>> {
        if self.data.len() % 2 != 0 {
            return Err(CodecError::invalid_response(
                "payload length must be even for register conversion",
            ));
        }

        Ok(self
            .data
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect())
    }

    /// Returns the first `count` bits of the payload, LSB first.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_regcodec::ReadResponse;
    ///
    /// let response = ReadResponse::from_bytes(&[0x01, 0b0000_0101])?;
    /// assert_eq!(response.to_bits(3), vec![true, false, true]);
    /// # Ok::<(), modbus_regcodec::CodecError>(())
    /// ```
    pub fn to_bits(&self, count: usize) -> Vec<bool> {
        (0..count)
            .map(|i| crate::utils::bit_at(&self.data, i))
            .collect()
    }
}
