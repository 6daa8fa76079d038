//! Modbus read functions and read requests.
//!
//! The four read functions differ in the table they address and in how the
//! answer is packed: coils and discrete inputs come back as packed bits,
//! input and holding registers as big-endian 16-bit words.
//!
//! | Function | Code | Default address | Default count | Block |
//! |----------|:----:|----------------:|--------------:|-------|
//! | Read Coils | 0x01 | 1 | 1 | bits |
//! | Read Discrete Inputs | 0x02 | 10001 | 1 | bits |
//! | Read Holding Registers | 0x03 | 40001 | 2 | registers |
//! | Read Input Registers | 0x04 | 30001 | 2 | registers |
//!
//! # Example
//!
//! ```
//! use modbus_regcodec::{BlockKind, ReadFunction, ReadRequest};
//!
//! let request = ReadRequest::new(ReadFunction::ReadHoldingRegisters, 40001, 20)?;
//! assert_eq!(request.function.block_kind(), BlockKind::Registers);
//! assert_eq!(request.to_pdu(), [0x03, 0x9C, 0x41, 0x00, 0x14]);
//! # Ok::<(), modbus_regcodec::CodecError>(())
//! ```

use crate::codec::BlockKind;
use crate::error::{CodecError, Result};

/// Maximum number of bits in one coil or discrete-input read.
pub const MAX_BITS_PER_READ: u16 = 2000;

/// Maximum number of registers in one register read.
pub const MAX_REGISTERS_PER_READ: u16 = 125;

/// The Modbus read functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadFunction {
    /// Read Coils (0x01).
    ReadCoils,
    /// Read Discrete Inputs (0x02).
    ReadDiscreteInputs,
    /// Read Holding Registers (0x03).
    ReadHoldingRegisters,
    /// Read Input Registers (0x04).
    ReadInputRegisters,
}

impl ReadFunction {
    /// All read functions in function-code order.
    pub const ALL: [ReadFunction; 4] = [
        ReadFunction::ReadCoils,
        ReadFunction::ReadDiscreteInputs,
        ReadFunction::ReadHoldingRegisters,
        ReadFunction::ReadInputRegisters,
    ];

    /// Returns the Modbus function code.
    pub fn code(self) -> u8 {
        match self {
            ReadFunction::ReadCoils => 0x01,
            ReadFunction::ReadDiscreteInputs => 0x02,
            ReadFunction::ReadHoldingRegisters => 0x03,
            ReadFunction::ReadInputRegisters => 0x04,
        }
    }

    /// Looks up a read function by its code.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::InvalidParameter` for codes other than 0x01-0x04.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_regcodec::ReadFunction;
    ///
    /// assert_eq!(ReadFunction::from_code(0x04)?, ReadFunction::ReadInputRegisters);
    /// assert!(ReadFunction::from_code(0x06).is_err());
    /// # Ok::<(), modbus_regcodec::CodecError>(())
    /// ```
    pub fn from_code(code: u8) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.code() == code)
            .ok_or_else(|| {
                CodecError::invalid_parameter(
                    "function_code",
                    format!("0x{:02X} is not a read function", code),
                )
            })
    }

    /// Returns the conventional first address of the table this function reads.
    pub fn default_address(self) -> u32 {
        match self {
            ReadFunction::ReadCoils => 1,
            ReadFunction::ReadDiscreteInputs => 10001,
            ReadFunction::ReadHoldingRegisters => 40001,
            ReadFunction::ReadInputRegisters => 30001,
        }
    }

    /// Returns the number of items read when the caller gives no count.
    pub fn default_count(self) -> u16 {
        match self {
            ReadFunction::ReadCoils | ReadFunction::ReadDiscreteInputs => 1,
            ReadFunction::ReadHoldingRegisters | ReadFunction::ReadInputRegisters => 2,
        }
    }

    /// Returns the layout of the answer.
    pub fn block_kind(self) -> BlockKind {
        match self {
            ReadFunction::ReadCoils | ReadFunction::ReadDiscreteInputs => BlockKind::Bits,
            ReadFunction::ReadHoldingRegisters | ReadFunction::ReadInputRegisters => {
                BlockKind::Registers
            }
        }
    }

    /// Returns the largest count a single request may ask for.
    pub fn max_count(self) -> u16 {
        match self.block_kind() {
            BlockKind::Bits => MAX_BITS_PER_READ,
            BlockKind::Registers => MAX_REGISTERS_PER_READ,
        }
    }
}

impl std::fmt::Display for ReadFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ReadFunction::ReadCoils => "Read Coils",
            ReadFunction::ReadDiscreteInputs => "Read Discrete Inputs",
            ReadFunction::ReadHoldingRegisters => "Read Holding Registers",
            ReadFunction::ReadInputRegisters => "Read Input Registers",
        };
        write!(f, "{} (0x{:02X})", name, self.code())
    }
}

/// One read request: function, first address and item count.
///
/// Addresses are sent as given; a device laid out with holding registers at
/// 40001 is read with address 40001.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRequest {
    /// Read function.
    pub function: ReadFunction,
    /// First address.
    pub address: u16,
    /// Number of bits or registers.
    pub count: u16,
}

impl ReadRequest {
    /// Creates a validated read request.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::InvalidParameter` if `count` is 0 or above the
    /// function's [`max_count`](ReadFunction::max_count).
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_regcodec::{ReadFunction, ReadRequest};
    ///
    /// assert!(ReadRequest::new(ReadFunction::ReadCoils, 1, 2000).is_ok());
    /// assert!(ReadRequest::new(ReadFunction::ReadInputRegisters, 30001, 126).is_err());
    /// ```
    pub fn new(function: ReadFunction, address: u16, count: u16) -> Result<Self> {
        if count == 0 || count > function.max_count() {
            return Err(CodecError::invalid_parameter(
                "count",
                format!("must be 1-{} for {}", function.max_count(), function),
            ));
        }
        Ok(Self {
            function,
            address,
            count,
        })
    }

    /// Creates a request using the function's default address and count.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_regcodec::{ReadFunction, ReadRequest};
    ///
    /// let request = ReadRequest::with_defaults(ReadFunction::ReadDiscreteInputs);
    /// assert_eq!((request.address, request.count), (10001, 1));
    /// ```
    pub fn with_defaults(function: ReadFunction) -> Self {
        Self {
            function,
            // every default address fits in a u16
            address: function.default_address() as u16,
            count: function.default_count(),
        }
    }

    /// Returns the number of payload bytes a complete answer carries.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_regcodec::{ReadFunction, ReadRequest};
    ///
    /// let coils = ReadRequest::new(ReadFunction::ReadCoils, 1, 10)?;
    /// assert_eq!(coils.expected_byte_count(), 2);
    ///
    /// let registers = ReadRequest::new(ReadFunction::ReadHoldingRegisters, 40001, 10)?;
    /// assert_eq!(registers.expected_byte_count(), 20);
    /// # Ok::<(), modbus_regcodec::CodecError>(())
    /// ```
    pub fn expected_byte_count(&self) -> usize {
        let count = usize::from(self.count);
        match self.function.block_kind() {
            BlockKind::Bits => count.div_ceil(8),
            BlockKind::Registers => count * crate::chunk::REGISTER_SIZE,
        }
    }

    /// Serializes the request PDU: function code, address and count,
    /// big-endian.
    pub fn to_pdu(&self) -> [u8; 5] {
        let [address_hi, address_lo] = self.address.to_be_bytes();
        let [count_hi, count_lo] = self.count.to_be_bytes();
        [
            self.function.code(),
            address_hi,
            address_lo,
            count_hi,
            count_lo,
        ]
    }
}
