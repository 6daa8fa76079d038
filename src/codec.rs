//! Decoding whole register blocks.
//!
//! [`decode`] and [`decode_with`] run the full codec over one response
//! buffer: resolve the template, chunk the buffer, build one [`Record`] per
//! template entry.
//!
//! # Guarantees
//!
//! - One record per template entry, whatever the buffer length
//! - Short or malformed entries become placeholder rows; they never abort
//!   the batch
//! - Only structural problems (unknown type names, non-bit types in a bit
//!   block, a zero register size) are returned as errors
//!
//! # Example
//!
//! ```
//! use modbus_regcodec::{decode, DataType, TemplateEntry};
//!
//! let data = hex::decode("fefefc19").unwrap();
//! let template = [
//!     TemplateEntry::of(DataType::B16Uint, "status"),
//!     TemplateEntry::of(DataType::B16Int, "setpoint"),
//!     TemplateEntry::of(DataType::B32Float, "flow"),
//! ];
//!
//! let records = decode(&data, Some(&template), 40001, 0)?;
//! assert_eq!(records.len(), 3);
//! assert_eq!(records[1].fields()[3], "-999");
//! assert!(records[2].is_placeholder());
//! # Ok::<(), modbus_regcodec::CodecError>(())
//! ```

use log::debug;

use crate::chunk::{bit_chunks, chunks, REGISTER_SIZE};
use crate::data_type::{DataType, TypeKind};
use crate::error::{CodecError, Result};
use crate::record::{build_bit_record, build_record, Record};
use crate::template::{repeat_entry, resolve_all, TemplateEntry};

/// Layout of the block being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockKind {
    /// 16-bit registers (holding or input registers).
    #[default]
    Registers,
    /// Packed single bits (coils or discrete inputs).
    Bits,
}

impl BlockKind {
    /// Returns the type of every slot in a synthesized template.
    pub fn default_type(self) -> DataType {
        match self {
            BlockKind::Registers => DataType::B16Uint,
            BlockKind::Bits => DataType::Bit1Boolean,
        }
    }
}

/// Options for one decode call.
///
/// # Example
///
/// ```
/// use modbus_regcodec::{BlockKind, DecodeOptions};
///
/// let options = DecodeOptions::new(BlockKind::Bits)
///     .with_start_register(10001)
///     .with_default_count(16);
///
/// assert_eq!(options.start_register, 10001);
/// assert_eq!(options.register_size, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Register or bit layout.
    pub block: BlockKind,
    /// Address of the first register (or bit) in the buffer.
    pub start_register: u32,
    /// Size of the synthesized template: bytes for register blocks,
    /// bits for bit blocks. Ignored when a template is supplied.
    pub default_count: usize,
    /// Bytes per register unit used for address arithmetic.
    pub register_size: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new(BlockKind::Registers)
    }
}

impl DecodeOptions {
    /// Creates options for a block starting at address 0.
    pub fn new(block: BlockKind) -> Self {
        Self {
            block,
            start_register: 0,
            default_count: 0,
            register_size: REGISTER_SIZE,
        }
    }

    /// Sets the address of the first register.
    pub fn with_start_register(mut self, start_register: u32) -> Self {
        self.start_register = start_register;
        self
    }

    /// Sets the size of the synthesized template.
    pub fn with_default_count(mut self, default_count: usize) -> Self {
        self.default_count = default_count;
        self
    }

    /// Sets a custom register size (default is 2 bytes).
    pub fn with_register_size(mut self, register_size: usize) -> Self {
        self.register_size = register_size;
        self
    }
}

/// Builds the template used when none is supplied.
///
/// Register blocks get `default_count / 2` slots of `B16_UINT`; bit blocks
/// get `default_count` slots of `BIT1_BOOLEAN`. Every note is `-`.
///
/// # Example
///
/// ```
/// use modbus_regcodec::{default_template, BlockKind};
///
/// assert_eq!(default_template(BlockKind::Registers, 4).len(), 2);
/// assert_eq!(default_template(BlockKind::Bits, 4).len(), 4);
/// ```
pub fn default_template(block: BlockKind, default_count: usize) -> Vec<TemplateEntry> {
    let data_type = block.default_type();
    let slots = match block {
        BlockKind::Registers => default_count / data_type.byte_length(),
        BlockKind::Bits => default_count,
    };
    repeat_entry(data_type, slots)
}

/// Decodes a register block.
///
/// Shorthand for [`decode_with`] on a [`BlockKind::Registers`] block.
///
/// # Arguments
///
/// * `buffer` - Register bytes, big-endian, without the leading byte count
/// * `template` - Entries to decode; `None` (or an empty slice) synthesizes
///   one from `default_count`
/// * `start_register` - Address of the first register in `buffer`
/// * `default_count` - Byte count covered by the synthesized template
///
/// # Errors
///
/// Returns `CodecError::UnknownType` if an entry names an unknown type.
pub fn decode(
    buffer: &[u8],
    template: Option<&[TemplateEntry]>,
    start_register: u32,
    default_count: usize,
) -> Result<Vec<Record>> {
    let options = DecodeOptions::new(BlockKind::Registers)
        .with_start_register(start_register)
        .with_default_count(default_count);
    decode_with(buffer, template, &options)
}

/// Decodes a register or bit block according to `options`.
///
/// # Errors
///
/// - `CodecError::UnknownType` if an entry names an unknown type
/// - `CodecError::InvalidTemplate` if a bit block template contains a type
///   other than `BIT1_BOOLEAN`
/// - `CodecError::InvalidParameter` if `register_size` is 0
///
/// # Example
///
/// ```
/// use modbus_regcodec::{decode_with, BlockKind, DecodeOptions};
///
/// let options = DecodeOptions::new(BlockKind::Bits)
///     .with_start_register(1)
///     .with_default_count(4);
/// let records = decode_with(&[0b0000_0101], None, &options)?;
///
/// let values: Vec<String> = records.iter().map(|r| r.fields()[3].clone()).collect();
/// assert_eq!(values, ["true", "false", "true", "false"]);
/// assert_eq!(records[3].address, Some(4));
/// # Ok::<(), modbus_regcodec::CodecError>(())
/// ```
pub fn decode_with(
    buffer: &[u8],
    template: Option<&[TemplateEntry]>,
    options: &DecodeOptions,
) -> Result<Vec<Record>> {
    if options.register_size == 0 {
        return Err(CodecError::invalid_parameter(
            "register_size",
            "must be greater than 0",
        ));
    }

    let synthesized;
    let entries = match template {
        Some(entries) if !entries.is_empty() => entries,
        _ => {
            synthesized = default_template(options.block, options.default_count);
            synthesized.as_slice()
        }
    };
    let types = resolve_all(entries)?;

    debug!(
        "Decoding {} bytes as {:?} block with {} entries from address {}",
        buffer.len(),
        options.block,
        entries.len(),
        options.start_register
    );

    let records: Vec<Record> = match options.block {
        BlockKind::Registers => {
            let widths = types.iter().map(|dt| dt.byte_length());
            chunks(buffer, widths, options.register_size)
                .zip(types.iter().zip(entries))
                .map(|(chunk, (&data_type, entry))| {
                    build_record(data_type, &entry.note, &chunk, options.start_register)
                })
                .collect()
        }
        BlockKind::Bits => {
            if let Some(data_type) = types.iter().find(|dt| dt.kind() != TypeKind::Bool1) {
                return Err(CodecError::invalid_template(format!(
                    "{} cannot be read from a bit block",
                    data_type
                )));
            }
            bit_chunks(buffer, types.len())
                .zip(types.iter().zip(entries))
                .map(|(bit, (&data_type, entry))| {
                    build_bit_record(data_type, &entry.note, bit, options.start_register)
                })
                .collect()
        }
    };

    let placeholders = records.iter().filter(|r| r.is_placeholder()).count();
    if placeholders > 0 {
        debug!(
            "{} of {} entries had no data in a {} byte response",
            placeholders,
            records.len(),
            buffer.len()
        );
    }

    Ok(records)
}
