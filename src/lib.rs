//! # Modbus Register Codec
//!
//! A Rust library for turning the raw bytes of a Modbus read response into
//! typed, labelled rows.
//!
//! This is a **codec-only** library. It does not open sockets or poll
//! devices: callers hand it the bytes a device returned and a template
//! describing what those bytes mean, and get back one record per template
//! entry.
//!
//! ## Features
//!
//! - **Typed templates**: 17 named data types (integers, floats, strings,
//!   bit fields) laid out back to back over the register block
//! - **Total output**: one record per template entry, always; short or
//!   malformed entries become placeholder rows instead of errors
//! - **Register addressing**: every record carries the absolute register it
//!   starts at, including entries that begin mid-register
//! - **Coils and discrete inputs**: packed bit blocks decode the same way
//! - **Templates as data**: load named templates from YAML or JSON files
//! - **Write side**: [`PayloadBuilder`] encodes values into registers
//!
//! ## Quick Start
//!
//! ```
//! use modbus_regcodec::{decode, TemplateEntry};
//!
//! // Registers 40001.. as returned by a holding-register read
//! let data = hex::decode("556e697432332d41fefefc19437ee2c6").unwrap();
//!
//! let template = [
//!     TemplateEntry::new("B64_STRING", "unit name"),
//!     TemplateEntry::new("B16_UINT", "status"),
//!     TemplateEntry::new("B16_INT", "setpoint"),
//!     TemplateEntry::new("B32_FLOAT", "flow"),
//! ];
//!
//! let records = decode(&data, Some(&template), 40001, 0)?;
//! for record in &records {
//!     println!("{:?}", record.fields());
//! }
//!
//! assert_eq!(records[2].fields()[1], "40006");
//! assert_eq!(records[2].fields()[3], "-999");
//! assert_eq!(records[3].fields()[3], "254.88583374023438");
//! # Ok::<(), modbus_regcodec::CodecError>(())
//! ```
//!
//! ## Data Types
//!
//! | Name | Bytes | Value |
//! |------|:-----:|-------|
//! | `BIT1_BOOLEAN` | 1 | `true` / `false` |
//! | `BIT8` | 1 | binary digits, at least 7 wide |
//! | `B8_UINT`, `B8_INT` | 1 | integer |
//! | `B16_UINT`, `B16_INT`, `B16_FLOAT` | 2 | integer / float |
//! | `B32_UINT`, `B32_INT`, `B32_FLOAT` | 4 | integer / float |
//! | `B64_UINT`, `B64_INT`, `B64_FLOAT` | 8 | integer / float |
//! | `B8_STRING` .. `B64_STRING` | 1 .. 8 | UTF-8 text |
//!
//! All multi-byte values are big-endian.
//!
//! ## Default Template
//!
//! Without a template, a register block is shown as `default_count / 2`
//! `B16_UINT` registers and a bit block as `default_count` single bits:
//!
//! ```
//! use modbus_regcodec::decode;
//!
//! let records = decode(&[0xfe, 0xfe, 0xfc, 0x19], None, 40001, 4)?;
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].fields()[3], "64537");
//! # Ok::<(), modbus_regcodec::CodecError>(())
//! ```
//!
//! ## Reading Through a Source
//!
//! The [`pipeline`] module wires a [`RegisterSource`](pipeline::RegisterSource)
//! (the fetch stage, supplied by the caller) to the decoder and the
//! [`table`] renderer:
//!
//! ```
//! use modbus_regcodec::pipeline::{read_table, MemorySource};
//! use modbus_regcodec::{ReadFunction, ReadRequest};
//!
//! let mut device = MemorySource::sample();
//! let request = ReadRequest::with_defaults(ReadFunction::ReadHoldingRegisters);
//!
//! println!("{}", read_table(&mut device, &request, None)?);
//! # Ok::<(), modbus_regcodec::CodecError>(())
//! ```
//!
//! ## Error Handling
//!
//! Decoding only fails for structural problems. Everything per-entry ends up
//! in a placeholder row.
//!
//! ```
//! use modbus_regcodec::{decode, CodecError, TemplateEntry};
//!
//! let template = [TemplateEntry::new("B24_UINT", "-")];
//! match decode(&[0, 0, 0], Some(&template), 0, 0) {
//!     Err(CodecError::UnknownType { name }) => assert_eq!(name, "B24_UINT"),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```
//!
//! ## Logging
//!
//! The library logs through the [`log`](https://docs.rs/log) facade: one
//! `debug!` line per decode call and per placeholder row, and a `warn!` when
//! a response's byte count disagrees with its payload. Install any logger
//! (for example `env_logger`) to see them.

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod chunk;
mod codec;
mod data_type;
mod error;
mod function;
mod payload;
pub mod pipeline;
mod record;
mod response;
pub mod table;
pub mod template;
pub mod utils;

// Public re-exports
pub use codec::{decode, decode_with, default_template, BlockKind, DecodeOptions};
pub use data_type::{DataType, TypeKind};
pub use error::{exception_description, CodecError, Result};
pub use function::{ReadFunction, ReadRequest, MAX_BITS_PER_READ, MAX_REGISTERS_PER_READ};
pub use payload::{parse_bit_string, PayloadBuilder};
pub use record::{
    build_bit_record, build_record, decode_value, Record, Value, EMPTY_FIELD, PLACEHOLDER_NOTE,
};
pub use response::ReadResponse;
pub use template::{TemplateEntry, TemplateSet};
