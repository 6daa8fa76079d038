//! Fetch, decode and render in one call.
//!
//! The codec itself never touches a device. Reading one is split into
//! stages:
//!
//! 1. **Fetch**: a [`RegisterSource`] answers a [`ReadRequest`] with the raw
//!    data part of a read response (byte count + payload, or one exception
//!    code).
//! 2. **Unwrap**: [`ReadResponse`] strips the byte count or turns the
//!    exception into an error.
//! 3. **Decode**: the payload goes through [`decode_with`] with a template
//!    or a default template sized from the request.
//! 4. **Render**: records become a text table (see [`table`](crate::table)).
//!
//! Transports (TCP, RTU, ...) implement [`RegisterSource`] outside this
//! crate. [`MemorySource`] is an in-memory device for tests and demos.
//!
//! # Example
//!
//! ```
//! use modbus_regcodec::pipeline::{read_records, MemorySource};
//! use modbus_regcodec::{ReadFunction, ReadRequest, Value};
//!
//! let mut device = MemorySource::sample();
//! let request = ReadRequest::new(ReadFunction::ReadInputRegisters, 30005, 2)?;
//!
//! let records = read_records(&mut device, &request, None)?;
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].address, Some(30006));
//! assert_eq!(records[1].value, Some(Value::UInt(0xfc19)));
//! # Ok::<(), modbus_regcodec::CodecError>(())
//! ```

use log::debug;

use crate::chunk::REGISTER_SIZE;
use crate::codec::{decode_with, BlockKind, DecodeOptions};
use crate::error::Result;
use crate::function::{ReadFunction, ReadRequest};
use crate::record::Record;
use crate::response::ReadResponse;
use crate::table;
use crate::template::TemplateEntry;
use crate::utils::pack_bits;

/// Exception code for reads outside the device's tables.
pub const ILLEGAL_DATA_ADDRESS: u8 = 0x02;

/// Exception code for reads whose answer would not fit a response.
pub const ILLEGAL_DATA_VALUE: u8 = 0x03;

/// Something that can answer Modbus read requests.
pub trait RegisterSource {
    /// Performs one read and returns the data part of the response.
    ///
    /// A successful answer is the byte count followed by the payload; a
    /// rejected request is the single exception code.
    ///
    /// # Errors
    ///
    /// Transport failures are returned as errors.
    fn read(&mut self, request: &ReadRequest) -> Result<Vec<u8>>;
}

impl<S: RegisterSource + ?Sized> RegisterSource for &mut S {
    fn read(&mut self, request: &ReadRequest) -> Result<Vec<u8>> {
        (**self).read(request)
    }
}

/// Sends a request and unwraps the response.
///
/// # Errors
///
/// - Any transport error from the source
/// - `CodecError::Exception` if the device rejected the request
/// - `CodecError::InvalidResponse` if the response is empty
pub fn fetch<S>(source: &mut S, request: &ReadRequest) -> Result<ReadResponse>
where
    S: RegisterSource + ?Sized,
{
    debug!(
        "{}: {} items from address {}",
        request.function, request.count, request.address
    );
    let raw = source.read(request)?;
    ReadResponse::from_bytes(&raw)
}

/// Returns the decode options matching a request.
///
/// The default template covers every requested item: `count` bits for bit
/// reads, `count` registers for register reads.
pub fn options_for(request: &ReadRequest) -> DecodeOptions {
    let block = request.function.block_kind();
    let count = usize::from(request.count);
    let default_count = match block {
        BlockKind::Bits => count,
        BlockKind::Registers => count * REGISTER_SIZE,
    };
    DecodeOptions::new(block)
        .with_start_register(u32::from(request.address))
        .with_default_count(default_count)
}

/// Decodes a response payload for the request that produced it.
///
/// # Errors
///
/// Structural template errors, as for [`decode_with`].
pub fn decode_payload(
    payload: &[u8],
    template: Option<&[TemplateEntry]>,
    request: &ReadRequest,
) -> Result<Vec<Record>> {
    decode_with(payload, template, &options_for(request))
}

/// Fetches and decodes one read.
///
/// # Errors
///
/// Any error from [`fetch`] or [`decode_payload`].
pub fn read_records<S>(
    source: &mut S,
    request: &ReadRequest,
    template: Option<&[TemplateEntry]>,
) -> Result<Vec<Record>>
where
    S: RegisterSource + ?Sized,
{
    let response = fetch(source, request)?;
    decode_payload(response.payload(), template, request)
}

/// Fetches, decodes and renders one read as a text table.
///
/// # Errors
///
/// Any error from [`read_records`].
pub fn read_table<S>(
    source: &mut S,
    request: &ReadRequest,
    template: Option<&[TemplateEntry]>,
) -> Result<String>
where
    S: RegisterSource + ?Sized,
{
    let records = read_records(source, request, template)?;
    Ok(table::render(&records))
}

/// Register contents of [`MemorySource::sample`].
///
/// Laid out for a template of one 8-character label, a `B16_UINT`, a
/// `B16_INT`, a `B32_UINT`, a `B32_INT`, four `B32_FLOAT`s and four
/// single-byte values.
pub const SAMPLE_REGISTERS: [u16; 20] = [
    0x556e, 0x6974, 0x3233, 0x2d41, // "Unit23-A"
    0xffff, // 65535
    0xfc19, // -999
    0xffff, 0xfffa, // 4294967290
    0x8000, 0x0000, // -2147483648
    0x437e, 0xe2c6, // 254.88583
    0x420a, 0xc326, // 34.69057
    0x427d, 0x7aeb, // 63.37004
    0x4107, 0x0e38, // 8.440971
    0xffff, 0x0007,
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Table<T> {
    start: u16,
    values: Vec<T>,
}

impl<T> Table<T> {
    fn new(start: u16, values: Vec<T>) -> Self {
        Self { start, values }
    }

    fn range(&self, address: u16, count: u16) -> Option<&[T]> {
        let offset = usize::from(address.checked_sub(self.start)?);
        let end = offset.checked_add(usize::from(count))?;
        self.values.get(offset..end)
    }
}

/// An in-memory Modbus device.
///
/// Each of the four tables is a contiguous block starting at its own
/// address. Reads that fall outside a block are answered with exception
/// [`ILLEGAL_DATA_ADDRESS`].
///
/// # Example
///
/// ```
/// use modbus_regcodec::pipeline::{fetch, MemorySource};
/// use modbus_regcodec::{CodecError, ReadFunction, ReadRequest};
///
/// let mut device = MemorySource::new().with_holding_registers(40001, vec![0x1234]);
///
/// let ok = ReadRequest::new(ReadFunction::ReadHoldingRegisters, 40001, 1)?;
/// assert_eq!(fetch(&mut device, &ok)?.to_registers()?, vec![0x1234]);
///
/// let past_end = ReadRequest::new(ReadFunction::ReadHoldingRegisters, 40002, 1)?;
/// assert!(matches!(
///     fetch(&mut device, &past_end),
///     Err(CodecError::Exception { code: 0x02 })
/// ));
/// # Ok::<(), modbus_regcodec::CodecError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySource {
    coils: Table<bool>,
    discrete_inputs: Table<bool>,
    input_registers: Table<u16>,
    holding_registers: Table<u16>,
}

impl MemorySource {
    /// Creates a device with empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the sample device: 256 cleared coils at 1, 256 cleared
    /// discrete inputs at 10001, and [`SAMPLE_REGISTERS`] as both input
    /// registers (30001) and holding registers (40001).
    pub fn sample() -> Self {
        Self::new()
            .with_coils(1, vec![false; 256])
            .with_discrete_inputs(10001, vec![false; 256])
            .with_input_registers(30001, SAMPLE_REGISTERS.to_vec())
            .with_holding_registers(40001, SAMPLE_REGISTERS.to_vec())
    }

    /// Replaces the coil table.
    pub fn with_coils(mut self, start: u16, values: Vec<bool>) -> Self {
        self.coils = Table::new(start, values);
        self
    }

    /// Replaces the discrete-input table.
    pub fn with_discrete_inputs(mut self, start: u16, values: Vec<bool>) -> Self {
        self.discrete_inputs = Table::new(start, values);
        self
    }

    /// Replaces the input-register table.
    pub fn with_input_registers(mut self, start: u16, values: Vec<u16>) -> Self {
        self.input_registers = Table::new(start, values);
        self
    }

    /// Replaces the holding-register table.
    pub fn with_holding_registers(mut self, start: u16, values: Vec<u16>) -> Self {
        self.holding_registers = Table::new(start, values);
        self
    }

    fn payload(&self, request: &ReadRequest) -> Option<Vec<u8>> {
        let (address, count) = (request.address, request.count);
        match request.function {
            ReadFunction::ReadCoils => self.coils.range(address, count).map(pack_bits),
            ReadFunction::ReadDiscreteInputs => {
                self.discrete_inputs.range(address, count).map(pack_bits)
            }
            ReadFunction::ReadHoldingRegisters => self
                .holding_registers
                .range(address, count)
                .map(register_bytes),
            ReadFunction::ReadInputRegisters => self
                .input_registers
                .range(address, count)
                .map(register_bytes),
        }
    }
}

fn register_bytes(registers: &[u16]) -> Vec<u8> {
    registers.iter().flat_map(|r| r.to_be_bytes()).collect()
}

impl RegisterSource for MemorySource {
    fn read(&mut self, request: &ReadRequest) -> Result<Vec<u8>> {
        let Some(payload) = self.payload(request) else {
            debug!(
                "{} at {} (count {}) is outside the table",
                request.function, request.address, request.count
            );
            return Ok(vec![ILLEGAL_DATA_ADDRESS]);
        };
        let Ok(byte_count) = u8::try_from(payload.len()) else {
            return Ok(vec![ILLEGAL_DATA_VALUE]);
        };

        let mut response = Vec::with_capacity(payload.len() + 1);
        response.push(byte_count);
        response.extend(payload);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;
    use crate::error::CodecError;
    use crate::record::Value;

    fn holding(address: u16, count: u16) -> ReadRequest {
        ReadRequest::new(ReadFunction::ReadHoldingRegisters, address, count).unwrap()
    }

    fn unit_template() -> Vec<TemplateEntry> {
        vec![
            TemplateEntry::of(DataType::B64String, "text label"),
            TemplateEntry::of(DataType::B16Uint, "16 bit unsigned integer"),
            TemplateEntry::of(DataType::B16Int, "16 bit integer"),
            TemplateEntry::of(DataType::B32Uint, "32 bit unsigned integer"),
            TemplateEntry::of(DataType::B32Int, "32 bit integer"),
            TemplateEntry::of(DataType::B32Float, "32 bit float"),
            TemplateEntry::of(DataType::B32Float, "32 bit float"),
            TemplateEntry::of(DataType::B32Float, "32 bit float"),
            TemplateEntry::of(DataType::B32Float, "32 bit float"),
            TemplateEntry::of(DataType::B8Uint, "8 bit unsigned integer"),
            TemplateEntry::of(DataType::B8Int, "8 bit integer"),
            TemplateEntry::of(DataType::B8Uint, "high byte"),
            TemplateEntry::of(DataType::Bit8, "8 bits"),
        ]
    }

    #[test]
    fn test_sample_holding_registers_with_template() {
        let mut device = MemorySource::sample();
        let records = read_records(&mut device, &holding(40001, 20), Some(&unit_template())).unwrap();

        let values: Vec<(Option<u32>, String)> = records
            .iter()
            .map(|r| (r.address, r.fields()[3].clone()))
            .collect();
        assert_eq!(
            values,
            vec![
                (Some(40001), "Unit23-A".to_string()),
                (Some(40005), "65535".to_string()),
                (Some(40006), "-999".to_string()),
                (Some(40007), "4294967290".to_string()),
                (Some(40009), "-2147483648".to_string()),
                (Some(40011), "254.88583374023438".to_string()),
                (Some(40013), "34.690574645996094".to_string()),
                (Some(40015), "63.37003707885742".to_string()),
                (Some(40017), "8.440971374511719".to_string()),
                (Some(40019), "255".to_string()),
                (Some(40019), "-1".to_string()),
                (Some(40020), "0".to_string()),
                (Some(40020), "0000111".to_string()),
            ]
        );
    }

    #[test]
    fn test_default_template_covers_every_register() {
        let mut device = MemorySource::sample();
        let records = read_records(&mut device, &holding(40001, 2), None).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].value, Some(Value::UInt(0x556e)));
        assert_eq!(records[1].value, Some(Value::UInt(0x6974)));
        assert_eq!(records[1].address, Some(40002));
    }

    #[test]
    fn test_input_registers_mirror_holding() {
        let mut device = MemorySource::sample();
        let request = ReadRequest::new(ReadFunction::ReadInputRegisters, 30011, 2).unwrap();
        let template = [TemplateEntry::of(DataType::B32Float, "flow")];
        let records = read_records(&mut device, &request, Some(&template)).unwrap();
        assert_eq!(records[0].address, Some(30011));
        assert_eq!(records[0].raw.as_deref(), Some("437e e2c6"));
    }

    #[test]
    fn test_coils() {
        let mut device = MemorySource::new().with_coils(1, vec![true, false, true, true]);
        let request = ReadRequest::new(ReadFunction::ReadCoils, 1, 4).unwrap();
        let records = read_records(&mut device, &request, None).unwrap();

        let bits: Vec<(Option<u32>, Option<Value>)> =
            records.into_iter().map(|r| (r.address, r.value)).collect();
        assert_eq!(
            bits,
            vec![
                (Some(1), Some(Value::Bool(true))),
                (Some(2), Some(Value::Bool(false))),
                (Some(3), Some(Value::Bool(true))),
                (Some(4), Some(Value::Bool(true))),
            ]
        );
    }

    #[test]
    fn test_discrete_inputs_default_request() {
        let mut device = MemorySource::sample();
        let request = ReadRequest::with_defaults(ReadFunction::ReadDiscreteInputs);
        let records = read_records(&mut device, &request, None).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].address, Some(10001));
        assert_eq!(records[0].value, Some(Value::Bool(false)));
    }

    #[test]
    fn test_out_of_range_is_exception() {
        let mut device = MemorySource::sample();
        for request in [holding(40020, 2), holding(40000, 1), holding(1, 1)] {
            match read_records(&mut device, &request, None) {
                Err(CodecError::Exception { code }) => assert_eq!(code, ILLEGAL_DATA_ADDRESS),
                other => panic!("Expected exception, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_oversized_request_is_exception() {
        let mut device = MemorySource::new().with_holding_registers(0, vec![0; 200]);
        // fields are public, so limits can be bypassed
        let request = ReadRequest {
            function: ReadFunction::ReadHoldingRegisters,
            address: 0,
            count: 200,
        };
        assert!(matches!(
            fetch(&mut device, &request),
            Err(CodecError::Exception { code: ILLEGAL_DATA_VALUE })
        ));
    }

    #[test]
    fn test_short_payload_yields_placeholders() {
        struct Truncating;
        impl RegisterSource for Truncating {
            fn read(&mut self, _request: &ReadRequest) -> Result<Vec<u8>> {
                Ok(vec![0x04, 0x00, 0x07])
            }
        }

        let records = read_records(&mut Truncating, &holding(40001, 2), None).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].value, Some(Value::UInt(7)));
        assert!(records[1].is_placeholder());
    }

    #[test]
    fn test_transport_error_propagates() {
        struct Offline;
        impl RegisterSource for Offline {
            fn read(&mut self, _request: &ReadRequest) -> Result<Vec<u8>> {
                Err(std::io::Error::new(std::io::ErrorKind::TimedOut, "no answer").into())
            }
        }

        let err = read_table(&mut Offline, &holding(40001, 1), None).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
    }

    #[test]
    fn test_read_table() {
        let mut device = MemorySource::sample();
        let request = holding(40005, 2);
        let text = read_table(&mut device, &request, None).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "no  data type  address  data  value  note");
        assert_eq!(lines[2], " 0  B16_UINT     40005  ffff  65535  -");
        assert_eq!(lines[3], " 1  B16_UINT     40006  fc19  64537  -");
    }

    #[test]
    fn test_source_through_mut_reference() {
        let mut device = MemorySource::sample();
        let mut borrowed = &mut device;
        let response = fetch(&mut borrowed, &holding(40001, 1)).unwrap();
        assert_eq!(response.payload(), &[0x55, 0x6e]);
    }

    #[test]
    fn test_options_for_request() {
        let options = options_for(&holding(40001, 20));
        assert_eq!(options.block, BlockKind::Registers);
        assert_eq!(options.default_count, 40);
        assert_eq!(options.start_register, 40001);

        let coils = ReadRequest::new(ReadFunction::ReadCoils, 1, 10).unwrap();
        assert_eq!(options_for(&coils).default_count, 10);
    }
}
