//! Example: Decoding register reads into tables
//!
//! Run with: cargo run --example decode_table
//!
//! Set `RUST_LOG=debug` to see the decoder's log lines.
//!
//! This example demonstrates:
//! - Loading named templates from a YAML file
//! - Reading holding registers with and without a template
//! - Reading coils with a bit template
//! - Handling exception responses
//! - Exporting records as JSON

use modbus_regcodec::pipeline::{read_records, read_table, MemorySource};
use modbus_regcodec::{table, CodecError, ReadFunction, ReadRequest, TemplateSet};

fn main() -> modbus_regcodec::Result<()> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let templates = TemplateSet::from_path(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/demos/templates.yml"
    ))?;
    println!("Templates: {:?}\n", templates.names().collect::<Vec<_>>());

    // In-memory device: coils at 1, discrete inputs at 10001,
    // input registers at 30001, holding registers at 40001
    let mut device = MemorySource::sample()
        .with_coils(1, vec![true, false, true, true, false, false, false, false]);

    // =========================================================================
    // Holding registers with a template
    // =========================================================================

    let request = ReadRequest::new(ReadFunction::ReadHoldingRegisters, 40001, 20)?;
    println!("=== {} with template 'unit_status' ===\n", request.function);
    let template = templates.get("unit_status")?;
    println!("{}\n", read_table(&mut device, &request, Some(template))?);

    // =========================================================================
    // Holding registers without a template
    // =========================================================================

    let request = ReadRequest::new(ReadFunction::ReadHoldingRegisters, 40005, 6)?;
    println!("=== {} without template ===\n", request.function);
    println!("{}\n", read_table(&mut device, &request, None)?);

    // =========================================================================
    // Coils with a bit template
    // =========================================================================

    let request = ReadRequest::new(ReadFunction::ReadCoils, 1, 4)?;
    println!("=== {} with template 'alarms' ===\n", request.function);
    let template = templates.get("alarms")?;
    println!("{}\n", read_table(&mut device, &request, Some(template))?);

    // =========================================================================
    // Exception responses
    // =========================================================================

    let request = ReadRequest::new(ReadFunction::ReadInputRegisters, 30019, 10)?;
    println!("=== {} past the end of the table ===\n", request.function);
    match read_table(&mut device, &request, None) {
        Ok(text) => println!("{}\n", text),
        Err(CodecError::Exception { code }) => println!("** Error: exception 0x{:02X}\n", code),
        Err(e) => return Err(e),
    }

    // =========================================================================
    // JSON export
    // =========================================================================

    let request = ReadRequest::new(ReadFunction::ReadInputRegisters, 30011, 4)?;
    println!("=== {} as JSON ===\n", request.function);
    let records = read_records(&mut device, &request, Some(&templates.get("unit_status")?[5..7]))?;
    println!("{}", table::to_json(&records)?);

    Ok(())
}
