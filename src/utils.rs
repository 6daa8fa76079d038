//! Utility functions for bit handling, hex formatting and half floats.
//!
//! These helpers back the chunker, the record builder and the payload
//! builder, and are public for callers who format register data themselves.
//!
//! # Example
//!
//! ```
//! use modbus_regcodec::utils::{bit_at, format_bits8, group_hex};
//!
//! // Coil 9 lives in bit 1 of the second byte
//! assert!(bit_at(&[0x07, 0x02], 9));
//!
//! assert_eq!(group_hex("556e697432332d41", 4), "556e 6974 3233 2d41");
//! assert_eq!(format_bits8(0x07), "0000111");
//! ```

/// Gets a single bit from a byte buffer read as one little-endian integer.
///
/// Bit 0 is the least significant bit of the first byte. Bits past the end
/// of the buffer read as `false`.
///
/// # Arguments
///
/// * `bytes` - The packed bit buffer (coil/discrete-input layout)
/// * `index` - Bit position, counted from the LSB of `bytes[0]`
///
/// # Example
///
/// ```
/// use modbus_regcodec::utils::bit_at;
///
/// let bytes = [0b0000_0101, 0b0000_0001];
/// assert!(bit_at(&bytes, 0));
/// assert!(!bit_at(&bytes, 1));
/// assert!(bit_at(&bytes, 8));
/// assert!(!bit_at(&bytes, 100));
/// ```
#[inline]
pub fn bit_at(bytes: &[u8], index: usize) -> bool {
    bytes
        .get(index / 8)
        .is_some_and(|byte| (byte >> (index % 8)) & 1 == 1)
}

/// Packs booleans into bytes, LSB first.
///
/// The last byte is zero-padded when `bits.len()` is not a multiple of 8.
///
/// # Example
///
/// ```
/// use modbus_regcodec::utils::pack_bits;
///
/// assert_eq!(pack_bits(&[false, true, true, true]), vec![0b0000_1110]);
/// assert!(pack_bits(&[]).is_empty());
/// ```
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &bit)| if bit { acc | (1 << i) } else { acc })
        })
        .collect()
}

/// Splits a hex string into space-separated groups.
///
/// # Arguments
///
/// * `hex` - Hex digits without separators
/// * `width` - Number of digits per group (4 = one register)
///
/// # Returns
///
/// The grouped string. A trailing short group is kept as is.
///
/// # Example
///
/// ```
/// use modbus_regcodec::utils::group_hex;
///
/// assert_eq!(group_hex("437ee2c6", 4), "437e e2c6");
/// assert_eq!(group_hex("fefefc", 4), "fefe fc");
/// assert_eq!(group_hex("", 4), "");
/// ```
pub fn group_hex(hex: &str, width: usize) -> String {
    if width == 0 {
        return hex.to_string();
    }
    hex.as_bytes()
        .chunks(width)
        .map(|group| String::from_utf8_lossy(group))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats a byte as a zero-padded binary string of at least 7 digits.
///
/// Values of 128 and above print all 8 digits.
///
/// # Example
///
/// ```
/// use modbus_regcodec::utils::format_bits8;
///
/// assert_eq!(format_bits8(0x00), "0000000");
/// assert_eq!(format_bits8(0x07), "0000111");
/// assert_eq!(format_bits8(0xFF), "11111111");
/// ```
pub fn format_bits8(value: u8) -> String {
    format!("{:07b}", value)
}

/// Converts IEEE-754 binary16 bits to an `f32`.
///
/// Every half-precision value is exactly representable as `f32`, so the
/// conversion is lossless. Subnormals, infinities and NaN are preserved.
///
/// # Example
///
/// ```
/// use modbus_regcodec::utils::f16_to_f32;
///
/// assert_eq!(f16_to_f32(0x3C00), 1.0);
/// assert_eq!(f16_to_f32(0xC000), -2.0);
/// assert_eq!(f16_to_f32(0x7BFF), 65504.0);
/// assert!(f16_to_f32(0x7E00).is_nan());
/// ```
pub fn f16_to_f32(bits: u16) -> f32 {
    let negative = bits & 0x8000 != 0;
    let exponent = ((bits >> 10) & 0x1F) as i32;
    let fraction = (bits & 0x03FF) as f32;

    let magnitude = match exponent {
        0 => fraction * 2f32.powi(-24),
        0x1F if fraction == 0.0 => f32::INFINITY,
        0x1F => f32::NAN,
        _ => (1.0 + fraction / 1024.0) * 2f32.powi(exponent - 15),
    };

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Converts an `f32` to IEEE-754 binary16 bits, rounding to nearest even.
///
/// Values too large for half precision become infinity; values too small
/// flush to signed zero.
///
/// # Example
///
/// ```
/// use modbus_regcodec::utils::f32_to_f16;
///
/// assert_eq!(f32_to_f16(1.0), 0x3C00);
/// assert_eq!(f32_to_f16(-2.0), 0xC000);
/// assert_eq!(f32_to_f16(1.0e6), 0x7C00);
/// ```
pub fn f32_to_f16(value: f32) -> u16 {
    let x = value.to_bits();
    let sign = ((x >> 16) & 0x8000) as u16;
    let exponent = ((x >> 23) & 0xFF) as i32;
    let mantissa = x & 0x007F_FFFF;

    if exponent == 0xFF {
        let nan_bit = if mantissa != 0 { 0x0200 } else { 0 };
        return sign | 0x7C00 | nan_bit;
    }

    let half_exponent = exponent - 127 + 15;
    if half_exponent >= 0x1F {
        return sign | 0x7C00;
    }

    if half_exponent <= 0 {
        if half_exponent < -10 {
            return sign;
        }
        // subnormal: shift the full significand into units of 2^-24
        let significand = mantissa | 0x0080_0000;
        let shift = (14 - half_exponent) as u32;
        let mut half = significand >> shift;
        let remainder = significand & ((1 << shift) - 1);
        let halfway = 1 << (shift - 1);
        if remainder > halfway || (remainder == halfway && half & 1 == 1) {
            half += 1;
        }
        return sign | half as u16;
    }

    let mut half = ((half_exponent as u32) << 10) | (mantissa >> 13);
    let remainder = mantissa & 0x1FFF;
    // a carry out of the mantissa correctly bumps the exponent
    if remainder > 0x1000 || (remainder == 0x1000 && half & 1 == 1) {
        half += 1;
    }
    sign | half as u16
}
