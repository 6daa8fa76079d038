//! Splitting raw response bytes into per-entry chunks.
//!
//! [`chunks`] walks a byte buffer left to right, handing out one slice per
//! declared width together with the register offset at which the slice
//! starts. [`bit_chunks`] is the 1-bit variant used for coil and
//! discrete-input blocks.
//!
//! Neither iterator fails. When the buffer runs out, byte chunks come back
//! shorter than their declared width (possibly empty) and bit chunks read
//! as `false`; deciding what a short chunk means is left to the record
//! builder.
//!
//! # Example
//!
//! ```
//! use modbus_regcodec::chunk::{chunks, REGISTER_SIZE};
//!
//! let data = hex::decode("556e697432332d41fefefc19feff").unwrap();
//! let parts: Vec<_> = chunks(&data, [8, 2, 2, 1, 1], REGISTER_SIZE)
//!     .map(|c| (c.hex(), c.offset().whole()))
//!     .collect();
//!
//! assert_eq!(
//!     parts,
//!     vec![
//!         ("556e697432332d41".to_string(), 0),
//!         ("fefe".to_string(), 4),
//!         ("fc19".to_string(), 5),
//!         ("fe".to_string(), 6),
//!         ("ff".to_string(), 6),
//!     ]
//! );
//! ```

/// Bytes per Modbus register.
pub const REGISTER_SIZE: usize = 2;

/// Position of a chunk measured in registers, kept as an exact fraction.
///
/// The offset is `bytes / register_size`. It is only rounded (down) when an
/// address is formatted, so 8-bit entries mixed with 16-bit ones land
/// mid-register without accumulating rounding error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterOffset {
    bytes: usize,
    register_size: usize,
}

impl RegisterOffset {
    /// Creates an offset of `bytes` bytes in units of `register_size`.
    ///
    /// A zero `register_size` is treated as 1.
    pub fn new(bytes: usize, register_size: usize) -> Self {
        Self {
            bytes,
            register_size: register_size.max(1),
        }
    }

    /// Returns the offset in bytes.
    pub fn bytes(self) -> usize {
        self.bytes
    }

    /// Returns the whole number of registers, truncating any fraction.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_regcodec::chunk::RegisterOffset;
    ///
    /// assert_eq!(RegisterOffset::new(5, 2).whole(), 2);
    /// assert_eq!(RegisterOffset::new(6, 2).whole(), 3);
    /// ```
    pub fn whole(self) -> usize {
        self.bytes / self.register_size
    }

    /// Returns whether the offset falls in the middle of a register.
    pub fn is_fractional(self) -> bool {
        self.bytes % self.register_size != 0
    }

    /// Returns the offset in registers as a float.
    pub fn as_f64(self) -> f64 {
        self.bytes as f64 / self.register_size as f64
    }
}

impl std::fmt::Display for RegisterOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_f64())
    }
}

/// One width-delimited slice of a response buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    bytes: &'a [u8],
    width: usize,
    offset: RegisterOffset,
}

impl<'a> Chunk<'a> {
    /// Returns the bytes actually present (may be shorter than [`width`](Self::width)).
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Returns the declared width in bytes.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the register offset at which this chunk starts.
    pub fn offset(&self) -> RegisterOffset {
        self.offset
    }

    /// Returns whether fewer bytes were available than declared.
    pub fn is_truncated(&self) -> bool {
        self.bytes.len() < self.width
    }

    /// Returns the chunk's bytes as lowercase hex.
    pub fn hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

/// Iterator returned by [`chunks`].
#[derive(Debug, Clone)]
pub struct Chunks<'a, I> {
    buffer: &'a [u8],
    widths: I,
    cursor: usize,
    register_size: usize,
}

impl<'a, I> Iterator for Chunks<'a, I>
where
    I: Iterator<Item = usize>,
{
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let width = self.widths.next()?;
        let len = self.buffer.len();
        let start = self.cursor.min(len);
        let end = self.cursor.saturating_add(width).min(len);

        let chunk = Chunk {
            bytes: &self.buffer[start..end],
            width,
            offset: RegisterOffset::new(self.cursor, self.register_size),
        };
        self.cursor = self.cursor.saturating_add(width);
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.widths.size_hint()
    }
}

/// Splits `buffer` into one chunk per entry of `widths`.
///
/// Chunks are produced lazily, in order, without overlap. The sequence has
/// exactly as many elements as `widths`, whatever the buffer length.
///
/// # Arguments
///
/// * `buffer` - Raw register bytes (no leading byte count)
/// * `widths` - Declared byte width of each entry
/// * `register_size` - Bytes per register unit, normally [`REGISTER_SIZE`]
///
/// # Example
///
/// ```
/// use modbus_regcodec::chunk::chunks;
///
/// let data = [0xfc, 0x19, 0xff];
/// let parts: Vec<_> = chunks(&data, [2, 2, 2], 2).collect();
///
/// assert_eq!(parts.len(), 3);
/// assert!(!parts[0].is_truncated());
/// assert_eq!(parts[1].bytes(), &[0xff]);
/// assert!(parts[2].bytes().is_empty());
/// ```
pub fn chunks<I>(buffer: &[u8], widths: I, register_size: usize) -> Chunks<'_, I::IntoIter>
where
    I: IntoIterator<Item = usize>,
{
    Chunks {
        buffer,
        widths: widths.into_iter(),
        cursor: 0,
        register_size: register_size.max(1),
    }
}

/// One bit of a coil or discrete-input block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitChunk {
    /// Bit value.
    pub value: bool,
    /// Offset from the first requested bit.
    pub address: usize,
}

/// Iterator returned by [`bit_chunks`].
#[derive(Debug, Clone)]
pub struct BitChunks<'a> {
    buffer: &'a [u8],
    index: usize,
    count: usize,
}

impl Iterator for BitChunks<'_> {
    type Item = BitChunk;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let chunk = BitChunk {
            value: crate::utils::bit_at(self.buffer, self.index),
            address: self.index,
        };
        self.index += 1;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitChunks<'_> {}

/// Reads `count` bits from a packed bit buffer, LSB first.
///
/// The buffer is interpreted as one little-endian integer, the layout
/// Modbus uses for coils and discrete inputs. Addresses start at 0 and
/// increase by 1 per bit.
///
/// # Example
///
/// ```
/// use modbus_regcodec::chunk::bit_chunks;
///
/// let bits: Vec<bool> = bit_chunks(&[0x07, 0x02], 16).map(|b| b.value).collect();
/// assert_eq!(&bits[..4], &[true, true, true, false]);
/// assert!(bits[9]);
/// ```
pub fn bit_chunks(buffer: &[u8], count: usize) -> BitChunks<'_> {
    BitChunks {
        buffer,
        index: 0,
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_exact_buffer() {
        let data = hex::decode("fc19fffffffe").unwrap();
        let parts: Vec<_> = chunks(&data, [2, 2, 1, 1], REGISTER_SIZE)
            .map(|c| (c.hex(), c.offset().whole()))
            .collect();
        assert_eq!(
            parts,
            vec![
                ("fc19".to_string(), 0),
                ("ffff".to_string(), 1),
                ("ff".to_string(), 2),
                ("fe".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_chunks_fractional_offsets() {
        let data = [0u8; 8];
        let offsets: Vec<_> = chunks(&data, [1, 2, 1, 4], REGISTER_SIZE)
            .map(|c| c.offset())
            .collect();
        assert_eq!(offsets[0].as_f64(), 0.0);
        assert_eq!(offsets[1].as_f64(), 0.5);
        assert!(offsets[1].is_fractional());
        assert_eq!(offsets[2].as_f64(), 1.5);
        assert_eq!(offsets[3].as_f64(), 2.0);
        assert_eq!(offsets[3].whole(), 2);
    }

    #[test]
    fn test_chunks_short_buffer_never_fails() {
        let data = [0x01, 0x02, 0x03];
        let parts: Vec<_> = chunks(&data, [2, 4, 8], REGISTER_SIZE).collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].bytes(), &[0x03]);
        assert!(parts[1].is_truncated());
        assert_eq!(parts[2].hex(), "");
        assert_eq!(parts[2].offset().whole(), 3);
    }

    #[test]
    fn test_chunks_empty_widths() {
        assert_eq!(chunks(&[1, 2], Vec::<usize>::new(), 2).count(), 0);
    }

    #[test]
    fn test_chunks_zero_register_size() {
        let parts: Vec<_> = chunks(&[1, 2, 3], [1, 1, 1], 0).collect();
        assert_eq!(parts[2].offset().whole(), 2);
    }

    #[test]
    fn test_register_offset_display() {
        assert_eq!(RegisterOffset::new(3, 2).to_string(), "1.5");
        assert_eq!(RegisterOffset::new(4, 2).to_string(), "2");
    }

    #[test]
    fn test_bit_chunks_coil_layout() {
        let bits: Vec<_> = bit_chunks(&[0x07, 0x02], 16).collect();
        assert_eq!(bits.len(), 16);
        let on: Vec<usize> = bits.iter().filter(|b| b.value).map(|b| b.address).collect();
        assert_eq!(on, vec![0, 1, 2, 9]);
    }

    #[test]
    fn test_bit_chunks_past_buffer() {
        let bits: Vec<_> = bit_chunks(&[0xFF], 10).collect();
        assert!(bits[7].value);
        assert!(!bits[8].value);
        assert!(!bits[9].value);
        assert_eq!(bits[9].address, 9);
    }

    #[test]
    fn test_bit_chunks_exact_size() {
        let mut iter = bit_chunks(&[0x00], 3);
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.len(), 2);
    }
}
