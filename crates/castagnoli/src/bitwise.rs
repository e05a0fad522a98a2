//! Table-less CRC32C.
//!
//! A branchless bit-at-a-time implementation that shares nothing with the
//! table engine. It is slow and exists to cross-check the tables and every
//! accelerated path.

use crate::constants::POLYNOMIAL;

/// Fold `data` into a raw register value (no pre/post complement).
///
/// ```
/// use castagnoli::bitwise::compute;
///
/// assert_eq!(!compute(!0, b"123456789"), 0xE306_9283);
/// ```
#[must_use]
pub fn compute(state: u32, data: &[u8]) -> u32 {
  data.iter().fold(state, |crc, &b| compute_byte(crc, b))
}

/// Fold one byte. `0u32.wrapping_sub(bit)` is all ones when the low bit is set.
#[inline]
#[must_use]
pub const fn compute_byte(mut crc: u32, byte: u8) -> u32 {
  crc ^= byte as u32;
  let mut i = 0;
  while i < 8 {
    crc = (crc >> 1) ^ (POLYNOMIAL & 0u32.wrapping_sub(crc & 1));
    i += 1;
  }
  crc
}
