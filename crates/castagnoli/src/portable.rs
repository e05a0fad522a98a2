//! Reference table engine.
//!
//! The byte step is the Sarwate update over table 0; the word step retires a
//! little-endian 32-bit word through all four slicing tables at once. Both
//! operate on the raw (complemented) register.

// Table indices are masked to 0..=255 or taken from `>> 24`.
#![allow(clippy::indexing_slicing)]

use crate::constants::TABLES;

/// Fold one byte into the register.
#[inline(always)]
#[must_use]
pub fn step_one_byte(state: u32, byte: u8) -> u32 {
  TABLES.0[0][((state ^ u32::from(byte)) & 0xFF) as usize] ^ (state >> 8)
}

/// Fold a little-endian 32-bit word into the register.
#[inline(always)]
#[must_use]
pub fn step_four_bytes(state: u32, word: u32) -> u32 {
  let c = state ^ word;
  let t = &TABLES.0;
  t[3][(c & 0xFF) as usize] ^ t[2][((c >> 8) & 0xFF) as usize] ^ t[1][((c >> 16) & 0xFF) as usize] ^ t[0][(c >> 24) as usize]
}

/// Software accelerated step: two word steps over 8 bytes.
///
/// Upper 32 bits of `acc` are ignored and returned as zero, matching the
/// 64-bit hardware instruction.
#[inline]
#[must_use]
pub fn step_portable(acc: u64, word: &[u8; 8]) -> u64 {
  let [a, b, c, d, e, f, g, h] = *word;
  let s = step_four_bytes(acc as u32, u32::from_le_bytes([a, b, c, d]));
  u64::from(step_four_bytes(s, u32::from_le_bytes([e, f, g, h])))
}

/// Byte-at-a-time over the whole slice.
#[inline]
#[must_use]
pub fn compute_bytewise(state: u32, data: &[u8]) -> u32 {
  data.iter().fold(state, |s, &b| step_one_byte(s, b))
}

#[cfg(test)]
mod tests {
  use alloc::vec::Vec;

  use super::*;
  use crate::bitwise;

  const CHECK: &[u8] = b"123456789";

  #[test]
  fn bytewise_check_value() {
    assert_eq!(!compute_bytewise(!0, CHECK), 0xE306_9283);
  }

  #[test]
  fn single_zero_byte() {
    assert_eq!(!step_one_byte(!0, 0), 0x527D_5351);
  }

  #[test]
  fn word_step_equals_four_byte_steps() {
    for (state, word) in [(0u32, 0u32), (!0, 0), (0x1234_5678, 0x9ABC_DEF0), (!0, !0), (0xDEAD_BEEF, 1)] {
      let bytes = word.to_le_bytes();
      assert_eq!(
        step_four_bytes(state, word),
        compute_bytewise(state, &bytes),
        "state={state:#x} word={word:#x}"
      );
    }
  }

  #[test]
  fn portable_step_equals_bytewise() {
    let word: [u8; 8] = *b"abcdefgh";
    let acc = step_portable(u64::from(!0u32), &word);
    assert_eq!(acc >> 32, 0);
    assert_eq!(acc as u32, compute_bytewise(!0, &word));
  }

  #[test]
  fn portable_step_ignores_high_bits() {
    let word = [0xA5; 8];
    assert_eq!(step_portable(0xFFFF_FFFF_0000_0001, &word), step_portable(1, &word));
  }

  #[test]
  fn matches_table_less_reference() {
    let data: Vec<u8> = (0..1031u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8).collect();
    for start in [0usize, 1, 7, 500] {
      let d = &data[start..];
      assert_eq!(compute_bytewise(0x0BAD_F00D, d), bitwise::compute(0x0BAD_F00D, d));
    }
  }
}
