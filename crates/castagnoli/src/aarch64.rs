//! ARMv8 CRC extension word step.
//!
//! Safety:
//! - This file is allowed to use `unsafe` for ISA-specific intrinsics.
//! - The safe wrapper is only handed out after `aarch64::CRC_READY` is confirmed.

#![allow(unsafe_code)]

use core::arch::aarch64::__crc32cw;

/// Two `crc32cw` instructions over 8 bytes.
///
/// # Safety
/// Caller must ensure the CPU supports the `crc` target feature.
#[target_feature(enable = "crc")]
unsafe fn step_crc32cw_unchecked(acc: u64, word: &[u8; 8]) -> u64 {
  let [a, b, c, d, e, f, g, h] = *word;
  let s = __crc32cw(acc as u32, u32::from_le_bytes([a, b, c, d]));
  u64::from(__crc32cw(s, u32::from_le_bytes([e, f, g, h])))
}

#[inline]
pub(crate) fn step_crc32cw(acc: u64, word: &[u8; 8]) -> u64 {
  // SAFETY: only selected when `CRC_READY` was detected.
  unsafe { step_crc32cw_unchecked(acc, word) }
}
