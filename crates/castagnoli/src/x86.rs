//! SSE4.2 `crc32` word steps (x86 and x86_64).
//!
//! The `crc32` instruction implements exactly the CRC32C polynomial on the
//! raw register, so one instruction replaces one table word step.
//!
//! Safety:
//! - This file is allowed to use `unsafe` for ISA-specific intrinsics.
//! - The safe wrappers are only handed out by the selector after
//!   `platform::caps::x86::CRC32_READY` has been confirmed.

#![allow(unsafe_code)]

#[cfg(target_arch = "x86")]
use core::arch::x86::_mm_crc32_u32;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::{_mm_crc32_u32, _mm_crc32_u64};

/// Two 32-bit `crc32` instructions over 8 bytes.
///
/// # Safety
/// Caller must ensure the CPU supports `sse4.2`.
#[target_feature(enable = "sse4.2")]
unsafe fn step_crc32l_unchecked(acc: u64, word: &[u8; 8]) -> u64 {
  let [a, b, c, d, e, f, g, h] = *word;
  let s = _mm_crc32_u32(acc as u32, u32::from_le_bytes([a, b, c, d]));
  u64::from(_mm_crc32_u32(s, u32::from_le_bytes([e, f, g, h])))
}

/// One 64-bit `crc32` instruction over 8 bytes.
///
/// # Safety
/// Caller must ensure the CPU supports `sse4.2`.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.2")]
unsafe fn step_crc32q_unchecked(acc: u64, word: &[u8; 8]) -> u64 {
  // The instruction only reads the low 32 bits of the accumulator.
  _mm_crc32_u64(acc & 0xFFFF_FFFF, u64::from_le_bytes(*word))
}

#[inline]
pub(crate) fn step_crc32l(acc: u64, word: &[u8; 8]) -> u64 {
  // SAFETY: only selected when `CRC32_READY` (sse4.2) was detected.
  unsafe { step_crc32l_unchecked(acc, word) }
}

#[cfg(target_arch = "x86_64")]
#[inline]
pub(crate) fn step_crc32q(acc: u64, word: &[u8; 8]) -> u64 {
  // SAFETY: only selected when `CRC32_READY` (sse4.2) was detected.
  unsafe { step_crc32q_unchecked(acc, word) }
}
