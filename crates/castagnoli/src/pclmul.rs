//! PCLMULQDQ batch fold (x86_64).
//!
//! Four 128-bit accumulators fold 64 bytes per iteration by `x^512`, collapse
//! into one lane, fold any remaining 16-byte blocks by `x^128`, then reduce
//! 128 -> 64 -> 32 bits and finish with a Barrett reduction. Works on the
//! raw register like the other kernels.
//!
//! Safety:
//! - This file is allowed to use `unsafe` for ISA-specific intrinsics.
//! - The safe wrapper is only handed out after `x86::PCLMUL_READY` is confirmed.

#![allow(unsafe_code)]

use core::arch::x86_64::{
  __m128i, _mm_and_si128, _mm_clmulepi64_si128, _mm_cvtsi32_si128, _mm_extract_epi32, _mm_loadu_si128,
  _mm_set_epi32, _mm_set_epi64x, _mm_srli_si128, _mm_xor_si128,
};

use crate::{
  constants::fold::{K1, K2, K3, K4, K5, MU_PRIME, P_PRIME},
  portable,
};

/// Smallest input the fold accepts.
pub(crate) const MIN_LEN: usize = 64;

/// Input length granularity.
pub(crate) const BLOCK: usize = 16;

#[inline(always)]
fn load(block: &[u8; 16]) -> __m128i {
  // SAFETY: `block` is 16 readable bytes; unaligned loads are SSE2, baseline on x86_64.
  unsafe { _mm_loadu_si128(block.as_ptr().cast()) }
}

/// `b ^ clmul(a.lo, k.lo) ^ clmul(a.hi, k.hi)`
#[inline]
#[target_feature(enable = "pclmulqdq")]
fn reduce128(a: __m128i, b: __m128i, keys: __m128i) -> __m128i {
  let lo = _mm_clmulepi64_si128(a, keys, 0x00);
  let hi = _mm_clmulepi64_si128(a, keys, 0x11);
  _mm_xor_si128(b, _mm_xor_si128(lo, hi))
}

/// # Safety
/// Caller must ensure the CPU supports `pclmulqdq` and `sse4.1`.
#[target_feature(enable = "pclmulqdq", enable = "sse4.1")]
unsafe fn fold_unchecked(state: u32, blocks: &[[u8; 16]]) -> u32 {
  let (lanes, tail) = blocks.as_chunks::<4>();
  let Some(([b0, b1, b2, b3], rest)) = lanes.split_first() else {
    return state;
  };

  let mut x0 = _mm_xor_si128(load(b0), _mm_cvtsi32_si128(state as i32));
  let mut x1 = load(b1);
  let mut x2 = load(b2);
  let mut x3 = load(b3);

  let k12 = _mm_set_epi64x(K2 as i64, K1 as i64);
  for [c0, c1, c2, c3] in rest {
    x0 = reduce128(x0, load(c0), k12);
    x1 = reduce128(x1, load(c1), k12);
    x2 = reduce128(x2, load(c2), k12);
    x3 = reduce128(x3, load(c3), k12);
  }

  let k34 = _mm_set_epi64x(K4 as i64, K3 as i64);
  let mut v = reduce128(x0, x1, k34);
  v = reduce128(v, x2, k34);
  v = reduce128(v, x3, k34);
  for block in tail {
    v = reduce128(v, load(block), k34);
  }

  // 128 -> 64
  v = _mm_xor_si128(_mm_clmulepi64_si128(v, k34, 0x10), _mm_srli_si128(v, 8));

  // 64 -> 32
  let low32 = _mm_set_epi32(0, 0, 0, !0);
  let k5 = _mm_set_epi64x(0, K5 as i64);
  v = _mm_xor_si128(
    _mm_clmulepi64_si128(_mm_and_si128(v, low32), k5, 0x00),
    _mm_srli_si128(v, 4),
  );

  // Barrett
  let pu = _mm_set_epi64x(MU_PRIME as i64, P_PRIME as i64);
  let t1 = _mm_clmulepi64_si128(_mm_and_si128(v, low32), pu, 0x10);
  let t2 = _mm_clmulepi64_si128(_mm_and_si128(t1, low32), pu, 0x00);
  _mm_extract_epi32(_mm_xor_si128(v, t2), 1) as u32
}

/// Fold `data` into the raw register.
///
/// Inputs shorter than [`MIN_LEN`] and bytes past the last whole 16-byte
/// block go through the byte step, so the function is total.
pub(crate) fn fold(state: u32, data: &[u8]) -> u32 {
  if data.len() < MIN_LEN {
    return portable::compute_bytewise(state, data);
  }
  let (blocks, rest) = data.as_chunks::<BLOCK>();
  // SAFETY: only selected when `PCLMUL_READY` (pclmulqdq + sse4.1) was detected.
  let state = unsafe { fold_unchecked(state, blocks) };
  portable::compute_bytewise(state, rest)
}

#[cfg(all(test, not(miri)))]
mod tests {
  use alloc::vec::Vec;

  use super::*;

  fn has_pclmul() -> bool {
    platform::caps().has(platform::caps::x86::PCLMUL_READY)
  }

  fn data(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i as u32).wrapping_mul(0x9E37_79B9).rotate_left(7) as u8).collect()
  }

  #[test]
  fn fold_matches_bytewise_on_block_multiples() {
    if !has_pclmul() {
      return;
    }
    for len in [64usize, 80, 96, 112, 128, 144, 192, 256, 1024, 4096 + 48] {
      let d = data(len);
      for state in [0u32, !0, 0x1234_5678] {
        assert_eq!(fold(state, &d), portable::compute_bytewise(state, &d), "len={len} state={state:#x}");
      }
    }
  }

  #[test]
  fn fold_handles_ragged_and_short_inputs() {
    if !has_pclmul() {
      return;
    }
    for len in [0usize, 1, 15, 63, 65, 79, 127, 200] {
      let d = data(len);
      assert_eq!(fold(!0, &d), portable::compute_bytewise(!0, &d), "len={len}");
    }
  }

  #[test]
  fn check_value_padded_to_block() {
    if !has_pclmul() {
      return;
    }
    let zeros = [0u8; 32];
    let mut d = Vec::from(&b"123456789"[..]);
    d.resize(64, 0xAB);
    assert_eq!(!fold(!0, &zeros), 0x8A91_36AA);
    assert_eq!(fold(!0, &d), portable::compute_bytewise(!0, &d));
  }
}
