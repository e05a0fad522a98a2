//! Carry-less multiplication constants for the CRC32C batch fold.
//!
//! Each folding key is `x^n mod P`, bit-reflected to 32 bits and shifted left
//! by one so that the 64-bit carry-less product lines up with the reflected
//! data lanes.

use super::{POLYNOMIAL_FULL, gf2};

const fn fold_key(n: u32) -> u64 {
  gf2::reflect_bits_u64(gf2::xpow_mod_32(n, POLYNOMIAL_FULL), 32) << 1
}

/// Fold distance 512 bits, high lane (`x^544`).
pub(crate) const K1: u64 = fold_key(512 + 32);
/// Fold distance 512 bits, low lane (`x^480`).
pub(crate) const K2: u64 = fold_key(512 - 32);
/// Fold distance 128 bits, high lane (`x^160`).
pub(crate) const K3: u64 = fold_key(128 + 32);
/// Fold distance 128 bits, low lane (`x^96`).
pub(crate) const K4: u64 = fold_key(128 - 32);
/// 64 to 32 bit reduction (`x^64`).
pub(crate) const K5: u64 = fold_key(64);

/// Reflected 33-bit generator for Barrett reduction.
pub(crate) const P_PRIME: u64 = gf2::reflect_bits_u64(POLYNOMIAL_FULL, 33);

/// Reflected Barrett constant `floor(x^64 / P)`.
pub(crate) const MU_PRIME: u64 = gf2::reflect_bits_u64(gf2::gf2_div_128(1u128 << 64, POLYNOMIAL_FULL as u128) as u64, 33);
