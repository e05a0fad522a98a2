//! Compile-time constants for CRC32C.
//!
//! Everything here is computed by `const fn` and lives in read-only statics;
//! nothing is initialized at runtime.

pub(crate) mod fold;
pub(crate) mod gf2;
pub(crate) mod tables;

/// CRC32C polynomial, normal form (`x^32` implied).
pub const POLYNOMIAL_NORMAL: u32 = 0x1EDC_6F41;

/// CRC32C polynomial, bit-reflected form used by the LSB-first tables.
pub const POLYNOMIAL: u32 = 0x82F6_3B78;

/// Full 33-bit generator `x^32 + POLYNOMIAL_NORMAL` for GF(2) arithmetic.
pub(crate) const POLYNOMIAL_FULL: u64 = (1 << 32) | POLYNOMIAL_NORMAL as u64;

/// 64-byte aligned wrapper so each table starts on a cache line.
#[repr(C, align(64))]
pub struct Aligned64<T>(pub T);

/// The four slicing-by-4 tables.
///
/// `TABLES.0[0]` is the classic Sarwate table; `TABLES.0[k]` advances a byte
/// through `k` further zero bytes.
pub static TABLES: Aligned64<[[u32; 256]; 4]> = Aligned64(tables::slicing_tables(POLYNOMIAL));
