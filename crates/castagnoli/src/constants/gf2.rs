//! GF(2) polynomial arithmetic for deriving folding constants at compile time.

/// Reverse the lower `width` bits of `value`.
#[inline]
pub(crate) const fn reflect_bits_u64(value: u64, width: u32) -> u64 {
  let mut result = 0u64;
  let mut i = 0u32;
  while i < width {
    if (value >> i) & 1 != 0 {
      result |= 1 << (width - 1 - i);
    }
    i += 1;
  }
  result
}

/// Degree of a non-zero polynomial (index of its highest set bit).
#[inline]
const fn deg_u128(x: u128) -> u32 {
  if x == 0 {
    return 0;
  }
  127 - x.leading_zeros()
}

/// Quotient of `dividend / divisor` over GF(2).
#[inline]
pub(crate) const fn gf2_div_128(dividend: u128, divisor: u128) -> u128 {
  let mut rem = dividend;
  let mut q: u128 = 0;
  while rem != 0 && deg_u128(rem) >= deg_u128(divisor) {
    let shift = deg_u128(rem) - deg_u128(divisor);
    q ^= 1u128 << shift;
    rem ^= divisor << shift;
  }
  q
}

/// `a * b mod poly_full` for polynomials of degree < 32.
#[inline]
const fn gf2_mul_mod_32(a: u64, b: u64, poly_full: u64) -> u64 {
  let mut product: u64 = 0;
  let mut i = 0;
  while i < 32 {
    if (b >> i) & 1 != 0 {
      product ^= a << i;
    }
    i += 1;
  }

  let mut bit = 63u32;
  while bit >= 32 {
    if (product >> bit) & 1 != 0 {
      product ^= poly_full << (bit - 32);
    }
    bit -= 1;
  }
  product & 0xFFFF_FFFF
}

/// `x^n mod poly_full` by square-and-multiply.
#[inline]
pub(crate) const fn xpow_mod_32(n: u32, poly_full: u64) -> u64 {
  if n < 32 {
    return 1u64 << n;
  }

  let mut result: u64 = 1;
  let mut base: u64 = 2;
  let mut exp = n;
  while exp > 0 {
    if exp & 1 != 0 {
      result = gf2_mul_mod_32(result, base, poly_full);
    }
    base = gf2_mul_mod_32(base, base, poly_full);
    exp >>= 1;
  }
  result
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::constants::POLYNOMIAL_FULL;

  #[test]
  fn reflect_bits() {
    assert_eq!(reflect_bits_u64(0b1010, 4), 0b0101);
    assert_eq!(reflect_bits_u64(0x8000_0000, 32), 1);
    assert_eq!(reflect_bits_u64(POLYNOMIAL_FULL & 0xFFFF_FFFF, 32), u64::from(crate::constants::POLYNOMIAL));
  }

  #[test]
  fn xpow_small_exponents_are_monomials() {
    assert_eq!(xpow_mod_32(0, POLYNOMIAL_FULL), 1);
    assert_eq!(xpow_mod_32(31, POLYNOMIAL_FULL), 1 << 31);
  }

  #[test]
  fn xpow_32_is_the_polynomial_tail() {
    // x^32 = P - x^32 (mod P)
    assert_eq!(xpow_mod_32(32, POLYNOMIAL_FULL), POLYNOMIAL_FULL & 0xFFFF_FFFF);
  }

  #[test]
  fn xpow_exponents_add() {
    let a = xpow_mod_32(100, POLYNOMIAL_FULL);
    let b = xpow_mod_32(61, POLYNOMIAL_FULL);
    assert_eq!(gf2_mul_mod_32(a, b, POLYNOMIAL_FULL), xpow_mod_32(161, POLYNOMIAL_FULL));
  }

  #[test]
  fn division_by_self_is_one() {
    let p = u128::from(POLYNOMIAL_FULL);
    assert_eq!(gf2_div_128(p, p), 1);
    assert_eq!(gf2_div_128(p << 7, p), 1 << 7);
  }
}
