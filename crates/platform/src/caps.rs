//! CPU capability bitset.
//!
//! [`Caps`] is a 64-bit set of ISA extensions. The lower half holds x86
//! features, the upper half aarch64 features. Only the extensions a CRC32C
//! kernel can use are modelled.

use core::fmt;

/// CPU capabilities: a 64-bit feature bitset.
///
/// `Caps` is `Copy`; pass it by value.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(pub(crate) u64);

impl Caps {
  /// Empty capability set.
  pub const NONE: Self = Self(0);

  /// Build a capability set from raw bits.
  #[cfg(test)]
  #[inline]
  #[must_use]
  pub const fn from_raw(bits: u64) -> Self {
    Self(bits)
  }

  /// Raw bits of this set.
  #[inline]
  #[must_use]
  pub const fn as_raw(self) -> u64 {
    self.0
  }

  /// A set with exactly one bit.
  ///
  /// # Panics
  ///
  /// Fails const evaluation when `bit >= 64`.
  #[inline]
  #[must_use]
  pub const fn bit(bit: u8) -> Self {
    assert!(bit < 64);
    Self(1u64 << bit)
  }

  /// True when every feature in `required` is present.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    self.0 & required.0 == required.0
  }

  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self(self.0 | other.0)
  }

  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self(self.0 & other.0)
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  /// Number of features present.
  #[inline]
  #[must_use]
  pub const fn count(self) -> u32 {
    self.0.count_ones()
  }

  /// Names of the features present, in bit order.
  pub fn feature_names(self) -> impl Iterator<Item = &'static str> {
    NAMES.iter().filter(move |(c, _)| self.has(*c)).map(|(_, n)| *n)
  }
}

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self {
    self.union(rhs)
  }
}

impl core::ops::BitAnd for Caps {
  type Output = Self;

  #[inline]
  fn bitand(self, rhs: Self) -> Self {
    self.intersection(rhs)
  }
}

impl core::ops::BitOrAssign for Caps {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

impl fmt::Debug for Caps {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.feature_names()).finish()
  }
}

const NAMES: &[(Caps, &str)] = &[
  (x86::SSE2, "sse2"),
  (x86::SSE41, "sse4.1"),
  (x86::SSE42, "sse4.2"),
  (x86::PCLMULQDQ, "pclmulqdq"),
  (aarch64::NEON, "neon"),
  (aarch64::CRC, "crc"),
];

/// Target architecture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Arch {
  X86_64,
  X86,
  Aarch64,
  #[default]
  Other,
}

impl Arch {
  /// Architecture of the current compilation target.
  #[inline]
  #[must_use]
  pub const fn current() -> Self {
    #[cfg(target_arch = "x86_64")]
    {
      Self::X86_64
    }
    #[cfg(target_arch = "x86")]
    {
      Self::X86
    }
    #[cfg(target_arch = "aarch64")]
    {
      Self::Aarch64
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64")))]
    {
      Self::Other
    }
  }

  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::X86 => "x86",
      Self::Aarch64 => "aarch64",
      Self::Other => "other",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// x86/x86_64 features (bits 0-31).
pub mod x86 {
  use super::Caps;

  pub const SSE2: Caps = Caps::bit(0);
  pub const SSE41: Caps = Caps::bit(1);
  pub const SSE42: Caps = Caps::bit(2);
  pub const PCLMULQDQ: Caps = Caps::bit(3);

  /// `crc32` instructions (SSE4.2).
  pub const CRC32_READY: Caps = SSE42;

  /// Carry-less multiply folding: `pclmulqdq` plus `pextrd` from SSE4.1.
  pub const PCLMUL_READY: Caps = Caps(PCLMULQDQ.0 | SSE41.0);
}

/// aarch64 features (bits 32-63).
pub mod aarch64 {
  use super::Caps;

  /// Baseline on AArch64.
  pub const NEON: Caps = Caps::bit(32);
  pub const CRC: Caps = Caps::bit(33);

  /// `crc32c*` instructions.
  pub const CRC_READY: Caps = CRC;
}
