//! CRC32C (Castagnoli) checksums with hardware acceleration.
//!
//! | Property | Value |
//! |----------|-------|
//! | Polynomial | 0x1EDC6F41 (normal), 0x82F63B78 (reflected) |
//! | Initial value / final XOR | 0xFFFFFFFF |
//! | Check (`"123456789"`) | 0xE3069283 |
//!
//! Every input is valid and every kernel produces the same bits. Kernels are
//! chosen once per process from the detected CPU features:
//!
//! | Kernel | Requires |
//! |--------|----------|
//! | `x86_64/sse4.2-crc32q` | SSE4.2 |
//! | `x86/sse4.2-crc32l` | SSE4.2 |
//! | `aarch64/crc32cw` | ARMv8 CRC |
//! | `x86_64/pclmul-fold` (batch, large buffers) | PCLMULQDQ + SSE4.1 |
//! | `portable/slice4` | nothing |
//!
//! # Example
//!
//! ```rust
//! use castagnoli::{Checksum, Crc32c};
//!
//! // One-shot
//! assert_eq!(castagnoli::value(b"123456789"), 0xE306_9283);
//!
//! // Extending a running checksum
//! let crc = castagnoli::extend(castagnoli::value(b"1234"), b"56789");
//! assert_eq!(crc, 0xE306_9283);
//!
//! // Streaming
//! let mut hasher = Crc32c::new();
//! hasher.update(b"1234");
//! hasher.update(b"56789");
//! assert_eq!(hasher.finalize(), crc);
//! ```
//!
//! # Configuration
//!
//! See [`config`] for the `CASTAGNOLI_*` environment overrides and
//! [`introspect`] to see what was picked.
//!
//! # no_std
//!
//! Disable default features for `no_std`. Only compile-time CPU features are
//! then used, and environment overrides are ignored.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(test)]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[cfg(target_arch = "aarch64")]
mod aarch64;
pub mod bitwise;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod introspect;
pub mod kernels;
#[cfg(target_arch = "x86_64")]
mod pclmul;
pub mod portable;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86;

pub use config::{Crc32cConfig, Crc32cForce, ParseForceError};
pub use dispatch::Engine;
pub use platform::Caps;
pub use traits::Checksum;

/// Added to the rotated CRC by [`mask`].
pub const MASK_DELTA: u32 = 0xA282_EAD8;

/// Extend `crc` with `data`. Start a fresh checksum with `crc = 0`.
///
/// `extend(extend(0, a), b) == extend(0, a ++ b)` and `extend(crc, &[]) == crc`.
#[inline]
#[must_use]
pub fn extend(crc: u32, data: &[u8]) -> u32 {
  dispatch::engine().extend(crc, data)
}

/// CRC32C of `data`.
#[inline]
#[must_use]
pub fn value(data: &[u8]) -> u32 {
  extend(0, data)
}

/// Masked representation of a CRC for storage.
///
/// Computing the CRC of a string that already contains embedded CRCs is
/// error-prone, so stored CRCs are rotated and offset first.
#[inline]
#[must_use]
pub const fn mask(crc: u32) -> u32 {
  crc.rotate_right(15).wrapping_add(MASK_DELTA)
}

/// Inverse of [`mask`].
#[inline]
#[must_use]
pub const fn unmask(masked: u32) -> u32 {
  masked.wrapping_sub(MASK_DELTA).rotate_left(15)
}

/// Streaming CRC32C hasher.
///
/// ```
/// use castagnoli::{Checksum, Crc32c};
///
/// let crc = Crc32c::checksum(b"123456789");
/// assert_eq!(crc, 0xE306_9283);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Crc32c {
  initial: u32,
  crc: u32,
}

impl Crc32c {
  /// Continue from a previously finalized checksum.
  #[inline]
  #[must_use]
  pub const fn resume(crc: u32) -> Self {
    Self { initial: crc, crc }
  }

  /// Name of the selected step kernel, e.g. `"x86_64/sse4.2-crc32q"`.
  #[must_use]
  pub fn backend_name() -> &'static str {
    dispatch::engine().step_name()
  }
}

impl core::fmt::Debug for Crc32c {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Crc32c").field("crc", &format_args!("{:#010x}", self.crc)).finish()
  }
}

impl Checksum for Crc32c {
  const OUTPUT_SIZE: usize = 4;
  type Output = u32;

  #[inline]
  fn new() -> Self {
    Self::resume(0)
  }

  #[inline]
  fn with_initial(initial: u32) -> Self {
    Self::resume(initial)
  }

  #[inline]
  fn update(&mut self, data: &[u8]) {
    self.crc = extend(self.crc, data);
  }

  #[inline]
  fn finalize(&self) -> u32 {
    self.crc
  }

  #[inline]
  fn reset(&mut self) {
    self.crc = self.initial;
  }
}

#[cfg(feature = "std")]
impl std::io::Write for Crc32c {
  #[inline]
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self.update(buf);
    Ok(buf.len())
  }

  #[inline]
  fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> {
    self.update(buf);
    Ok(())
  }

  #[inline]
  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}
