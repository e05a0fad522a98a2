//! Capability detection.
//!
//! - Compile-time features via `cfg!(target_feature = "...")`
//! - Runtime features via `is_x86_feature_detected!` / `is_aarch64_feature_detected!` (std only)
//! - Caching in `OnceLock` (std) or atomics (no_std)
//! - A process-wide override that can hide detected features, never add them
//! - Miri always sees [`Caps::NONE`]

use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::caps::Caps;

static OVERRIDE_SET: AtomicBool = AtomicBool::new(false);
static OVERRIDE_BITS: AtomicU64 = AtomicU64::new(0);

/// Set or clear the capabilities override.
///
/// While set, [`caps()`] returns the override instead of detected features.
/// The override is intersected with [`detected()`]: it can hide features,
/// never add them.
pub fn set_caps_override(value: Option<Caps>) {
  match value {
    Some(c) => {
      OVERRIDE_BITS.store(c.intersection(detected()).0, Ordering::Release);
      OVERRIDE_SET.store(true, Ordering::Release);
    }
    None => OVERRIDE_SET.store(false, Ordering::Release),
  }
}

/// Whether an override is currently set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  OVERRIDE_SET.load(Ordering::Acquire)
}

fn get_override() -> Option<Caps> {
  if has_override() {
    Some(Caps(OVERRIDE_BITS.load(Ordering::Acquire)))
  } else {
    None
  }
}

#[cfg(all(not(miri), not(feature = "std")))]
mod cache {
  use core::sync::atomic::{AtomicU8, AtomicU64, Ordering};

  use super::Caps;

  const UNINIT: u8 = 0;
  const READY: u8 = 2;

  static STATE: AtomicU8 = AtomicU8::new(UNINIT);
  static BITS: AtomicU64 = AtomicU64::new(0);

  /// Detection is idempotent, so racing initializers store the same value.
  pub fn get_or_init(f: fn() -> Caps) -> Caps {
    if STATE.load(Ordering::Acquire) == READY {
      return Caps(BITS.load(Ordering::Acquire));
    }
    let c = f();
    BITS.store(c.0, Ordering::Release);
    STATE.store(READY, Ordering::Release);
    c
  }
}

/// Capabilities the dispatcher may use.
///
/// Returns the override when one is set, otherwise [`detected()`].
#[inline]
#[must_use]
pub fn caps() -> Caps {
  get_override().unwrap_or_else(detected)
}

/// Hardware capabilities, cached after the first call. Ignores the override.
///
/// Every kernel selection is bounded by this set.
#[inline]
#[must_use]
pub fn detected() -> Caps {
  #[cfg(miri)]
  {
    Caps::NONE
  }

  #[cfg(all(not(miri), feature = "std"))]
  {
    use std::sync::OnceLock;
    static CACHED: OnceLock<Caps> = OnceLock::new();
    *CACHED.get_or_init(detect_uncached)
  }

  #[cfg(all(not(miri), not(feature = "std")))]
  {
    cache::get_or_init(detect_uncached)
  }
}

/// Detect capabilities without caching or overrides.
#[must_use]
pub fn detect_uncached() -> Caps {
  #[cfg(miri)]
  {
    Caps::NONE
  }

  #[cfg(all(not(miri), any(target_arch = "x86_64", target_arch = "x86")))]
  {
    detect_x86()
  }

  #[cfg(all(not(miri), target_arch = "aarch64"))]
  {
    detect_aarch64()
  }

  #[cfg(all(
    not(miri),
    not(any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64"))
  ))]
  {
    Caps::NONE
  }
}

#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
fn detect_x86() -> Caps {
  #[allow(unused_mut)]
  let mut bits = compile_time_x86();

  #[cfg(feature = "std")]
  {
    bits |= runtime_x86();
  }

  bits
}

#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
const fn compile_time_x86() -> Caps {
  use crate::caps::x86;

  let mut bits = Caps::NONE;
  if cfg!(target_feature = "sse2") {
    bits = bits.union(x86::SSE2);
  }
  if cfg!(target_feature = "sse4.1") {
    bits = bits.union(x86::SSE41);
  }
  if cfg!(target_feature = "sse4.2") {
    bits = bits.union(x86::SSE42);
  }
  if cfg!(target_feature = "pclmulqdq") {
    bits = bits.union(x86::PCLMULQDQ);
  }
  bits
}

#[cfg(all(any(target_arch = "x86_64", target_arch = "x86"), feature = "std"))]
fn runtime_x86() -> Caps {
  use crate::caps::x86;

  let mut bits = Caps::NONE;
  if std::arch::is_x86_feature_detected!("sse2") {
    bits |= x86::SSE2;
  }
  if std::arch::is_x86_feature_detected!("sse4.1") {
    bits |= x86::SSE41;
  }
  if std::arch::is_x86_feature_detected!("sse4.2") {
    bits |= x86::SSE42;
  }
  if std::arch::is_x86_feature_detected!("pclmulqdq") {
    bits |= x86::PCLMULQDQ;
  }
  bits
}

#[cfg(target_arch = "aarch64")]
fn detect_aarch64() -> Caps {
  use crate::caps::aarch64;

  #[allow(unused_mut)]
  let mut bits = aarch64::NEON.union(compile_time_aarch64());

  #[cfg(feature = "std")]
  {
    if std::arch::is_aarch64_feature_detected!("crc") {
      bits |= aarch64::CRC;
    }
  }

  bits
}

#[cfg(target_arch = "aarch64")]
const fn compile_time_aarch64() -> Caps {
  use crate::caps::aarch64;

  let mut bits = Caps::NONE;
  if cfg!(target_feature = "crc") {
    bits = bits.union(aarch64::CRC);
  }
  bits
}
