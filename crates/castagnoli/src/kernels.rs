//! Kernel registry.
//!
//! Two kernel shapes exist:
//!
//! - [`StepFn`]: retires exactly 8 bytes per call on the raw register, widened
//!   to `u64` to match the 64-bit `crc32` instruction. Every variant must
//!   agree bit-for-bit with [`portable::step_portable`].
//! - [`BatchFn`]: folds a long slice in one call. Only used by the driver for
//!   inputs of at least [`MIN_BATCH_LEN`] bytes, on a prefix whose length is a
//!   multiple of [`BATCH_BLOCK`].
//!
//! Candidate lists are ordered best first and always end with a variant that
//! has no requirements (batch lists excepted: no batch is a valid outcome).
//!
//! The selectors here trust the `caps` they are given and stay crate-private.
//! Callers bound `caps` by `platform::detected()` first.

use backend::{Candidate, Selected, candidates};
#[allow(unused_imports)]
use platform::caps::{Caps, aarch64, x86};

use crate::{config::Crc32cForce, portable};

/// Accelerated step: 8 bytes per call.
pub type StepFn = fn(u64, &[u8; 8]) -> u64;

/// Wide batch fold over a raw register.
pub type BatchFn = fn(u32, &[u8]) -> u32;

/// Smallest buffer the batch path may be handed.
pub const MIN_BATCH_LEN: usize = 64;

/// The batch path consumes prefixes that are a multiple of this length.
pub const BATCH_BLOCK: usize = 16;

pub const PORTABLE: &str = "portable/slice4";
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub const X86_CRC32L: &str = "x86/sse4.2-crc32l";
#[cfg(target_arch = "x86_64")]
pub const X86_64_CRC32Q: &str = "x86_64/sse4.2-crc32q";
#[cfg(target_arch = "aarch64")]
pub const AARCH64_CRC32CW: &str = "aarch64/crc32cw";
#[cfg(target_arch = "x86_64")]
pub const X86_64_PCLMUL: &str = "x86_64/pclmul-fold";

#[cfg(target_arch = "x86_64")]
pub(crate) const STEP_CANDIDATES: &[Candidate<StepFn>] = candidates![
  X86_64_CRC32Q => x86::CRC32_READY => crate::x86::step_crc32q,
  X86_CRC32L => x86::CRC32_READY => crate::x86::step_crc32l,
  PORTABLE => Caps::NONE => portable::step_portable,
];

#[cfg(target_arch = "x86")]
pub(crate) const STEP_CANDIDATES: &[Candidate<StepFn>] = candidates![
  X86_CRC32L => x86::CRC32_READY => crate::x86::step_crc32l,
  PORTABLE => Caps::NONE => portable::step_portable,
];

#[cfg(target_arch = "aarch64")]
pub(crate) const STEP_CANDIDATES: &[Candidate<StepFn>] = candidates![
  AARCH64_CRC32CW => aarch64::CRC_READY => crate::aarch64::step_crc32cw,
  PORTABLE => Caps::NONE => portable::step_portable,
];

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
pub(crate) const STEP_CANDIDATES: &[Candidate<StepFn>] = candidates![
  PORTABLE => Caps::NONE => portable::step_portable,
];

#[cfg(target_arch = "x86_64")]
pub(crate) const BATCH_CANDIDATES: &[Candidate<BatchFn>] = candidates![
  X86_64_PCLMUL => x86::PCLMUL_READY => crate::pclmul::fold,
];

#[cfg(not(target_arch = "x86_64"))]
pub(crate) const BATCH_CANDIDATES: &[Candidate<BatchFn>] = &[];

/// The software step, always available.
#[must_use]
pub const fn portable_step() -> Selected<StepFn> {
  Selected::new(PORTABLE, portable::step_portable)
}

/// Best step runnable with `caps`.
#[must_use]
pub(crate) fn best_step(caps: Caps) -> Selected<StepFn> {
  backend::select(caps, STEP_CANDIDATES).unwrap_or(portable_step())
}

/// Best batch kernel runnable with `caps`, if any.
#[must_use]
pub(crate) fn best_batch(caps: Caps) -> Option<Selected<BatchFn>> {
  backend::select(caps, BATCH_CANDIDATES)
}

/// Every step variant runnable with `caps`, best first.
pub(crate) fn steps(caps: Caps) -> impl Iterator<Item = Selected<StepFn>> {
  backend::runnable(caps, STEP_CANDIDATES)
}

/// Every batch variant runnable with `caps`, best first.
pub(crate) fn batches(caps: Caps) -> impl Iterator<Item = Selected<BatchFn>> {
  backend::runnable(caps, BATCH_CANDIDATES)
}

/// Step kernel a force mode pins, or `None` for [`Crc32cForce::Auto`] and
/// for modes this architecture has no kernel for.
#[must_use]
pub(crate) const fn forced_step_name(force: Crc32cForce) -> Option<&'static str> {
  match force {
    Crc32cForce::Auto => None,
    Crc32cForce::Portable => Some(PORTABLE),
    Crc32cForce::Hwcrc32 => {
      #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
      {
        Some(X86_CRC32L)
      }
      #[cfg(target_arch = "aarch64")]
      {
        Some(AARCH64_CRC32CW)
      }
      #[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
      {
        None
      }
    }
    Crc32cForce::Hwcrc64 => {
      #[cfg(target_arch = "x86_64")]
      {
        Some(X86_64_CRC32Q)
      }
      #[cfg(not(target_arch = "x86_64"))]
      {
        None
      }
    }
  }
}

/// The step a force mode pins, if that kernel can run with `caps`.
#[must_use]
pub(crate) fn forced_step(force: Crc32cForce, caps: Caps) -> Option<Selected<StepFn>> {
  let name = forced_step_name(force)?;
  steps(caps).find(|s| s.name == name)
}

#[cfg(test)]
mod tests {
  use alloc::vec::Vec;

  use super::*;

  #[test]
  fn candidate_lists_end_with_portable() {
    let last = STEP_CANDIDATES.last().unwrap();
    assert_eq!(last.name, PORTABLE);
    assert!(last.requires.is_empty());
  }

  #[test]
  fn no_caps_selects_portable_without_batch() {
    assert_eq!(best_step(Caps::NONE).name, PORTABLE);
    assert!(best_batch(Caps::NONE).is_none());
    assert_eq!(steps(Caps::NONE).count(), 1);
  }

  #[test]
  fn names_are_unique() {
    let mut names: Vec<&str> = STEP_CANDIDATES
      .iter()
      .map(|c| c.name)
      .chain(BATCH_CANDIDATES.iter().map(|c| c.name))
      .collect();
    let before = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), before);
  }

  #[test]
  fn every_step_matches_portable() {
    let word = *b"\x00\x01\x7F\x80\xFE\xFFab";
    for step in steps(platform::caps()) {
      for acc in [0u64, 0xFFFF_FFFF, 0x8000_0001] {
        assert_eq!((step.func)(acc, &word), portable::step_portable(acc, &word), "{}", step.name);
      }
    }
  }

  #[test]
  fn portable_force_always_resolves() {
    assert_eq!(forced_step(Crc32cForce::Portable, Caps::NONE).unwrap().name, PORTABLE);
    assert!(forced_step(Crc32cForce::Auto, platform::caps()).is_none());
    assert!(forced_step(Crc32cForce::Hwcrc32, Caps::NONE).is_none());
    assert!(forced_step(Crc32cForce::Hwcrc64, Caps::NONE).is_none());
  }
}
