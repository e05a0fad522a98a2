//! Engine selection and the alignment driver.
//!
//! An [`Engine`] is one fixed capability decision: a step kernel, an optional
//! batch kernel and the batch threshold. The process-wide engine is resolved
//! once through [`backend::Dispatcher`] and every call reuses it.
//!
//! The driver, per call:
//!
//! 1. complements `crc` into the raw register;
//! 2. hands the longest 16-byte-multiple prefix to the batch kernel when the
//!    input is at least `batch_min_len` bytes, returning early if nothing is left;
//! 3. steps single bytes until the cursor address is 4-byte aligned;
//! 4. runs the step kernel over 16-byte groups, then one 8-byte group;
//! 5. steps the remaining tail bytes;
//! 6. complements the register back.
//!
//! Alignment never changes the result.

use backend::{Dispatcher, Selected};
use platform::Caps;

use crate::{
  config::{self, Crc32cConfig, Crc32cForce},
  kernels::{self, BATCH_BLOCK, BatchFn, MIN_BATCH_LEN, StepFn},
  portable,
};

/// A resolved set of kernels.
#[derive(Clone, Copy, Debug)]
pub struct Engine {
  step: Selected<StepFn>,
  batch: Option<Selected<BatchFn>>,
  batch_min_len: usize,
}

impl Engine {
  /// Build an engine from explicit kernels. `batch_min_len` is raised to at least 64.
  #[must_use]
  pub fn new(step: Selected<StepFn>, batch: Option<Selected<BatchFn>>, batch_min_len: usize) -> Self {
    Self {
      step,
      batch,
      batch_min_len: batch_min_len.max(MIN_BATCH_LEN),
    }
  }

  /// The table engine alone. Always available.
  #[must_use]
  pub fn portable() -> Self {
    Self::new(kernels::portable_step(), None, MIN_BATCH_LEN)
  }

  /// Resolve an engine for `caps` under `cfg`.
  ///
  /// `caps` is intersected with the detected hardware, so a kernel the CPU
  /// cannot run is never selected.
  #[must_use]
  pub fn for_caps(caps: Caps, cfg: &Crc32cConfig) -> Self {
    Self::within(caps, platform::detected(), cfg)
  }

  pub(crate) fn within(caps: Caps, hardware: Caps, cfg: &Crc32cConfig) -> Self {
    let caps = caps.intersection(hardware);
    let step = match cfg.effective_force {
      Crc32cForce::Auto => kernels::best_step(caps),
      forced => kernels::forced_step(forced, caps).unwrap_or_else(|| kernels::best_step(caps)),
    };
    let batch = if cfg.batch { kernels::best_batch(caps) } else { None };
    Self::new(step, batch, cfg.batch_min_len)
  }

  /// Resolve an engine from detected capabilities and the process configuration.
  #[must_use]
  pub fn detect() -> Self {
    Self::for_caps(platform::caps(), &config::get())
  }

  /// Every engine runnable on this machine: each step kernel alone, then
  /// each batch kernel over the best step with the smallest threshold.
  pub fn available() -> impl Iterator<Item = Self> {
    let caps = platform::caps();
    let best = kernels::best_step(caps);
    kernels::steps(caps)
      .map(|step| Self::new(step, None, MIN_BATCH_LEN))
      .chain(kernels::batches(caps).map(move |batch| Self::new(best, Some(batch), MIN_BATCH_LEN)))
  }

  #[inline]
  #[must_use]
  pub fn step_name(&self) -> &'static str {
    self.step.name
  }

  #[inline]
  #[must_use]
  pub fn batch_name(&self) -> Option<&'static str> {
    self.batch.map(|b| b.name)
  }

  #[inline]
  #[must_use]
  pub fn batch_min_len(&self) -> usize {
    self.batch_min_len
  }

  /// Combined diagnostic name, e.g. `"x86_64/sse4.2-crc32q+x86_64/pclmul-fold"`.
  #[must_use]
  pub fn name(&self) -> EngineName {
    EngineName(self.step.name, self.batch_name())
  }

  /// Extend `crc` with `data`.
  #[must_use]
  pub fn extend(&self, crc: u32, data: &[u8]) -> u32 {
    let mut state = !crc;
    let mut rest = data;

    if let Some(batch) = self.batch
      && data.len() >= self.batch_min_len
    {
      let (head, tail) = data.split_at(data.len() - data.len() % BATCH_BLOCK);
      state = (batch.func)(state, head);
      if tail.is_empty() {
        return !state;
      }
      rest = tail;
    }

    !drive(self.step.func, state, rest)
  }
}

impl Default for Engine {
  fn default() -> Self {
    Self::portable()
  }
}

/// `step` or `step+batch`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineName(&'static str, Option<&'static str>);

impl core::fmt::Display for EngineName {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self.1 {
      Some(batch) => write!(f, "{}+{batch}", self.0),
      None => f.write_str(self.0),
    }
  }
}

/// Steps 3-5 of the driver on the raw register.
#[inline]
fn drive(step: StepFn, state: u32, data: &[u8]) -> u32 {
  let lead = data.as_ptr().align_offset(4).min(data.len());
  let (head, body) = data.split_at(lead);
  let state = portable::compute_bytewise(state, head);

  let (words, tail) = body.as_chunks::<8>();
  let (pairs, single) = words.as_chunks::<2>();

  let mut acc = u64::from(state);
  for [a, b] in pairs {
    acc = step(step(acc, a), b);
  }
  for w in single {
    acc = step(acc, w);
  }

  portable::compute_bytewise(acc as u32, tail)
}

fn select_engine() -> Selected<Engine> {
  let engine = Engine::detect();
  #[cfg(feature = "log")]
  log::debug!(
    "crc32c engine: {} (batch threshold {} bytes, caps {:?})",
    engine.name(),
    engine.batch_min_len,
    platform::caps()
  );
  Selected::new(engine.step.name, engine)
}

static ENGINE: Dispatcher<Engine> = Dispatcher::new(select_engine);

/// The process-wide engine.
#[inline]
#[must_use]
pub fn engine() -> Engine {
  ENGINE.get().func
}
