//! Kernel selection and caching.
//!
//! - [`Candidate`]: a kernel with capability requirements
//! - [`Selected`]: the outcome of selection
//! - [`select`]: choose the best kernel from a candidate list
//! - [`Dispatcher`]: run a selector once and cache the outcome

use platform::Caps;

/// A kernel with capability requirements.
///
/// Candidate lists are ordered best to worst.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<F> {
  /// Diagnostic name, e.g. `"x86_64/sse4.2-crc32q"`.
  pub name: &'static str,
  /// Features that must all be present to run `func`.
  pub requires: Caps,
  pub func: F,
}

impl<F> Candidate<F> {
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, requires: Caps, func: F) -> Self {
    Self { name, requires, func }
  }
}

/// The result of kernel selection.
#[derive(Clone, Copy, Debug)]
pub struct Selected<F> {
  pub name: &'static str,
  pub func: F,
}

impl<F> Selected<F> {
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, func: F) -> Self {
    Self { name, func }
  }
}

/// Build a candidate slice: `name => requires => func`, best first.
#[macro_export]
macro_rules! candidates {
  ($($name:expr => $requires:expr => $func:expr),+ $(,)?) => {
    &[$($crate::dispatch::Candidate::new($name, $requires, $func)),+]
  };
}

/// Select the first candidate whose `requires` is satisfied by `caps`.
///
/// Returns `None` when nothing matches. Lists that end with a
/// `Caps::NONE` entry always match.
#[inline]
#[must_use]
pub fn select<F: Copy>(caps: Caps, candidates: &[Candidate<F>]) -> Option<Selected<F>> {
  candidates
    .iter()
    .find(|c| caps.has(c.requires))
    .map(|c| Selected::new(c.name, c.func))
}

/// Every candidate runnable with `caps`, in list order.
pub fn runnable<F: Copy>(caps: Caps, candidates: &[Candidate<F>]) -> impl Iterator<Item = Selected<F>> + '_ {
  candidates
    .iter()
    .filter(move |c| caps.has(c.requires))
    .map(|c| Selected::new(c.name, c.func))
}

/// Caches the result of a selector function.
///
/// The selector runs once. With `std` the result is stored in a `OnceLock`;
/// without `std` it is stored in an atomic once-cell, and threads racing the
/// first call spin until the winner has published.
pub struct Dispatcher<F: Copy + 'static> {
  #[cfg(feature = "std")]
  inner: std::sync::OnceLock<Selected<F>>,
  #[cfg(not(feature = "std"))]
  inner: once::OnceCell<Selected<F>>,
  selector: fn() -> Selected<F>,
}

impl<F: Copy + 'static> Dispatcher<F> {
  #[must_use]
  pub const fn new(selector: fn() -> Selected<F>) -> Self {
    Self {
      #[cfg(feature = "std")]
      inner: std::sync::OnceLock::new(),
      #[cfg(not(feature = "std"))]
      inner: once::OnceCell::new(),
      selector,
    }
  }

  /// The selected kernel, initializing on first call.
  #[inline]
  #[must_use]
  pub fn get(&self) -> Selected<F> {
    *self.inner.get_or_init(self.selector)
  }

  #[inline]
  #[must_use]
  pub fn backend_name(&self) -> &'static str {
    self.get().name
  }
}

#[cfg(not(feature = "std"))]
mod once {
  #![allow(unsafe_code)]

  use core::{
    cell::UnsafeCell,
    hint,
    mem::MaybeUninit,
    sync::atomic::{AtomicU8, Ordering},
  };

  const UNINIT: u8 = 0;
  const RUNNING: u8 = 1;
  const READY: u8 = 2;

  /// Write-once cell for `no_std`: `UNINIT -> RUNNING -> READY`.
  pub(super) struct OnceCell<T> {
    state: AtomicU8,
    value: UnsafeCell<MaybeUninit<T>>,
  }

  // SAFETY: `value` is written only by the thread that moved `state` from
  // UNINIT to RUNNING, and read only after READY was stored with Release.
  unsafe impl<T: Send + Sync> Sync for OnceCell<T> {}

  impl<T> OnceCell<T> {
    pub(super) const fn new() -> Self {
      Self {
        state: AtomicU8::new(UNINIT),
        value: UnsafeCell::new(MaybeUninit::uninit()),
      }
    }

    pub(super) fn get_or_init(&self, init: fn() -> T) -> &T {
      if self.state.load(Ordering::Acquire) != READY {
        match self.state.compare_exchange(UNINIT, RUNNING, Ordering::Acquire, Ordering::Acquire) {
          Ok(_) => {
            let value = init();
            // SAFETY: this thread won UNINIT -> RUNNING; no one else writes or reads yet.
            unsafe { (*self.value.get()).write(value) };
            self.state.store(READY, Ordering::Release);
          }
          Err(_) => {
            while self.state.load(Ordering::Acquire) != READY {
              hint::spin_loop();
            }
          }
        }
      }
      // SAFETY: state is READY, so the value was initialized and is never written again.
      unsafe { (*self.value.get()).assume_init_ref() }
    }
  }

}

#[cfg(test)]
mod tests {
  use core::sync::atomic::{AtomicUsize, Ordering};

  use platform::caps::x86;

  use super::*;

  type TestFn = fn(u32, &[u8]) -> u32;

  fn portable(_crc: u32, _data: &[u8]) -> u32 {
    0xDEAD_BEEF
  }

  fn fast(_crc: u32, _data: &[u8]) -> u32 {
    0xCAFE_BABE
  }

  #[test]
  fn candidate_creation() {
    let c: Candidate<TestFn> = Candidate::new("test", Caps::NONE, portable);
    assert_eq!(c.name, "test");
    assert_eq!(c.requires, Caps::NONE);
  }

  #[test]
  fn select_falls_back_to_portable() {
    let list: &[Candidate<TestFn>] = candidates![
      "fast" => x86::SSE42 => fast,
      "portable" => Caps::NONE => portable,
    ];
    let selected = select(Caps::NONE, list).unwrap();
    assert_eq!(selected.name, "portable");
    assert_eq!((selected.func)(0, &[]), 0xDEAD_BEEF);
  }

  #[test]
  fn select_prefers_first_match() {
    let list: &[Candidate<TestFn>] = candidates![
      "needs-pclmul" => x86::PCLMUL_READY => fast,
      "needs-sse42" => x86::SSE42 => fast,
      "portable" => Caps::NONE => portable,
    ];
    let selected = select(x86::SSE42 | x86::SSE41, list).unwrap();
    assert_eq!(selected.name, "needs-sse42");
    assert_eq!((selected.func)(0, &[]), 0xCAFE_BABE);
  }

  #[test]
  fn select_without_fallback_is_none() {
    let list: &[Candidate<TestFn>] = candidates!["fast" => x86::SSE42 => fast];
    assert!(select(Caps::NONE, list).is_none());
  }

  #[test]
  fn runnable_filters_in_order() {
    let list: &[Candidate<TestFn>] = candidates![
      "a" => x86::PCLMUL_READY => fast,
      "b" => x86::SSE42 => fast,
      "c" => Caps::NONE => portable,
    ];
    let names: [&str; 2] = {
      let mut it = runnable(x86::SSE42, list).map(|s| s.name);
      [it.next().unwrap(), it.next().unwrap()]
    };
    assert_eq!(names, ["b", "c"]);
  }

  fn test_selector() -> Selected<TestFn> {
    Selected::new("test", portable)
  }

  static SELECTOR_RUNS: AtomicUsize = AtomicUsize::new(0);

  fn counting_selector() -> Selected<TestFn> {
    SELECTOR_RUNS.fetch_add(1, Ordering::Relaxed);
    Selected::new("counted", fast)
  }

  #[test]
  fn dispatcher_runs_selector_once() {
    static DISPATCH: Dispatcher<TestFn> = Dispatcher::new(counting_selector);
    for _ in 0..5 {
      assert_eq!(DISPATCH.get().name, "counted");
    }
    assert_eq!(DISPATCH.backend_name(), "counted");
    assert_eq!(SELECTOR_RUNS.load(Ordering::Relaxed), 1);
  }

  #[test]
  fn dispatcher_caches_selection() {
    static DISPATCH: Dispatcher<TestFn> = Dispatcher::new(test_selector);
    assert_eq!(DISPATCH.get().name, "test");
    assert_eq!(DISPATCH.backend_name(), "test");
    assert_eq!((DISPATCH.get().func)(0, &[]), 0xDEAD_BEEF);
  }
}
