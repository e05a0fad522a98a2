//! Kernel dispatch for the castagnoli workspace.
//!
//! Algorithm crates register kernels as an ordered list of [`Candidate`]s,
//! best first, and let [`select`] pick the first one whose requirements the
//! detected [`Caps`] satisfy. A [`Dispatcher`] runs that selection once and
//! caches the result.
//!
//! ```ignore
//! use backend::{Candidate, Selected, candidates, select};
//! use platform::caps::{Caps, x86};
//!
//! const STEPS: &[Candidate<StepFn>] = candidates![
//!   "x86_64/sse4.2-crc32q" => x86::CRC32_READY => crc32q_step,
//!   "portable/slice4"      => Caps::NONE       => portable_step,
//! ];
//!
//! fn select_step() -> Selected<StepFn> {
//!   select(platform::caps(), STEPS).unwrap_or(Selected::new("portable/slice4", portable_step))
//! }
//! ```
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod dispatch;

pub use dispatch::{Candidate, Dispatcher, Selected, runnable, select};
pub use platform::{self, Caps};
