//! CPU capability detection for the castagnoli workspace.
//!
//! This crate answers one question for the checksum kernels: which of the
//! CRC-relevant instructions can run on this machine?
//!
//! ```ignore
//! use platform::caps::x86;
//!
//! if platform::caps().has(x86::CRC32_READY) {
//!     // SSE4.2 crc32 instructions are usable
//! }
//! ```
//!
//! Compile-time features (`cfg!(target_feature = ...)`) are always included.
//! With `std`, runtime detection is added and cached in a `OnceLock`; without
//! it, the result is cached in atomics. Under Miri the answer is always
//! [`Caps::NONE`].

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
mod detect;

pub use caps::{Arch, Caps};
pub use detect::{caps, detect_uncached, detected, has_override, set_caps_override};
