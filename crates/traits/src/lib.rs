//! Checksum traits for the castagnoli workspace.
//!
//! The algorithm crate implements [`Checksum`] for its hasher type so generic
//! code (property tests, fuzz targets, benches) can drive any checksum through
//! one interface.
//!
//! This crate is `no_std` and has zero dependencies.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod checksum;

pub use checksum::Checksum;
