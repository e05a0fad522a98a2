//! Non-cryptographic checksum trait.

use core::fmt::Debug;

/// Non-cryptographic checksum algorithm.
///
/// # Usage
///
/// ```rust,ignore
/// use castagnoli::{Checksum, Crc32c};
///
/// // One-shot
/// let crc = Crc32c::checksum(b"hello world");
///
/// // Streaming
/// let mut hasher = Crc32c::new();
/// hasher.update(b"hello ");
/// hasher.update(b"world");
/// assert_eq!(hasher.finalize(), crc);
/// ```
///
/// # Implementor Requirements
///
/// - `new()` must return the same state as `Default::default()`
/// - `finalize()` must be idempotent
/// - `reset()` must restore the state the hasher was constructed with
pub trait Checksum: Clone + Default {
  /// Output size in bytes.
  const OUTPUT_SIZE: usize;

  /// The checksum output type.
  type Output: Copy + Eq + Debug + Default;

  /// Create a new hasher with the default initial value.
  #[must_use]
  fn new() -> Self;

  /// Create a hasher that continues from a previously finalized checksum.
  #[must_use]
  fn with_initial(initial: Self::Output) -> Self;

  /// Fold more data into the running checksum.
  fn update(&mut self, data: &[u8]);

  /// Update with several non-contiguous buffers, in order.
  ///
  /// Identical to calling [`update`](Self::update) on each buffer.
  #[inline]
  fn update_vectored(&mut self, bufs: &[&[u8]]) {
    for buf in bufs {
      self.update(buf);
    }
  }

  /// Update with `std::io::IoSlice` buffers.
  #[cfg(feature = "std")]
  #[inline]
  fn update_io_slices(&mut self, bufs: &[std::io::IoSlice<'_>]) {
    for buf in bufs {
      self.update(buf);
    }
  }

  /// Return the checksum of everything processed so far.
  ///
  /// Does not consume the hasher; further updates remain possible.
  #[must_use]
  fn finalize(&self) -> Self::Output;

  /// Reset the hasher to its initial state.
  fn reset(&mut self);

  /// Compute the checksum of `data` in one shot.
  #[inline]
  #[must_use]
  fn checksum(data: &[u8]) -> Self::Output {
    let mut h = Self::new();
    h.update(data);
    h.finalize()
  }

  /// Compute the checksum of several buffers in one shot.
  #[inline]
  #[must_use]
  fn checksum_vectored(bufs: &[&[u8]]) -> Self::Output {
    let mut h = Self::new();
    h.update_vectored(bufs);
    h.finalize()
  }
}
