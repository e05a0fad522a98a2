//! Fuzz target for the CRC32C API.
//!
//! Tests that:
//! - No panics on arbitrary input
//! - Every engine agrees with the selected one
//! - Streaming, extend and resume agree with one-shot
//! - Masking round-trips

#![no_main]

use arbitrary::Arbitrary;
use castagnoli::{Checksum, Crc32c, Engine};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  data: Vec<u8>,
  split_point: usize,
  /// Chunk sizes for streaming updates
  chunk_sizes: Vec<u8>,
  offset: u8,
}

fuzz_target!(|input: Input| {
  let offset = usize::from(input.offset % 8).min(input.data.len());
  let data = &input.data[offset..];
  let split = input.split_point % (data.len() + 1);

  let oneshot = castagnoli::value(data);

  for engine in Engine::available() {
    assert_eq!(engine.extend(0, data), oneshot, "{} mismatch", engine.name());
  }

  let (a, b) = data.split_at(split);
  assert_eq!(castagnoli::extend(castagnoli::value(a), b), oneshot, "extend mismatch");

  let mut resumed = Crc32c::resume(Crc32c::checksum(a));
  resumed.update(b);
  assert_eq!(resumed.finalize(), oneshot, "resume mismatch");

  let mut hasher = Crc32c::new();
  let mut rest = data;
  let mut sizes = input.chunk_sizes.iter().cycle();
  while !rest.is_empty() {
    let size = sizes.next().map_or(1, |&s| usize::from(s).max(1)).min(rest.len());
    let (chunk, tail) = rest.split_at(size);
    hasher.update(chunk);
    rest = tail;
  }
  assert_eq!(hasher.finalize(), oneshot, "streaming mismatch");

  assert_eq!(castagnoli::unmask(castagnoli::mask(oneshot)), oneshot, "mask mismatch");
});
