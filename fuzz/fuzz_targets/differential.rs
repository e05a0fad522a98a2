//! Differential fuzzing against the `crc32c` crate.

#![no_main]

use castagnoli::{Checksum, Crc32c};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
  let ours = Crc32c::checksum(data);
  let reference = crc32c::crc32c(data);

  assert_eq!(
    ours,
    reference,
    "CRC32C differential mismatch: ours={ours:#010x}, reference={reference:#010x}, len={}",
    data.len()
  );
});
