//! Published CRC32C vectors and differential checks against other crates.

use castagnoli::{Checksum, Crc32c, Engine};
use crc_fast::CrcAlgorithm;

const CRC32C_CHECK: u32 = 0xE306_9283;

/// RFC 3720 (iSCSI) B.4 vectors.
fn iscsi_vectors() -> [(Vec<u8>, u32); 4] {
  [
    (vec![0x00; 32], 0x8A91_36AA),
    (vec![0xFF; 32], 0x62A8_AB43),
    ((0u8..32).collect(), 0x46DD_794E),
    ((0u8..32).rev().collect(), 0x113F_DB5C),
  ]
}

#[test]
fn check_string() {
  let result = castagnoli::value(b"123456789");
  assert_eq!(
    result, CRC32C_CHECK,
    "CRC32C mismatch: got {result:#010X}, expected {CRC32C_CHECK:#010X}"
  );
}

#[test]
fn iscsi_vectors_on_every_engine() {
  for engine in Engine::available() {
    for (data, expected) in iscsi_vectors() {
      let got = engine.extend(0, &data);
      assert_eq!(got, expected, "{}: got {got:#010X}, expected {expected:#010X}", engine.name());
    }
  }
}

#[test]
fn empty_input() {
  assert_eq!(castagnoli::value(&[]), 0);
  assert_eq!(Crc32c::checksum(&[]), 0);
  for crc in [0, CRC32C_CHECK, u32::MAX] {
    assert_eq!(castagnoli::extend(crc, &[]), crc);
  }
}

#[test]
fn matches_crc32c_crate() {
  let data: Vec<u8> = (0..70_000u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8).collect();
  for len in [0usize, 1, 7, 8, 15, 16, 63, 64, 255, 256, 257, 4095, 4096, 65_537, 70_000] {
    let d = &data[..len];
    assert_eq!(castagnoli::value(d), crc32c::crc32c(d), "len={len}");
  }
}

#[test]
fn matches_crc_fast() {
  let data: Vec<u8> = (0..10_000u32).map(|i| (i ^ (i >> 5)) as u8).collect();
  for len in [0usize, 3, 32, 100, 512, 1000, 9999] {
    let d = &data[..len];
    let reference = crc_fast::checksum(CrcAlgorithm::Crc32Iscsi, d) as u32;
    assert_eq!(castagnoli::value(d), reference, "len={len}");
  }
}

#[test]
fn extend_matches_crc32c_append() {
  let a = b"The quick brown fox ";
  let b = b"jumps over the lazy dog";
  let ours = castagnoli::extend(castagnoli::value(a), b);
  assert_eq!(ours, crc32c::crc32c_append(crc32c::crc32c(a), b));
}

#[test]
fn masked_values_are_stable() {
  let crc = castagnoli::value(b"foo");
  assert_eq!(castagnoli::mask(crc), 0xFEBE_8A61);
  assert_eq!(castagnoli::unmask(0xFEBE_8A61), crc);
}
