//! Slicing-by-4 lookup table generation.

// Loop indices stay below 256 and table indices are masked with `& 0xFF`.
#![allow(clippy::indexing_slicing)]

/// Reflected byte table (table 0) for `poly`.
pub(crate) const fn table_0(poly: u32) -> [u32; 256] {
  let mut table = [0u32; 256];
  let mut i = 0usize;
  while i < 256 {
    let mut crc = i as u32;
    let mut j = 0;
    while j < 8 {
      crc = if crc & 1 != 0 { (crc >> 1) ^ poly } else { crc >> 1 };
      j += 1;
    }
    table[i] = crc;
    i += 1;
  }
  table
}

/// All four slicing tables: `t[k+1][b] = t[0][t[k][b] & 0xFF] ^ (t[k][b] >> 8)`.
pub(crate) const fn slicing_tables(poly: u32) -> [[u32; 256]; 4] {
  let mut tables = [[0u32; 256]; 4];
  tables[0] = table_0(poly);

  let mut k = 1;
  while k < 4 {
    let mut i = 0;
    while i < 256 {
      let prev = tables[k - 1][i];
      tables[k][i] = tables[0][(prev & 0xFF) as usize] ^ (prev >> 8);
      i += 1;
    }
    k += 1;
  }
  tables
}

#[cfg(test)]
mod tests {
  use super::super::{POLYNOMIAL, TABLES};

  #[test]
  fn table_0_spot_checks() {
    let t = &TABLES.0[0];
    assert_eq!(t[0], 0);
    assert_eq!(t[1], 0xF26B_8303);
    assert_eq!(t[128], POLYNOMIAL);
    assert_eq!(t[255], 0xAD7D_5351);
  }

  #[test]
  fn higher_tables_spot_checks() {
    assert_eq!(TABLES.0[1][1], 0x13A2_9877);
    assert_eq!(TABLES.0[2][1], 0xA541_927E);
    assert_eq!(TABLES.0[3][1], 0xDD45_AAB8);
    for k in 0..4 {
      assert_eq!(TABLES.0[k][0], 0, "table {k} must map zero to zero");
    }
  }

  #[test]
  fn tables_are_cache_line_aligned() {
    assert_eq!(core::ptr::from_ref(&TABLES.0).addr() % 64, 0);
  }

  #[test]
  fn each_table_is_linear() {
    // CRC tables are GF(2)-linear in the index.
    for k in 0..4 {
      let t = &TABLES.0[k];
      for a in [0x01usize, 0x5A, 0x80, 0xC3] {
        for b in [0x02usize, 0x11, 0x7F, 0xFF] {
          assert_eq!(t[a ^ b], t[a] ^ t[b]);
        }
      }
    }
  }
}
