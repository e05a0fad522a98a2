//! Which kernels this process runs, and why.
//!
//! ```
//! let sel = castagnoli::introspect::selection();
//! println!("{sel}");
//! // e.g. "step=x86_64/sse4.2-crc32q batch=x86_64/pclmul-fold (>= 256 B) force=auto arch=x86_64 caps={...}"
//! ```

use core::fmt;

use platform::{Arch, Caps};

use crate::{
  config::{self, Crc32cForce},
  dispatch,
};

/// Snapshot of the process-wide kernel selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
  pub arch: Arch,
  /// Capabilities the selection was made against.
  pub caps: Caps,
  pub step: &'static str,
  pub batch: Option<&'static str>,
  pub batch_min_len: usize,
  pub requested_force: Crc32cForce,
  pub effective_force: Crc32cForce,
}

/// Inspect the process-wide selection. Never affects the hot path.
#[must_use]
pub fn selection() -> Selection {
  let engine = dispatch::engine();
  let cfg = config::get();
  Selection {
    arch: Arch::current(),
    caps: platform::caps(),
    step: engine.step_name(),
    batch: engine.batch_name(),
    batch_min_len: engine.batch_min_len(),
    requested_force: cfg.requested_force,
    effective_force: cfg.effective_force,
  }
}

impl fmt::Display for Selection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "step={}", self.step)?;
    match self.batch {
      Some(b) => write!(f, " batch={b} (>= {} B)", self.batch_min_len)?,
      None => f.write_str(" batch=none")?,
    }
    write!(f, " force={}", self.effective_force)?;
    if self.requested_force != self.effective_force {
      write!(f, " (requested {})", self.requested_force)?;
    }
    write!(f, " arch={} caps={:?}", self.arch, self.caps)
  }
}

#[cfg(test)]
mod tests {
  use alloc::string::ToString;

  use super::*;

  #[test]
  fn selection_is_stable() {
    assert_eq!(selection(), selection());
  }

  #[test]
  fn selection_matches_engine() {
    let sel = selection();
    assert_eq!(sel.step, crate::Crc32c::backend_name());
    assert!(sel.batch_min_len >= crate::kernels::MIN_BATCH_LEN);
    assert!(sel.caps.has(Caps::NONE));
  }

  #[test]
  fn display_mentions_kernels() {
    let sel = Selection {
      arch: Arch::Other,
      caps: Caps::NONE,
      step: "portable/slice4",
      batch: None,
      batch_min_len: 256,
      requested_force: Crc32cForce::Hwcrc64,
      effective_force: Crc32cForce::Auto,
    };
    assert_eq!(
      sel.to_string(),
      "step=portable/slice4 batch=none force=auto (requested hwcrc64) arch=other caps={}"
    );
  }
}
