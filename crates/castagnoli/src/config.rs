//! Runtime configuration: environment overrides for kernel selection.
//!
//! | Variable | Values |
//! |----------|--------|
//! | `CASTAGNOLI_FORCE` | `auto`, `portable` / `table`, `hwcrc32`, `hwcrc64` / `hwcrc` |
//! | `CASTAGNOLI_BATCH` | `on` / `1` / `true`, `off` / `0` / `false` |
//! | `CASTAGNOLI_BATCH_MIN_LEN` | bytes, clamped to at least 64 |
//!
//! Overrides are read once per process (std only; `no_std` builds always use
//! the defaults). Forced modes are clamped to detected CPU capabilities.

use core::{fmt, str::FromStr};

use platform::Caps;

use crate::kernels::{self, MIN_BATCH_LEN};

/// Environment variable selecting a step kernel.
pub const ENV_FORCE: &str = "CASTAGNOLI_FORCE";
/// Environment variable toggling the batch path.
pub const ENV_BATCH: &str = "CASTAGNOLI_BATCH";
/// Environment variable setting the batch threshold.
pub const ENV_BATCH_MIN_LEN: &str = "CASTAGNOLI_BATCH_MIN_LEN";

/// Default minimum length diverted to the batch path.
pub const DEFAULT_BATCH_MIN_LEN: usize = 256;

/// Forced step selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Crc32cForce {
  /// Best available kernels.
  #[default]
  Auto,
  /// Table engine only, batch path disabled.
  Portable,
  /// 32-bit hardware instruction (`crc32l`, `crc32cw`).
  Hwcrc32,
  /// 64-bit hardware instruction (`crc32q`).
  Hwcrc64,
}

impl Crc32cForce {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Portable => "portable",
      Self::Hwcrc32 => "hwcrc32",
      Self::Hwcrc64 => "hwcrc64",
    }
  }
}

impl fmt::Display for Crc32cForce {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Unrecognized force mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub struct ParseForceError;

impl fmt::Display for ParseForceError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("unknown CRC32C force mode (expected auto, portable, hwcrc32 or hwcrc64)")
  }
}

impl core::error::Error for ParseForceError {}

impl FromStr for Crc32cForce {
  type Err = ParseForceError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    let is = |name: &str| s.eq_ignore_ascii_case(name);

    if is("auto") {
      Ok(Self::Auto)
    } else if is("portable") || is("table") || is("scalar") {
      Ok(Self::Portable)
    } else if is("hwcrc32") || is("crc32l") || is("crc32cw") {
      Ok(Self::Hwcrc32)
    } else if is("hwcrc64") || is("hwcrc") || is("crc32q") {
      Ok(Self::Hwcrc64)
    } else {
      Err(ParseForceError)
    }
  }
}

/// Parse a boolean switch. Accepts `on/off`, `true/false`, `yes/no`, `1/0`.
#[must_use]
pub fn parse_switch(s: &str) -> Option<bool> {
  let s = s.trim();
  let is = |name: &str| s.eq_ignore_ascii_case(name);
  if is("on") || is("true") || is("yes") || s == "1" {
    Some(true)
  } else if is("off") || is("false") || is("no") || s == "0" {
    Some(false)
  } else {
    None
  }
}

/// Effective configuration after applying overrides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crc32cConfig {
  /// Requested force mode (environment).
  pub requested_force: Crc32cForce,
  /// Force mode clamped to detected CPU capabilities.
  pub effective_force: Crc32cForce,
  /// Whether the batch path may be used.
  pub batch: bool,
  /// Inputs shorter than this never take the batch path. Always `>= 64`.
  pub batch_min_len: usize,
}

impl Default for Crc32cConfig {
  fn default() -> Self {
    Self {
      requested_force: Crc32cForce::Auto,
      effective_force: Crc32cForce::Auto,
      batch: true,
      batch_min_len: DEFAULT_BATCH_MIN_LEN,
    }
  }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
  pub(crate) force: Crc32cForce,
  pub(crate) batch: Option<bool>,
  pub(crate) batch_min_len: Option<usize>,
}

impl Overrides {
  /// Parse raw override values. `lookup` returns the value of a variable.
  #[cfg(any(feature = "std", test))]
  pub(crate) fn parse<'a>(lookup: impl Fn(&str) -> Option<&'a str>) -> Self {
    let non_empty = |name| lookup(name).map(str::trim).filter(|v| !v.is_empty());

    let force = match non_empty(ENV_FORCE).map(str::parse::<Crc32cForce>) {
      Some(Ok(f)) => f,
      Some(Err(_err)) => {
        #[cfg(feature = "log")]
        log::warn!("ignoring {ENV_FORCE}: {_err}");
        Crc32cForce::Auto
      }
      None => Crc32cForce::Auto,
    };

    let batch = non_empty(ENV_BATCH).and_then(|v| {
      let parsed = parse_switch(v);
      #[cfg(feature = "log")]
      if parsed.is_none() {
        log::warn!("ignoring {ENV_BATCH}={v:?}: expected on or off");
      }
      parsed
    });

    let batch_min_len = non_empty(ENV_BATCH_MIN_LEN).and_then(|v| {
      let parsed = v.parse::<usize>().ok();
      #[cfg(feature = "log")]
      if parsed.is_none() {
        log::warn!("ignoring {ENV_BATCH_MIN_LEN}={v:?}: expected a byte count");
      }
      parsed
    });

    Self {
      force,
      batch,
      batch_min_len,
    }
  }
}

#[cfg(feature = "std")]
fn overrides() -> Overrides {
  use std::{string::String, sync::OnceLock};

  static OVERRIDES: OnceLock<Overrides> = OnceLock::new();
  *OVERRIDES.get_or_init(|| {
    let vars: [(&str, Option<String>); 3] =
      [ENV_FORCE, ENV_BATCH, ENV_BATCH_MIN_LEN].map(|k| (k, std::env::var(k).ok()));
    Overrides::parse(|name| vars.iter().find(|(k, _)| *k == name).and_then(|(_, v)| v.as_deref()))
  })
}

#[cfg(not(feature = "std"))]
fn overrides() -> Overrides {
  Overrides::default()
}

/// Clamp a requested force mode to what `caps` can run; unavailable kernels fall back to `Auto`.
///
/// `caps` is bounded by the detected hardware.
#[must_use]
pub fn clamp_force_to_caps(requested: Crc32cForce, caps: Caps) -> Crc32cForce {
  match requested {
    Crc32cForce::Auto | Crc32cForce::Portable => requested,
    Crc32cForce::Hwcrc32 | Crc32cForce::Hwcrc64 => {
      if kernels::forced_step(requested, caps.intersection(platform::detected())).is_some() {
        requested
      } else {
        Crc32cForce::Auto
      }
    }
  }
}

pub(crate) fn resolve(ov: Overrides, caps: Caps) -> Crc32cConfig {
  let effective_force = clamp_force_to_caps(ov.force, caps);
  let defaults = Crc32cConfig::default();
  Crc32cConfig {
    requested_force: ov.force,
    effective_force,
    batch: effective_force != Crc32cForce::Portable && ov.batch.unwrap_or(defaults.batch),
    batch_min_len: ov.batch_min_len.unwrap_or(defaults.batch_min_len).max(MIN_BATCH_LEN),
  }
}

/// The effective configuration for this process.
#[must_use]
pub fn get() -> Crc32cConfig {
  resolve(overrides(), platform::caps())
}
