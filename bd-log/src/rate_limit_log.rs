// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

#[cfg(test)]
#[path = "./rate_limit_log_test.rs"]
mod rate_limit_log_test;

use parking_lot::Mutex;
use std::time::Instant;
use time::Duration;

//
// CallSiteLimiter
//

/// Remembers when a single call site last logged at full level. Used by the `*_every!` macros,
/// which keep one limiter per call site in a static.
#[derive(Default)]
pub struct CallSiteLimiter {
  last_emitted: Mutex<Option<Instant>>,
}

impl CallSiteLimiter {
  /// Returns true if more than `period` has passed since the last time this returned true. The
  /// first call always returns true.
  pub fn try_acquire(&self, period: Duration) -> bool {
    let now = Instant::now();
    let mut last_emitted = self.last_emitted.lock();
    match *last_emitted {
      Some(last) if now.duration_since(last) <= period.unsigned_abs() => false,
      _ => {
        *last_emitted = Some(now);
        true
      },
    }
  }
}

/// Logs at `$level` at most once per `$period` for the call site. Suppressed messages are still
/// emitted at debug level.
#[macro_export]
macro_rules! log_every {
  ($level:expr, $period:expr, $($arg:tt)+) => {{
    static LIMITER: ::std::sync::OnceLock<$crate::rate_limit_log::CallSiteLimiter> =
      ::std::sync::OnceLock::new();

    if LIMITER
      .get_or_init($crate::rate_limit_log::CallSiteLimiter::default)
      .try_acquire($period)
    {
      ::log::log!($level, $($arg)+);
    } else {
      ::log::debug!($($arg)+);
    }
  }};
}

#[macro_export]
macro_rules! warn_every {
  ($period:expr, $($arg:tt)+) => {
    $crate::log_every!(::log::Level::Warn, $period, $($arg)+)
  };
}

#[macro_export]
macro_rules! error_every {
  ($period:expr, $($arg:tt)+) => {
    $crate::log_every!(::log::Level::Error, $period, $($arg)+)
  };
}

pub use {error_every, log_every, warn_every};
