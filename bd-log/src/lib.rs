// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

#![deny(
  clippy::expect_used,
  clippy::panic,
  clippy::todo,
  clippy::unimplemented,
  clippy::unreachable,
  clippy::unwrap_used
)]

#[cfg(test)]
#[path = "./lib_test.rs"]
mod lib_test;

pub mod rate_limit_log;

use parking_lot::Mutex;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::reload::Handle as ReloadHandle;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

const DEFAULT_FILTER_RULES: &str = "info";

//
// Error
//

#[derive(thiserror::Error, Debug)]
pub enum Error {
  #[error("diagnostics logging has not been initialized")]
  NotInitialized,
  #[error("invalid filter rules {rules:?}: {source}")]
  InvalidFilter {
    rules: String,
    #[source]
    source: ParseError,
  },
  #[error("unable to reload filter: {0}")]
  Reload(#[from] tracing_subscriber::reload::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Parses filter rules in `RUST_LOG` syntax, failing on directives the filter would otherwise
/// silently ignore.
pub fn parse_filter(rules: &str) -> Result<EnvFilter> {
  EnvFilter::try_new(rules).map_err(|source| Error::InvalidFilter {
    rules: rules.to_string(),
    source,
  })
}

//
// SwapLogger
//

// Process wide diagnostics logging. Both `tracing` events and `log` records (bridged via
// tracing-log) end up on stderr, filtered by a filter that can be swapped at runtime.
#[derive(Default)]
pub struct SwapLogger {
  handle: Mutex<Option<ReloadHandle<EnvFilter, Registry>>>,
}

impl SwapLogger {
  const fn new() -> Self {
    Self {
      handle: Mutex::new(None),
    }
  }

  fn get() -> &'static Self {
    static LOGGER: SwapLogger = SwapLogger::new();

    &LOGGER
  }

  // Install the diagnostics subscriber. Only the first call in a process has any effect, later
  // calls (e.g. from multiple test ctors) are ignored.
  pub fn initialize() {
    let mut handle = Self::get().handle.lock();
    if handle.is_some() {
      return;
    }

    // ANSI is opt in via BD_LOG_ANSI so that output captured by log collectors stays clean.
    let stderr = tracing_subscriber::fmt::layer()
      .with_writer(std::io::stderr)
      .with_ansi(std::env::var("BD_LOG_ANSI").is_ok())
      .with_line_number(true)
      .with_thread_ids(true)
      .compact();

    let filter = EnvFilter::new(
      std::env::var("RUST_LOG")
        .as_deref()
        .unwrap_or(DEFAULT_FILTER_RULES),
    );

    let (filter, reload_handle) = tracing_subscriber::reload::Layer::new(filter);
    if Registry::default()
      .with(filter)
      .with(stderr)
      .try_init()
      .is_ok()
    {
      *handle = Some(reload_handle);
    }
  }

  #[must_use]
  pub fn is_initialized() -> bool {
    Self::get().handle.lock().is_some()
  }

  // Swap in a new filter using RUST_LOG syntax.
  pub fn swap(new_rust_log: &str) -> Result<()> {
    let filter = parse_filter(new_rust_log)?;
    Self::get()
      .handle
      .lock()
      .as_ref()
      .ok_or(Error::NotInitialized)?
      .reload(filter)?;

    // tracing-subscriber does not keep the log facade max level in sync on reload.
    log::set_max_level(tracing_log::AsLog::as_log(
      &tracing_subscriber::filter::LevelFilter::current(),
    ));
    tracing::debug!("swapped diagnostics filter to {new_rust_log:?}");

    Ok(())
  }
}
