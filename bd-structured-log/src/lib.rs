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


pub mod config;
pub mod encoder;
pub mod facade;
pub mod field;
pub mod json;

pub use config::{ConfigError, DurationEncoding, JsonLoggerConfig, LogFacadeConfig, TimeEncoding};
pub use facade::LogFacadeLogger;
pub use field::{
  ERROR_FIELD_KEY,
  Field,
  FieldValue,
  LogFieldKey,
  LogMarshaler,
  MarshalError,
  ObjectEncoder,
};
pub use json::JsonLogger;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[cfg(test)]
#[ctor::ctor]
fn test_global_init() {
  bd_test_helpers::test_global_init();
}

//
// Level
//

/// Severity of a log record. Ordering follows severity, so `level >= threshold` means the record
/// passes a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
  Debug,
  Info,
  #[serde(alias = "warning")]
  Warn,
  Error,
}

impl Level {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Debug => "debug",
      Self::Info => "info",
      Self::Warn => "warn",
      Self::Error => "error",
    }
  }
}

impl std::fmt::Display for Level {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown log level {0:?}")]
pub struct ParseLevelError(String);

impl FromStr for Level {
  type Err = ParseLevelError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "debug" => Ok(Self::Debug),
      "info" => Ok(Self::Info),
      "warn" | "warning" => Ok(Self::Warn),
      "error" => Ok(Self::Error),
      _ => Err(ParseLevelError(s.to_string())),
    }
  }
}

impl From<Level> for log::Level {
  fn from(level: Level) -> Self {
    match level {
      Level::Debug => Self::Debug,
      Level::Info => Self::Info,
      Level::Warn => Self::Warn,
      Level::Error => Self::Error,
    }
  }
}

//
// StructuredLogger
//

/// A leveled logger that writes a message together with a list of typed fields, and that can
/// derive child loggers with fields permanently attached.
///
/// Implementations must be cheap to clone and safe to share between threads. Writes never fail
/// from the caller's point of view: sink errors are the logger's own business.
pub trait StructuredLogger: Send + Sync {
  /// Whether a record at `level` would be written.
  fn enabled(&self, level: Level) -> bool;

  /// Writes a single record. `Field::Skip` entries are ignored.
  fn log(&self, level: Level, message: &str, fields: Vec<Field>);

  /// Returns a derived logger that includes `fields` in every record it writes. The receiver is
  /// left untouched.
  fn with(&self, fields: Vec<Field>) -> Self
  where
    Self: Sized;

  fn debug(&self, message: &str, fields: Vec<Field>) {
    self.log(Level::Debug, message, fields);
  }

  fn info(&self, message: &str, fields: Vec<Field>) {
    self.log(Level::Info, message, fields);
  }

  fn warn(&self, message: &str, fields: Vec<Field>) {
    self.log(Level::Warn, message, fields);
  }

  fn error(&self, message: &str, fields: Vec<Field>) {
    self.log(Level::Error, message, fields);
  }
}

//
// NoopLogger
//

/// A logger that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl StructuredLogger for NoopLogger {
  fn enabled(&self, _level: Level) -> bool {
    false
  }

  fn log(&self, _level: Level, _message: &str, _fields: Vec<Field>) {}

  fn with(&self, _fields: Vec<Field>) -> Self {
    Self
  }
}
