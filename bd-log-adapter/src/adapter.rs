// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

#[cfg(test)]
#[path = "./adapter_test.rs"]
mod adapter_test;

use crate::convert::{NonStringKey, fields_from_keyvals};
use crate::value::Value;
use bd_structured_log::{Field, Level, StructuredLogger};
use std::any::Any;
use std::sync::Arc;

//
// LogAdapter
//

/// The logging contract a request handling framework programs against. Messages carry a
/// flattened list alternating string keys and values.
pub trait LogAdapter: Send + Sync {
  fn info(&self, message: &str, keyvals: Vec<Value>);

  fn error(&self, message: &str, keyvals: Vec<Value>);

  /// Returns an adapter that attaches `keyvals` to everything it logs.
  fn new(&self, keyvals: Vec<Value>) -> Arc<dyn LogAdapter>;

  fn as_any(&self) -> &dyn Any;
}

//
// Adapter
//

/// Implements [`LogAdapter`] on top of a [`StructuredLogger`].
#[derive(Debug, Clone)]
pub struct Adapter<L> {
  logger: L,
  non_string_key: NonStringKey,
}

impl<L: StructuredLogger> Adapter<L> {
  #[must_use]
  pub fn new(logger: L) -> Self {
    Self {
      logger,
      non_string_key: NonStringKey::default(),
    }
  }

  /// Selects how a non-string value in key position is handled. Derived adapters inherit it.
  #[must_use]
  pub fn non_string_key(mut self, non_string_key: NonStringKey) -> Self {
    self.non_string_key = non_string_key;
    self
  }

  #[must_use]
  pub const fn logger(&self) -> &L {
    &self.logger
  }

  pub fn info(&self, message: &str, keyvals: Vec<Value>) {
    self.log(Level::Info, message, keyvals);
  }

  pub fn error(&self, message: &str, keyvals: Vec<Value>) {
    self.log(Level::Error, message, keyvals);
  }

  /// Returns a new adapter around a derived logger with `keyvals` attached. `self` is unchanged.
  #[must_use]
  pub fn with(&self, keyvals: Vec<Value>) -> Self {
    Self {
      logger: self.logger.with(self.fields(keyvals)),
      non_string_key: self.non_string_key,
    }
  }

  fn log(&self, level: Level, message: &str, keyvals: Vec<Value>) {
    self.logger.log(level, message, self.fields(keyvals));
  }

  fn fields(&self, keyvals: Vec<Value>) -> Vec<Field> {
    fields_from_keyvals(keyvals, self.non_string_key)
  }
}

impl<L: StructuredLogger + 'static> Adapter<L> {
  #[must_use]
  pub fn into_shared(self) -> Arc<dyn LogAdapter> {
    Arc::new(self)
  }
}

impl<L: StructuredLogger + 'static> LogAdapter for Adapter<L> {
  fn info(&self, message: &str, keyvals: Vec<Value>) {
    self.log(Level::Info, message, keyvals);
  }

  fn error(&self, message: &str, keyvals: Vec<Value>) {
    self.log(Level::Error, message, keyvals);
  }

  fn new(&self, keyvals: Vec<Value>) -> Arc<dyn LogAdapter> {
    Arc::new(self.with(keyvals))
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}
