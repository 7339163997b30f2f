// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

use bd_structured_log::{Field, Level, StructuredLogger};
use parking_lot::Mutex;
use std::sync::Arc;

//
// RecordedLog
//

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedLog {
  pub level: Level,
  pub message: String,
  // Fields attached via `with`, in attachment order.
  pub context: Vec<Field>,
  // Fields passed with the record itself, exactly as received (skip placeholders included).
  pub fields: Vec<Field>,
}

//
// RecordingLogger
//

/// A structured logger that keeps every record in memory. Derived loggers share the record list
/// with their parent.
#[derive(Clone, Default)]
pub struct RecordingLogger {
  records: Arc<Mutex<Vec<RecordedLog>>>,
  context: Vec<Field>,
}

impl RecordingLogger {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn records(&self) -> Vec<RecordedLog> {
    self.records.lock().clone()
  }

  #[must_use]
  pub fn context(&self) -> &[Field] {
    &self.context
  }
}

impl StructuredLogger for RecordingLogger {
  fn enabled(&self, _level: Level) -> bool {
    true
  }

  fn log(&self, level: Level, message: &str, fields: Vec<Field>) {
    self.records.lock().push(RecordedLog {
      level,
      message: message.to_string(),
      context: self.context.clone(),
      fields,
    });
  }

  fn with(&self, fields: Vec<Field>) -> Self {
    let mut context = self.context.clone();
    context.extend(fields);
    Self {
      records: self.records.clone(),
      context,
    }
  }
}
