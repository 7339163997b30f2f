// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

#[cfg(test)]
#[path = "./json_test.rs"]
mod json_test;

use crate::config::JsonLoggerConfig;
use crate::encoder::{FieldEncoder, JsonMembers, time_to_json};
use crate::field::Field;
use crate::{Level, StructuredLogger};
use bd_log::warn_every;
use parking_lot::Mutex;
use serde_json::Value;
use std::io::Write;
use std::sync::Arc;
use time::OffsetDateTime;
use time::ext::NumericalDuration;
use time::format_description::well_known::Rfc3339;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

//
// JsonLogger
//

/// A structured logger writing one JSON object per line to a shared sink.
///
/// Members are written in a fixed order: timestamp (if enabled), level, logger name (if any),
/// message, fields attached via `with` in attachment order, then the record's own fields. Keys are
/// never deduplicated: a field reusing the level, message or any earlier key is written as an
/// additional member.
#[derive(Clone)]
pub struct JsonLogger {
  config: Arc<JsonLoggerConfig>,
  sink: SharedWriter,
  error_output: SharedWriter,
  name: Option<Arc<str>>,
  context: Vec<Field>,
}

impl std::fmt::Debug for JsonLogger {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("JsonLogger")
      .field("config", &self.config)
      .field("name", &self.name)
      .field("context", &self.context)
      .finish_non_exhaustive()
  }
}

impl JsonLogger {
  /// Creates a logger writing to `sink`. Write failures are reported on stderr.
  pub fn new(config: JsonLoggerConfig, sink: impl Write + Send + 'static) -> Self {
    Self {
      config: Arc::new(config),
      sink: Arc::new(Mutex::new(Box::new(sink))),
      error_output: Arc::new(Mutex::new(Box::new(std::io::stderr()))),
      name: None,
      context: Vec::new(),
    }
  }

  #[must_use]
  pub fn stderr(config: JsonLoggerConfig) -> Self {
    Self::new(config, std::io::stderr())
  }

  /// Replaces the destination for write failure reports.
  #[must_use]
  pub fn error_output(mut self, error_output: impl Write + Send + 'static) -> Self {
    self.error_output = Arc::new(Mutex::new(Box::new(error_output)));
    self
  }

  /// Returns a derived logger whose records carry `name` under the configured name key. Nested
  /// names are joined with `.`.
  #[must_use]
  pub fn named(&self, name: &str) -> Self {
    let name: Arc<str> = match &self.name {
      Some(parent) if !name.is_empty() => format!("{parent}.{name}").into(),
      Some(parent) => parent.clone(),
      None => name.into(),
    };
    Self {
      name: Some(name),
      ..self.clone()
    }
  }

  #[must_use]
  pub fn config(&self) -> &JsonLoggerConfig {
    &self.config
  }

  /// Flushes the sink.
  pub fn sync(&self) -> std::io::Result<()> {
    self.sink.lock().flush()
  }

  fn encode(&self, level: Level, message: &str, fields: &[Field]) -> JsonMembers {
    let config = &self.config;
    let mut record = JsonMembers::default();
    if let Some(time_key) = &config.time_key {
      record.push(
        time_key.as_str(),
        time_to_json(OffsetDateTime::now_utc(), config.time_encoding),
      );
    }
    record.push(
      config.level_key.as_str(),
      Value::String(level.as_str().to_string()),
    );
    if let Some(name) = &self.name {
      record.push(config.name_key.as_str(), Value::String(name.to_string()));
    }
    record.push(
      config.message_key.as_str(),
      Value::String(message.to_string()),
    );

    let encoder = FieldEncoder {
      time_encoding: config.time_encoding,
      duration_encoding: config.duration_encoding,
    };
    for field in self.context.iter().chain(fields) {
      encoder.add_field(&mut record, field);
    }

    record
  }

  fn write_line(&self, record: &JsonMembers) -> std::io::Result<()> {
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');
    self.sink.lock().write_all(&line)
  }

  fn report_write_error(&self, error: &std::io::Error) {
    warn_every!(1.minutes(), "unable to write log record: {}", error);

    let now = OffsetDateTime::now_utc()
      .format(&Rfc3339)
      .unwrap_or_else(|_| "<unknown>".to_string());
    let _ignored = writeln!(self.error_output.lock(), "{now} write error: {error}");
  }
}

impl StructuredLogger for JsonLogger {
  fn enabled(&self, level: Level) -> bool {
    level >= self.config.level
  }

  fn log(&self, level: Level, message: &str, fields: Vec<Field>) {
    if !self.enabled(level) {
      return;
    }

    let record = self.encode(level, message, &fields);
    if let Err(e) = self.write_line(&record) {
      self.report_write_error(&e);
    }
  }

  fn with(&self, fields: Vec<Field>) -> Self {
    let mut derived = self.clone();
    derived
      .context
      .extend(fields.into_iter().filter(|field| !field.is_skip()));
    derived
  }
}
