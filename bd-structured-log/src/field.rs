// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

#[cfg(test)]
#[path = "./field_test.rs"]
mod field_test;

use std::borrow::Cow;
use std::fmt::Display;
use std::sync::Arc;
use time::OffsetDateTime;

/// Error fields are always written under this key, whatever key the caller supplied.
pub const ERROR_FIELD_KEY: &str = "error";

pub type LogFieldKey = Cow<'static, str>;

//
// MarshalError
//

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct MarshalError {
  message: String,
}

impl MarshalError {
  #[must_use]
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}

//
// ObjectEncoder
//

/// Receives the members of a value that knows how to marshal itself into a structured record.
pub trait ObjectEncoder {
  fn add_string(&mut self, key: &str, value: &str);
  fn add_bool(&mut self, key: &str, value: bool);
  fn add_i64(&mut self, key: &str, value: i64);
  fn add_u64(&mut self, key: &str, value: u64);
  fn add_f64(&mut self, key: &str, value: f64);
  fn add_bytes(&mut self, key: &str, value: &[u8]);
  fn add_object(&mut self, key: &str, value: &dyn LogMarshaler) -> Result<(), MarshalError>;
}

//
// LogMarshaler
//

/// Implemented by values that encode themselves member by member instead of relying on the
/// logger's generic object encoding.
pub trait LogMarshaler: Send + Sync {
  fn marshal_log(&self, encoder: &mut dyn ObjectEncoder) -> Result<(), MarshalError>;
}

//
// FieldValue
//

/// The closed set of value kinds a structured logger knows how to encode.
#[derive(Clone)]
pub enum FieldValue {
  Base64(Vec<u8>),
  Bool(bool),
  Float64(f64),
  Int64(i64),
  Uint64(u64),
  String(String),
  // Rendered when the record is encoded.
  Stringer(Arc<dyn Display + Send + Sync>),
  Time(OffsetDateTime),
  Error(Arc<dyn std::error::Error + Send + Sync>),
  Duration(time::Duration),
  Marshaler(Arc<dyn LogMarshaler>),
  Object(serde_json::Value),
}

impl std::fmt::Debug for FieldValue {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Base64(b) => f.debug_tuple("Base64").field(b).finish(),
      Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
      Self::Float64(v) => f.debug_tuple("Float64").field(v).finish(),
      Self::Int64(v) => f.debug_tuple("Int64").field(v).finish(),
      Self::Uint64(v) => f.debug_tuple("Uint64").field(v).finish(),
      Self::String(s) => f.debug_tuple("String").field(s).finish(),
      Self::Stringer(s) => f.debug_tuple("Stringer").field(&s.to_string()).finish(),
      Self::Time(t) => f.debug_tuple("Time").field(t).finish(),
      Self::Error(e) => f.debug_tuple("Error").field(&e.to_string()).finish(),
      Self::Duration(d) => f.debug_tuple("Duration").field(d).finish(),
      Self::Marshaler(_) => f.write_str("Marshaler(..)"),
      Self::Object(o) => f.debug_tuple("Object").field(o).finish(),
    }
  }
}

// Stringers and errors compare by their rendering, marshalers by identity.
impl PartialEq for FieldValue {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Self::Base64(a), Self::Base64(b)) => a == b,
      (Self::Bool(a), Self::Bool(b)) => a == b,
      (Self::Float64(a), Self::Float64(b)) => a == b,
      (Self::Int64(a), Self::Int64(b)) => a == b,
      (Self::Uint64(a), Self::Uint64(b)) => a == b,
      (Self::String(a), Self::String(b)) => a == b,
      (Self::Stringer(a), Self::Stringer(b)) => a.to_string() == b.to_string(),
      (Self::Time(a), Self::Time(b)) => a == b,
      (Self::Error(a), Self::Error(b)) => a.to_string() == b.to_string(),
      (Self::Duration(a), Self::Duration(b)) => a == b,
      (Self::Marshaler(a), Self::Marshaler(b)) => {
        std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
      },
      (Self::Object(a), Self::Object(b)) => a == b,
      _ => false,
    }
  }
}

//
// Field
//

/// A named, typed unit of structured data attached to a record. `Skip` is a placeholder that
/// encoders ignore.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
  Skip,
  Named {
    key: LogFieldKey,
    value: FieldValue,
  },
}

impl Field {
  #[must_use]
  pub fn new(key: impl Into<LogFieldKey>, value: FieldValue) -> Self {
    Self::Named {
      key: key.into(),
      value,
    }
  }

  #[must_use]
  pub const fn skip() -> Self {
    Self::Skip
  }

  #[must_use]
  pub fn base64(key: impl Into<LogFieldKey>, value: impl Into<Vec<u8>>) -> Self {
    Self::new(key, FieldValue::Base64(value.into()))
  }

  #[must_use]
  pub fn bool(key: impl Into<LogFieldKey>, value: bool) -> Self {
    Self::new(key, FieldValue::Bool(value))
  }

  #[must_use]
  pub fn float64(key: impl Into<LogFieldKey>, value: f64) -> Self {
    Self::new(key, FieldValue::Float64(value))
  }

  #[must_use]
  pub fn int64(key: impl Into<LogFieldKey>, value: i64) -> Self {
    Self::new(key, FieldValue::Int64(value))
  }

  #[must_use]
  pub fn uint64(key: impl Into<LogFieldKey>, value: u64) -> Self {
    Self::new(key, FieldValue::Uint64(value))
  }

  #[must_use]
  pub fn string(key: impl Into<LogFieldKey>, value: impl Into<String>) -> Self {
    Self::new(key, FieldValue::String(value.into()))
  }

  #[must_use]
  pub fn stringer(key: impl Into<LogFieldKey>, value: Arc<dyn Display + Send + Sync>) -> Self {
    Self::new(key, FieldValue::Stringer(value))
  }

  #[must_use]
  pub fn time(key: impl Into<LogFieldKey>, value: OffsetDateTime) -> Self {
    Self::new(key, FieldValue::Time(value))
  }

  /// An error field, always keyed by [`ERROR_FIELD_KEY`].
  #[must_use]
  pub fn error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::shared_error(Arc::new(error))
  }

  #[must_use]
  pub fn shared_error(error: Arc<dyn std::error::Error + Send + Sync>) -> Self {
    Self::new(ERROR_FIELD_KEY, FieldValue::Error(error))
  }

  #[must_use]
  pub fn duration(key: impl Into<LogFieldKey>, value: time::Duration) -> Self {
    Self::new(key, FieldValue::Duration(value))
  }

  #[must_use]
  pub fn marshaler(key: impl Into<LogFieldKey>, value: Arc<dyn LogMarshaler>) -> Self {
    Self::new(key, FieldValue::Marshaler(value))
  }

  #[must_use]
  pub fn object(key: impl Into<LogFieldKey>, value: serde_json::Value) -> Self {
    Self::new(key, FieldValue::Object(value))
  }

  #[must_use]
  pub const fn is_skip(&self) -> bool {
    matches!(self, Self::Skip)
  }

  #[must_use]
  pub fn key(&self) -> Option<&str> {
    match self {
      Self::Skip => None,
      Self::Named { key, .. } => Some(&**key),
    }
  }

  #[must_use]
  pub const fn value(&self) -> Option<&FieldValue> {
    match self {
      Self::Skip => None,
      Self::Named { value, .. } => Some(value),
    }
  }
}
