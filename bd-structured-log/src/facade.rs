// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

use crate::config::LogFacadeConfig;
use crate::encoder::{JsonMembers, encode_base64, marshal_to_json};
use crate::field::{Field, FieldValue};
use crate::{Level, StructuredLogger};
use log::kv::{Key, Source, Value, VisitSource};
use std::borrow::Cow;
use std::fmt::Display;
use std::sync::Arc;
use time::OffsetDateTime;

//
// LogFacadeLogger
//

/// A structured logger that forwards records to whatever `log` implementation is installed, with
/// fields carried as `log` key-values.
#[derive(Debug, Clone)]
pub struct LogFacadeLogger {
  target: Arc<str>,
  context: Vec<Field>,
}

impl Default for LogFacadeLogger {
  fn default() -> Self {
    Self::new(&LogFacadeConfig::default())
  }
}

impl LogFacadeLogger {
  #[must_use]
  pub fn new(config: &LogFacadeConfig) -> Self {
    Self {
      target: config.target.as_str().into(),
      context: Vec::new(),
    }
  }

  #[must_use]
  pub fn target(&self) -> &str {
    &self.target
  }
}

impl StructuredLogger for LogFacadeLogger {
  fn enabled(&self, level: Level) -> bool {
    let level = log::Level::from(level);
    level <= log::max_level()
      && log::logger().enabled(
        &log::Metadata::builder()
          .level(level)
          .target(&self.target)
          .build(),
      )
  }

  fn log(&self, level: Level, message: &str, fields: Vec<Field>) {
    if !self.enabled(level) {
      return;
    }

    let pairs = KeyValues(
      self
        .context
        .iter()
        .chain(&fields)
        .filter_map(KeyValue::from_field)
        .collect(),
    );
    log::logger().log(
      &log::Record::builder()
        .args(format_args!("{message}"))
        .level(level.into())
        .target(&self.target)
        .key_values(&pairs)
        .build(),
    );
  }

  fn with(&self, fields: Vec<Field>) -> Self {
    let mut derived = self.clone();
    derived
      .context
      .extend(fields.into_iter().filter(|field| !field.is_skip()));
    derived
  }
}

//
// KeyValue
//

// A field prepared for visiting. Values that need an owned encoding (bytes, marshaled objects) are
// encoded up front since `log` values can only borrow.
enum KvValue<'a> {
  Bool(bool),
  F64(f64),
  I64(i64),
  U64(u64),
  Str(&'a str),
  Owned(String),
  Stringer(&'a Arc<dyn Display + Send + Sync>),
  Time(&'a OffsetDateTime),
  Duration(&'a time::Duration),
  Error(&'a (dyn std::error::Error + 'static)),
  Json(&'a serde_json::Value),
  Marshaled(JsonMembers),
}

struct KeyValue<'a> {
  key: Cow<'a, str>,
  value: KvValue<'a>,
}

impl<'a> KeyValue<'a> {
  fn from_field(field: &'a Field) -> Option<Self> {
    let Field::Named { key, value } = field else {
      return None;
    };

    let value = match value {
      FieldValue::Base64(bytes) => KvValue::Owned(encode_base64(bytes)),
      FieldValue::Bool(b) => KvValue::Bool(*b),
      FieldValue::Float64(f) => KvValue::F64(*f),
      FieldValue::Int64(i) => KvValue::I64(*i),
      FieldValue::Uint64(u) => KvValue::U64(*u),
      FieldValue::String(s) => KvValue::Str(s.as_str()),
      FieldValue::Stringer(s) => KvValue::Stringer(s),
      FieldValue::Time(t) => KvValue::Time(t),
      FieldValue::Error(e) => KvValue::Error(&**e),
      FieldValue::Duration(d) => KvValue::Duration(d),
      FieldValue::Object(o) => KvValue::Json(o),
      FieldValue::Marshaler(m) => match marshal_to_json(m.as_ref()) {
        Ok(encoded) => KvValue::Marshaled(encoded),
        Err(e) => {
          return Some(Self {
            key: Cow::Owned(format!("{key}Error")),
            value: KvValue::Owned(e.to_string()),
          });
        },
      },
    };

    Some(Self {
      key: Cow::Borrowed(&**key),
      value,
    })
  }

  fn to_value(&self) -> Value<'_> {
    match &self.value {
      KvValue::Bool(b) => Value::from(*b),
      KvValue::F64(f) => Value::from(*f),
      KvValue::I64(i) => Value::from(*i),
      KvValue::U64(u) => Value::from(*u),
      KvValue::Str(s) => Value::from(*s),
      KvValue::Owned(s) => Value::from(s.as_str()),
      KvValue::Stringer(s) => Value::from_display(*s),
      KvValue::Time(t) => Value::from_display(*t),
      KvValue::Duration(d) => Value::from_display(*d),
      KvValue::Error(e) => Value::from_dyn_error(*e),
      KvValue::Json(j) => Value::from_serde(*j),
      KvValue::Marshaled(m) => Value::from_serde(m),
    }
  }
}

struct KeyValues<'a>(Vec<KeyValue<'a>>);

impl Source for KeyValues<'_> {
  fn visit<'kvs>(&'kvs self, visitor: &mut dyn VisitSource<'kvs>) -> Result<(), log::kv::Error> {
    for pair in &self.0 {
      visitor.visit_pair(Key::from_str(&pair.key), pair.to_value())?;
    }
    Ok(())
  }
}
