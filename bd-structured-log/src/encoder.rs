// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

#[cfg(test)]
#[path = "./encoder_test.rs"]
mod encoder_test;

use crate::config::{DurationEncoding, TimeEncoding};
use crate::field::{Field, FieldValue, LogMarshaler, MarshalError, ObjectEncoder};
use base64::Engine;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Number, Value};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
  base64::engine::general_purpose::STANDARD.encode(bytes)
}

// JSON has no representation for non-finite floats, so they are written as strings.
#[must_use]
pub fn float_to_json(value: f64) -> Value {
  Number::from_f64(value).map_or_else(
    || {
      Value::String(
        if value.is_nan() {
          "NaN"
        } else if value.is_sign_positive() {
          "+Inf"
        } else {
          "-Inf"
        }
        .to_string(),
      )
    },
    Value::Number,
  )
}

#[must_use]
pub fn time_to_json(value: OffsetDateTime, encoding: TimeEncoding) -> Value {
  #[allow(clippy::cast_precision_loss)]
  let epoch_nanos = value.unix_timestamp_nanos() as f64;
  match encoding {
    TimeEncoding::Rfc3339 => value
      .format(&Rfc3339)
      .map_or_else(|_| float_to_json(epoch_nanos / 1e9), Value::String),
    TimeEncoding::EpochSeconds => float_to_json(epoch_nanos / 1e9),
    TimeEncoding::EpochMillis => float_to_json(epoch_nanos / 1e6),
  }
}

#[must_use]
pub fn duration_to_json(value: time::Duration, encoding: DurationEncoding) -> Value {
  match encoding {
    DurationEncoding::Seconds => float_to_json(value.as_seconds_f64()),
    DurationEncoding::Nanos => {
      let nanos = i64::try_from(value.whole_nanoseconds()).unwrap_or(if value.is_negative() {
        i64::MIN
      } else {
        i64::MAX
      });
      Value::Number(nanos.into())
    },
    DurationEncoding::String => Value::String(value.to_string()),
  }
}

/// Runs a marshaler against a fresh JSON object.
pub fn marshal_to_json(marshaler: &dyn LogMarshaler) -> Result<JsonMembers, MarshalError> {
  let mut encoder = JsonObjectEncoder::default();
  marshaler.marshal_log(&mut encoder)?;
  Ok(encoder.into_members())
}

//
// JsonMembers
//

/// The members of a JSON object in emission order. Keys may repeat and every member is written,
/// so a later field never replaces an earlier one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonMembers(Vec<(String, EncodedValue)>);

impl JsonMembers {
  pub fn push(&mut self, key: impl Into<String>, value: impl Into<EncodedValue>) {
    self.0.push((key.into(), value.into()));
  }
}

impl Serialize for JsonMembers {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.0.len()))?;
    for (key, value) in &self.0 {
      map.serialize_entry(key, value)?;
    }
    map.end()
  }
}

/// A single encoded member value: either plain JSON or a nested object produced by a marshaler.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedValue {
  Json(Value),
  Object(JsonMembers),
}

impl From<Value> for EncodedValue {
  fn from(value: Value) -> Self {
    Self::Json(value)
  }
}

impl From<JsonMembers> for EncodedValue {
  fn from(members: JsonMembers) -> Self {
    Self::Object(members)
  }
}

impl Serialize for EncodedValue {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Self::Json(value) => value.serialize(serializer),
      Self::Object(members) => members.serialize(serializer),
    }
  }
}

//
// JsonObjectEncoder
//

/// An `ObjectEncoder` that collects members in the order they are added.
#[derive(Default)]
pub struct JsonObjectEncoder {
  members: JsonMembers,
}

impl JsonObjectEncoder {
  #[must_use]
  pub fn into_members(self) -> JsonMembers {
    self.members
  }
}

impl ObjectEncoder for JsonObjectEncoder {
  fn add_string(&mut self, key: &str, value: &str) {
    self.members.push(key, Value::String(value.to_string()));
  }

  fn add_bool(&mut self, key: &str, value: bool) {
    self.members.push(key, Value::Bool(value));
  }

  fn add_i64(&mut self, key: &str, value: i64) {
    self.members.push(key, Value::Number(value.into()));
  }

  fn add_u64(&mut self, key: &str, value: u64) {
    self.members.push(key, Value::Number(value.into()));
  }

  fn add_f64(&mut self, key: &str, value: f64) {
    self.members.push(key, float_to_json(value));
  }

  fn add_bytes(&mut self, key: &str, value: &[u8]) {
    self.members.push(key, Value::String(encode_base64(value)));
  }

  fn add_object(&mut self, key: &str, value: &dyn LogMarshaler) -> Result<(), MarshalError> {
    let nested = marshal_to_json(value)?;
    self.members.push(key, nested);
    Ok(())
  }
}

//
// FieldEncoder
//

/// Encodes typed fields into record members using the configured time and duration encodings.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldEncoder {
  pub time_encoding: TimeEncoding,
  pub duration_encoding: DurationEncoding,
}

impl FieldEncoder {
  /// Appends a field to `members`. Skip placeholders add nothing. A marshaler that fails is
  /// replaced by a `<key>Error` member carrying the failure message.
  pub fn add_field(&self, members: &mut JsonMembers, field: &Field) {
    let Field::Named { key, value } = field else {
      return;
    };

    match self.encode_value(value) {
      Ok(encoded) => members.push(&**key, encoded),
      Err(e) => {
        log::debug!("unable to marshal field {key:?}: {e}");
        members.push(format!("{key}Error"), Value::String(e.to_string()));
      },
    }
  }

  // Only marshalers can fail.
  fn encode_value(&self, value: &FieldValue) -> Result<EncodedValue, MarshalError> {
    let encoded = match value {
      FieldValue::Base64(bytes) => Value::String(encode_base64(bytes)),
      FieldValue::Bool(b) => Value::Bool(*b),
      FieldValue::Float64(f) => float_to_json(*f),
      FieldValue::Int64(i) => Value::Number((*i).into()),
      FieldValue::Uint64(u) => Value::Number((*u).into()),
      FieldValue::String(s) => Value::String(s.clone()),
      FieldValue::Stringer(s) => Value::String(s.to_string()),
      FieldValue::Time(t) => time_to_json(*t, self.time_encoding),
      FieldValue::Error(e) => Value::String(e.to_string()),
      FieldValue::Duration(d) => duration_to_json(*d, self.duration_encoding),
      FieldValue::Object(o) => o.clone(),
      FieldValue::Marshaler(m) => return marshal_to_json(m.as_ref()).map(EncodedValue::Object),
    };
    Ok(EncodedValue::Json(encoded))
  }
}
