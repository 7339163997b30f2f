// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

#[cfg(test)]
#[path = "./convert_test.rs"]
mod convert_test;

use crate::value::Value;
use bd_structured_log::{Field, LogFieldKey};

//
// NonStringKey
//

/// What to do after finding a value that is not a string in key position. Either way a
/// `Field::Skip` placeholder is emitted for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NonStringKey {
  /// Drop the offending key together with the element that follows it, so parsing stays aligned
  /// on even positions. The output always has `(len + 1) / 2` entries.
  #[default]
  SkipPair,
  /// Drop only the offending element and read the next one as a key. Everything after it is
  /// paired with shifted parity.
  Realign,
}

/// Converts a flattened key/value list into typed fields, preserving pair order.
///
/// A trailing key without a value and a pair with a non-string key both produce a `Field::Skip`
/// placeholder rather than shortening the output. Conversion never fails.
#[must_use]
pub fn fields_from_keyvals(keyvals: Vec<Value>, non_string_key: NonStringKey) -> Vec<Field> {
  let mut fields = Vec::with_capacity(keyvals.len().div_ceil(2));
  let mut keyvals = keyvals.into_iter();

  while let Some(key) = keyvals.next() {
    let key = match key {
      Value::Str(key) => key,
      other => {
        log::trace!("skipping {} value in key position", other.kind());
        fields.push(Field::skip());
        if non_string_key == NonStringKey::SkipPair {
          keyvals.next();
        }
        continue;
      },
    };

    match keyvals.next() {
      Some(value) => fields.push(value_to_field(key, value)),
      None => {
        log::trace!("skipping trailing key {key:?} without a value");
        fields.push(Field::skip());
      },
    }
  }

  fields
}

/// Maps a single value onto the matching typed field. Integers are widened to 64 bits and `f32`
/// to `f64`. Errors ignore `key` and are always written under the reserved error key.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn value_to_field(key: LogFieldKey, value: Value) -> Field {
  match value {
    Value::Bytes(bytes) => Field::base64(key, bytes),
    Value::Bool(b) => Field::bool(key, b),
    Value::F32(f) => Field::float64(key, f64::from(f)),
    Value::F64(f) => Field::float64(key, f),
    Value::Int(i) => Field::int64(key, i as i64),
    Value::I8(i) => Field::int64(key, i64::from(i)),
    Value::I16(i) => Field::int64(key, i64::from(i)),
    Value::I32(i) => Field::int64(key, i64::from(i)),
    Value::I64(i) => Field::int64(key, i),
    Value::Uint(u) => Field::uint64(key, u as u64),
    Value::U8(u) => Field::uint64(key, u64::from(u)),
    Value::U16(u) => Field::uint64(key, u64::from(u)),
    Value::U32(u) => Field::uint64(key, u64::from(u)),
    Value::U64(u) => Field::uint64(key, u),
    Value::Str(s) => Field::string(key, s.into_owned()),
    Value::Stringer(s) => Field::stringer(key, s),
    Value::Time(t) => Field::time(key, t),
    Value::Error(e) => Field::shared_error(e),
    Value::Duration(d) => Field::duration(key, d),
    Value::Marshaler(m) => Field::marshaler(key, m),
    Value::Object(o) => Field::object(key, o),
  }
}
