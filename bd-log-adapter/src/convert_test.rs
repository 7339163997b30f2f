// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

use super::{NonStringKey, fields_from_keyvals, value_to_field};
use crate::kv;
use crate::value::Value;
use assert_matches::assert_matches;
use bd_structured_log::{
  ERROR_FIELD_KEY,
  Field,
  FieldValue,
  LogMarshaler,
  MarshalError,
  ObjectEncoder,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use time::macros::datetime;

#[derive(Debug, thiserror::Error)]
#[error("disk full")]
struct DiskFull;

struct Point {
  x: i64,
  y: i64,
}

impl LogMarshaler for Point {
  fn marshal_log(&self, encoder: &mut dyn ObjectEncoder) -> Result<(), MarshalError> {
    encoder.add_i64("x", self.x);
    encoder.add_i64("y", self.y);
    Ok(())
  }
}

#[derive(serde::Serialize)]
struct Custom {
  name: &'static str,
}

fn convert(keyvals: Vec<Value>) -> Vec<Field> {
  fields_from_keyvals(keyvals, NonStringKey::default())
}

#[test]
fn even_list_keeps_order() {
  assert_eq!(
    convert(kv!["a", 1, "b", "two", "c", true]),
    vec![
      Field::int64("a", 1),
      Field::string("b", "two"),
      Field::bool("c", true),
    ]
  );
}

#[test]
fn empty_list() {
  assert_eq!(convert(kv![]), vec![]);
}

#[test]
fn output_length_is_half_rounded_up() {
  for len in 0usize .. 9 {
    let keyvals: Vec<Value> = (0 .. len).map(|i| Value::from(format!("k{i}"))).collect();
    assert_eq!(convert(keyvals).len(), len.div_ceil(2), "len {len}");
  }
}

#[test]
fn trailing_key_becomes_placeholder() {
  assert_eq!(
    convert(kv!["k1", "v1", "k2"]),
    vec![Field::string("k1", "v1"), Field::skip()]
  );
}

#[test]
fn non_string_key_skips_the_pair() {
  assert_eq!(
    convert(kv![1, "a", "b", "c", 2.5, "d", "e", "f"]),
    vec![
      Field::skip(),
      Field::string("b", "c"),
      Field::skip(),
      Field::string("e", "f"),
    ]
  );
}

#[test]
fn non_string_key_realign() {
  let fields = fields_from_keyvals(kv![1, "a", "b", 2, 3, "c", "d"], NonStringKey::Realign);
  assert_eq!(
    fields,
    vec![
      Field::skip(),
      Field::string("a", "b"),
      Field::skip(),
      Field::skip(),
      Field::string("c", "d"),
    ]
  );
}

#[test]
fn integers_are_widened() {
  assert_eq!(
    convert(kv![
      "i8", -8i8, "i16", -16i16, "i32", -32i32, "i64", -64i64, "int", -1isize
    ]),
    vec![
      Field::int64("i8", -8),
      Field::int64("i16", -16),
      Field::int64("i32", -32),
      Field::int64("i64", -64),
      Field::int64("int", -1),
    ]
  );
  assert_eq!(
    convert(kv![
      "u8", 8u8, "u16", 16u16, "u32", 32u32, "u64", u64::MAX, "uint", 1usize
    ]),
    vec![
      Field::uint64("u8", 8),
      Field::uint64("u16", 16),
      Field::uint64("u32", 32),
      Field::uint64("u64", u64::MAX),
      Field::uint64("uint", 1),
    ]
  );
}

#[test]
fn floats_become_float64() {
  assert_eq!(
    convert(kv!["f32", 0.5f32, "f64", 0.25]),
    vec![Field::float64("f32", 0.5), Field::float64("f64", 0.25)]
  );
}

#[test]
fn each_kind_maps_to_its_field() {
  let t = datetime!(2020-05-06 07:08:09 UTC);
  let point: Arc<dyn LogMarshaler> = Arc::new(Point { x: 1, y: 2 });
  let fields = convert(vec![
    Value::from("bytes"),
    Value::from(vec![1u8, 2, 3]),
    Value::from("stringer"),
    Value::display(std::net::Ipv4Addr::LOCALHOST),
    Value::from("time"),
    Value::from(t),
    Value::from("duration"),
    Value::from(time::Duration::milliseconds(1500)),
    Value::from("point"),
    Value::from(point.clone()),
    Value::from("custom"),
    Value::object(&Custom { name: "c" }),
  ]);

  assert_eq!(
    fields,
    vec![
      Field::base64("bytes", vec![1, 2, 3]),
      Field::stringer("stringer", Arc::new("127.0.0.1")),
      Field::time("time", t),
      Field::duration("duration", time::Duration::milliseconds(1500)),
      Field::marshaler("point", point),
      Field::object("custom", json!({"name": "c"})),
    ]
  );
}

#[test]
fn error_key_is_replaced() {
  let fields = convert(kv!["cause", Value::error(DiskFull)]);
  assert_eq!(fields.len(), 1);
  assert_eq!(fields[0].key(), Some(ERROR_FIELD_KEY));
  assert_matches!(fields[0].value(), Some(FieldValue::Error(e)) if e.to_string() == "disk full");
}

#[test]
fn value_to_field_string() {
  assert_eq!(
    value_to_field("k".into(), Value::from(String::from("v"))),
    Field::string("k", "v")
  );
}
