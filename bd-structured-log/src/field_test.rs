// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

#![allow(clippy::unwrap_used)]

use super::{ERROR_FIELD_KEY, Field, FieldValue, LogMarshaler, MarshalError, ObjectEncoder};
use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
#[error("connection reset")]
struct ConnectionReset;

struct Empty;

impl LogMarshaler for Empty {
  fn marshal_log(&self, _encoder: &mut dyn ObjectEncoder) -> Result<(), MarshalError> {
    Ok(())
  }
}

#[test]
fn error_field_uses_reserved_key() {
  let field = Field::error(ConnectionReset);
  assert_eq!(field.key(), Some(ERROR_FIELD_KEY));
  assert_matches!(field.value(), Some(FieldValue::Error(e)) if e.to_string() == "connection reset");
}

#[test]
fn skip_has_no_key_or_value() {
  let field = Field::skip();
  assert!(field.is_skip());
  assert_eq!(field.key(), None);
  assert_eq!(field.value(), None);
}

#[test]
fn typed_constructors() {
  assert_eq!(
    Field::int64("n", -3),
    Field::new("n", FieldValue::Int64(-3))
  );
  assert_eq!(
    Field::base64("b", vec![1, 2]),
    Field::new("b", FieldValue::Base64(vec![1, 2]))
  );
  assert_matches!(Field::string("s", "v").value(), Some(FieldValue::String(s)) if s == "v");
  assert_matches!(
    Field::duration("d", time::Duration::seconds(2)).value(),
    Some(FieldValue::Duration(d)) if *d == time::Duration::seconds(2)
  );
}

#[test]
fn equality_by_rendering_and_identity() {
  let a: Arc<dyn std::fmt::Display + Send + Sync> = Arc::new(5);
  let b: Arc<dyn std::fmt::Display + Send + Sync> = Arc::new("5");
  assert_eq!(Field::stringer("k", a), Field::stringer("k", b));

  let marshaler: Arc<dyn LogMarshaler> = Arc::new(Empty);
  assert_eq!(
    Field::marshaler("m", marshaler.clone()),
    Field::marshaler("m", marshaler)
  );
  assert_ne!(
    Field::marshaler("m", Arc::new(Empty)),
    Field::marshaler("m", Arc::new(Empty))
  );
}
