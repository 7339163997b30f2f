// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

#[cfg(test)]
#[path = "./value_test.rs"]
mod value_test;

use bd_structured_log::LogMarshaler;
use std::borrow::Cow;
use std::fmt::{Debug, Display};
use std::sync::Arc;
use time::OffsetDateTime;

//
// Value
//

/// A single element of a flattened key/value list. Keys are expected to be `Str`; any variant may
/// appear in value position.
#[derive(Clone)]
pub enum Value {
  Bytes(Vec<u8>),
  Bool(bool),
  F32(f32),
  F64(f64),
  Int(isize),
  I8(i8),
  I16(i16),
  I32(i32),
  I64(i64),
  Uint(usize),
  U8(u8),
  U16(u16),
  U32(u32),
  U64(u64),
  Str(Cow<'static, str>),
  Stringer(Arc<dyn Display + Send + Sync>),
  Time(OffsetDateTime),
  Error(Arc<dyn std::error::Error + Send + Sync>),
  Duration(time::Duration),
  Marshaler(Arc<dyn LogMarshaler>),
  Object(serde_json::Value),
}

impl Value {
  /// A value rendered through its `Display` implementation when the record is encoded.
  #[must_use]
  pub fn display(value: impl Display + Send + Sync + 'static) -> Self {
    Self::Stringer(Arc::new(value))
  }

  #[must_use]
  pub fn error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Error(Arc::new(error))
  }

  #[must_use]
  pub fn marshal(value: impl LogMarshaler + 'static) -> Self {
    Self::Marshaler(Arc::new(value))
  }

  /// Captures any serializable value as a generic object. A value that fails to serialize is
  /// still logged, as a string describing the failure.
  #[must_use]
  pub fn object<T: serde::Serialize + ?Sized>(value: &T) -> Self {
    Self::Object(serde_json::to_value(value).unwrap_or_else(|e| {
      log::debug!("unable to serialize object value: {e}");
      serde_json::Value::String(format!("<unserializable: {e}>"))
    }))
  }

  /// Captures a value through its `Debug` rendering.
  #[must_use]
  pub fn debug(value: &(impl Debug + ?Sized)) -> Self {
    Self::Object(serde_json::Value::String(format!("{value:?}")))
  }

  #[must_use]
  pub const fn kind(&self) -> &'static str {
    match self {
      Self::Bytes(_) => "bytes",
      Self::Bool(_) => "bool",
      Self::F32(_) => "f32",
      Self::F64(_) => "f64",
      Self::Int(_) => "isize",
      Self::I8(_) => "i8",
      Self::I16(_) => "i16",
      Self::I32(_) => "i32",
      Self::I64(_) => "i64",
      Self::Uint(_) => "usize",
      Self::U8(_) => "u8",
      Self::U16(_) => "u16",
      Self::U32(_) => "u32",
      Self::U64(_) => "u64",
      Self::Str(_) => "str",
      Self::Stringer(_) => "stringer",
      Self::Time(_) => "time",
      Self::Error(_) => "error",
      Self::Duration(_) => "duration",
      Self::Marshaler(_) => "marshaler",
      Self::Object(_) => "object",
    }
  }
}

impl Debug for Value {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Bytes(v) => write!(f, "Bytes({v:?})"),
      Self::Bool(v) => write!(f, "Bool({v})"),
      Self::F32(v) => write!(f, "F32({v})"),
      Self::F64(v) => write!(f, "F64({v})"),
      Self::Int(v) => write!(f, "Int({v})"),
      Self::I8(v) => write!(f, "I8({v})"),
      Self::I16(v) => write!(f, "I16({v})"),
      Self::I32(v) => write!(f, "I32({v})"),
      Self::I64(v) => write!(f, "I64({v})"),
      Self::Uint(v) => write!(f, "Uint({v})"),
      Self::U8(v) => write!(f, "U8({v})"),
      Self::U16(v) => write!(f, "U16({v})"),
      Self::U32(v) => write!(f, "U32({v})"),
      Self::U64(v) => write!(f, "U64({v})"),
      Self::Str(v) => write!(f, "Str({v:?})"),
      Self::Stringer(v) => write!(f, "Stringer({:?})", v.to_string()),
      Self::Time(v) => write!(f, "Time({v})"),
      Self::Error(v) => write!(f, "Error({:?})", v.to_string()),
      Self::Duration(v) => write!(f, "Duration({v})"),
      Self::Marshaler(_) => f.write_str("Marshaler(..)"),
      Self::Object(v) => write!(f, "Object({v})"),
    }
  }
}

macro_rules! impl_from {
  ($($ty:ty => $variant:ident),* $(,)?) => {
    $(
      impl From<$ty> for Value {
        fn from(value: $ty) -> Self {
          Self::$variant(value)
        }
      }
    )*
  };
}

impl_from! {
  Vec<u8> => Bytes,
  bool => Bool,
  f32 => F32,
  f64 => F64,
  isize => Int,
  i8 => I8,
  i16 => I16,
  i32 => I32,
  i64 => I64,
  usize => Uint,
  u8 => U8,
  u16 => U16,
  u32 => U32,
  u64 => U64,
  Cow<'static, str> => Str,
  OffsetDateTime => Time,
  time::Duration => Duration,
  Arc<dyn Display + Send + Sync> => Stringer,
  Arc<dyn std::error::Error + Send + Sync> => Error,
  Arc<dyn LogMarshaler> => Marshaler,
  serde_json::Value => Object,
}

impl From<&'static [u8]> for Value {
  fn from(value: &'static [u8]) -> Self {
    Self::Bytes(value.to_vec())
  }
}

impl<const N: usize> From<&'static [u8; N]> for Value {
  fn from(value: &'static [u8; N]) -> Self {
    Self::Bytes(value.to_vec())
  }
}

impl From<&'static str> for Value {
  fn from(value: &'static str) -> Self {
    Self::Str(Cow::Borrowed(value))
  }
}

impl From<String> for Value {
  fn from(value: String) -> Self {
    Self::Str(Cow::Owned(value))
  }
}

// Durations beyond the range of `time::Duration` saturate.
impl From<std::time::Duration> for Value {
  fn from(value: std::time::Duration) -> Self {
    Self::Duration(time::Duration::try_from(value).unwrap_or(time::Duration::MAX))
  }
}

/// Builds a `Vec<Value>` key/value list from heterogeneous expressions.
///
/// ```ignore
/// let keyvals = kv!["path", "/health", "status", 200u16, "elapsed", elapsed];
/// ```
#[macro_export]
macro_rules! kv {
  () => {
    ::std::vec::Vec::<$crate::Value>::new()
  };
  ($($value:expr),+ $(,)?) => {
    ::std::vec![$($crate::Value::from($value)),+]
  };
}
