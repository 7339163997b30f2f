// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

#![allow(clippy::unwrap_used)]

use super::JsonLogger;
use crate::config::{DurationEncoding, JsonLoggerConfig, TimeEncoding};
use crate::field::Field;
use crate::{Level, StructuredLogger};
use bd_test_helpers::{FailingWriter, TestBuffer};
use pretty_assertions::assert_eq;
use serde_json::json;
use time::ext::NumericalDuration;
use time::macros::datetime;

fn setup(level: Level) -> (JsonLogger, TestBuffer) {
  let buffer = TestBuffer::new();
  let logger = JsonLogger::new(
    JsonLoggerConfig::default().with_level(level).without_time(),
    buffer.clone(),
  );
  (logger, buffer)
}

#[derive(Debug, thiserror::Error)]
#[error("boom")]
struct Boom;

#[test]
fn info_record() {
  let (logger, buffer) = setup(Level::Debug);
  logger.info("msg", vec![Field::string("hoge", "fuga")]);
  assert_eq!(
    buffer.stripped(),
    r#"{"level":"info","msg":"msg","hoge":"fuga"}"#
  );
}

#[test]
fn error_record() {
  let (logger, buffer) = setup(Level::Debug);
  logger.error("msg", vec![Field::string("hoge", "fuga")]);
  assert_eq!(
    buffer.lines(),
    vec![r#"{"level":"error","msg":"msg","hoge":"fuga"}"#.to_string()]
  );
}

#[derive(Debug, thiserror::Error)]
#[error("second")]
struct Second;

#[test]
fn repeated_keys_never_overwrite() {
  let (logger, buffer) = setup(Level::Debug);
  logger.info(
    "real message",
    vec![Field::string("msg", "user"), Field::string("level", "x")],
  );
  logger.error("failed", vec![Field::error(Boom), Field::error(Second)]);
  logger
    .with(vec![Field::int64("id", 1)])
    .info("m", vec![Field::int64("id", 2)]);

  assert_eq!(
    buffer.lines(),
    vec![
      r#"{"level":"info","msg":"real message","msg":"user","level":"x"}"#.to_string(),
      r#"{"level":"error","msg":"failed","error":"boom","error":"second"}"#.to_string(),
      r#"{"level":"info","msg":"m","id":1,"id":2}"#.to_string(),
    ]
  );
}

#[test]
fn level_threshold() {
  let (logger, buffer) = setup(Level::Warn);
  assert!(!logger.enabled(Level::Info));
  assert!(logger.enabled(Level::Error));
  logger.debug("d", vec![]);
  logger.info("i", vec![]);
  logger.warn("w", vec![]);
  logger.error("e", vec![]);
  assert_eq!(
    buffer.lines(),
    vec![
      r#"{"level":"warn","msg":"w"}"#.to_string(),
      r#"{"level":"error","msg":"e"}"#.to_string(),
    ]
  );
}

#[test]
fn with_attaches_fields_without_touching_parent() {
  let (logger, buffer) = setup(Level::Debug);
  let child = logger.with(vec![Field::int64("a", 1), Field::skip()]);
  child.info("child", vec![Field::bool("b", true)]);
  logger.info("parent", vec![]);
  let grandchild = child.with(vec![Field::uint64("c", 2)]);
  grandchild.info("grandchild", vec![]);

  assert_eq!(
    buffer.lines(),
    vec![
      r#"{"level":"info","msg":"child","a":1,"b":true}"#.to_string(),
      r#"{"level":"info","msg":"parent"}"#.to_string(),
      r#"{"level":"info","msg":"grandchild","a":1,"c":2}"#.to_string(),
    ]
  );
}

#[test]
fn named_loggers() {
  let (logger, buffer) = setup(Level::Debug);
  logger.named("http").named("server").info("up", vec![]);
  assert_eq!(
    buffer.stripped(),
    r#"{"level":"info","logger":"http.server","msg":"up"}"#
  );
}

#[test]
fn typed_fields() {
  let buffer = TestBuffer::new();
  let logger = JsonLogger::new(
    JsonLoggerConfig {
      level: Level::Debug,
      time_key: None,
      duration_encoding: DurationEncoding::Nanos,
      time_encoding: TimeEncoding::EpochSeconds,
      ..Default::default()
    },
    buffer.clone(),
  );
  logger.info(
    "typed",
    vec![
      Field::base64("bytes", b"hi".to_vec()),
      Field::float64("f", 0.25),
      Field::int64("i", -1),
      Field::time("t", datetime!(1970-01-01 00:00:10 UTC)),
      Field::duration("d", 2.microseconds()),
      Field::error(Boom),
      Field::stringer("s", std::sync::Arc::new(42)),
      Field::object("o", json!({"nested": [1, 2]})),
      Field::skip(),
    ],
  );

  let record: serde_json::Value = serde_json::from_str(&buffer.stripped()).unwrap();
  assert_eq!(
    record,
    json!({
      "level": "info",
      "msg": "typed",
      "bytes": "aGk=",
      "f": 0.25,
      "i": -1,
      "t": 10.0,
      "d": 2000,
      "error": "boom",
      "s": "42",
      "o": {"nested": [1, 2]},
    })
  );
}

#[test]
fn timestamps_lead_the_record() {
  let buffer = TestBuffer::new();
  let logger = JsonLogger::new(JsonLoggerConfig::default(), buffer.clone());
  logger.info("msg", vec![]);

  let record: serde_json::Map<String, serde_json::Value> =
    serde_json::from_str(&buffer.stripped()).unwrap();
  let keys: Vec<&str> = record.keys().map(String::as_str).collect();
  assert_eq!(keys, vec!["ts", "level", "msg"]);
  assert!(record["ts"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn write_failures_go_to_error_output() {
  let errors = TestBuffer::new();
  let logger = JsonLogger::new(
    JsonLoggerConfig::default().without_time(),
    FailingWriter,
  )
  .error_output(errors.clone());

  logger.info("lost", vec![]);
  logger.error("lost", vec![]);

  let lines = errors.lines();
  assert_eq!(lines.len(), 2);
  assert!(lines[0].ends_with("write error: sink unavailable"));
  assert!(logger.sync().is_err());
}
