// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

#![deny(
  clippy::expect_used,
  clippy::panic,
  clippy::todo,
  clippy::unimplemented,
  clippy::unreachable,
  clippy::unwrap_used
)]

//! Adapts a [`StructuredLogger`] to the generic key/value logging contract ([`LogAdapter`]) used
//! by request handling frameworks, so that the framework can log through a structured logger
//! without depending on it.
//!
//! The framework calls `info(message, keyvals)` with a flattened list alternating string keys
//! and values. The adapter turns that list into typed fields and forwards them:
//!
//! ```ignore
//! let adapter = Adapter::new(JsonLogger::stderr(JsonLoggerConfig::default()));
//! adapter.info("request finished", kv!["status", 200u16, "path", "/health"]);
//!
//! let ctx = Context::background().with_logger(adapter.into_shared());
//! let logger: Option<JsonLogger> = bd_log_adapter::logger(&ctx);
//! ```

pub mod adapter;
pub mod context;
pub mod convert;
pub mod value;

pub use adapter::{Adapter, LogAdapter};
pub use bd_structured_log::StructuredLogger;
pub use context::{Context, log_error, log_info, logger};
pub use convert::{NonStringKey, fields_from_keyvals};
pub use value::Value;

#[cfg(test)]
#[ctor::ctor]
fn test_global_init() {
  bd_test_helpers::test_global_init();
}
