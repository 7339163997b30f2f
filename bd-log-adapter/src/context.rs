// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

#[cfg(test)]
#[path = "./context_test.rs"]
mod context_test;

use crate::adapter::{Adapter, LogAdapter};
use crate::value::Value;
use bd_structured_log::StructuredLogger;
use std::sync::Arc;

//
// Context
//

/// Request scoped state handed explicitly through request handling. Carries the active log
/// adapter, if any. Deriving a context never modifies the receiver.
#[derive(Clone, Default)]
pub struct Context {
  log_adapter: Option<Arc<dyn LogAdapter>>,
}

impl std::fmt::Debug for Context {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Context")
      .field("has_log_adapter", &self.log_adapter.is_some())
      .finish()
  }
}

impl Context {
  /// An empty context with no log adapter attached.
  #[must_use]
  pub fn background() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn with_logger(&self, log_adapter: Arc<dyn LogAdapter>) -> Self {
    Self {
      log_adapter: Some(log_adapter),
    }
  }

  /// Derives a context whose adapter attaches `keyvals` to every message. Without an adapter
  /// this is a plain copy.
  #[must_use]
  pub fn with_log_context(&self, keyvals: Vec<Value>) -> Self {
    match &self.log_adapter {
      Some(log_adapter) => self.with_logger(log_adapter.new(keyvals)),
      None => self.clone(),
    }
  }

  #[must_use]
  pub fn log_adapter(&self) -> Option<&Arc<dyn LogAdapter>> {
    self.log_adapter.as_ref()
  }
}

/// Returns the structured logger behind the context's adapter. `None` if the context has no
/// adapter or its adapter wraps a different logger type.
#[must_use]
pub fn logger<L: StructuredLogger + Clone + 'static>(ctx: &Context) -> Option<L> {
  ctx
    .log_adapter()?
    .as_any()
    .downcast_ref::<Adapter<L>>()
    .map(|adapter| adapter.logger().clone())
}

/// Logs an informational message through the context's adapter, if there is one.
pub fn log_info(ctx: &Context, message: &str, keyvals: Vec<Value>) {
  if let Some(log_adapter) = ctx.log_adapter() {
    log_adapter.info(message, keyvals);
  }
}

/// Logs an error message through the context's adapter, if there is one.
pub fn log_error(ctx: &Context, message: &str, keyvals: Vec<Value>) {
  if let Some(log_adapter) = ctx.log_adapter() {
    log_adapter.error(message, keyvals);
  }
}
