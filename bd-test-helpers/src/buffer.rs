// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

//
// TestBuffer
//

/// An in-memory sink. Clones share the same underlying buffer so a test can hand one clone to a
/// logger and inspect the output through another.
#[derive(Clone, Default)]
pub struct TestBuffer {
  inner: Arc<Mutex<Vec<u8>>>,
}

impl TestBuffer {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn contents(&self) -> String {
    String::from_utf8_lossy(&self.inner.lock()).into_owned()
  }

  /// Every complete line written so far, without the trailing newline.
  #[must_use]
  pub fn lines(&self) -> Vec<String> {
    let contents = self.contents();
    let mut lines: Vec<String> = contents.split('\n').map(ToString::to_string).collect();
    lines.pop();
    lines
  }

  /// The contents with trailing newlines removed.
  #[must_use]
  pub fn stripped(&self) -> String {
    self.contents().trim_end_matches('\n').to_string()
  }
}

impl Write for TestBuffer {
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self.inner.lock().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}

//
// FailingWriter
//

/// A sink that fails every write.
#[derive(Clone, Copy, Default)]
pub struct FailingWriter;

impl Write for FailingWriter {
  fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
    Err(std::io::Error::other("sink unavailable"))
  }

  fn flush(&mut self) -> std::io::Result<()> {
    Err(std::io::Error::other("sink unavailable"))
  }
}
