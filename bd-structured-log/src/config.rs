// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

#[cfg(test)]
#[path = "./config_test.rs"]
mod config_test;

use crate::Level;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

//
// ConfigError
//

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
  #[error("unable to read config file {path:?}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("unable to deserialize config: {0}")]
  Yaml(#[from] serde_yaml::Error),
}

//
// TimeEncoding
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeEncoding {
  #[default]
  Rfc3339,
  EpochSeconds,
  EpochMillis,
}

//
// DurationEncoding
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationEncoding {
  /// Floating point seconds.
  #[default]
  Seconds,
  /// Integer nanoseconds.
  Nanos,
  /// Human readable, e.g. `1.5s`.
  String,
}

//
// JsonLoggerConfig
//

/// Configuration for [`crate::JsonLogger`]. Every member has a default so partial YAML documents
/// are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JsonLoggerConfig {
  /// Records below this level are dropped.
  pub level: Level,
  /// Key for the record timestamp. `None` omits timestamps entirely.
  pub time_key: Option<String>,
  pub level_key: String,
  pub name_key: String,
  pub message_key: String,
  pub time_encoding: TimeEncoding,
  pub duration_encoding: DurationEncoding,
}

impl Default for JsonLoggerConfig {
  fn default() -> Self {
    Self {
      level: Level::Info,
      time_key: Some("ts".to_string()),
      level_key: "level".to_string(),
      name_key: "logger".to_string(),
      message_key: "msg".to_string(),
      time_encoding: TimeEncoding::default(),
      duration_encoding: DurationEncoding::default(),
    }
  }
}

impl JsonLoggerConfig {
  #[must_use]
  pub fn with_level(mut self, level: Level) -> Self {
    self.level = level;
    self
  }

  #[must_use]
  pub fn without_time(mut self) -> Self {
    self.time_key = None;
    self
  }

  pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
    Ok(serde_yaml::from_str(yaml)?)
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    log::debug!("loading json logger config from {path:?}");
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_yaml_str(&contents)
  }
}

//
// LogFacadeConfig
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogFacadeConfig {
  /// Target attached to every forwarded record.
  pub target: String,
}

impl Default for LogFacadeConfig {
  fn default() -> Self {
    Self {
      target: "bd_structured_log".to_string(),
    }
  }
}
