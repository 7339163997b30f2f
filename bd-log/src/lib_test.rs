// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

#![allow(clippy::unwrap_used)]

use crate::{Error, SwapLogger, parse_filter};

#[test]
fn parse_valid_filter() {
  parse_filter("info,bd_log_adapter=trace").unwrap();
}

#[test]
fn parse_invalid_filter() {
  let error = parse_filter("bd_log_adapter=nope").unwrap_err();
  assert!(matches!(error, Error::InvalidFilter { ref rules, .. } if rules == "bd_log_adapter=nope"));
}

#[test]
fn swap_after_initialize() {
  SwapLogger::initialize();
  // A second initialization is a no-op.
  SwapLogger::initialize();

  // Another test binary may own the global subscriber, in which case there is nothing to swap.
  if SwapLogger::is_initialized() {
    SwapLogger::swap("debug").unwrap();
    assert_eq!(log::max_level(), log::LevelFilter::Debug);
    SwapLogger::swap("info").unwrap();
  }

  assert!(SwapLogger::swap("bd_log=nope").is_err());
}
