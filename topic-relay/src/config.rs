/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Runtime configuration for the relay engine.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Tunables for the delivery engine, parsed from a json5 document.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelayConfig {
    /// Upper bound on concurrent sends across all in-flight broadcasts.
    pub max_in_flight_sends: usize,
    /// Pause after each successful send, in milliseconds.
    pub send_pacing_ms: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_in_flight_sends: 8,
            send_pacing_ms: 200,
        }
    }
}

impl RelayConfig {
    /// Parses a json5 configuration document.
    pub fn from_json5_str(contents: &str) -> Result<Self, ConfigError> {
        json5::from_str(contents).map_err(|err| ConfigError(err.to_string()))
    }

    pub fn send_pacing(&self) -> Duration {
        Duration::from_millis(self.send_pacing_ms)
    }

    /// A zero bound would deadlock the permit pool; treat it as one.
    pub(crate) fn effective_max_in_flight(&self) -> usize {
        self.max_in_flight_sends.max(1)
    }
}

/// Failure to parse the configuration document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigError(String);

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unable to parse relay config: {}", self.0)
    }
}

impl Error for ConfigError {}
