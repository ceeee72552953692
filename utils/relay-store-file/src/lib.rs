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

//! File-backed [`RelayStore`]: the link-state document as one JSON file with
//! whole-document overwrite semantics.

use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;
use topic_relay::{LinkState, RelayStore, StoreError};
use tracing::{debug, warn};

/// Stores the link-state document at a fixed filesystem path.
///
/// A missing file loads as the empty document, so a fresh deployment starts
/// clean without provisioning. Saves overwrite the whole file; durability
/// beyond the filesystem's own guarantees is not attempted.
pub struct FileRelayStore {
    path: PathBuf,
}

impl FileRelayStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RelayStore for FileRelayStore {
    async fn load(&self) -> Result<LinkState, StoreError> {
        if !self.path.exists() {
            debug!(
                path = %self.path.display(),
                "no link-state document yet, starting empty"
            );
            return Ok(LinkState::default());
        }

        let contents = fs::read_to_string(&self.path).map_err(|err| {
            warn!(path = %self.path.display(), %err, "unable to read link-state document");
            StoreError::Io(format!("{}: {err}", self.path.display()))
        })?;

        serde_json::from_str(&contents).map_err(|err| {
            warn!(path = %self.path.display(), %err, "unable to parse link-state document");
            StoreError::Malformed(format!("{}: {err}", self.path.display()))
        })
    }

    async fn save(&self, state: &LinkState) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(state)
            .map_err(|err| StoreError::Malformed(err.to_string()))?;

        fs::write(&self.path, contents).map_err(|err| {
            warn!(path = %self.path.display(), %err, "unable to write link-state document");
            StoreError::Io(format!("{}: {err}", self.path.display()))
        })
    }
}
