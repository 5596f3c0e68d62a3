// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{fs, path::PathBuf};

use exchange_ews::{EwsError, OutgoingRequest, Transport};

/// Transport answering every request with the contents of a saved response
/// file.
#[derive(Debug, Clone)]
pub struct ReplayTransport {
    path: PathBuf,
}

impl ReplayTransport {
    /// Creates a transport replaying `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Transport for ReplayTransport {
    fn send(&mut self, request: &OutgoingRequest) -> Result<String, EwsError> {
        tracing::debug!(action = %request.action, path = %self.path.display(), "replaying saved response");
        fs::read_to_string(&self.path).map_err(|e| {
            EwsError::Transport(format!(
                "Failed to read response file at {}: {e}",
                self.path.display()
            ))
        })
    }
}
