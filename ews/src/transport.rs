// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Delivery of encoded requests to a server.

use crate::config::RequestFormat;
use crate::error::EwsError;

/// An encoded request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRequest {
    /// Encoding of `body`.
    pub format: RequestFormat,
    /// Value of the `SOAPAction` header, e.g.
    /// `http://schemas.microsoft.com/exchange/services/2006/messages/ArchiveItem`.
    pub action: String,
    /// SOAP envelope or JSON document.
    pub body: String,
}

impl OutgoingRequest {
    /// Content type matching the request format.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self.format {
            RequestFormat::Xml => "text/xml; charset=utf-8",
            RequestFormat::Json => "application/json; charset=utf-8",
        }
    }
}

/// Sends a request and returns the raw response body.
///
/// HTTP, authentication and retries live behind this trait; requests only
/// encode and decode.
pub trait Transport {
    /// Delivers `request` and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns [`EwsError::Transport`] if the request cannot be delivered.
    fn send(&mut self, request: &OutgoingRequest) -> Result<String, EwsError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, request: &OutgoingRequest) -> Result<String, EwsError> {
        (**self).send(request)
    }
}

/// Transport answering every request with a fixed body.
///
/// Sent requests are recorded so they can be inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct StaticTransport {
    response: String,
    sent: Vec<OutgoingRequest>,
}

impl StaticTransport {
    /// Creates a transport replying with `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            sent: Vec::new(),
        }
    }

    /// Requests sent so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> &[OutgoingRequest] {
        &self.sent
    }
}

impl Transport for StaticTransport {
    fn send(&mut self, request: &OutgoingRequest) -> Result<String, EwsError> {
        tracing::debug!(action = %request.action, bytes = request.body.len(), "replaying canned response");
        self.sent.push(request.clone());
        Ok(self.response.clone())
    }
}
