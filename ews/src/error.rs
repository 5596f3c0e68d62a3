// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::version::ExchangeVersion;

/// Errors raised while validating, encoding or decoding EWS payloads.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum EwsError {
    /// A required field is missing or fails a structural check.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request needs a newer server than the one negotiated.
    #[error(
        "{request} is only valid for {minimum} or later, but the requested server version is {requested}"
    )]
    VersionMismatch {
        /// Wire name of the rejected request.
        request: &'static str,
        /// Earliest version supporting the request.
        minimum: ExchangeVersion,
        /// Version the service is configured for.
        requested: ExchangeVersion,
    },

    /// XML parsing/writing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// JSON parsing/writing error.
    #[error("JSON error: {0}")]
    Json(String),

    /// The response envelope does not have the expected shape.
    #[error("Invalid server response: {0}")]
    InvalidResponse(String),

    /// The server answered with a SOAP fault.
    #[error("SOAP fault: {0}")]
    SoapFault(String),

    /// A response message reported an error and the request stops on errors.
    #[error("Response #{index} failed with {code}: {message}")]
    ServiceResponse {
        /// Position of the failing response, equal to its target's position.
        index: usize,
        /// `ResponseCode` reported by the server.
        code: String,
        /// `MessageText` reported by the server.
        message: String,
    },

    /// The transport collaborator failed to deliver the request.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EwsError {
    /// Builds the error reported for a missing required parameter.
    #[must_use]
    pub fn argument_null(param: &str) -> Self {
        Self::Validation(format!("{param} cannot be null"))
    }
}

impl From<quick_xml::Error> for EwsError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e.to_string())
    }
}

impl From<std::io::Error> for EwsError {
    fn from(e: std::io::Error) -> Self {
        Self::Xml(format!("IO error: {e}"))
    }
}

impl From<serde_json::Error> for EwsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}
