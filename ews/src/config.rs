// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::version::ExchangeVersion;

/// How a multi-response request reacts to failed response messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
pub enum ServiceErrorHandling {
    /// Stop at the first failed message and return it as an error.
    #[serde(rename = "throw_on_error")]
    #[default]
    ThrowOnError,
    /// Return every outcome, failures included.
    #[serde(rename = "return_errors")]
    ReturnErrors,
}

/// Wire format of request and response bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
pub enum RequestFormat {
    /// SOAP 1.1 envelope.
    #[serde(rename = "xml")]
    #[default]
    Xml,
    /// EWS JSON encoding.
    #[serde(rename = "json")]
    Json,
}

/// EWS service configuration.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ServiceConfig {
    /// Server version requests are written for.
    #[serde(default)]
    pub requested_server_version: ExchangeVersion,
    /// IANA time zone used to turn timestamps into dates (UTC if unset).
    #[serde(default)]
    pub time_zone: Option<String>,
    /// Default error handling of multi-response requests.
    #[serde(default)]
    pub error_handling: ServiceErrorHandling,
    /// Default wire format.
    #[serde(default)]
    pub format: RequestFormat,
}
