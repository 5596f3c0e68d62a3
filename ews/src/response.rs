// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Response messages and the envelopes that carry them.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::EwsError;
use crate::json::{JsonObject, JsonObjectExt};
use crate::xml::{EwsXmlReader, XmlNodeType, names};

/// Response code of a successful message.
pub const NO_ERROR: &str = "NoError";

/// Class of a response message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ServiceResult {
    /// The operation succeeded.
    #[default]
    Success,
    /// The operation succeeded with a warning.
    Warning,
    /// The operation failed.
    Error,
}

impl ServiceResult {
    /// Wire value of the `ResponseClass` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for ServiceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceResult {
    type Err = EwsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Success" => Ok(Self::Success),
            "Warning" => Ok(Self::Warning),
            "Error" => Ok(Self::Error),
            _ => Err(EwsError::InvalidResponse(format!(
                "Unknown ResponseClass: {s}"
            ))),
        }
    }
}

/// Status part every response message shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseOutcome {
    /// `ResponseClass` of the message.
    pub result: ServiceResult,
    /// `ResponseCode` of the message.
    pub code: String,
    /// `MessageText`, present on warnings and errors.
    pub message: Option<String>,
}

impl Default for ResponseOutcome {
    fn default() -> Self {
        Self {
            result: ServiceResult::Success,
            code: NO_ERROR.to_string(),
            message: None,
        }
    }
}

/// One response message, paired with the target it answers.
pub trait ServiceResponse {
    /// Status of the message.
    fn outcome(&self) -> &ResponseOutcome;

    /// Status of the message, for loading.
    fn outcome_mut(&mut self) -> &mut ResponseOutcome;

    /// Tries to consume a payload element specific to this response type.
    ///
    /// # Errors
    ///
    /// Returns an error if XML parsing fails.
    fn read_element_from_xml(&mut self, _reader: &mut EwsXmlReader<'_>) -> Result<bool, EwsError> {
        Ok(false)
    }

    /// Loads a payload key specific to this response type.
    fn load_json_key(&mut self, _key: &str, _value: &Value) {}

    /// Class of the message.
    fn result(&self) -> ServiceResult {
        self.outcome().result
    }

    /// Whether the message reports an error.
    fn is_error(&self) -> bool {
        self.outcome().result == ServiceResult::Error
    }
}

/// Responses of a multi-response request, in target order.
#[derive(Debug, Clone)]
pub struct ServiceResponseCollection<R> {
    responses: Vec<R>,
}

impl<R: ServiceResponse> ServiceResponseCollection<R> {
    /// Wraps `responses`.
    #[must_use]
    pub const fn new(responses: Vec<R>) -> Self {
        Self { responses }
    }

    /// Number of responses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Response at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&R> {
        self.responses.get(index)
    }

    /// Iterates responses in target order.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.responses.iter()
    }

    /// Worst class among the responses.
    #[must_use]
    pub fn overall_result(&self) -> ServiceResult {
        self.responses
            .iter()
            .map(ServiceResponse::result)
            .max()
            .unwrap_or_default()
    }

    /// Responses reporting an error, with their positions.
    pub fn errors(&self) -> impl Iterator<Item = (usize, &R)> {
        self.responses.iter().enumerate().filter(|(_, r)| r.is_error())
    }

    /// Unwraps the responses.
    #[must_use]
    pub fn into_vec(self) -> Vec<R> {
        self.responses
    }
}

impl<R> IntoIterator for ServiceResponseCollection<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.responses.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a ServiceResponseCollection<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.responses.iter()
    }
}

/// Fills `responses` from the messages of a SOAP response envelope.
///
/// `response_element` is the operation's response element (e.g.
/// `ArchiveItemResponse`), `message_element` the per-target message element.
///
/// # Errors
///
/// Returns [`EwsError::SoapFault`] for a fault envelope and
/// [`EwsError::InvalidResponse`] if the operation element is missing or the
/// number of messages differs from `responses.len()`.
pub fn parse_xml_response_messages<R: ServiceResponse>(
    body: &str,
    response_element: &str,
    message_element: &str,
    responses: &mut [R],
) -> Result<(), EwsError> {
    let mut reader = EwsXmlReader::new(body);

    loop {
        match reader.read()? {
            XmlNodeType::StartElement if reader.local_name() == names::FAULT => {
                return Err(read_fault(&mut reader)?);
            }
            XmlNodeType::StartElement if reader.local_name() == response_element => break,
            XmlNodeType::Eof => {
                return Err(EwsError::InvalidResponse(format!(
                    "Missing {response_element} element"
                )));
            }
            _ => {}
        }
    }

    if !reader.read_to_start_element(names::RESPONSE_MESSAGES)? {
        return Err(EwsError::InvalidResponse(format!(
            "Missing {} element",
            names::RESPONSE_MESSAGES
        )));
    }

    let mut count = 0usize;
    loop {
        match reader.read()? {
            XmlNodeType::StartElement if reader.local_name() == message_element => {
                match responses.get_mut(count) {
                    Some(response) => read_response_message(&mut reader, message_element, response)?,
                    None => reader.skip_current_element()?,
                }
                count += 1;
            }
            XmlNodeType::StartElement => reader.skip_current_element()?,
            XmlNodeType::EndElement if reader.local_name() == names::RESPONSE_MESSAGES => break,
            XmlNodeType::Eof => {
                return Err(EwsError::InvalidResponse(format!(
                    "Unexpected EOF inside {}",
                    names::RESPONSE_MESSAGES
                )));
            }
            _ => {}
        }
    }

    check_count(count, responses.len())
}

/// Fills `responses` from the messages of a JSON response document.
///
/// # Errors
///
/// Returns [`EwsError::Json`] if the body is not JSON and
/// [`EwsError::InvalidResponse`] if the document shape or the number of
/// messages is wrong.
pub fn parse_json_response_messages<R: ServiceResponse>(
    body: &str,
    responses: &mut [R],
) -> Result<(), EwsError> {
    let document: Value = serde_json::from_str(body)?;
    let items = document
        .as_object()
        .and_then(|doc| doc.read_as_object(names::BODY))
        .and_then(|body| body.read_as_object(names::RESPONSE_MESSAGES))
        .and_then(|messages| messages.read_as_array(names::ITEMS))
        .ok_or_else(|| {
            EwsError::InvalidResponse("Missing Body.ResponseMessages.Items".to_string())
        })?;

    for (item, response) in items.iter().zip(responses.iter_mut()) {
        let message = item.as_object().ok_or_else(|| {
            EwsError::InvalidResponse("Response message is not an object".to_string())
        })?;
        load_response_message_json(message, response)?;
    }

    check_count(items.len(), responses.len())
}

fn read_fault(reader: &mut EwsXmlReader<'_>) -> Result<EwsError, EwsError> {
    let message = if reader.read_to_start_element(names::FAULT_STRING)? {
        reader.read_element_value()?
    } else {
        "unknown fault".to_string()
    };
    tracing::warn!(fault = %message, "server returned a SOAP fault");
    Ok(EwsError::SoapFault(message))
}

fn read_response_message<R: ServiceResponse>(
    reader: &mut EwsXmlReader<'_>,
    message_element: &str,
    response: &mut R,
) -> Result<(), EwsError> {
    if let Some(class) = reader.read_attribute_value(names::RESPONSE_CLASS) {
        response.outcome_mut().result = class.parse()?;
    }

    loop {
        match reader.read()? {
            XmlNodeType::StartElement => match reader.local_name().to_string().as_str() {
                names::RESPONSE_CODE => response.outcome_mut().code = reader.read_element_value()?,
                names::MESSAGE_TEXT => {
                    response.outcome_mut().message = Some(reader.read_element_value()?);
                }
                _ => {
                    if !response.read_element_from_xml(reader)? {
                        reader.skip_current_element()?;
                    }
                }
            },
            XmlNodeType::EndElement if reader.local_name() == message_element => return Ok(()),
            XmlNodeType::Eof => {
                return Err(EwsError::InvalidResponse(format!(
                    "Unexpected EOF inside {message_element}"
                )));
            }
            _ => {}
        }
    }
}

fn load_response_message_json<R: ServiceResponse>(
    message: &JsonObject,
    response: &mut R,
) -> Result<(), EwsError> {
    for (key, value) in message {
        match key.as_str() {
            names::RESPONSE_CLASS => {
                if let Some(class) = value.as_str() {
                    response.outcome_mut().result = class.parse()?;
                }
            }
            names::RESPONSE_CODE => {
                if let Some(code) = value.as_str() {
                    response.outcome_mut().code = code.to_string();
                }
            }
            names::MESSAGE_TEXT => {
                response.outcome_mut().message = value.as_str().map(ToString::to_string);
            }
            _ => response.load_json_key(key, value),
        }
    }
    Ok(())
}

fn check_count(actual: usize, expected: usize) -> Result<(), EwsError> {
    if actual == expected {
        Ok(())
    } else {
        Err(EwsError::InvalidResponse(format!(
            "Expected {expected} response messages, received {actual}"
        )))
    }
}
