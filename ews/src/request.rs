// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Operation request contracts and envelope encoding.

use serde_json::Value;

use crate::config::{RequestFormat, ServiceErrorHandling};
use crate::error::EwsError;
use crate::json::{JsonObject, JsonObjectExt};
use crate::response::{
    ServiceResponse, ServiceResponseCollection, parse_json_response_messages,
    parse_xml_response_messages,
};
use crate::service::ExchangeService;
use crate::transport::{OutgoingRequest, Transport};
use crate::version::ExchangeVersion;
use crate::xml::{EwsXmlWriter, XmlNamespace, names};

/// A single EWS operation.
pub trait ServiceRequest {
    /// Operation element, e.g. `ArchiveItem`.
    fn xml_element_name(&self) -> &'static str;

    /// Operation response element, e.g. `ArchiveItemResponse`.
    fn response_xml_element_name(&self) -> &'static str;

    /// Earliest server version supporting the operation.
    fn minimum_required_server_version(&self) -> ExchangeVersion;

    /// Checks required fields and their version-specific constraints.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first failed check.
    fn validate(&self, _service: &ExchangeService) -> Result<(), EwsError> {
        Ok(())
    }

    /// Writes attributes of the operation element.
    ///
    /// # Errors
    ///
    /// Returns an error if XML writing fails.
    fn write_attributes_to_xml(&self, _writer: &mut EwsXmlWriter) -> Result<(), EwsError> {
        Ok(())
    }

    /// Writes the children of the operation element.
    ///
    /// # Errors
    ///
    /// Returns an error if XML writing fails.
    fn write_elements_to_xml(
        &self,
        writer: &mut EwsXmlWriter,
        service: &ExchangeService,
    ) -> Result<(), EwsError>;

    /// Serializes the operation body to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be serialized.
    fn to_json(&self, service: &ExchangeService) -> Result<JsonObject, EwsError>;

    /// Rejects the request if the service targets an older server.
    ///
    /// # Errors
    ///
    /// Returns [`EwsError::VersionMismatch`].
    fn validate_server_version(&self, service: &ExchangeService) -> Result<(), EwsError> {
        let minimum = self.minimum_required_server_version();
        let requested = service.requested_server_version();
        if requested < minimum {
            return Err(EwsError::VersionMismatch {
                request: self.xml_element_name(),
                minimum,
                requested,
            });
        }
        Ok(())
    }

    /// Value of the `SOAPAction` header.
    fn soap_action(&self) -> String {
        format!("{}/{}", XmlNamespace::Messages.uri(), self.xml_element_name())
    }

    /// Writes `<m:Operation>` with attributes and children.
    ///
    /// # Errors
    ///
    /// Returns an error if XML writing fails.
    fn write_to_xml(
        &self,
        writer: &mut EwsXmlWriter,
        service: &ExchangeService,
    ) -> Result<(), EwsError> {
        writer.write_start_element(XmlNamespace::Messages, self.xml_element_name())?;
        self.write_attributes_to_xml(writer)?;
        self.write_elements_to_xml(writer, service)?;
        writer.write_end_element()
    }

    /// Checks the server version, validates the request and encodes it as a
    /// SOAP envelope or JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if a check or the encoding fails.
    fn emit(
        &self,
        service: &ExchangeService,
        format: RequestFormat,
    ) -> Result<OutgoingRequest, EwsError> {
        self.validate_server_version(service)?;
        self.validate(service)?;
        let body = match format {
            RequestFormat::Xml => self.soap_envelope(service)?,
            RequestFormat::Json => self.json_document(service)?,
        };
        tracing::trace!(%body, "encoded request");
        Ok(OutgoingRequest {
            format,
            action: self.soap_action(),
            body,
        })
    }

    /// Encodes the request inside a SOAP envelope, without validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if XML writing fails.
    fn soap_envelope(&self, service: &ExchangeService) -> Result<String, EwsError> {
        let mut writer = EwsXmlWriter::new();

        writer.write_start_element(XmlNamespace::Soap, names::ENVELOPE)?;
        for ns in [XmlNamespace::Soap, XmlNamespace::Types, XmlNamespace::Messages] {
            writer.write_attribute_value(&format!("xmlns:{}", ns.prefix()), ns.uri())?;
        }

        writer.write_start_element(XmlNamespace::Soap, names::HEADER)?;
        writer.write_start_element(XmlNamespace::Types, names::REQUEST_SERVER_VERSION)?;
        writer.write_attribute_value(names::VERSION, service.requested_server_version().as_str())?;
        writer.write_end_element()?;
        writer.write_end_element()?;

        writer.write_start_element(XmlNamespace::Soap, names::BODY)?;
        self.write_to_xml(&mut writer, service)?;
        writer.write_end_element()?;

        writer.write_end_element()?;
        writer.into_string()
    }

    /// Encodes the request as a JSON document, without validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn json_document(&self, service: &ExchangeService) -> Result<String, EwsError> {
        let mut body = self.to_json(service)?;
        if body.type_name().is_none() {
            body.add_type_parameter(&format!("{}Request", self.xml_element_name()));
        }

        let mut header = JsonObject::new();
        header.insert(
            names::REQUEST_SERVER_VERSION.to_string(),
            Value::String(service.requested_server_version().as_str().to_string()),
        );

        let mut document = JsonObject::new();
        document.insert(names::HEADER.to_string(), Value::Object(header));
        document.insert(names::BODY.to_string(), Value::Object(body));
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

/// An operation acting on several targets, answered by one response message
/// per target in the same order.
pub trait MultiResponseServiceRequest: ServiceRequest {
    /// What each response message answers, e.g. an item id.
    type Target;

    /// Response produced for each target.
    type Response: ServiceResponse;

    /// Targets of the request, in wire order.
    fn targets(&self) -> &[Self::Target];

    /// Per-target response message element, e.g. `ArchiveItemResponseMessage`.
    fn response_message_xml_element_name(&self) -> &'static str;

    /// How failed messages are reported by [`MultiResponseServiceRequest::execute`].
    fn error_handling_mode(&self) -> ServiceErrorHandling;

    /// Creates the empty response for the target at `index`.
    fn create_service_response(target: &Self::Target, index: usize) -> Self::Response;

    /// Number of response messages the server must return.
    fn expected_response_message_count(&self) -> usize {
        self.targets().len()
    }

    /// Parses a response body into one response per target.
    ///
    /// # Errors
    ///
    /// Returns an error for faults, malformed bodies, a message count other
    /// than [`MultiResponseServiceRequest::expected_response_message_count`],
    /// or, under [`ServiceErrorHandling::ThrowOnError`], the first failed
    /// message.
    fn parse_response(
        &self,
        body: &str,
        format: RequestFormat,
    ) -> Result<ServiceResponseCollection<Self::Response>, EwsError> {
        let mut responses: Vec<Self::Response> = self
            .targets()
            .iter()
            .take(self.expected_response_message_count())
            .enumerate()
            .map(|(index, target)| Self::create_service_response(target, index))
            .collect();

        match format {
            RequestFormat::Xml => parse_xml_response_messages(
                body,
                self.response_xml_element_name(),
                self.response_message_xml_element_name(),
                &mut responses,
            )?,
            RequestFormat::Json => parse_json_response_messages(body, &mut responses)?,
        }

        let collection = ServiceResponseCollection::new(responses);
        if self.error_handling_mode() == ServiceErrorHandling::ThrowOnError
            && let Some((index, failed)) = collection.errors().next()
        {
            let outcome = failed.outcome();
            return Err(EwsError::ServiceResponse {
                index,
                code: outcome.code.clone(),
                message: outcome.message.clone().unwrap_or_default(),
            });
        }
        Ok(collection)
    }

    /// Encodes the request in the service's format, sends it, and parses the
    /// reply.
    ///
    /// # Errors
    ///
    /// Returns an error if validation, delivery or parsing fails.
    #[tracing::instrument(skip_all, fields(request = self.xml_element_name(), targets = self.targets().len()))]
    fn execute<T: Transport + ?Sized>(
        &self,
        service: &ExchangeService,
        transport: &mut T,
    ) -> Result<ServiceResponseCollection<Self::Response>, EwsError>
    where
        Self: Sized,
    {
        let format = service.format();
        let outgoing = self.emit(service, format)?;
        tracing::debug!(action = %outgoing.action, "sending request");

        let body = transport.send(&outgoing)?;
        let responses = self.parse_response(&body, format)?;
        tracing::debug!(overall = %responses.overall_result(), "received responses");
        Ok(responses)
    }
}
