// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Serialization contract shared by complex property values.

use serde_json::Value;

use crate::error::EwsError;
use crate::json::JsonObject;
use crate::service::ExchangeService;
use crate::xml::{EwsXmlReader, EwsXmlWriter, XmlNamespace, XmlNodeType};

/// A value that encodes itself as an XML element and as a JSON object.
///
/// Implementors provide the per-field steps; the provided methods drive them
/// in the same order for every property.
pub trait ComplexProperty {
    /// Writes attributes of the property element.
    ///
    /// # Errors
    ///
    /// Returns an error if XML writing fails.
    fn write_attributes_to_xml(&self, _writer: &mut EwsXmlWriter) -> Result<(), EwsError> {
        Ok(())
    }

    /// Writes child elements of the property element.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is missing or XML writing fails.
    fn write_elements_to_xml(&self, writer: &mut EwsXmlWriter) -> Result<(), EwsError>;

    /// Serializes the property to a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is missing.
    fn to_json(&self, service: &ExchangeService) -> Result<JsonObject, EwsError>;

    /// Reads attributes from the current start element.
    fn read_attributes_from_xml(&mut self, _reader: &EwsXmlReader<'_>) {}

    /// Tries to consume the child element the reader is positioned on.
    ///
    /// Returns `true` only if a value was read. For an element this property
    /// does not know, returns `false` and leaves the reader on it, so the
    /// caller can skip it or hand it to another handler.
    ///
    /// # Errors
    ///
    /// Returns an error if XML parsing fails.
    fn try_read_element_from_xml(&mut self, reader: &mut EwsXmlReader<'_>)
    -> Result<bool, EwsError>;

    /// Loads one key of a JSON object. Unknown keys are ignored.
    fn load_json_key(&mut self, key: &str, value: &Value, service: &ExchangeService);

    /// Writes the whole property as `<prefix:name ...>...</prefix:name>`.
    ///
    /// # Errors
    ///
    /// Returns an error if XML writing fails.
    fn write_to_xml(
        &self,
        writer: &mut EwsXmlWriter,
        namespace: XmlNamespace,
        name: &str,
    ) -> Result<(), EwsError> {
        writer.write_start_element(namespace, name)?;
        self.write_attributes_to_xml(writer)?;
        self.write_elements_to_xml(writer)?;
        writer.write_end_element()
    }

    /// Loads the property from the start element `name` the reader is
    /// positioned on, leaving the reader on the matching end element.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader is elsewhere or XML parsing fails.
    fn load_from_xml(&mut self, reader: &mut EwsXmlReader<'_>, name: &str) -> Result<(), EwsError> {
        if !reader.is_start_element(name) {
            return Err(EwsError::Xml(format!(
                "expected start of {name}, found {:?} {}",
                reader.node_type(),
                reader.local_name()
            )));
        }
        self.read_attributes_from_xml(reader);

        loop {
            match reader.read()? {
                XmlNodeType::StartElement => {
                    // A handler that consumed the element but produced no value
                    // leaves the reader on its end tag.
                    if !self.try_read_element_from_xml(reader)?
                        && reader.node_type() == XmlNodeType::StartElement
                    {
                        tracing::debug!(element = reader.local_name(), "skipping unknown element");
                        reader.skip_current_element()?;
                    }
                }
                XmlNodeType::EndElement if reader.local_name() == name => return Ok(()),
                XmlNodeType::Eof => {
                    return Err(EwsError::Xml(format!("unexpected EOF inside {name}")));
                }
                _ => {}
            }
        }
    }

    /// Loads every key of `object` through [`ComplexProperty::load_json_key`].
    fn load_from_json(&mut self, object: &JsonObject, service: &ExchangeService) {
        for (key, value) in object {
            self.load_json_key(key, value, service);
        }
    }
}
