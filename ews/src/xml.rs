// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! XML utilities for EWS processing.

use std::fmt;
use std::io::Cursor;

use jiff::civil::Date;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::datetime::parse_unspecified_date;
use crate::error::EwsError;

/// XML namespaces used by EWS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlNamespace {
    /// SOAP 1.1 envelope namespace.
    Soap,
    /// EWS types namespace.
    Types,
    /// EWS messages namespace.
    Messages,
}

impl XmlNamespace {
    /// Prefix bound to the namespace on the envelope.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Soap => "soap",
            Self::Types => "t",
            Self::Messages => "m",
        }
    }

    /// Namespace URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Soap => "http://schemas.xmlsoap.org/soap/envelope/",
            Self::Types => "http://schemas.microsoft.com/exchange/services/2006/types",
            Self::Messages => "http://schemas.microsoft.com/exchange/services/2006/messages",
        }
    }
}

/// Element and attribute names shared by the XML and JSON encodings.
#[allow(missing_docs)]
pub mod names {
    pub const ARCHIVE_ITEM: &str = "ArchiveItem";
    pub const ARCHIVE_ITEM_RESPONSE: &str = "ArchiveItemResponse";
    pub const ARCHIVE_ITEM_RESPONSE_MESSAGE: &str = "ArchiveItemResponseMessage";
    pub const ARCHIVE_SOURCE_FOLDER_ID: &str = "ArchiveSourceFolderId";
    pub const ITEM_IDS: &str = "ItemIds";
    pub const ITEM_ID: &str = "ItemId";
    pub const ITEMS: &str = "Items";
    pub const FOLDER_ID: &str = "FolderId";
    pub const DISTINGUISHED_FOLDER_ID: &str = "DistinguishedFolderId";
    pub const MAILBOX: &str = "Mailbox";
    pub const EMAIL_ADDRESS: &str = "EmailAddress";
    pub const ID: &str = "Id";
    pub const CHANGE_KEY: &str = "ChangeKey";

    pub const RECURRENCE: &str = "Recurrence";
    pub const START_DATE: &str = "StartDate";
    pub const END_DATE: &str = "EndDate";
    pub const NUMBER_OF_OCCURRENCES: &str = "NumberOfOccurrences";
    pub const NO_END_RECURRENCE: &str = "NoEndRecurrence";
    pub const END_DATE_RECURRENCE: &str = "EndDateRecurrence";
    pub const NUMBERED_RECURRENCE: &str = "NumberedRecurrence";

    pub const ENVELOPE: &str = "Envelope";
    pub const HEADER: &str = "Header";
    pub const BODY: &str = "Body";
    pub const FAULT: &str = "Fault";
    pub const FAULT_STRING: &str = "faultstring";
    pub const REQUEST_SERVER_VERSION: &str = "RequestServerVersion";
    pub const VERSION: &str = "Version";
    pub const RESPONSE_MESSAGES: &str = "ResponseMessages";
    pub const RESPONSE_CLASS: &str = "ResponseClass";
    pub const RESPONSE_CODE: &str = "ResponseCode";
    pub const MESSAGE_TEXT: &str = "MessageText";
}

/// Writer producing EWS-flavoured XML.
///
/// Start tags are buffered until the first child or text is written, so an
/// element closed right after its attributes is emitted as an empty element.
pub struct EwsXmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
    pending: Option<BytesStart<'static>>,
    open: Vec<String>,
}

impl EwsXmlWriter {
    /// Creates a writer with two-space indentation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
            pending: None,
            open: Vec::new(),
        }
    }

    /// Opens `<prefix:name>`.
    ///
    /// # Errors
    ///
    /// Returns an error if XML writing fails.
    pub fn write_start_element(
        &mut self,
        namespace: XmlNamespace,
        name: &str,
    ) -> Result<(), EwsError> {
        self.flush_pending()?;
        let qname = format!("{}:{name}", namespace.prefix());
        self.pending = Some(BytesStart::new(qname.clone()));
        self.open.push(qname);
        Ok(())
    }

    /// Adds an attribute to the element opened last.
    ///
    /// # Errors
    ///
    /// Returns an error if the element already has content.
    pub fn write_attribute_value(&mut self, name: &str, value: &str) -> Result<(), EwsError> {
        match self.pending.as_mut() {
            Some(start) => {
                start.push_attribute((name, value));
                Ok(())
            }
            None => Err(EwsError::Xml(format!(
                "attribute {name} written after element content"
            ))),
        }
    }

    /// Writes escaped text inside the element opened last.
    ///
    /// # Errors
    ///
    /// Returns an error if XML writing fails.
    pub fn write_value(&mut self, value: &str) -> Result<(), EwsError> {
        self.flush_pending()?;
        self.writer.write_event(Event::Text(BytesText::new(value)))?;
        Ok(())
    }

    /// Closes the element opened last.
    ///
    /// # Errors
    ///
    /// Returns an error if no element is open or XML writing fails.
    pub fn write_end_element(&mut self) -> Result<(), EwsError> {
        let qname = self
            .open
            .pop()
            .ok_or_else(|| EwsError::Xml("no open element to close".to_string()))?;
        match self.pending.take() {
            Some(start) => self.writer.write_event(Event::Empty(start))?,
            None => self.writer.write_event(Event::End(BytesEnd::new(qname)))?,
        }
        Ok(())
    }

    /// Writes `<prefix:name>value</prefix:name>`.
    ///
    /// # Errors
    ///
    /// Returns an error if XML writing fails.
    pub fn write_element_value(
        &mut self,
        namespace: XmlNamespace,
        name: &str,
        value: &str,
    ) -> Result<(), EwsError> {
        self.write_start_element(namespace, name)?;
        self.write_value(value)?;
        self.write_end_element()
    }

    /// Finishes writing and returns the document.
    ///
    /// # Errors
    ///
    /// Returns an error if elements are left open or the output is not UTF-8.
    pub fn into_string(self) -> Result<String, EwsError> {
        if let Some(name) = self.open.last() {
            return Err(EwsError::Xml(format!("element {name} was never closed")));
        }
        let bytes = self.writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| EwsError::Xml(format!("UTF-8 error: {e}")))
    }

    fn flush_pending(&mut self) -> Result<(), EwsError> {
        if let Some(start) = self.pending.take() {
            self.writer.write_event(Event::Start(start))?;
        }
        Ok(())
    }
}

impl fmt::Debug for EwsXmlWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EwsXmlWriter")
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}

impl Default for EwsXmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Kind of node the reader is positioned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlNodeType {
    /// Nothing read yet.
    None,
    /// An opening tag (empty elements are reported as start + end).
    StartElement,
    /// A closing tag.
    EndElement,
    /// Text or CDATA content.
    Text,
    /// End of the document.
    Eof,
}

/// Pull reader over an EWS document, tracking the current node.
pub struct EwsXmlReader<'a> {
    reader: Reader<&'a [u8]>,
    node_type: XmlNodeType,
    local_name: String,
    attributes: Vec<(String, String)>,
    text: String,
}

impl<'a> EwsXmlReader<'a> {
    /// Creates a reader over `xml`.
    #[must_use]
    pub fn new(xml: &'a str) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().check_end_names = true;
        reader.config_mut().expand_empty_elements = true;
        Self {
            reader,
            node_type: XmlNodeType::None,
            local_name: String::new(),
            attributes: Vec::new(),
            text: String::new(),
        }
    }

    /// Kind of the current node.
    #[must_use]
    pub const fn node_type(&self) -> XmlNodeType {
        self.node_type
    }

    /// Local name (without prefix) of the current element.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Whether the current node is the start of element `name`.
    #[must_use]
    pub fn is_start_element(&self, name: &str) -> bool {
        self.node_type == XmlNodeType::StartElement && self.local_name == name
    }

    /// Whether the current node is the end of element `name`.
    #[must_use]
    pub fn is_end_element(&self, name: &str) -> bool {
        self.node_type == XmlNodeType::EndElement && self.local_name == name
    }

    /// Reads an attribute of the current start element by local name.
    #[must_use]
    pub fn read_attribute_value(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Advances to the next element, text or end-of-document node.
    ///
    /// # Errors
    ///
    /// Returns an error if XML parsing fails.
    pub fn read(&mut self) -> Result<XmlNodeType, EwsError> {
        loop {
            match self.reader.read_event()? {
                Event::Start(ref e) => {
                    self.local_name = utf8(e.name().local_name().into_inner())?;
                    self.attributes.clear();
                    for attr in e.attributes().flatten() {
                        let key = utf8(attr.key.local_name().into_inner())?;
                        let value = attr
                            .decode_and_unescape_value(self.reader.decoder())
                            .map_err(|e| EwsError::Xml(e.to_string()))?
                            .into_owned();
                        self.attributes.push((key, value));
                    }
                    self.text.clear();
                    self.node_type = XmlNodeType::StartElement;
                }
                Event::End(ref e) => {
                    self.local_name = utf8(e.name().local_name().into_inner())?;
                    self.attributes.clear();
                    self.node_type = XmlNodeType::EndElement;
                }
                Event::Text(ref e) => {
                    let text = e.decode().map_err(|e| EwsError::Xml(e.to_string()))?;
                    if text.is_empty() {
                        continue;
                    }
                    self.text = text.into_owned();
                    self.node_type = XmlNodeType::Text;
                }
                Event::GeneralRef(ref e) => {
                    let name = e.decode().map_err(|e| EwsError::Xml(e.to_string()))?;
                    self.text = match e.resolve_char_ref() {
                        Ok(Some(ch)) => ch.to_string(),
                        _ => resolve_predefined_entity(&name)
                            .ok_or_else(|| EwsError::Xml(format!("unknown entity &{name};")))?
                            .to_string(),
                    };
                    self.node_type = XmlNodeType::Text;
                }
                Event::CData(ref e) => {
                    self.text = utf8(e)?;
                    self.node_type = XmlNodeType::Text;
                }
                Event::Eof => self.node_type = XmlNodeType::Eof,
                _ => continue,
            }
            return Ok(self.node_type);
        }
    }

    /// Reads forward until the start of element `name`.
    ///
    /// Returns `false` if the document ends first.
    ///
    /// # Errors
    ///
    /// Returns an error if XML parsing fails.
    pub fn read_to_start_element(&mut self, name: &str) -> Result<bool, EwsError> {
        loop {
            match self.read()? {
                XmlNodeType::Eof => return Ok(false),
                XmlNodeType::StartElement if self.local_name == name => return Ok(true),
                _ => {}
            }
        }
    }

    /// Reads the text content of the current start element and moves to its
    /// end tag. Child elements are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader is not on a start element or the
    /// document ends early.
    pub fn read_element_value(&mut self) -> Result<String, EwsError> {
        if self.node_type != XmlNodeType::StartElement {
            return Err(EwsError::Xml(format!(
                "expected a start element, found {:?}",
                self.node_type
            )));
        }
        let name = self.local_name.clone();
        let mut value = String::new();
        loop {
            match self.read()? {
                XmlNodeType::Text => value.push_str(&self.text),
                XmlNodeType::StartElement => self.skip_current_element()?,
                XmlNodeType::EndElement if self.local_name == name => {
                    return Ok(value.trim().to_string());
                }
                XmlNodeType::Eof => {
                    return Err(EwsError::Xml(format!("unexpected EOF inside {name}")));
                }
                _ => {}
            }
        }
    }

    /// Reads the current element's value as a date without time or zone.
    ///
    /// Returns `None` when the value is empty or not a date.
    ///
    /// # Errors
    ///
    /// Returns an error if XML parsing fails.
    pub fn read_element_value_as_unspecified_date(&mut self) -> Result<Option<Date>, EwsError> {
        let value = self.read_element_value()?;
        Ok(parse_unspecified_date(&value))
    }

    /// Skips the current start element including all of its children.
    ///
    /// # Errors
    ///
    /// Returns an error if the document ends before the element is closed.
    pub fn skip_current_element(&mut self) -> Result<(), EwsError> {
        if self.node_type != XmlNodeType::StartElement {
            return Ok(());
        }
        let mut depth = 1usize;
        loop {
            match self.read()? {
                XmlNodeType::StartElement => depth += 1,
                XmlNodeType::EndElement => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                XmlNodeType::Eof => return Err(EwsError::Xml("Unexpected EOF".to_string())),
                _ => {}
            }
        }
    }
}

impl fmt::Debug for EwsXmlReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EwsXmlReader")
            .field("node_type", &self.node_type)
            .field("local_name", &self.local_name)
            .finish_non_exhaustive()
    }
}

fn utf8(bytes: &[u8]) -> Result<String, EwsError> {
    std::str::from_utf8(bytes)
        .map(ToString::to_string)
        .map_err(|e| EwsError::Xml(format!("UTF-8 error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_collapses_elements_without_content() {
        let mut writer = EwsXmlWriter::new();
        writer
            .write_start_element(XmlNamespace::Types, "ItemId")
            .unwrap();
        writer.write_attribute_value("Id", "AAA").unwrap();
        writer.write_end_element().unwrap();

        let xml = writer.into_string().unwrap();
        assert!(xml.contains(r#"<t:ItemId Id="AAA"/>"#));
        assert!(!xml.contains("</t:ItemId>"));
    }

    #[test]
    fn writer_rejects_unclosed_elements() {
        let mut writer = EwsXmlWriter::new();
        writer
            .write_start_element(XmlNamespace::Messages, "ItemIds")
            .unwrap();
        assert!(writer.into_string().is_err());
    }

    #[test]
    fn reader_reports_empty_elements_as_start_and_end() {
        let mut reader = EwsXmlReader::new(r#"<t:Root><t:ItemId Id="A"/></t:Root>"#);
        assert_eq!(reader.read().unwrap(), XmlNodeType::StartElement);
        assert_eq!(reader.read().unwrap(), XmlNodeType::StartElement);
        assert_eq!(reader.local_name(), "ItemId");
        assert_eq!(reader.read_attribute_value("Id"), Some("A"));
        assert_eq!(reader.read().unwrap(), XmlNodeType::EndElement);
        assert!(reader.is_end_element("ItemId"));
        assert_eq!(reader.read().unwrap(), XmlNodeType::EndElement);
        assert_eq!(reader.read().unwrap(), XmlNodeType::Eof);
    }

    #[test]
    fn reader_reads_value_and_skips_children() {
        let mut reader = EwsXmlReader::new("<a><b>x<c><d/></c>y</b><e/></a>");
        assert!(reader.read_to_start_element("b").unwrap());
        assert_eq!(reader.read_element_value().unwrap(), "xy");
        assert!(reader.is_end_element("b"));
        assert_eq!(reader.read().unwrap(), XmlNodeType::StartElement);
        assert_eq!(reader.local_name(), "e");
    }

    #[test]
    fn reader_resolves_entity_references() {
        let mut reader = EwsXmlReader::new("<m:MessageText>Tom&amp;Jerry&#33;</m:MessageText>");
        assert!(reader.read_to_start_element("MessageText").unwrap());
        assert_eq!(reader.read_element_value().unwrap(), "Tom&Jerry!");
    }

    #[test]
    fn reader_keeps_spaces_around_entity_references() {
        let mut reader =
            EwsXmlReader::new("<m:MessageText>\n  Tom &amp; Jerry &lt; 3 &gt; 2\n</m:MessageText>");
        assert!(reader.read_to_start_element("MessageText").unwrap());
        assert_eq!(reader.read_element_value().unwrap(), "Tom & Jerry < 3 > 2");
    }

    #[test]
    fn reader_unescapes_attribute_values() {
        let mut reader =
            EwsXmlReader::new(r#"<t:ItemId Id="A&amp;B&lt;C" ChangeKey="&quot;k&quot;&#62;"/>"#);
        assert_eq!(reader.read().unwrap(), XmlNodeType::StartElement);
        assert_eq!(reader.read_attribute_value("Id"), Some("A&B<C"));
        assert_eq!(reader.read_attribute_value("ChangeKey"), Some("\"k\">"));
    }
}
