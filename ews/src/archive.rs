// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! The `ArchiveItem` operation.

use serde_json::Value;

use crate::config::ServiceErrorHandling;
use crate::error::EwsError;
use crate::json::{JsonObject, JsonObjectExt};
use crate::property::ComplexProperty;
use crate::request::{MultiResponseServiceRequest, ServiceRequest};
use crate::response::{ResponseOutcome, ServiceResponse};
use crate::service::ExchangeService;
use crate::types::{FolderId, ItemId, item_ids_to_json, write_item_ids_to_xml};
use crate::version::ExchangeVersion;
use crate::xml::{EwsXmlReader, EwsXmlWriter, XmlNamespace, XmlNodeType, names};

/// Moves items from a source folder into the mailbox archive.
#[derive(Debug, Clone)]
pub struct ArchiveItemRequest {
    error_handling: ServiceErrorHandling,
    source_folder_id: Option<FolderId>,
    ids: Vec<ItemId>,
}

impl ArchiveItemRequest {
    /// Creates an empty request.
    #[must_use]
    pub const fn new(error_handling: ServiceErrorHandling) -> Self {
        Self {
            error_handling,
            source_folder_id: None,
            ids: Vec::new(),
        }
    }

    /// Folder the items are archived from.
    #[must_use]
    pub const fn source_folder_id(&self) -> Option<&FolderId> {
        self.source_folder_id.as_ref()
    }

    /// Sets the folder the items are archived from.
    pub fn set_source_folder_id(&mut self, folder_id: FolderId) {
        self.source_folder_id = Some(folder_id);
    }

    /// Items to archive, in wire order.
    #[must_use]
    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    /// Items to archive, for editing.
    pub const fn ids_mut(&mut self) -> &mut Vec<ItemId> {
        &mut self.ids
    }
}

impl ServiceRequest for ArchiveItemRequest {
    fn xml_element_name(&self) -> &'static str {
        names::ARCHIVE_ITEM
    }

    fn response_xml_element_name(&self) -> &'static str {
        names::ARCHIVE_ITEM_RESPONSE
    }

    fn minimum_required_server_version(&self) -> ExchangeVersion {
        ExchangeVersion::Exchange2013
    }

    fn validate(&self, service: &ExchangeService) -> Result<(), EwsError> {
        let folder_id = self
            .source_folder_id
            .as_ref()
            .ok_or_else(|| EwsError::argument_null("SourceFolderId"))?;
        folder_id.validate(service.requested_server_version())?;
        self.ids.iter().try_for_each(ItemId::validate)
    }

    fn write_elements_to_xml(
        &self,
        writer: &mut EwsXmlWriter,
        _service: &ExchangeService,
    ) -> Result<(), EwsError> {
        let folder_id = self
            .source_folder_id
            .as_ref()
            .ok_or_else(|| EwsError::argument_null("SourceFolderId"))?;
        writer.write_start_element(XmlNamespace::Messages, names::ARCHIVE_SOURCE_FOLDER_ID)?;
        folder_id.write_to_xml(writer)?;
        writer.write_end_element()?;

        write_item_ids_to_xml(writer, &self.ids, XmlNamespace::Messages, names::ITEM_IDS)
    }

    fn to_json(&self, service: &ExchangeService) -> Result<JsonObject, EwsError> {
        let folder_id = self
            .source_folder_id
            .as_ref()
            .ok_or_else(|| EwsError::argument_null("SourceFolderId"))?;

        // Not wrapped: `__type` tells the folder id variants apart.
        let mut obj = JsonObject::new();
        obj.insert(
            names::ARCHIVE_SOURCE_FOLDER_ID.to_string(),
            Value::Object(folder_id.to_json()),
        );
        obj.insert(
            names::ITEM_IDS.to_string(),
            item_ids_to_json(&self.ids, service)?,
        );
        Ok(obj)
    }
}

impl MultiResponseServiceRequest for ArchiveItemRequest {
    type Target = ItemId;
    type Response = ArchiveItemResponse;

    fn targets(&self) -> &[ItemId] {
        &self.ids
    }

    fn response_message_xml_element_name(&self) -> &'static str {
        names::ARCHIVE_ITEM_RESPONSE_MESSAGE
    }

    fn error_handling_mode(&self) -> ServiceErrorHandling {
        self.error_handling
    }

    fn create_service_response(target: &ItemId, index: usize) -> ArchiveItemResponse {
        ArchiveItemResponse::new(target.clone(), index)
    }
}

/// Outcome of archiving one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveItemResponse {
    index: usize,
    target: ItemId,
    outcome: ResponseOutcome,
    item_id: Option<ItemId>,
}

impl ArchiveItemResponse {
    /// Creates a pending response for `target` at position `index`.
    #[must_use]
    pub fn new(target: ItemId, index: usize) -> Self {
        Self {
            index,
            target,
            outcome: ResponseOutcome::default(),
            item_id: None,
        }
    }

    /// Position of the response, equal to its target's position.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The item this response answers.
    #[must_use]
    pub const fn target(&self) -> &ItemId {
        &self.target
    }

    /// Id of the archived copy, when the server returns one.
    #[must_use]
    pub const fn item_id(&self) -> Option<&ItemId> {
        self.item_id.as_ref()
    }
}

impl ServiceResponse for ArchiveItemResponse {
    fn outcome(&self) -> &ResponseOutcome {
        &self.outcome
    }

    fn outcome_mut(&mut self) -> &mut ResponseOutcome {
        &mut self.outcome
    }

    fn read_element_from_xml(&mut self, reader: &mut EwsXmlReader<'_>) -> Result<bool, EwsError> {
        if !reader.is_start_element(names::ITEMS) {
            return Ok(false);
        }

        loop {
            match reader.read()? {
                XmlNodeType::StartElement if reader.local_name() == names::ITEM_ID => {
                    let mut id = ItemId::default();
                    id.load_from_xml(reader, names::ITEM_ID)?;
                    self.item_id.get_or_insert(id);
                }
                XmlNodeType::EndElement if reader.local_name() == names::ITEMS => return Ok(true),
                XmlNodeType::Eof => {
                    return Err(EwsError::Xml(format!(
                        "unexpected EOF inside {}",
                        names::ITEMS
                    )));
                }
                _ => {}
            }
        }
    }

    fn load_json_key(&mut self, key: &str, value: &Value) {
        if key != names::ITEMS {
            return;
        }
        self.item_id = value
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
            .filter_map(|item| item.read_as_object(names::ITEM_ID))
            .find_map(|id| {
                let unique_id = id.read_as_string(names::ID)?;
                Some(match id.read_as_string(names::CHANGE_KEY) {
                    Some(change_key) => ItemId::with_change_key(unique_id, change_key),
                    None => ItemId::new(unique_id),
                })
            });
    }
}
