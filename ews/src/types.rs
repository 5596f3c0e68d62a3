// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::EwsError;
use crate::json::{JsonObject, JsonObjectExt};
use crate::property::ComplexProperty;
use crate::service::ExchangeService;
use crate::version::ExchangeVersion;
use crate::xml::{EwsXmlReader, EwsXmlWriter, XmlNamespace, XmlNodeType, names};

/// Identifier of an item (message, appointment, ...) in a mailbox.
///
/// An `ItemId` is opaque: the server hands it out and the client passes it
/// back unchanged. The change key, when present, pins a specific version of
/// the item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ItemId {
    id: String,
    change_key: Option<String>,
}

impl ItemId {
    /// Creates an item id without change key.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            change_key: None,
        }
    }

    /// Creates an item id with a change key.
    #[must_use]
    pub fn with_change_key(id: impl Into<String>, change_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            change_key: Some(change_key.into()),
        }
    }

    /// The unique identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The change key.
    #[must_use]
    pub fn change_key(&self) -> Option<&str> {
        self.change_key.as_deref()
    }

    /// Checks the id is usable in a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty.
    pub fn validate(&self) -> Result<(), EwsError> {
        if self.id.trim().is_empty() {
            return Err(EwsError::Validation("ItemId: Id must not be empty".to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.id.fmt(f)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl ComplexProperty for ItemId {
    fn write_attributes_to_xml(&self, writer: &mut EwsXmlWriter) -> Result<(), EwsError> {
        writer.write_attribute_value(names::ID, &self.id)?;
        if let Some(change_key) = &self.change_key {
            writer.write_attribute_value(names::CHANGE_KEY, change_key)?;
        }
        Ok(())
    }

    fn write_elements_to_xml(&self, _writer: &mut EwsXmlWriter) -> Result<(), EwsError> {
        Ok(())
    }

    fn to_json(&self, _service: &ExchangeService) -> Result<JsonObject, EwsError> {
        let mut obj = JsonObject::new();
        obj.add_type_parameter(names::ITEM_ID);
        obj.insert(names::ID.to_string(), Value::String(self.id.clone()));
        if let Some(change_key) = &self.change_key {
            obj.insert(
                names::CHANGE_KEY.to_string(),
                Value::String(change_key.clone()),
            );
        }
        Ok(obj)
    }

    fn read_attributes_from_xml(&mut self, reader: &EwsXmlReader<'_>) {
        self.id = reader
            .read_attribute_value(names::ID)
            .unwrap_or_default()
            .to_string();
        self.change_key = reader
            .read_attribute_value(names::CHANGE_KEY)
            .map(ToString::to_string);
    }

    fn try_read_element_from_xml(
        &mut self,
        _reader: &mut EwsXmlReader<'_>,
    ) -> Result<bool, EwsError> {
        Ok(false)
    }

    fn load_json_key(&mut self, key: &str, value: &Value, _service: &ExchangeService) {
        match key {
            names::ID => {
                if let Some(id) = value.as_str() {
                    self.id = id.to_string();
                }
            }
            names::CHANGE_KEY => self.change_key = value.as_str().map(ToString::to_string),
            _ => {}
        }
    }
}

/// Writes `ids` as `<prefix:name>` wrapping one `<t:ItemId>` per id, in order.
///
/// # Errors
///
/// Returns an error if XML writing fails.
pub fn write_item_ids_to_xml(
    writer: &mut EwsXmlWriter,
    ids: &[ItemId],
    namespace: XmlNamespace,
    name: &str,
) -> Result<(), EwsError> {
    writer.write_start_element(namespace, name)?;
    for id in ids {
        id.write_to_xml(writer, XmlNamespace::Types, names::ITEM_ID)?;
    }
    writer.write_end_element()
}

/// Serializes `ids` to a JSON array, preserving order.
///
/// # Errors
///
/// Returns an error if an id cannot be serialized.
pub fn item_ids_to_json(ids: &[ItemId], service: &ExchangeService) -> Result<Value, EwsError> {
    ids.iter()
        .map(|id| id.to_json(service).map(Value::Object))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

/// Reads the `<t:ItemId>` children of the list element the reader is on.
///
/// # Errors
///
/// Returns an error if XML parsing fails.
pub fn read_item_ids_from_xml(
    reader: &mut EwsXmlReader<'_>,
    name: &str,
) -> Result<Vec<ItemId>, EwsError> {
    let mut ids = Vec::new();
    loop {
        match reader.read()? {
            XmlNodeType::StartElement if reader.local_name() == names::ITEM_ID => {
                let mut id = ItemId::default();
                id.load_from_xml(reader, names::ITEM_ID)?;
                ids.push(id);
            }
            XmlNodeType::StartElement => reader.skip_current_element()?,
            XmlNodeType::EndElement if reader.local_name() == name => return Ok(ids),
            XmlNodeType::Eof => {
                return Err(EwsError::Xml(format!("unexpected EOF inside {name}")));
            }
            _ => {}
        }
    }
}

/// Folders every mailbox has, addressable by name instead of id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownFolderName {
    /// Calendar.
    Calendar,
    /// Contacts.
    Contacts,
    /// Deleted Items.
    DeletedItems,
    /// Drafts.
    Drafts,
    /// Inbox.
    Inbox,
    /// Journal.
    Journal,
    /// Notes.
    Notes,
    /// Outbox.
    Outbox,
    /// Sent Items.
    SentItems,
    /// Tasks.
    Tasks,
    /// Root of the message folder hierarchy.
    MsgFolderRoot,
    /// Root of the mailbox.
    Root,
    /// Junk Email.
    JunkEmail,
    /// Search Folders.
    SearchFolders,
    /// Voice Mail.
    VoiceMail,
    /// Root of the dumpster.
    RecoverableItemsRoot,
    /// Soft-deleted items.
    RecoverableItemsDeletions,
    /// Root of the archive mailbox.
    ArchiveRoot,
    /// Root of the archive message folder hierarchy.
    ArchiveMsgFolderRoot,
    /// Deleted Items of the archive mailbox.
    ArchiveDeletedItems,
    /// Archive Inbox.
    ArchiveInbox,
    /// Sync Issues.
    SyncIssues,
    /// Conflicts.
    Conflicts,
    /// Conversation History.
    ConversationHistory,
    /// To-do search folder.
    ToDoSearch,
}

impl WellKnownFolderName {
    /// All names, in declaration order.
    pub const ALL: [Self; 25] = [
        Self::Calendar,
        Self::Contacts,
        Self::DeletedItems,
        Self::Drafts,
        Self::Inbox,
        Self::Journal,
        Self::Notes,
        Self::Outbox,
        Self::SentItems,
        Self::Tasks,
        Self::MsgFolderRoot,
        Self::Root,
        Self::JunkEmail,
        Self::SearchFolders,
        Self::VoiceMail,
        Self::RecoverableItemsRoot,
        Self::RecoverableItemsDeletions,
        Self::ArchiveRoot,
        Self::ArchiveMsgFolderRoot,
        Self::ArchiveDeletedItems,
        Self::ArchiveInbox,
        Self::SyncIssues,
        Self::Conflicts,
        Self::ConversationHistory,
        Self::ToDoSearch,
    ];

    /// Wire value of the `Id` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::Contacts => "contacts",
            Self::DeletedItems => "deleteditems",
            Self::Drafts => "drafts",
            Self::Inbox => "inbox",
            Self::Journal => "journal",
            Self::Notes => "notes",
            Self::Outbox => "outbox",
            Self::SentItems => "sentitems",
            Self::Tasks => "tasks",
            Self::MsgFolderRoot => "msgfolderroot",
            Self::Root => "root",
            Self::JunkEmail => "junkemail",
            Self::SearchFolders => "searchfolders",
            Self::VoiceMail => "voicemail",
            Self::RecoverableItemsRoot => "recoverableitemsroot",
            Self::RecoverableItemsDeletions => "recoverableitemsdeletions",
            Self::ArchiveRoot => "archiveroot",
            Self::ArchiveMsgFolderRoot => "archivemsgfolderroot",
            Self::ArchiveDeletedItems => "archivedeleteditems",
            Self::ArchiveInbox => "archiveinbox",
            Self::SyncIssues => "syncissues",
            Self::Conflicts => "conflicts",
            Self::ConversationHistory => "conversationhistory",
            Self::ToDoSearch => "todosearch",
        }
    }

    /// Earliest server version that knows the folder name.
    #[must_use]
    pub const fn minimum_required_server_version(self) -> ExchangeVersion {
        match self {
            Self::RecoverableItemsRoot
            | Self::RecoverableItemsDeletions
            | Self::ArchiveRoot
            | Self::ArchiveMsgFolderRoot
            | Self::ArchiveDeletedItems => ExchangeVersion::Exchange2010Sp1,
            Self::ArchiveInbox
            | Self::SyncIssues
            | Self::Conflicts
            | Self::ConversationHistory
            | Self::ToDoSearch => ExchangeVersion::Exchange2013,
            _ => ExchangeVersion::Exchange2007Sp1,
        }
    }
}

impl fmt::Display for WellKnownFolderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WellKnownFolderName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown well-known folder name: {s}"))
    }
}

/// Identifier of a folder, either by server id or by well-known name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderId {
    /// A folder addressed by its server-assigned id.
    Id {
        /// The unique identifier.
        id: String,
        /// The change key.
        change_key: Option<String>,
    },
    /// A well-known folder, optionally in another user's mailbox.
    Distinguished {
        /// The folder name.
        name: WellKnownFolderName,
        /// SMTP address of the mailbox that holds the folder.
        mailbox: Option<String>,
    },
}

impl FolderId {
    /// Creates a folder id from a server-assigned id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self::Id {
            id: id.into(),
            change_key: None,
        }
    }

    /// Creates a folder id for a well-known folder in the caller's mailbox.
    #[must_use]
    pub const fn distinguished(name: WellKnownFolderName) -> Self {
        Self::Distinguished {
            name,
            mailbox: None,
        }
    }

    /// Creates a folder id for a well-known folder in `mailbox`.
    #[must_use]
    pub fn distinguished_in(name: WellKnownFolderName, mailbox: impl Into<String>) -> Self {
        Self::Distinguished {
            name,
            mailbox: Some(mailbox.into()),
        }
    }

    /// Element name of this kind of id.
    #[must_use]
    pub const fn xml_element_name(&self) -> &'static str {
        match self {
            Self::Id { .. } => names::FOLDER_ID,
            Self::Distinguished { .. } => names::DISTINGUISHED_FOLDER_ID,
        }
    }

    /// Checks the id against the server version requests are written for.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty, the mailbox is blank, or the
    /// well-known folder is newer than `version`.
    pub fn validate(&self, version: ExchangeVersion) -> Result<(), EwsError> {
        match self {
            Self::Id { id, .. } if id.trim().is_empty() => Err(EwsError::Validation(
                "FolderId: Id must not be empty".to_string(),
            )),
            Self::Id { .. } => Ok(()),
            Self::Distinguished { name, mailbox } => {
                let minimum = name.minimum_required_server_version();
                if version < minimum {
                    return Err(EwsError::Validation(format!(
                        "FolderId: {name} is only valid for {minimum} or later, \
                         but the requested server version is {version}"
                    )));
                }
                if mailbox.as_deref().is_some_and(|m| m.trim().is_empty()) {
                    return Err(EwsError::Validation(
                        "FolderId: Mailbox must not be empty".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Writes the id as `<t:FolderId/>` or `<t:DistinguishedFolderId/>`.
    ///
    /// # Errors
    ///
    /// Returns an error if XML writing fails.
    pub fn write_to_xml(&self, writer: &mut EwsXmlWriter) -> Result<(), EwsError> {
        writer.write_start_element(XmlNamespace::Types, self.xml_element_name())?;
        match self {
            Self::Id { id, change_key } => {
                writer.write_attribute_value(names::ID, id)?;
                if let Some(change_key) = change_key {
                    writer.write_attribute_value(names::CHANGE_KEY, change_key)?;
                }
            }
            Self::Distinguished { name, mailbox } => {
                writer.write_attribute_value(names::ID, name.as_str())?;
                if let Some(mailbox) = mailbox {
                    writer.write_start_element(XmlNamespace::Types, names::MAILBOX)?;
                    writer.write_element_value(
                        XmlNamespace::Types,
                        names::EMAIL_ADDRESS,
                        mailbox,
                    )?;
                    writer.write_end_element()?;
                }
            }
        }
        writer.write_end_element()
    }

    /// Serializes the id to a JSON object.
    #[must_use]
    pub fn to_json(&self) -> JsonObject {
        let mut obj = JsonObject::new();
        obj.add_type_parameter(self.xml_element_name());
        match self {
            Self::Id { id, change_key } => {
                obj.insert(names::ID.to_string(), Value::String(id.clone()));
                if let Some(change_key) = change_key {
                    obj.insert(
                        names::CHANGE_KEY.to_string(),
                        Value::String(change_key.clone()),
                    );
                }
            }
            Self::Distinguished { name, mailbox } => {
                obj.insert(
                    names::ID.to_string(),
                    Value::String(name.as_str().to_string()),
                );
                if let Some(mailbox) = mailbox {
                    let mut mailbox_obj = JsonObject::new();
                    mailbox_obj.insert(
                        names::EMAIL_ADDRESS.to_string(),
                        Value::String(mailbox.clone()),
                    );
                    obj.insert(names::MAILBOX.to_string(), Value::Object(mailbox_obj));
                }
            }
        }
        obj
    }

    /// Reads a folder id from the `<t:FolderId>` or `<t:DistinguishedFolderId>`
    /// start element the reader is on.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is neither, the well-known name is
    /// unknown, or XML parsing fails.
    pub fn read_from_xml(reader: &mut EwsXmlReader<'_>) -> Result<Self, EwsError> {
        let element = reader.local_name().to_string();
        let id = reader
            .read_attribute_value(names::ID)
            .unwrap_or_default()
            .to_string();

        match element.as_str() {
            names::FOLDER_ID => {
                let change_key = reader
                    .read_attribute_value(names::CHANGE_KEY)
                    .map(ToString::to_string);
                reader.skip_current_element()?;
                Ok(Self::Id { id, change_key })
            }
            names::DISTINGUISHED_FOLDER_ID => {
                let name = id.parse().map_err(EwsError::Xml)?;
                let mut mailbox = None;
                loop {
                    match reader.read()? {
                        XmlNodeType::StartElement if reader.local_name() == names::EMAIL_ADDRESS => {
                            mailbox = Some(reader.read_element_value()?);
                        }
                        XmlNodeType::EndElement if reader.local_name() == element => break,
                        XmlNodeType::Eof => {
                            return Err(EwsError::Xml(format!("unexpected EOF inside {element}")));
                        }
                        _ => {}
                    }
                }
                Ok(Self::Distinguished { name, mailbox })
            }
            other => Err(EwsError::Xml(format!("{other} is not a folder id"))),
        }
    }
}

impl FromStr for FolderId {
    type Err = std::convert::Infallible;

    /// Well-known folder names become distinguished ids, anything else is
    /// taken as a server-assigned id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<WellKnownFolderName>()
            .map_or_else(|_| Self::new(s), Self::distinguished))
    }
}

impl From<WellKnownFolderName> for FolderId {
    fn from(name: WellKnownFolderName) -> Self {
        Self::distinguished(name)
    }
}
