// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Core of an Exchange Web Services (EWS) client: property values with
//! change tracking, recurrence ranges, and operation requests encoded as SOAP
//! or JSON.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::option_option,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::match_bool
)]

mod archive;
mod change;
mod config;
mod datetime;
mod error;
mod json;
mod property;
mod recurrence;
mod request;
mod response;
mod service;
mod transport;
mod types;
mod version;
mod xml;

pub use crate::archive::{ArchiveItemRequest, ArchiveItemResponse};
pub use crate::change::{ChangeTracker, PropertyId, set_field_value};
pub use crate::config::{RequestFormat, ServiceConfig, ServiceErrorHandling};
pub use crate::datetime::{date_to_xs_date, parse_unspecified_date};
pub use crate::error::EwsError;
pub use crate::json::{JsonObject, JsonObjectExt, TYPE_KEY};
pub use crate::property::ComplexProperty;
pub use crate::recurrence::{
    EndDateRecurrenceRange, NoEndRecurrenceRange, NumberedRecurrenceRange, Recurrence,
    RecurrenceRange,
};
pub use crate::request::{MultiResponseServiceRequest, ServiceRequest};
pub use crate::response::{
    NO_ERROR, ResponseOutcome, ServiceResponse, ServiceResponseCollection, ServiceResult,
};
pub use crate::service::ExchangeService;
pub use crate::transport::{OutgoingRequest, StaticTransport, Transport};
pub use crate::types::{FolderId, ItemId, WellKnownFolderName, read_item_ids_from_xml};
pub use crate::version::ExchangeVersion;
pub use crate::xml::{EwsXmlReader, EwsXmlWriter, XmlNamespace, XmlNodeType, names};
