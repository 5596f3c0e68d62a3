// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Service context shared by requests and properties.

use jiff::civil::Date;
use jiff::tz::TimeZone;

use crate::archive::{ArchiveItemRequest, ArchiveItemResponse};
use crate::config::{RequestFormat, ServiceConfig, ServiceErrorHandling};
use crate::datetime::to_unspecified_date_in;
use crate::error::EwsError;
use crate::request::MultiResponseServiceRequest;
use crate::response::ServiceResponseCollection;
use crate::transport::Transport;
use crate::types::{FolderId, ItemId};
use crate::version::ExchangeVersion;

/// Context every request is validated, encoded and decoded against.
///
/// # Example
///
/// ```ignore
/// use exchange_ews::{ExchangeService, ServiceConfig, ExchangeVersion};
///
/// let config = ServiceConfig {
///     requested_server_version: ExchangeVersion::Exchange2013,
///     time_zone: Some("Europe/Berlin".to_string()),
///     ..Default::default()
/// };
/// let service = ExchangeService::new(config)?;
/// ```
#[derive(Debug, Clone)]
pub struct ExchangeService {
    config: ServiceConfig,
    time_zone: TimeZone,
}

impl ExchangeService {
    /// Creates a service context.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured time zone is unknown.
    pub fn new(config: ServiceConfig) -> Result<Self, EwsError> {
        let time_zone = match &config.time_zone {
            Some(name) => TimeZone::get(name)
                .map_err(|e| EwsError::Config(format!("Unknown time zone {name}: {e}")))?,
            None => TimeZone::UTC,
        };
        Ok(Self { config, time_zone })
    }

    /// Creates a UTC service context for `version`.
    #[must_use]
    pub fn with_version(version: ExchangeVersion) -> Self {
        Self {
            config: ServiceConfig {
                requested_server_version: version,
                ..Default::default()
            },
            time_zone: TimeZone::UTC,
        }
    }

    /// Server version requests are written for.
    #[must_use]
    pub const fn requested_server_version(&self) -> ExchangeVersion {
        self.config.requested_server_version
    }

    /// Time zone used for date conversion.
    #[must_use]
    pub const fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    /// Default error handling of multi-response requests.
    #[must_use]
    pub const fn error_handling(&self) -> ServiceErrorHandling {
        self.config.error_handling
    }

    /// Default wire format.
    #[must_use]
    pub const fn format(&self) -> RequestFormat {
        self.config.format
    }

    /// Converts a JSON start-date string into an unspecified date.
    ///
    /// Returns `None` if the value cannot be read as a date.
    #[must_use]
    pub fn convert_start_date_to_unspecified_date(&self, value: &str) -> Option<Date> {
        let date = to_unspecified_date_in(value, &self.time_zone);
        if date.is_none() {
            tracing::debug!(value, "dropping unparsable start date");
        }
        date
    }

    /// Archives `item_ids` out of `source_folder_id`, returning one outcome
    /// per item in the order given.
    ///
    /// # Errors
    ///
    /// Returns an error if `item_ids` is empty, the request is invalid for the
    /// requested server version, or the exchange with the server fails.
    #[tracing::instrument(skip_all, fields(folder = source_folder_id.xml_element_name()))]
    pub fn archive_items<T: Transport>(
        &self,
        transport: &mut T,
        item_ids: impl IntoIterator<Item = ItemId>,
        source_folder_id: FolderId,
    ) -> Result<ServiceResponseCollection<ArchiveItemResponse>, EwsError> {
        let item_ids: Vec<ItemId> = item_ids.into_iter().collect();
        tracing::debug!(items = item_ids.len(), "archiving items");
        if item_ids.is_empty() {
            return Err(EwsError::Validation(
                "itemIds: the collection must contain at least one item".to_string(),
            ));
        }

        let mut request = ArchiveItemRequest::new(ServiceErrorHandling::ReturnErrors);
        request.set_source_folder_id(source_folder_id);
        request.ids_mut().extend(item_ids);
        request.execute(self, transport)
    }
}
