// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence ranges and the recurrence they bound.
//!
//! A range is one of three closed variants. Each variant implements the whole
//! [`ComplexProperty`] contract itself and shares the start-date handling.

use jiff::civil::Date;
use serde_json::Value;

use crate::change::{ChangeTracker, PropertyId, set_field_value};
use crate::datetime::date_to_xs_date;
use crate::error::EwsError;
use crate::json::{JsonObject, JsonObjectExt};
use crate::property::ComplexProperty;
use crate::service::ExchangeService;
use crate::xml::{EwsXmlReader, EwsXmlWriter, XmlNamespace, XmlNodeType, names};

const RECURRENCE_RANGE_KEY: &str = "RecurrenceRange";

/// Start date and tracker handle shared by all range variants.
#[derive(Debug, Clone)]
struct RangeStart {
    id: PropertyId,
    start_date: Option<Date>,
}

// The tracker handle is identity, not value.
impl PartialEq for RangeStart {
    fn eq(&self, other: &Self) -> bool {
        self.start_date == other.start_date
    }
}

impl Eq for RangeStart {}

impl RangeStart {
    fn new(tracker: &mut ChangeTracker, start_date: Option<Date>) -> Self {
        Self {
            id: tracker.register(),
            start_date,
        }
    }

    fn set(&mut self, tracker: &mut ChangeTracker, date: Date) -> bool {
        set_field_value(tracker, self.id, &mut self.start_date, Some(date))
    }

    fn required(&self) -> Result<Date, EwsError> {
        self.start_date.ok_or_else(|| {
            EwsError::Validation("RecurrenceRange: StartDate must be set".to_string())
        })
    }

    fn write_to_xml(&self, writer: &mut EwsXmlWriter) -> Result<(), EwsError> {
        let date = self.required()?;
        writer.write_element_value(
            XmlNamespace::Types,
            names::START_DATE,
            &date_to_xs_date(date),
        )
    }

    fn add_to_json(&self, obj: &mut JsonObject, type_name: &str) -> Result<(), EwsError> {
        let date = self.required()?;
        obj.add_type_parameter(type_name);
        obj.insert(
            names::START_DATE.to_string(),
            Value::String(date_to_xs_date(date)),
        );
        Ok(())
    }

    fn try_read_from_xml(&mut self, reader: &mut EwsXmlReader<'_>) -> Result<bool, EwsError> {
        if reader.local_name() != names::START_DATE {
            return Ok(false);
        }
        let date = reader.read_element_value_as_unspecified_date()?;
        match date {
            Some(date) => self.start_date = Some(date),
            None => tracing::debug!("dropping unparsable StartDate element"),
        }
        Ok(date.is_some())
    }

    fn load_json_key(&mut self, key: &str, value: &Value, service: &ExchangeService) -> bool {
        if key != names::START_DATE {
            return false;
        }
        if let Some(date) = value
            .as_str()
            .and_then(|s| service.convert_start_date_to_unspecified_date(s))
        {
            self.start_date = Some(date);
        }
        true
    }
}

/// Range that starts on a date and never ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoEndRecurrenceRange {
    start: RangeStart,
}

impl NoEndRecurrenceRange {
    /// Element name and JSON type of this variant.
    pub const XML_ELEMENT_NAME: &str = names::NO_END_RECURRENCE;

    /// Creates a range without start date.
    pub fn new(tracker: &mut ChangeTracker) -> Self {
        Self {
            start: RangeStart::new(tracker, None),
        }
    }

    /// Creates a range starting on `start_date`.
    pub fn with_start_date(tracker: &mut ChangeTracker, start_date: Date) -> Self {
        Self {
            start: RangeStart::new(tracker, Some(start_date)),
        }
    }
}

impl ComplexProperty for NoEndRecurrenceRange {
    fn write_elements_to_xml(&self, writer: &mut EwsXmlWriter) -> Result<(), EwsError> {
        self.start.write_to_xml(writer)
    }

    fn to_json(&self, _service: &ExchangeService) -> Result<JsonObject, EwsError> {
        let mut obj = JsonObject::new();
        self.start.add_to_json(&mut obj, Self::XML_ELEMENT_NAME)?;
        Ok(obj)
    }

    fn try_read_element_from_xml(
        &mut self,
        reader: &mut EwsXmlReader<'_>,
    ) -> Result<bool, EwsError> {
        self.start.try_read_from_xml(reader)
    }

    fn load_json_key(&mut self, key: &str, value: &Value, service: &ExchangeService) {
        self.start.load_json_key(key, value, service);
    }
}

/// Range that ends on a given date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndDateRecurrenceRange {
    start: RangeStart,
    end_date: Option<Date>,
}

impl EndDateRecurrenceRange {
    /// Element name and JSON type of this variant.
    pub const XML_ELEMENT_NAME: &str = names::END_DATE_RECURRENCE;

    /// Creates a range without dates.
    pub fn new(tracker: &mut ChangeTracker) -> Self {
        Self {
            start: RangeStart::new(tracker, None),
            end_date: None,
        }
    }

    /// Creates a range from `start_date` through `end_date`.
    pub fn with_dates(tracker: &mut ChangeTracker, start_date: Date, end_date: Date) -> Self {
        Self {
            start: RangeStart::new(tracker, Some(start_date)),
            end_date: Some(end_date),
        }
    }

    /// Last date of the range.
    #[must_use]
    pub const fn end_date(&self) -> Option<Date> {
        self.end_date
    }

    /// Sets the last date of the range.
    pub fn set_end_date(&mut self, tracker: &mut ChangeTracker, end_date: Date) -> bool {
        set_field_value(tracker, self.start.id, &mut self.end_date, Some(end_date))
    }
}

impl ComplexProperty for EndDateRecurrenceRange {
    fn write_elements_to_xml(&self, writer: &mut EwsXmlWriter) -> Result<(), EwsError> {
        self.start.write_to_xml(writer)?;
        let end_date = self.end_date.ok_or_else(|| {
            EwsError::Validation("EndDateRecurrenceRange: EndDate must be set".to_string())
        })?;
        writer.write_element_value(
            XmlNamespace::Types,
            names::END_DATE,
            &date_to_xs_date(end_date),
        )
    }

    fn to_json(&self, _service: &ExchangeService) -> Result<JsonObject, EwsError> {
        let mut obj = JsonObject::new();
        self.start.add_to_json(&mut obj, Self::XML_ELEMENT_NAME)?;
        let end_date = self.end_date.ok_or_else(|| {
            EwsError::Validation("EndDateRecurrenceRange: EndDate must be set".to_string())
        })?;
        obj.insert(
            names::END_DATE.to_string(),
            Value::String(date_to_xs_date(end_date)),
        );
        Ok(obj)
    }

    fn try_read_element_from_xml(
        &mut self,
        reader: &mut EwsXmlReader<'_>,
    ) -> Result<bool, EwsError> {
        if self.start.try_read_from_xml(reader)? {
            return Ok(true);
        }
        if !reader.is_start_element(names::END_DATE) {
            return Ok(false);
        }
        let date = reader.read_element_value_as_unspecified_date()?;
        match date {
            Some(date) => self.end_date = Some(date),
            None => tracing::debug!("dropping unparsable EndDate element"),
        }
        Ok(date.is_some())
    }

    fn load_json_key(&mut self, key: &str, value: &Value, service: &ExchangeService) {
        if self.start.load_json_key(key, value, service) {
            return;
        }
        if key == names::END_DATE
            && let Some(date) = value
                .as_str()
                .and_then(|s| service.convert_start_date_to_unspecified_date(s))
        {
            self.end_date = Some(date);
        }
    }
}

/// Range that ends after a number of occurrences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedRecurrenceRange {
    start: RangeStart,
    number_of_occurrences: Option<u32>,
}

impl NumberedRecurrenceRange {
    /// Element name and JSON type of this variant.
    pub const XML_ELEMENT_NAME: &str = names::NUMBERED_RECURRENCE;

    /// Creates a range without start date or count.
    pub fn new(tracker: &mut ChangeTracker) -> Self {
        Self {
            start: RangeStart::new(tracker, None),
            number_of_occurrences: None,
        }
    }

    /// Creates a range of `number_of_occurrences` starting on `start_date`.
    pub fn with_occurrences(
        tracker: &mut ChangeTracker,
        start_date: Date,
        number_of_occurrences: u32,
    ) -> Self {
        Self {
            start: RangeStart::new(tracker, Some(start_date)),
            number_of_occurrences: Some(number_of_occurrences),
        }
    }

    /// Number of occurrences before the range ends.
    #[must_use]
    pub const fn number_of_occurrences(&self) -> Option<u32> {
        self.number_of_occurrences
    }

    /// Sets the number of occurrences.
    pub fn set_number_of_occurrences(&mut self, tracker: &mut ChangeTracker, count: u32) -> bool {
        set_field_value(
            tracker,
            self.start.id,
            &mut self.number_of_occurrences,
            Some(count),
        )
    }
}

impl ComplexProperty for NumberedRecurrenceRange {
    fn write_elements_to_xml(&self, writer: &mut EwsXmlWriter) -> Result<(), EwsError> {
        self.start.write_to_xml(writer)?;
        if let Some(count) = self.number_of_occurrences {
            writer.write_element_value(
                XmlNamespace::Types,
                names::NUMBER_OF_OCCURRENCES,
                &count.to_string(),
            )?;
        }
        Ok(())
    }

    fn to_json(&self, _service: &ExchangeService) -> Result<JsonObject, EwsError> {
        let mut obj = JsonObject::new();
        self.start.add_to_json(&mut obj, Self::XML_ELEMENT_NAME)?;
        if let Some(count) = self.number_of_occurrences {
            obj.insert(names::NUMBER_OF_OCCURRENCES.to_string(), Value::from(count));
        }
        Ok(obj)
    }

    fn try_read_element_from_xml(
        &mut self,
        reader: &mut EwsXmlReader<'_>,
    ) -> Result<bool, EwsError> {
        if self.start.try_read_from_xml(reader)? {
            return Ok(true);
        }
        if !reader.is_start_element(names::NUMBER_OF_OCCURRENCES) {
            return Ok(false);
        }
        let value = reader.read_element_value()?;
        let Ok(count) = value.trim().parse() else {
            tracing::debug!(%value, "dropping unparsable NumberOfOccurrences element");
            return Ok(false);
        };
        self.number_of_occurrences = Some(count);
        Ok(true)
    }

    fn load_json_key(&mut self, key: &str, value: &Value, service: &ExchangeService) {
        if self.start.load_json_key(key, value, service) {
            return;
        }
        if key == names::NUMBER_OF_OCCURRENCES {
            let count = match value {
                Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            };
            if count.is_some() {
                self.number_of_occurrences = count;
            }
        }
    }
}

/// Bounds of a recurring pattern: when it starts and, for bounded variants,
/// when it ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceRange {
    /// Starts on a date, never ends.
    NoEnd(NoEndRecurrenceRange),
    /// Ends on a date.
    EndDate(EndDateRecurrenceRange),
    /// Ends after a number of occurrences.
    Numbered(NumberedRecurrenceRange),
}

impl RecurrenceRange {
    /// Creates a range that never ends.
    pub fn no_end(tracker: &mut ChangeTracker, start_date: Date) -> Self {
        Self::NoEnd(NoEndRecurrenceRange::with_start_date(tracker, start_date))
    }

    /// Creates a range ending on `end_date`.
    pub fn end_date(tracker: &mut ChangeTracker, start_date: Date, end_date: Date) -> Self {
        Self::EndDate(EndDateRecurrenceRange::with_dates(
            tracker, start_date, end_date,
        ))
    }

    /// Creates a range ending after `number_of_occurrences`.
    pub fn numbered(
        tracker: &mut ChangeTracker,
        start_date: Date,
        number_of_occurrences: u32,
    ) -> Self {
        Self::Numbered(NumberedRecurrenceRange::with_occurrences(
            tracker,
            start_date,
            number_of_occurrences,
        ))
    }

    /// Creates an empty range of the variant named `name` (an element name or
    /// JSON type name).
    pub fn from_type_name(tracker: &mut ChangeTracker, name: &str) -> Option<Self> {
        match name {
            NoEndRecurrenceRange::XML_ELEMENT_NAME => {
                Some(Self::NoEnd(NoEndRecurrenceRange::new(tracker)))
            }
            EndDateRecurrenceRange::XML_ELEMENT_NAME => {
                Some(Self::EndDate(EndDateRecurrenceRange::new(tracker)))
            }
            NumberedRecurrenceRange::XML_ELEMENT_NAME => {
                Some(Self::Numbered(NumberedRecurrenceRange::new(tracker)))
            }
            _ => None,
        }
    }

    /// Reads a range from the start element the reader is on.
    ///
    /// Returns `None`, leaving the reader untouched, if the element does not
    /// name a range variant.
    ///
    /// # Errors
    ///
    /// Returns an error if XML parsing fails.
    pub fn read_from_xml(
        tracker: &mut ChangeTracker,
        reader: &mut EwsXmlReader<'_>,
    ) -> Result<Option<Self>, EwsError> {
        let name = reader.local_name().to_string();
        let Some(mut range) = Self::from_type_name(tracker, &name) else {
            return Ok(None);
        };
        range.load_from_xml(reader, &name)?;
        Ok(Some(range))
    }

    /// Builds a range from a JSON object, picking the variant from its type
    /// discriminator.
    pub fn from_json(
        tracker: &mut ChangeTracker,
        object: &JsonObject,
        service: &ExchangeService,
    ) -> Option<Self> {
        let mut range = Self::from_type_name(tracker, object.type_name()?)?;
        range.load_from_json(object, service);
        Some(range)
    }

    /// Element name and JSON type of the variant.
    #[must_use]
    pub const fn xml_element_name(&self) -> &'static str {
        match self {
            Self::NoEnd(_) => NoEndRecurrenceRange::XML_ELEMENT_NAME,
            Self::EndDate(_) => EndDateRecurrenceRange::XML_ELEMENT_NAME,
            Self::Numbered(_) => NumberedRecurrenceRange::XML_ELEMENT_NAME,
        }
    }

    /// Change-tracker handle of the range.
    #[must_use]
    pub const fn id(&self) -> PropertyId {
        self.start().id
    }

    /// First date of the range.
    #[must_use]
    pub const fn start_date(&self) -> Option<Date> {
        self.start().start_date
    }

    /// Whether a start date was ever set or loaded.
    #[must_use]
    pub const fn has_start_date(&self) -> bool {
        self.start().start_date.is_some()
    }

    /// Sets the first date of the range, notifying the owning recurrence if the
    /// value changes.
    pub fn set_start_date(&mut self, tracker: &mut ChangeTracker, start_date: Date) -> bool {
        self.start_mut().set(tracker, start_date)
    }

    /// Copies the bounds of this range into `recurrence`.
    pub fn setup_recurrence(&self, tracker: &mut ChangeTracker, recurrence: &mut Recurrence) {
        if let Some(start_date) = self.start_date() {
            recurrence.set_start_date(tracker, start_date);
        }
        match self {
            Self::NoEnd(_) => recurrence.never_ends(tracker),
            Self::EndDate(range) => {
                if let Some(end_date) = range.end_date {
                    recurrence.set_end_date(tracker, Some(end_date));
                }
            }
            Self::Numbered(range) => {
                if let Some(count) = range.number_of_occurrences {
                    recurrence.set_number_of_occurrences(tracker, Some(count));
                }
            }
        }
    }

    const fn start(&self) -> &RangeStart {
        match self {
            Self::NoEnd(range) => &range.start,
            Self::EndDate(range) => &range.start,
            Self::Numbered(range) => &range.start,
        }
    }

    const fn start_mut(&mut self) -> &mut RangeStart {
        match self {
            Self::NoEnd(range) => &mut range.start,
            Self::EndDate(range) => &mut range.start,
            Self::Numbered(range) => &mut range.start,
        }
    }
}

impl ComplexProperty for RecurrenceRange {
    fn write_elements_to_xml(&self, writer: &mut EwsXmlWriter) -> Result<(), EwsError> {
        match self {
            Self::NoEnd(range) => range.write_elements_to_xml(writer),
            Self::EndDate(range) => range.write_elements_to_xml(writer),
            Self::Numbered(range) => range.write_elements_to_xml(writer),
        }
    }

    fn to_json(&self, service: &ExchangeService) -> Result<JsonObject, EwsError> {
        match self {
            Self::NoEnd(range) => range.to_json(service),
            Self::EndDate(range) => range.to_json(service),
            Self::Numbered(range) => range.to_json(service),
        }
    }

    fn try_read_element_from_xml(
        &mut self,
        reader: &mut EwsXmlReader<'_>,
    ) -> Result<bool, EwsError> {
        match self {
            Self::NoEnd(range) => range.try_read_element_from_xml(reader),
            Self::EndDate(range) => range.try_read_element_from_xml(reader),
            Self::Numbered(range) => range.try_read_element_from_xml(reader),
        }
    }

    fn load_json_key(&mut self, key: &str, value: &Value, service: &ExchangeService) {
        match self {
            Self::NoEnd(range) => range.load_json_key(key, value, service),
            Self::EndDate(range) => range.load_json_key(key, value, service),
            Self::Numbered(range) => range.load_json_key(key, value, service),
        }
    }
}

impl From<NoEndRecurrenceRange> for RecurrenceRange {
    fn from(range: NoEndRecurrenceRange) -> Self {
        Self::NoEnd(range)
    }
}

impl From<EndDateRecurrenceRange> for RecurrenceRange {
    fn from(range: EndDateRecurrenceRange) -> Self {
        Self::EndDate(range)
    }
}

impl From<NumberedRecurrenceRange> for RecurrenceRange {
    fn from(range: NumberedRecurrenceRange) -> Self {
        Self::Numbered(range)
    }
}

/// A recurring pattern's bounds as seen by the item that owns it.
///
/// Ranges attached with [`Recurrence::set_range`] report their changes to the
/// recurrence through the [`ChangeTracker`].
///
/// Equality compares the pattern's bounds and range, not tracker handles.
#[derive(Debug, Clone)]
pub struct Recurrence {
    id: PropertyId,
    start_date: Option<Date>,
    end_date: Option<Date>,
    number_of_occurrences: Option<u32>,
    range: Option<RecurrenceRange>,
}

impl PartialEq for Recurrence {
    fn eq(&self, other: &Self) -> bool {
        self.start_date == other.start_date
            && self.end_date == other.end_date
            && self.number_of_occurrences == other.number_of_occurrences
            && self.range == other.range
    }
}

impl Eq for Recurrence {}

impl Recurrence {
    /// Creates an empty recurrence.
    pub fn new(tracker: &mut ChangeTracker) -> Self {
        Self {
            id: tracker.register(),
            start_date: None,
            end_date: None,
            number_of_occurrences: None,
            range: None,
        }
    }

    /// Change-tracker handle of the recurrence.
    #[must_use]
    pub const fn id(&self) -> PropertyId {
        self.id
    }

    /// First date of the pattern.
    #[must_use]
    pub const fn start_date(&self) -> Option<Date> {
        self.start_date
    }

    /// Last date of the pattern, if it ends on a date.
    #[must_use]
    pub const fn end_date(&self) -> Option<Date> {
        self.end_date
    }

    /// Number of occurrences, if the pattern ends after a count.
    #[must_use]
    pub const fn number_of_occurrences(&self) -> Option<u32> {
        self.number_of_occurrences
    }

    /// Whether the pattern has an end.
    #[must_use]
    pub const fn has_end(&self) -> bool {
        self.end_date.is_some() || self.number_of_occurrences.is_some()
    }

    /// The attached range.
    #[must_use]
    pub const fn range(&self) -> Option<&RecurrenceRange> {
        self.range.as_ref()
    }

    /// The attached range, for mutation.
    pub const fn range_mut(&mut self) -> Option<&mut RecurrenceRange> {
        self.range.as_mut()
    }

    /// Sets the first date of the pattern.
    pub fn set_start_date(&mut self, tracker: &mut ChangeTracker, start_date: Date) -> bool {
        set_field_value(tracker, self.id, &mut self.start_date, Some(start_date))
    }

    /// Sets the last date of the pattern.
    pub fn set_end_date(&mut self, tracker: &mut ChangeTracker, end_date: Option<Date>) -> bool {
        set_field_value(tracker, self.id, &mut self.end_date, end_date)
    }

    /// Sets the number of occurrences.
    pub fn set_number_of_occurrences(
        &mut self,
        tracker: &mut ChangeTracker,
        count: Option<u32>,
    ) -> bool {
        set_field_value(tracker, self.id, &mut self.number_of_occurrences, count)
    }

    /// Removes both end conditions.
    pub fn never_ends(&mut self, tracker: &mut ChangeTracker) {
        self.set_end_date(tracker, None);
        self.set_number_of_occurrences(tracker, None);
    }

    /// Attaches `range`: copies its bounds into this recurrence and makes this
    /// recurrence the owner of its change notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is unknown to `tracker` or already an
    /// ancestor of this recurrence.
    pub fn set_range(
        &mut self,
        tracker: &mut ChangeTracker,
        range: RecurrenceRange,
    ) -> Result<(), EwsError> {
        // Re-setting the attached range keeps its owner link.
        let old_id = self.range.as_ref().map(RecurrenceRange::id);
        if old_id != Some(range.id()) {
            tracker.attach(range.id(), self.id)?;
            if let Some(old_id) = old_id {
                tracker.detach(old_id);
            }
        }
        range.setup_recurrence(tracker, self);
        self.range = Some(range);
        Ok(())
    }

    /// Writes `<t:Recurrence>` wrapping the range element.
    ///
    /// # Errors
    ///
    /// Returns an error if no range is attached or XML writing fails.
    pub fn write_to_xml(&self, writer: &mut EwsXmlWriter) -> Result<(), EwsError> {
        let range = self.required_range()?;
        writer.write_start_element(XmlNamespace::Types, names::RECURRENCE)?;
        range.write_to_xml(writer, XmlNamespace::Types, range.xml_element_name())?;
        writer.write_end_element()
    }

    /// Serializes the recurrence to a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if no range is attached.
    pub fn to_json(&self, service: &ExchangeService) -> Result<JsonObject, EwsError> {
        let range = self.required_range()?;
        let mut obj = JsonObject::new();
        obj.insert(
            RECURRENCE_RANGE_KEY.to_string(),
            Value::Object(range.to_json(service)?),
        );
        Ok(obj)
    }

    /// Reads a recurrence from the `<t:Recurrence>` start element the reader
    /// is on. The loaded recurrence starts clean.
    ///
    /// # Errors
    ///
    /// Returns an error if XML parsing fails.
    pub fn read_from_xml(
        tracker: &mut ChangeTracker,
        reader: &mut EwsXmlReader<'_>,
    ) -> Result<Self, EwsError> {
        let mut recurrence = Self::new(tracker);
        loop {
            match reader.read()? {
                XmlNodeType::StartElement => match RecurrenceRange::read_from_xml(tracker, reader)? {
                    Some(range) => recurrence.set_range(tracker, range)?,
                    None => reader.skip_current_element()?,
                },
                XmlNodeType::EndElement if reader.local_name() == names::RECURRENCE => break,
                XmlNodeType::Eof => {
                    return Err(EwsError::Xml("unexpected EOF inside Recurrence".to_string()));
                }
                _ => {}
            }
        }
        recurrence.mark_loaded(tracker);
        Ok(recurrence)
    }

    /// Builds a recurrence from a JSON object. The loaded recurrence starts
    /// clean.
    ///
    /// # Errors
    ///
    /// Returns an error if the range cannot be attached.
    pub fn from_json(
        tracker: &mut ChangeTracker,
        object: &JsonObject,
        service: &ExchangeService,
    ) -> Result<Self, EwsError> {
        let mut recurrence = Self::new(tracker);
        if let Some(range) = object
            .read_as_object(RECURRENCE_RANGE_KEY)
            .and_then(|range| RecurrenceRange::from_json(tracker, range, service))
        {
            recurrence.set_range(tracker, range)?;
        }
        recurrence.mark_loaded(tracker);
        Ok(recurrence)
    }

    fn required_range(&self) -> Result<&RecurrenceRange, EwsError> {
        self.range
            .as_ref()
            .ok_or_else(|| EwsError::Validation("Recurrence: a range must be set".to_string()))
    }

    fn mark_loaded(&self, tracker: &mut ChangeTracker) {
        tracker.clear_dirty(self.id);
        if let Some(range) = &self.range {
            tracker.clear_dirty(range.id());
        }
    }
}
