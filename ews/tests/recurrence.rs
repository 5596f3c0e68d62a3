// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence range encoding and change propagation tests.

use exchange_ews::{
    ChangeTracker, ComplexProperty, EwsError, EwsXmlReader, EwsXmlWriter, ExchangeService,
    ExchangeVersion, JsonObject, NoEndRecurrenceRange, Recurrence, RecurrenceRange, TYPE_KEY,
    XmlNamespace, XmlNodeType,
};
use jiff::civil::{Date, date};
use proptest::prelude::*;

fn service() -> ExchangeService {
    ExchangeService::with_version(ExchangeVersion::Exchange2013)
}

fn range_to_xml(range: &RecurrenceRange) -> String {
    let mut writer = EwsXmlWriter::new();
    range
        .write_to_xml(&mut writer, XmlNamespace::Types, range.xml_element_name())
        .expect("Failed to write range");
    writer.into_string().expect("Failed to finish XML")
}

fn range_from_xml(tracker: &mut ChangeTracker, xml: &str) -> RecurrenceRange {
    let mut reader = EwsXmlReader::new(xml);
    assert_eq!(
        reader.read().expect("Failed to read XML"),
        XmlNodeType::StartElement
    );
    RecurrenceRange::read_from_xml(tracker, &mut reader)
        .expect("Failed to parse range")
        .expect("Element should name a range variant")
}

fn json_object(json: &str) -> JsonObject {
    serde_json::from_str(json).expect("Failed to parse JSON")
}

#[test]
fn recurrence_no_end_xml_round_trip() {
    let mut tracker = ChangeTracker::new();
    let range = RecurrenceRange::no_end(&mut tracker, date(2024, 3, 1));

    let xml = range_to_xml(&range);
    assert!(xml.contains("<t:NoEndRecurrence>"));
    assert!(xml.contains("<t:StartDate>2024-03-01</t:StartDate>"));
    assert_eq!(xml.matches("<t:StartDate>").count(), 1);

    let loaded = range_from_xml(&mut tracker, &xml);
    assert!(matches!(loaded, RecurrenceRange::NoEnd(_)));
    assert_eq!(loaded.start_date(), Some(date(2024, 3, 1)));
}

#[test]
fn recurrence_end_date_xml_round_trip() {
    let mut tracker = ChangeTracker::new();
    let range = RecurrenceRange::end_date(&mut tracker, date(2024, 3, 1), date(2024, 6, 30));

    let xml = range_to_xml(&range);
    let start = xml.find("<t:StartDate>").expect("StartDate missing");
    let end = xml.find("<t:EndDate>2024-06-30</t:EndDate>").expect("EndDate missing");
    assert!(start < end);

    let RecurrenceRange::EndDate(loaded) = range_from_xml(&mut tracker, &xml) else {
        panic!("Expected an end-date range");
    };
    assert_eq!(loaded.end_date(), Some(date(2024, 6, 30)));
}

#[test]
fn recurrence_numbered_json_round_trip() {
    let mut tracker = ChangeTracker::new();
    let service = service();
    let range = RecurrenceRange::numbered(&mut tracker, date(2025, 1, 15), 10);

    let json = range.to_json(&service).expect("Failed to serialize range");
    assert_eq!(
        json.get(TYPE_KEY).and_then(|v| v.as_str()),
        Some("NumberedRecurrence:#Exchange")
    );
    assert_eq!(
        json.get("StartDate").and_then(|v| v.as_str()),
        Some("2025-01-15")
    );
    assert_eq!(
        json.get("NumberOfOccurrences").and_then(serde_json::Value::as_u64),
        Some(10)
    );

    let loaded =
        RecurrenceRange::from_json(&mut tracker, &json, &service).expect("Unknown range type");
    let RecurrenceRange::Numbered(loaded) = loaded else {
        panic!("Expected a numbered range");
    };
    assert_eq!(loaded.number_of_occurrences(), Some(10));
}

#[test]
fn recurrence_unknown_children_are_skipped() {
    let mut tracker = ChangeTracker::new();
    let xml = r"<t:NoEndRecurrence>
        <t:Comment><t:Nested>x</t:Nested></t:Comment>
        <t:StartDate>2024-03-01+02:00</t:StartDate>
    </t:NoEndRecurrence>";

    let range = range_from_xml(&mut tracker, xml);
    assert_eq!(range.start_date(), Some(date(2024, 3, 1)));
}

#[test]
fn recurrence_reader_ignores_other_elements() {
    let mut tracker = ChangeTracker::new();
    let mut reader = EwsXmlReader::new("<t:WeeklyRecurrence/>");
    reader.read().expect("Failed to read XML");

    let range = RecurrenceRange::read_from_xml(&mut tracker, &mut reader)
        .expect("Reading should not fail");
    assert!(range.is_none());
    assert!(RecurrenceRange::from_type_name(&mut tracker, "Weekly").is_none());
}

#[test]
fn recurrence_write_requires_start_date() {
    let mut tracker = ChangeTracker::new();
    let range = RecurrenceRange::from(NoEndRecurrenceRange::new(&mut tracker));
    assert!(!range.has_start_date());

    let mut writer = EwsXmlWriter::new();
    let result = range.write_to_xml(&mut writer, XmlNamespace::Types, range.xml_element_name());
    assert!(matches!(result, Err(EwsError::Validation(_))));
    assert!(matches!(
        range.to_json(&service()),
        Err(EwsError::Validation(_))
    ));
}

#[test]
fn recurrence_unparsable_json_start_date_is_dropped() {
    let mut tracker = ChangeTracker::new();
    let service = service();
    let bad = json_object(r#"{"__type":"NoEndRecurrence:#Exchange","StartDate":"not a date"}"#);

    let fresh = RecurrenceRange::from_json(&mut tracker, &bad, &service).expect("Known type");
    assert!(!fresh.has_start_date());

    let mut range = RecurrenceRange::no_end(&mut tracker, date(2024, 3, 1));
    range.load_from_json(&bad, &service);
    assert_eq!(range.start_date(), Some(date(2024, 3, 1)));
    assert!(!tracker.is_dirty(range.id()));

    let null = json_object(r#"{"StartDate":null}"#);
    range.load_from_json(&null, &service);
    assert_eq!(range.start_date(), Some(date(2024, 3, 1)));
}

#[test]
fn recurrence_unparsable_xml_start_date_is_dropped() {
    let mut tracker = ChangeTracker::new();
    let xml = "<t:NoEndRecurrence><t:StartDate>someday</t:StartDate></t:NoEndRecurrence>";

    let range = range_from_xml(&mut tracker, xml);
    assert!(!range.has_start_date());
}

#[test]
fn recurrence_unparsable_end_date_does_not_swallow_siblings() {
    let mut tracker = ChangeTracker::new();
    let xml = "<t:EndDateRecurrence>
        <t:EndDate>never</t:EndDate>
        <t:StartDate>2024-03-01</t:StartDate>
    </t:EndDateRecurrence>";

    let range = range_from_xml(&mut tracker, xml);
    assert_eq!(range.start_date(), Some(date(2024, 3, 1)));
    let RecurrenceRange::EndDate(range) = range else {
        panic!("Expected an end-date range");
    };
    assert_eq!(range.end_date(), None);
}

#[test]
fn recurrence_setup_copies_bounds() {
    let mut tracker = ChangeTracker::new();
    let mut recurrence = Recurrence::new(&mut tracker);

    let range = RecurrenceRange::numbered(&mut tracker, date(2024, 3, 1), 5);
    recurrence
        .set_range(&mut tracker, range)
        .expect("Failed to attach range");
    assert_eq!(recurrence.start_date(), Some(date(2024, 3, 1)));
    assert_eq!(recurrence.number_of_occurrences(), Some(5));
    assert!(recurrence.has_end());

    let range = RecurrenceRange::no_end(&mut tracker, date(2024, 4, 1));
    recurrence
        .set_range(&mut tracker, range)
        .expect("Failed to attach range");
    assert_eq!(recurrence.start_date(), Some(date(2024, 4, 1)));
    assert!(!recurrence.has_end());
}

#[test]
fn recurrence_is_notified_once_per_real_change() {
    let mut tracker = ChangeTracker::new();
    let mut recurrence = Recurrence::new(&mut tracker);
    let range = RecurrenceRange::no_end(&mut tracker, date(2024, 3, 1));
    recurrence
        .set_range(&mut tracker, range)
        .expect("Failed to attach range");
    tracker.clear_dirty(recurrence.id());
    let before = tracker.change_count(recurrence.id());

    let range = recurrence.range_mut().expect("Range attached");
    assert!(range.set_start_date(&mut tracker, date(2024, 5, 1)));
    assert_eq!(tracker.change_count(recurrence.id()), before + 1);
    assert!(tracker.is_dirty(recurrence.id()));

    tracker.clear_dirty(recurrence.id());
    let range = recurrence.range_mut().expect("Range attached");
    assert!(!range.set_start_date(&mut tracker, date(2024, 5, 1)));
    assert_eq!(tracker.change_count(recurrence.id()), before + 1);
    assert!(!tracker.is_dirty(recurrence.id()));
}

#[test]
fn recurrence_replaced_range_stops_notifying() {
    let mut tracker = ChangeTracker::new();
    let mut recurrence = Recurrence::new(&mut tracker);
    let first = RecurrenceRange::no_end(&mut tracker, date(2024, 3, 1));
    let first_id = first.id();
    recurrence
        .set_range(&mut tracker, first)
        .expect("Failed to attach range");
    let second = RecurrenceRange::no_end(&mut tracker, date(2024, 3, 1));
    recurrence
        .set_range(&mut tracker, second)
        .expect("Failed to attach range");

    assert_eq!(tracker.owner(first_id), None);
    let owner = recurrence.range().map(RecurrenceRange::id);
    assert_eq!(owner.and_then(|id| tracker.owner(id)), Some(recurrence.id()));
}

#[test]
fn recurrence_same_range_set_twice_keeps_notifying() {
    let mut tracker = ChangeTracker::new();
    let mut recurrence = Recurrence::new(&mut tracker);
    let range = RecurrenceRange::no_end(&mut tracker, date(2024, 3, 1));
    let range_id = range.id();
    recurrence
        .set_range(&mut tracker, range.clone())
        .expect("Failed to attach range");
    recurrence
        .set_range(&mut tracker, range)
        .expect("Failed to attach range again");
    assert_eq!(tracker.owner(range_id), Some(recurrence.id()));

    let before = tracker.change_count(recurrence.id());
    let range = recurrence.range_mut().expect("Range attached");
    assert!(range.set_start_date(&mut tracker, date(2024, 4, 1)));
    assert_eq!(tracker.change_count(recurrence.id()), before + 1);
}

#[test]
fn recurrence_equality_ignores_tracker_handles() {
    let mut tracker = ChangeTracker::new();
    let a = RecurrenceRange::end_date(&mut tracker, date(2024, 3, 1), date(2024, 3, 31));
    let b = RecurrenceRange::end_date(&mut tracker, date(2024, 3, 1), date(2024, 3, 31));
    assert_ne!(a.id(), b.id());
    assert_eq!(a, b);

    let c = RecurrenceRange::end_date(&mut tracker, date(2024, 3, 1), date(2024, 4, 30));
    assert_ne!(a, c);
    let d = RecurrenceRange::no_end(&mut tracker, date(2024, 3, 1));
    assert_ne!(a, d);

    let mut first = Recurrence::new(&mut tracker);
    first.set_range(&mut tracker, a).expect("Failed to attach range");
    let mut second = Recurrence::new(&mut tracker);
    assert_ne!(first, second);
    second.set_range(&mut tracker, b).expect("Failed to attach range");
    assert_eq!(first, second);
}

#[test]
fn recurrence_xml_round_trip_loads_clean() {
    let mut tracker = ChangeTracker::new();
    let mut recurrence = Recurrence::new(&mut tracker);
    let range = RecurrenceRange::end_date(&mut tracker, date(2024, 3, 1), date(2024, 3, 31));
    recurrence
        .set_range(&mut tracker, range)
        .expect("Failed to attach range");

    let mut writer = EwsXmlWriter::new();
    recurrence
        .write_to_xml(&mut writer)
        .expect("Failed to write recurrence");
    let xml = writer.into_string().expect("Failed to finish XML");
    assert!(xml.contains("<t:Recurrence>"));
    assert!(xml.contains("<t:EndDateRecurrence>"));

    let mut reader = EwsXmlReader::new(&xml);
    reader.read().expect("Failed to read XML");
    let loaded = Recurrence::read_from_xml(&mut tracker, &mut reader).expect("Failed to load");
    assert_eq!(loaded.start_date(), Some(date(2024, 3, 1)));
    assert_eq!(loaded.end_date(), Some(date(2024, 3, 31)));
    assert!(!tracker.is_dirty(loaded.id()));
}

#[test]
fn recurrence_json_round_trip() {
    let mut tracker = ChangeTracker::new();
    let service = service();
    let mut recurrence = Recurrence::new(&mut tracker);
    let range = RecurrenceRange::numbered(&mut tracker, date(2024, 3, 1), 3);
    recurrence
        .set_range(&mut tracker, range)
        .expect("Failed to attach range");

    let json = recurrence.to_json(&service).expect("Failed to serialize");
    let loaded = Recurrence::from_json(&mut tracker, &json, &service).expect("Failed to load");
    assert_eq!(loaded.number_of_occurrences(), Some(3));
    assert_eq!(
        loaded.range().map(RecurrenceRange::xml_element_name),
        Some("NumberedRecurrence")
    );
}

fn any_date() -> impl Strategy<Value = Date> {
    (-9999i16..=9999, 1i8..=12, 1i8..=31)
        .prop_filter_map("no such day", |(y, m, d)| Date::new(y, m, d).ok())
}

proptest! {
    #[test]
    fn recurrence_start_date_survives_xml(start in any_date()) {
        let mut tracker = ChangeTracker::new();
        let range = RecurrenceRange::no_end(&mut tracker, start);
        let loaded = range_from_xml(&mut tracker, &range_to_xml(&range));
        prop_assert_eq!(loaded.start_date(), Some(start));
    }

    #[test]
    fn recurrence_start_date_survives_json(start in any_date(), count in 1u32..1000) {
        let mut tracker = ChangeTracker::new();
        let service = service();
        let range = RecurrenceRange::numbered(&mut tracker, start, count);
        let json = range.to_json(&service).expect("Failed to serialize range");
        let loaded = RecurrenceRange::from_json(&mut tracker, &json, &service)
            .expect("Unknown range type");
        prop_assert_eq!(loaded.start_date(), Some(start));
    }
}
