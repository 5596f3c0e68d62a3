// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `ArchiveItem` request and response tests.

use exchange_ews::{
    ArchiveItemRequest, EwsError, EwsXmlReader, ExchangeService, ExchangeVersion, FolderId, ItemId,
    MultiResponseServiceRequest, RequestFormat, ServiceConfig, ServiceErrorHandling,
    ServiceRequest, ServiceResponse, ServiceResult, StaticTransport, WellKnownFolderName, names,
    read_item_ids_from_xml,
};

const ARCHIVE_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Header>
    <h:ServerVersionInfo xmlns:h="http://schemas.microsoft.com/exchange/services/2006/types" MajorVersion="15" MinorVersion="0"/>
  </s:Header>
  <s:Body>
    <m:ArchiveItemResponse xmlns:m="http://schemas.microsoft.com/exchange/services/2006/messages" xmlns:t="http://schemas.microsoft.com/exchange/services/2006/types">
      <m:ResponseMessages>
        <m:ArchiveItemResponseMessage ResponseClass="Success">
          <m:ResponseCode>NoError</m:ResponseCode>
          <m:Items>
            <t:Message>
              <t:ItemId Id="A-archived" ChangeKey="CK1"/>
            </t:Message>
          </m:Items>
        </m:ArchiveItemResponseMessage>
        <m:ArchiveItemResponseMessage ResponseClass="Error">
          <m:MessageText>The specified object was not found in the store.</m:MessageText>
          <m:ResponseCode>ErrorItemNotFound</m:ResponseCode>
          <m:DescriptiveLinkKey>0</m:DescriptiveLinkKey>
          <m:Items/>
        </m:ArchiveItemResponseMessage>
        <m:ArchiveItemResponseMessage ResponseClass="Success">
          <m:ResponseCode>NoError</m:ResponseCode>
          <m:Items/>
        </m:ArchiveItemResponseMessage>
      </m:ResponseMessages>
    </m:ArchiveItemResponse>
  </s:Body>
</s:Envelope>"#;

const FAULT_RESPONSE: &str = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Body>
    <s:Fault>
      <faultcode xmlns:a="http://schemas.microsoft.com/exchange/services/2006/types">a:ErrorSchemaValidation</faultcode>
      <faultstring xml:lang="en-US">The request failed schema validation.</faultstring>
    </s:Fault>
  </s:Body>
</s:Envelope>"#;

const JSON_RESPONSE: &str = r#"{
  "Header": {"ServerVersionInfo": {"MajorVersion": 15}},
  "Body": {
    "ResponseMessages": {
      "Items": [
        {
          "__type": "ArchiveItemResponseMessage:#Exchange",
          "ResponseClass": "Success",
          "ResponseCode": "NoError",
          "Items": [{"__type": "Message:#Exchange", "ItemId": {"Id": "A-archived", "ChangeKey": "CK1"}}]
        },
        {
          "__type": "ArchiveItemResponseMessage:#Exchange",
          "ResponseClass": "Warning",
          "ResponseCode": "ErrorBatchProcessingStopped",
          "MessageText": "Stopped"
        }
      ]
    }
  }
}"#;

fn service() -> ExchangeService {
    ExchangeService::with_version(ExchangeVersion::Exchange2013)
}

fn request(
    error_handling: ServiceErrorHandling,
    folder: FolderId,
    ids: &[&str],
) -> ArchiveItemRequest {
    let mut request = ArchiveItemRequest::new(error_handling);
    request.set_source_folder_id(folder);
    request.ids_mut().extend(ids.iter().copied().map(ItemId::from));
    request
}

#[test]
fn archive_validate_requires_source_folder() {
    let request = ArchiveItemRequest::new(ServiceErrorHandling::ReturnErrors);
    let err = request.validate(&service()).expect_err("Validation should fail");
    assert!(matches!(err, EwsError::Validation(ref msg) if msg.contains("SourceFolderId")));
}

#[test]
fn archive_validate_accepts_valid_folder() {
    let request = request(
        ServiceErrorHandling::ReturnErrors,
        FolderId::new("F1"),
        &["A"],
    );
    request.validate(&service()).expect("Validation should pass");
}

#[test]
fn archive_validate_checks_folder_version() {
    let folder = FolderId::distinguished(WellKnownFolderName::ArchiveInbox);
    let request = request(ServiceErrorHandling::ReturnErrors, folder, &["A"]);

    let old = ExchangeService::with_version(ExchangeVersion::Exchange2010Sp1);
    assert!(matches!(
        request.validate(&old),
        Err(EwsError::Validation(_))
    ));
    request.validate(&service()).expect("Validation should pass");
}

#[test]
fn archive_emit_rejects_old_servers() {
    let request = request(
        ServiceErrorHandling::ReturnErrors,
        FolderId::new("F1"),
        &["A"],
    );
    let old = ExchangeService::with_version(ExchangeVersion::Exchange2010Sp2);

    let err = request
        .emit(&old, RequestFormat::Xml)
        .expect_err("Version check should fail");
    assert!(matches!(
        err,
        EwsError::VersionMismatch {
            request: "ArchiveItem",
            minimum: ExchangeVersion::Exchange2013,
            requested: ExchangeVersion::Exchange2010Sp2,
        }
    ));
}

#[test]
fn archive_expected_count_matches_targets() {
    let request = request(
        ServiceErrorHandling::ReturnErrors,
        FolderId::new("F1"),
        &["A", "B", "C"],
    );
    assert_eq!(request.expected_response_message_count(), 3);

    for (index, target) in request.targets().iter().enumerate() {
        let response = ArchiveItemRequest::create_service_response(target, index);
        assert_eq!(response.index(), index);
        assert_eq!(response.target(), target);
    }
}

#[test]
fn archive_xml_body_lists_ids_in_order() {
    let request = request(
        ServiceErrorHandling::ReturnErrors,
        FolderId::new("F1"),
        &["A", "B", "C"],
    );
    let outgoing = request
        .emit(&service(), RequestFormat::Xml)
        .expect("Failed to emit request");
    let xml = &outgoing.body;

    assert!(outgoing.action.ends_with("/messages/ArchiveItem"));
    assert!(xml.contains(r#"<t:RequestServerVersion Version="Exchange2013"/>"#));
    assert!(xml.contains("<m:ArchiveItem>"));
    assert!(xml.contains("<m:ArchiveSourceFolderId>"));
    assert!(xml.contains(r#"<t:FolderId Id="F1"/>"#));
    assert!(xml.contains("<m:ItemIds>"));

    let mut reader = EwsXmlReader::new(xml);
    assert!(
        reader
            .read_to_start_element(names::ITEM_IDS)
            .expect("Failed to read XML")
    );
    let ids = read_item_ids_from_xml(&mut reader, names::ITEM_IDS).expect("Failed to read ids");
    let ids: Vec<&str> = ids.iter().map(ItemId::id).collect();
    assert_eq!(ids, ["A", "B", "C"]);
    assert_eq!(ids.len(), request.expected_response_message_count());
}

#[test]
fn archive_json_body_mirrors_xml() {
    let request = request(
        ServiceErrorHandling::ReturnErrors,
        FolderId::distinguished_in(WellKnownFolderName::Inbox, "user@example.com"),
        &["A", "B"],
    );
    let outgoing = request
        .emit(&service(), RequestFormat::Json)
        .expect("Failed to emit request");
    let doc: serde_json::Value = serde_json::from_str(&outgoing.body).expect("Invalid JSON");

    assert_eq!(doc["Header"]["RequestServerVersion"], "Exchange2013");
    let body = &doc["Body"];
    assert_eq!(body["__type"], "ArchiveItemRequest:#Exchange");
    let folder = &body["ArchiveSourceFolderId"];
    assert!(folder.get("FolderId").is_none());
    assert_eq!(folder["__type"], "DistinguishedFolderId:#Exchange");
    assert_eq!(folder["Id"], "inbox");
    assert_eq!(folder["Mailbox"]["EmailAddress"], "user@example.com");
    assert_eq!(body["ItemIds"][0]["Id"], "A");
    assert_eq!(body["ItemIds"][1]["Id"], "B");
}

#[test]
fn archive_json_folder_id_is_not_wrapped() {
    let request = request(
        ServiceErrorHandling::ReturnErrors,
        FolderId::new("F1"),
        &["A"],
    );
    let outgoing = request
        .emit(&service(), RequestFormat::Json)
        .expect("Failed to emit request");
    let doc: serde_json::Value = serde_json::from_str(&outgoing.body).expect("Invalid JSON");

    let folder = &doc["Body"]["ArchiveSourceFolderId"];
    assert_eq!(folder["__type"], "FolderId:#Exchange");
    assert_eq!(folder["Id"], "F1");
}

#[test]
fn archive_execute_returns_errors_in_target_order() {
    let request = request(
        ServiceErrorHandling::ReturnErrors,
        FolderId::new("F1"),
        &["A", "B", "C"],
    );
    let mut transport = StaticTransport::new(ARCHIVE_RESPONSE);

    let responses = request
        .execute(&service(), &mut transport)
        .expect("Failed to execute request");

    assert_eq!(transport.sent().len(), 1);
    assert_eq!(responses.len(), 3);
    assert_eq!(responses.overall_result(), ServiceResult::Error);
    for (index, (response, expected)) in responses.iter().zip(["A", "B", "C"]).enumerate() {
        assert_eq!(response.index(), index);
        assert_eq!(response.target().id(), expected);
    }

    let first = responses.get(0).expect("First response");
    assert_eq!(first.result(), ServiceResult::Success);
    assert_eq!(
        first.item_id(),
        Some(&ItemId::with_change_key("A-archived", "CK1"))
    );

    let second = responses.get(1).expect("Second response");
    assert!(second.is_error());
    assert_eq!(second.outcome().code, "ErrorItemNotFound");
    assert_eq!(second.item_id(), None);
    assert_eq!(responses.errors().count(), 1);
}

#[test]
fn archive_execute_throws_first_error() {
    let request = request(
        ServiceErrorHandling::ThrowOnError,
        FolderId::new("F1"),
        &["A", "B", "C"],
    );
    let mut transport = StaticTransport::new(ARCHIVE_RESPONSE);

    let err = request
        .execute(&service(), &mut transport)
        .expect_err("Error message should surface");
    match err {
        EwsError::ServiceResponse {
            index,
            code,
            message,
        } => {
            assert_eq!(index, 1);
            assert_eq!(code, "ErrorItemNotFound");
            assert!(message.contains("not found"));
        }
        other => panic!("Unexpected error: {other}"),
    }
}

#[test]
fn archive_execute_rejects_message_count_mismatch() {
    let request = request(
        ServiceErrorHandling::ReturnErrors,
        FolderId::new("F1"),
        &["A", "B"],
    );
    let mut transport = StaticTransport::new(ARCHIVE_RESPONSE);

    let err = request
        .execute(&service(), &mut transport)
        .expect_err("Count mismatch should fail");
    assert!(matches!(err, EwsError::InvalidResponse(_)));
}

#[test]
fn archive_execute_reports_soap_fault() {
    let request = request(
        ServiceErrorHandling::ReturnErrors,
        FolderId::new("F1"),
        &["A"],
    );
    let mut transport = StaticTransport::new(FAULT_RESPONSE);

    let err = request
        .execute(&service(), &mut transport)
        .expect_err("Fault should fail");
    assert!(matches!(err, EwsError::SoapFault(ref msg) if msg.contains("schema validation")));
}

#[test]
fn archive_execute_parses_json_responses() {
    let config = ServiceConfig {
        requested_server_version: ExchangeVersion::Exchange2013,
        format: RequestFormat::Json,
        ..Default::default()
    };
    let service = ExchangeService::new(config).expect("Failed to create service");
    let request = request(
        ServiceErrorHandling::ThrowOnError,
        FolderId::new("F1"),
        &["A", "B"],
    );
    let mut transport = StaticTransport::new(JSON_RESPONSE);

    let responses = request
        .execute(&service, &mut transport)
        .expect("Warnings should not fail the request");

    assert_eq!(transport.sent()[0].format, RequestFormat::Json);
    assert_eq!(responses.overall_result(), ServiceResult::Warning);
    let first = responses.get(0).expect("First response");
    assert_eq!(first.item_id().map(ItemId::id), Some("A-archived"));
    let second = responses.get(1).expect("Second response");
    assert_eq!(second.outcome().message.as_deref(), Some("Stopped"));
}

#[test]
fn archive_items_rejects_empty_ids() {
    let mut transport = StaticTransport::new(ARCHIVE_RESPONSE);
    let err = service()
        .archive_items(&mut transport, Vec::new(), FolderId::new("F1"))
        .expect_err("Empty ids should fail");
    assert!(matches!(err, EwsError::Validation(_)));
    assert!(transport.sent().is_empty());
}

#[test]
fn archive_items_returns_every_outcome() {
    let mut transport = StaticTransport::new(ARCHIVE_RESPONSE);
    let ids = ["A", "B", "C"].map(ItemId::from);

    let responses = service()
        .archive_items(&mut transport, ids, FolderId::new("F1"))
        .expect("Failed to archive items");

    assert_eq!(responses.len(), 3);
    assert!(responses.get(1).is_some_and(ServiceResponse::is_error));
}
