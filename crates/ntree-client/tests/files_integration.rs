//! Files API integration tests.
//!
//! Covers the upload endpoint and its ticket header, and the `ok` flag
//! normalization of the file record operations.

mod common;

use anyhow::Result;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, header_regex, method, path};
use wiremock::{Mock, ResponseTemplate};

use common::{API_PATH, TestApi, UPLOAD_PATH};
use ntree_client::multipart::{Form, Part};
use ntree_client::{Error, SharedTicket};

#[tokio::test]
async fn test_upload_sends_ticket_to_upload_endpoint() -> Result<()> {
    let api = TestApi::start_with(|b| b.upload_ticket("ticket-1")).await;

    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(header("X-SourceId", "ticket-1"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("hello bytes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "fileId": "f1" })))
        .expect(1)
        .mount(&api.server)
        .await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&api.server)
        .await;

    let result = api
        .client
        .files()
        .upload_bytes("hello.txt", b"hello bytes".to_vec())
        .await?;

    assert_eq!(result.assigned_id(), Some("f1"));
    Ok(())
}

#[tokio::test]
async fn test_upload_custom_form() -> Result<()> {
    let api = TestApi::start_with(|b| b.upload_ticket("ticket-2")).await;

    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(header("X-SourceId", "ticket-2"))
        .and(body_string_contains("name=\"attachment\""))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "f7", "ok": true, "size": 3 })),
        )
        .expect(1)
        .mount(&api.server)
        .await;

    let form = Form::new().part("attachment", Part::bytes(b"abc".to_vec()).file_name("a.bin"));
    let result = api.client.files().upload(form).await?;

    assert_eq!(result.assigned_id(), Some("f7"));
    assert_eq!(result.ok, Some(json!(true)));
    assert_eq!(result.extra.get("size"), Some(&json!(3)));
    Ok(())
}

#[tokio::test]
async fn test_upload_reads_rotated_ticket() -> Result<()> {
    let tickets = SharedTicket::new();
    let slot = tickets.clone();
    let api = TestApi::start_with(move |b| b.credentials(slot)).await;

    for ticket in ["t1", "t2"] {
        Mock::given(method("POST"))
            .and(path(UPLOAD_PATH))
            .and(header("X-SourceId", ticket))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "fileId": ticket })))
            .expect(1)
            .mount(&api.server)
            .await;
    }

    tickets.set("t1");
    let first = api.client.files().upload_bytes("a", b"a".to_vec()).await?;
    tickets.set("t2");
    let second = api.client.files().upload_bytes("b", b"b".to_vec()).await?;

    assert_eq!(first.assigned_id(), Some("t1"));
    assert_eq!(second.assigned_id(), Some("t2"));
    Ok(())
}

#[tokio::test]
async fn test_upload_without_ticket_sends_nothing() -> Result<()> {
    let api = TestApi::start_with(|b| b.credentials(SharedTicket::new())).await;

    let err = api
        .client
        .files()
        .upload_bytes("a", b"a".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Credential(_)));

    let unconfigured = TestApi::start().await;
    let err = unconfigured
        .client
        .files()
        .upload_bytes("a", b"a".to_vec())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Credential(_)));

    assert!(api.server.received_requests().await.unwrap_or_default().is_empty());
    assert!(
        unconfigured
            .server
            .received_requests()
            .await
            .unwrap_or_default()
            .is_empty()
    );
    Ok(())
}

#[tokio::test]
async fn test_save_registers_file_record() -> Result<()> {
    let api = TestApi::start().await;
    api.expect_envelope(
        json!({
            "namespace": "NTreeNotes",
            "actionId": "create",
            "object": { "id": "f1", "type": "file", "title": "f1" }
        }),
        json!({ "ok": true, "objectId": "f1" }),
    )
    .await;

    let ack = api.client.files().save("f1").await?;

    assert!(ack.ok);
    assert_eq!(ack.into_value(), json!({ "ok": true, "objectId": "f1" }));
    Ok(())
}

#[tokio::test]
async fn test_save_missing_ok_becomes_false() -> Result<()> {
    let api = TestApi::start().await;
    api.expect_envelope(
        json!({
            "namespace": "NTreeNotes",
            "actionId": "create",
            "object": { "id": "f2", "type": "file", "title": "f2" }
        }),
        json!({ "objectId": "f2" }),
    )
    .await;

    let ack = api.client.files().save("f2").await?;

    assert!(!ack.ok);
    assert_eq!(ack.into_value(), json!({ "ok": false, "objectId": "f2" }));
    Ok(())
}

#[tokio::test]
async fn test_attach_to_note_sends_file_list() -> Result<()> {
    let api = TestApi::start().await;
    api.expect_envelope(
        json!({
            "namespace": "NTreeNotes",
            "actionId": "update",
            "objectId": "n1",
            "object": { "files": ["f1"] }
        }),
        json!({ "ok": "yes" }),
    )
    .await;

    let ack = api.client.files().attach_to_note("f1", "n1").await?;

    assert!(ack.ok);
    assert_eq!(ack.get("ok"), Some(&json!("yes")));
    Ok(())
}

#[tokio::test]
async fn test_attach_to_note_falsy_ok_becomes_false() -> Result<()> {
    let api = TestApi::start().await;
    api.expect_envelope(
        json!({
            "namespace": "NTreeNotes",
            "actionId": "update",
            "objectId": "n1",
            "object": { "files": ["f1"] }
        }),
        json!({ "ok": 0 }),
    )
    .await;

    let ack = api.client.files().attach_to_note("f1", "n1").await?;
    assert_eq!(ack.into_value(), json!({ "ok": false }));
    Ok(())
}

#[tokio::test]
async fn test_delete_file_empty_body_is_not_ok() -> Result<()> {
    let api = TestApi::start().await;
    api.expect_envelope(
        json!({ "namespace": "NTreeNotes", "actionId": "delete", "objectId": "f1" }),
        json!({}),
    )
    .await;

    let ack = api.client.files().delete("f1").await?;

    assert!(!ack.ok);
    assert_eq!(ack.into_value(), json!({ "ok": false }));
    Ok(())
}

#[tokio::test]
async fn test_delete_file_requires_literal_true() -> Result<()> {
    let api = TestApi::start().await;
    api.expect_envelope(
        json!({ "namespace": "NTreeNotes", "actionId": "delete", "objectId": "f1" }),
        json!({ "ok": "yes" }),
    )
    .await;
    api.expect_envelope(
        json!({ "namespace": "NTreeNotes", "actionId": "delete", "objectId": "f2" }),
        json!({ "ok": true }),
    )
    .await;

    let truthy = api.client.files().delete("f1").await?;
    assert!(!truthy.ok);

    let strict = api.client.files().delete("f2").await?;
    assert!(strict.ok);
    assert_eq!(strict.into_value(), json!({ "ok": true }));
    Ok(())
}
