use std::sync::Mutex;

use serde_json::{json, Value};
use upload_notice_lambda::adapters::diagnostics::{DiagnosticLevel, DiagnosticSink};
use upload_notice_lambda::domain::contract::InvocationContext;
use upload_notice_lambda::handlers::upload::handle_upload_event;

const S3_PUT_EVENT: &str = include_str!("fixtures/s3_put_event.json");

#[derive(Default)]
struct CapturingSink {
    lines: Mutex<Vec<(DiagnosticLevel, String, Value)>>,
}

impl CapturingSink {
    fn take(&self) -> Vec<(DiagnosticLevel, String, Value)> {
        std::mem::take(&mut *self.lines.lock().expect("poisoned mutex"))
    }
}

impl DiagnosticSink for CapturingSink {
    fn emit(&self, level: DiagnosticLevel, event: &str, details: Value) {
        self.lines
            .lock()
            .expect("poisoned mutex")
            .push((level, event.to_string(), details));
    }
}

fn fixture_event() -> Value {
    serde_json::from_str(S3_PUT_EVENT).expect("fixture should be valid JSON")
}

#[test]
fn s3_put_fixture_reports_first_package() {
    let sink = CapturingSink::default();
    let payload = handle_upload_event(
        fixture_event(),
        &InvocationContext::new("8476a536-e9f4-11e8-9739-2dfe598c3fcd"),
        &sink,
    )
    .expect("fixture event should be handled");

    assert_eq!(
        serde_json::to_value(&payload).expect("payload should serialize"),
        json!({ "message": "Hello there, the package name is package.zip!" })
    );

    let lines = sink.take();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].1, "event_received");
    assert_eq!(lines[0].2["event"], fixture_event());

    let built = &lines[1].2;
    assert_eq!(lines[1].1, "message_built");
    assert_eq!(built["request_id"], "8476a536-e9f4-11e8-9739-2dfe598c3fcd");
    assert_eq!(built["object_key"], "uploads/2023/package.zip");
    assert_eq!(built["display_name"], "package.zip");
    assert_eq!(built["bucket"], "release-artifacts");
    assert_eq!(built["event_name"], "ObjectCreated:Put");
    assert_eq!(built["ignored_records"], 1);
}

#[test]
fn fixture_with_reordered_records_reports_new_first_record() {
    let mut event = fixture_event();
    let records = event["Records"]
        .as_array_mut()
        .expect("fixture should carry a Records array");
    records.reverse();

    let payload = handle_upload_event(
        event,
        &InvocationContext::default(),
        &CapturingSink::default(),
    )
    .expect("reordered event should be handled");

    assert_eq!(
        payload.message,
        "Hello there, the package name is second.tar.gz!"
    );
}

#[test]
fn fixture_without_object_key_is_rejected() {
    let mut event = fixture_event();
    event["Records"][0]["s3"]["object"]
        .as_object_mut()
        .expect("fixture should carry an object entry")
        .remove("key");

    let sink = CapturingSink::default();
    let error = handle_upload_event(event, &InvocationContext::default(), &sink)
        .expect_err("missing key should be rejected");

    assert!(error.message().contains("key"));
    let lines = sink.take();
    assert_eq!(lines.last().map(|line| line.0), Some(DiagnosticLevel::Error));
    assert_eq!(lines.last().map(|line| line.1.as_str()), Some("input_rejected"));
}

#[test]
fn odd_informational_fields_in_first_record_keep_the_message() {
    let mut event = fixture_event();
    let first = &mut event["Records"][0];
    first["eventName"] = json!(7);
    first["s3"]["bucket"] = json!({ "arn": "arn:aws:s3:::release-artifacts" });
    first["s3"]["object"]["size"] = json!("1048576");
    first["s3"]["object"]["eTag"] = json!(-1);

    let sink = CapturingSink::default();
    let payload = handle_upload_event(event, &InvocationContext::default(), &sink)
        .expect("informational fields should not reject the event");

    assert_eq!(
        payload.message,
        "Hello there, the package name is package.zip!"
    );

    let lines = sink.take();
    let built = &lines[1].2;
    assert_eq!(lines[1].1, "message_built");
    assert_eq!(built["bucket"], Value::Null);
    assert_eq!(built["event_name"], Value::Null);
}
