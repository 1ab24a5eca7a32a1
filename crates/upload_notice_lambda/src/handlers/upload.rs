use serde_json::{json, Value};
use upload_notice_core::contract::{
    parse_notification_event, InputShapeError, InvocationContext, ResultPayload,
};
use upload_notice_core::message::build_result_payload;

use crate::adapters::diagnostics::DiagnosticSink;

pub const COMPONENT: &str = "upload_handler";

/// Reports the first uploaded object of an S3 notification.
///
/// Malformed events are returned as [`InputShapeError`] without a payload so
/// the runtime records a failed invocation.
pub fn handle_upload_event(
    event: Value,
    context: &InvocationContext,
    sink: &dyn DiagnosticSink,
) -> Result<ResultPayload, InputShapeError> {
    sink.info(
        "event_received",
        json!({
            "request_id": context.request_id,
            "event": &event,
        }),
    );

    let notification = match parse_notification_event(event) {
        Ok(value) => value,
        Err(error) => {
            sink.error(
                "input_rejected",
                json!({
                    "request_id": context.request_id,
                    "message": error.message(),
                }),
            );
            return Err(error);
        }
    };

    let payload = build_result_payload(&notification);
    sink.info(
        "message_built",
        json!({
            "request_id": context.request_id,
            "object_key": notification.object_key(),
            "display_name": notification.display_name(),
            "bucket": notification.bucket_name(),
            "event_name": notification.event_name(),
            "ignored_records": notification.ignored_records(),
            "message": payload.message,
        }),
    );

    Ok(payload)
}
