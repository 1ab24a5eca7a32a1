use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use upload_notice_core::contract::{InvocationContext, ResultPayload};
use upload_notice_lambda::adapters::diagnostics::StderrDiagnosticSink;
use upload_notice_lambda::handlers::upload::{handle_upload_event, COMPONENT};

async fn handle_request(event: LambdaEvent<Value>) -> Result<ResultPayload, Error> {
    let context = InvocationContext::new(event.context.request_id);
    let sink = StderrDiagnosticSink::new(COMPONENT);

    let payload = handle_upload_event(event.payload, &context, &sink)?;
    Ok(payload)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
