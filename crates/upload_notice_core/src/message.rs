use crate::contract::{NotificationEvent, ResultPayload};

pub fn confirmation_message(display_name: &str) -> String {
    format!("Hello there, the package name is {display_name}!")
}

pub fn build_result_payload(event: &NotificationEvent) -> ResultPayload {
    ResultPayload {
        message: confirmation_message(event.display_name()),
    }
}
