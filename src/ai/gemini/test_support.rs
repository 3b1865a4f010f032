use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockBuilder, ResponseTemplate};

pub const GENERATE_CONTENT_PATH_REGEX: &str = r"^/v1beta/models/[^/]+:generateContent$";
pub const STREAM_GENERATE_CONTENT_PATH_REGEX: &str = r"^/v1beta/models/[^/]+:streamGenerateContent$";

pub fn post_path_regex(pattern: &str) -> MockBuilder {
    Mock::given(method("POST")).and(path_regex(pattern))
}

/// A `generateContent` body whose single candidate carries `text`.
pub fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 4, "candidatesTokenCount": 2, "totalTokenCount": 6 }
    }))
}

/// A server-sent-event body with one event per chunk and a trailing usage event.
pub fn sse_response(chunks: &[&str]) -> ResponseTemplate {
    let mut body = String::new();
    for chunk in chunks {
        let event = serde_json::json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": chunk }] } }]
        });
        body.push_str(&format!("data: {}\r\n\r\n", event));
    }
    body.push_str("data: {\"usageMetadata\":{\"totalTokenCount\":9}}\r\n\r\n");

    ResponseTemplate::new(200).set_body_raw(body, "text/event-stream")
}
