use clap::Parser;
use futures::StreamExt;
use ia_m_uv::ai::{GeminiClient, GeminiClientConfig, Reply, RequestOptions};
use ia_m_uv::cli::Args;
use ia_m_uv::config::{self, Config};
use ia_m_uv::people::{
    self, BoundingBox, Flow, FrameDetections, FrameSink, FrameSource, PersonDetector,
};
use ia_m_uv::{Error, Result};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn reply_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

fn client_for(server: &MockServer, config: GeminiClientConfig) -> GeminiClient {
    GeminiClient::new(Some("integration-key".to_string()), config)
        .unwrap()
        .with_base_url(server.uri())
}

#[tokio::test]
async fn test_generate_then_chat_workflow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/v1beta/models/[^/]+:generateContent$"))
        .and(header("x-goog-api-key", "integration-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("Drink the sunshine.")))
        .mount(&server)
        .await;

    let config = GeminiClientConfig::default().with_system_instruction("You are a sales assistant.");
    let mut client = client_for(&server, config);

    let reply = client
        .generate_response_instructed(
            "Create a slogan for a new lemon soda.",
            "Answer with a marketing tone.",
            RequestOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(reply, Reply::Text("Drink the sunshine.".to_string()));
    assert_eq!(
        client.model().system_instruction(),
        Some("You are a sales assistant.")
    );

    client.start_chat(None);
    client.send_chat_message("Hello").await.unwrap();
    client.send_chat_message("Which phone?").await.unwrap();

    let history = client.chat_session().unwrap().history();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].text().as_deref(), Some("Hello"));
    assert_eq!(history[3].text().as_deref(), Some("Drink the sunshine."));
}

#[tokio::test]
async fn test_chat_before_start_fails() {
    let server = MockServer::start().await;
    let mut client = client_for(&server, GeminiClientConfig::default());

    let err = client.send_chat_message("Hi").await.unwrap_err();
    assert!(matches!(err, Error::NoChatSession));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_streamed_reply_concatenates_to_full_text() {
    let server = MockServer::start().await;
    let body = [
        "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Lemon \"}]}}]}\n\n",
        "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"fizz\"}]}}]}\n\n",
    ]
    .concat();
    Mock::given(method("POST"))
        .and(path_regex(r"^/v1beta/models/[^/]+:streamGenerateContent$"))
        .and(query_param("alt", "sse"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(body),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, GeminiClientConfig::default());
    let chunks: Vec<String> = client
        .generate_response_stream("Slogan please", RequestOptions::default())
        .await
        .unwrap()
        .map(|chunk| chunk.unwrap())
        .collect()
        .await;

    assert_eq!(chunks, vec!["Lemon ".to_string(), "fizz".to_string()]);
}

#[tokio::test]
async fn test_service_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend unavailable"))
        .mount(&server)
        .await;

    let client = client_for(&server, GeminiClientConfig::default());
    let err = client
        .generate_response("Hello", RequestOptions::default())
        .await
        .unwrap_err();

    match err {
        Error::AiProvider(message) => assert!(message.contains("500")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_missing_credential_is_config_error() {
    let err = config::resolve_api_key_with(None, |_| None).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_config_defaults_without_environment() {
    let config = Config::from_lookup(|_| None);
    assert_eq!(config.google_api_key, None);
    assert_eq!(config.gemini_model, config::DEFAULT_MODEL);
    assert_eq!(config.video_path, std::path::PathBuf::from(config::DEFAULT_VIDEO_PATH));
}

#[test]
fn test_cli_requires_problem_flag() {
    assert!(Args::try_parse_from(["ia-m-uv"]).is_err());

    let args = Args::try_parse_from(["ia-m-uv", "--problema", "How many apples fit in a box?"])
        .unwrap();
    assert_eq!(args.problem, "How many apples fit in a box?");
}

struct Frames(Vec<usize>);

impl FrameSource for Frames {
    type Frame = usize;

    fn read_frame(&mut self) -> Result<Option<usize>> {
        Ok(if self.0.is_empty() {
            None
        } else {
            Some(self.0.remove(0))
        })
    }
}

struct Boxes;

impl PersonDetector<usize> for Boxes {
    fn detect(&mut self, frame: &usize) -> Result<FrameDetections> {
        Ok(FrameDetections {
            boxes: vec![BoundingBox::new(0, 0, 64, 128); *frame],
            weights: vec![0.5; *frame],
        })
    }
}

struct Headless;

impl FrameSink<usize> for Headless {
    fn present(&mut self, _frame: &mut usize, _detections: &FrameDetections) -> Result<Flow> {
        Ok(Flow::Continue)
    }
}

#[test]
fn test_people_total_is_sum_over_frames() {
    let counts = vec![1, 3, 0, 2, 2];
    let expected: u64 = counts.iter().map(|&c| c as u64).sum();

    let summary = people::run(&mut Frames(counts), &mut Boxes, &mut Headless).unwrap();

    assert_eq!(summary.frames, 5);
    assert_eq!(summary.total_detections, expected);
    assert!(!summary.stopped_by_user);
}
