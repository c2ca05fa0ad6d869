//! # Webhook Tests
//!
//! The axum router end to end, with fake upstream clients and a recording
//! messenger in place of the LINE reply API.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use common::{article, dispatcher, FakeNews, FakeStory, RecordingMessenger};
use storyline::dialogue::InMemoryConversationStore;
use storyline::line::signature::sign;
use storyline::line::WebhookParser;
use storyline::server::{router, AppState};

const SECRET: &str = "channel-secret";

fn app(messenger: Arc<RecordingMessenger>, story: Arc<FakeStory>) -> Router {
    let bot = dispatcher(
        FakeNews::ok(vec![article("A", "B", "C")]),
        story,
        Arc::new(InMemoryConversationStore::new()),
    );
    router(AppState {
        parser: WebhookParser::new(SECRET),
        dispatcher: Arc::new(bot),
        messenger,
    })
}

fn text_event(reply_token: &str, user_id: &str, text: &str) -> serde_json::Value {
    json!({
        "type": "message",
        "replyToken": reply_token,
        "source": {"type": "user", "userId": user_id},
        "timestamp": 1700000000000i64,
        "message": {"type": "text", "id": "m", "text": text}
    })
}

fn signed_request(body: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhooks/line")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("x-line-signature", signature);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = app(
        Arc::new(RecordingMessenger::default()),
        FakeStory::new(Ok(String::new())),
    );
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_invalid_signature_rejected() {
    let messenger = Arc::new(RecordingMessenger::default());
    let app = app(messenger.clone(), FakeStory::new(Ok(String::new())));
    let body = json!({"events": [text_event("r1", "U1", "哈囉")]}).to_string();

    let response = app
        .oneshot(signed_request(&body, Some(&sign("wrong-secret", body.as_bytes()))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid signature");
    assert!(messenger.replies().is_empty());
}

#[tokio::test]
async fn test_missing_signature_rejected() {
    let messenger = Arc::new(RecordingMessenger::default());
    let app = app(messenger.clone(), FakeStory::new(Ok(String::new())));

    let response = app
        .oneshot(signed_request(r#"{"events":[]}"#, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(messenger.replies().is_empty());
}

#[tokio::test]
async fn test_undecodable_body_acknowledged() {
    let messenger = Arc::new(RecordingMessenger::default());
    let app = app(messenger.clone(), FakeStory::new(Ok(String::new())));
    let body = "{not json";

    let response = app
        .oneshot(signed_request(body, Some(&sign(SECRET, body.as_bytes()))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(messenger.replies().is_empty());
}

#[tokio::test]
async fn test_malformed_event_does_not_block_valid_ones() {
    let messenger = Arc::new(RecordingMessenger::default());
    let app = app(messenger.clone(), FakeStory::new(Ok(String::new())));
    let body = json!({
        "events": [
            text_event("r1", "U1", "哈囉"),
            {"type": "message", "replyToken": "r2", "source": {"userId": "U2"}},
            text_event("r3", "U3", "新聞 台積電")
        ]
    })
    .to_string();

    let response = app
        .oneshot(signed_request(&body, Some(&sign(SECRET, body.as_bytes()))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let tokens: Vec<String> = messenger.replies().into_iter().map(|(token, _)| token).collect();
    assert_eq!(tokens, vec!["r1", "r3"]);
}

#[tokio::test]
async fn test_group_message_without_user_is_answered() {
    let messenger = Arc::new(RecordingMessenger::default());
    let app = app(messenger.clone(), FakeStory::new(Ok(String::new())));
    let body = json!({
        "events": [{
            "type": "message",
            "replyToken": "rg",
            "source": {"type": "group", "groupId": "G1"},
            "message": {"type": "text", "id": "m", "text": "新聞 台積電"}
        }]
    })
    .to_string();

    let response = app
        .oneshot(signed_request(&body, Some(&sign(SECRET, body.as_bytes()))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let replies = messenger.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].0, "rg");
    assert!(replies[0].1.contains("標題: A"));
}

#[tokio::test]
async fn test_delivery_replies_in_order_and_skips_other_events() {
    let messenger = Arc::new(RecordingMessenger::default());
    let story = FakeStory::new(Ok("從前從前".to_string()));
    let app = app(messenger.clone(), story.clone());
    let body = json!({
        "destination": "Ubot",
        "events": [
            text_event("r1", "U1", "故事"),
            {"type": "follow", "replyToken": "rf", "source": {"type": "user", "userId": "U9"}},
            {
                "type": "message",
                "replyToken": "rs",
                "source": {"type": "user", "userId": "U1"},
                "message": {"type": "sticker", "id": "s", "packageId": "1", "stickerId": "1"}
            },
            text_event("r2", "U1", "友情"),
            text_event("r3", "U2", "新聞 台積電"),
            text_event("r4", "U3", "哈囉")
        ]
    })
    .to_string();

    let response = app
        .oneshot(signed_request(&body, Some(&sign(SECRET, body.as_bytes()))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");

    let replies = messenger.replies();
    let tokens: Vec<&str> = replies.iter().map(|(token, _)| token.as_str()).collect();
    assert_eq!(tokens, vec!["r1", "r2", "r3", "r4"]);
    assert_eq!(replies[0].1, "請告訴我你想要的故事主題，例如「友情」或「冒險」。");
    assert_eq!(replies[1].1, "從前從前");
    assert!(replies[2].1.contains("標題: A"));
    assert_eq!(replies[3].1, "請問你想了解什麼？可以說「新聞」或「故事」。");
    assert_eq!(story.calls(), vec![("友情".to_string(), "U1".to_string())]);
}

#[tokio::test]
async fn test_reply_failure_still_acknowledged() {
    let messenger = Arc::new(RecordingMessenger {
        fail: true,
        ..Default::default()
    });
    let app = app(messenger.clone(), FakeStory::new(Ok(String::new())));
    let body = json!({
        "events": [text_event("r1", "U1", "哈囉"), text_event("r2", "U2", "哈囉")]
    })
    .to_string();

    let response = app
        .oneshot(signed_request(&body, Some(&sign(SECRET, body.as_bytes()))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(messenger.replies().len(), 2);
}
