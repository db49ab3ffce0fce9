// tests/api.rs

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

use pairent_lib::api::{create_api_routes, AppState};
use pairent_lib::error::StoreError;
use pairent_lib::geo::Coordinate;
use pairent_lib::index::{GeoIndex, InMemoryGeoIndex};
use pairent_lib::inquiries::{ContactSubmission, InquiryStore, SubscriptionSubmission};
use pairent_lib::models::ProfileId;
use pairent_lib::notifications::{LogPushSender, MessageNotifier};
use pairent_lib::profiles::{InMemoryProfileStore, Profile, ProfileStore};
use pairent_lib::proximity::SearchConfig;
use pairent_lib::TopPicksService;

#[derive(Default)]
struct RecordingInquiries {
    contacts: Mutex<Vec<ContactSubmission>>,
    subscriptions: Mutex<Vec<SubscriptionSubmission>>,
}

#[async_trait]
impl InquiryStore for RecordingInquiries {
    async fn submit_contact(&self, submission: &ContactSubmission) -> Result<Uuid, StoreError> {
        self.contacts.lock().unwrap().push(submission.clone());
        Ok(Uuid::new_v4())
    }

    async fn submit_subscription(
        &self,
        submission: &SubscriptionSubmission,
    ) -> Result<Uuid, StoreError> {
        self.subscriptions.lock().unwrap().push(submission.clone());
        Ok(Uuid::new_v4())
    }
}

struct Harness {
    app: Router,
    profiles: Arc<InMemoryProfileStore>,
    inquiries: Arc<RecordingInquiries>,
}

fn harness() -> Harness {
    let mut profiles = Vec::new();
    let mut docs = Vec::new();
    for (id, lat) in [("ana", 52.5200), ("ben", 52.5205), ("cy", 52.5300)] {
        let doc = InMemoryGeoIndex::document_at(id, Coordinate::new(lat, 13.4050).unwrap()).unwrap();
        let mut profile = Profile::new(id);
        profile.location = Some(doc.location.clone());
        profile.fcm_tokens = vec![format!("{}-phone", id)];
        profiles.push(profile);
        docs.push(doc);
    }
    profiles.push(Profile::new("hermit"));

    let profiles = Arc::new(InMemoryProfileStore::from_profiles(profiles));
    let index: Arc<dyn GeoIndex> = Arc::new(InMemoryGeoIndex::from_documents(docs));
    let inquiries = Arc::new(RecordingInquiries::default());
    let state = Arc::new(AppState {
        top_picks: Arc::new(TopPicksService::new(
            profiles.clone(),
            index,
            SearchConfig::default().with_deadline(None),
        )),
        inquiries: inquiries.clone(),
        messages: Arc::new(MessageNotifier::new(profiles.clone(), Arc::new(LogPushSender))),
    });
    Harness {
        app: create_api_routes(state),
        profiles,
        inquiries,
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn nearby_users_returns_ranked_ids() {
    let h = harness();

    let (status, body) = send(h.app, get("/nearby-users/ana")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user_id"], "ana");
    assert_eq!(body["data"]["top_picks"], json!(["ben", "cy"]));
}

#[tokio::test]
async fn nearby_users_for_unknown_profile_is_not_found() {
    let h = harness();

    let (status, body) = send(h.app, get("/nearby-users/nobody")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("nobody"));
}

#[tokio::test]
async fn nearby_users_without_location_is_empty() {
    let h = harness();

    let (status, body) = send(h.app, get("/nearby-users/hermit")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["top_picks"], json!([]));
}

#[tokio::test]
async fn top_picks_refresh_persists() {
    let h = harness();

    let (status, body) = send(h.app, post_json("/profiles/cy/top-picks", json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["top_picks"], json!(["ben", "ana"]));
    let stored = h
        .profiles
        .get_profile(&ProfileId::new("cy"))
        .await
        .unwrap()
        .unwrap();
    assert!(stored.top_picks_loaded);
    assert_eq!(stored.top_picks, vec![ProfileId::new("ben"), ProfileId::new("ana")]);
}

#[tokio::test]
async fn chat_message_notifies_recipients() {
    let h = harness();
    let payload = json!({
        "recipient_ids": ["ben", "ghost"],
        "sender_name": "Ana",
        "content": "Coffee later?"
    });

    let (status, body) = send(h.app, post_json("/chats/c1/thread/m1", payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["recipients"], 2);
    assert_eq!(body["data"]["missing_recipients"], 1);
    assert_eq!(body["data"]["delivered"], 1);
}

#[tokio::test]
async fn contact_form_is_stored() {
    let h = harness();
    let payload = json!({"name": "Lee", "email": "lee@example.com", "message": "Hello"});

    let (status, body) = send(h.app, post_json("/contact", payload)).await;

    assert_eq!(status, StatusCode::OK);
    let result = body["data"]["result"].as_str().unwrap();
    assert!(result.starts_with("inquiry with ID: "));
    assert!(result.ends_with(" added"));
    let contacts = h.inquiries.contacts.lock().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].email, "lee@example.com");
}

#[tokio::test]
async fn subscription_requires_email() {
    let h = harness();

    let (status, body) = send(
        h.app,
        post_json("/subscribe", json!({"name": "Lee", "email": "  "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "email is required");
    assert!(h.inquiries.subscriptions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn subscription_is_stored() {
    let h = harness();
    let payload = json!({"email": "kim@example.com", "referral": "friend"});

    let (status, body) = send(h.app, post_json("/subscribe", payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["result"]
        .as_str()
        .unwrap()
        .starts_with("subscription with ID: "));
    let subs = h.inquiries.subscriptions.lock().unwrap();
    assert_eq!(subs[0].referral.as_deref(), Some("friend"));
    assert_eq!(subs[0].name, None);
}
