// src/api/handlers.rs

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use log::{error, info};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::response::{api_success, ApiError, ApiResult};
use crate::inquiries::{ContactSubmission, InquiryStore, SubscriptionSubmission};
use crate::models::{ChatMessage, MessageRef, ProfileId};
use crate::notifications::{MessageNotifier, MessageNotifyStats};
use crate::top_picks::TopPicksService;

// Application state
pub struct AppState {
    pub top_picks: Arc<TopPicksService>,
    pub inquiries: Arc<dyn InquiryStore>,
    pub messages: Arc<MessageNotifier>,
}

#[derive(Debug, Serialize)]
pub struct NearbyUsersResponse {
    pub user_id: ProfileId,
    pub top_picks: Vec<ProfileId>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionReceipt {
    pub id: Uuid,
    pub result: String,
}

#[derive(Debug, Serialize)]
pub struct MessageNotifyResponse {
    pub recipients: usize,
    pub missing_recipients: usize,
    pub delivered: usize,
    pub failed: usize,
}

impl From<MessageNotifyStats> for MessageNotifyResponse {
    fn from(stats: MessageNotifyStats) -> Self {
        Self {
            recipients: stats.recipients,
            missing_recipients: stats.missing_recipients,
            delivered: stats.delivered,
            failed: stats.failed,
        }
    }
}

pub fn create_api_routes(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/nearby-users/:user_id", get(get_nearby_users))
        .route("/profiles/:user_id/top-picks", post(refresh_top_picks))
        .route(
            "/chats/:conversation_id/thread/:message_id",
            post(notify_message),
        )
        .route("/contact", post(contact_us))
        .route("/subscribe", post(subscribe))
        .with_state(app_state)
}

// Ranked nearby profiles, computed on demand and not persisted
async fn get_nearby_users(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<NearbyUsersResponse> {
    let user_id = ProfileId(user_id);
    let top_picks = state
        .top_picks
        .nearby_for_profile(&user_id)
        .await
        .inspect_err(|e| error!("Nearby users lookup failed for {}: {:?}", user_id, e))?;
    api_success(NearbyUsersResponse { user_id, top_picks })
}

// Recompute and store the profile's top picks
async fn refresh_top_picks(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<NearbyUsersResponse> {
    let user_id = ProfileId(user_id);
    let top_picks = state
        .top_picks
        .refresh_for_profile(&user_id)
        .await
        .inspect_err(|e| error!("Top picks refresh failed for {}: {:?}", user_id, e))?;
    api_success(NearbyUsersResponse { user_id, top_picks })
}

async fn notify_message(
    State(state): State<Arc<AppState>>,
    Path((conversation_id, message_id)): Path<(String, String)>,
    Json(message): Json<ChatMessage>,
) -> ApiResult<MessageNotifyResponse> {
    let message_ref = MessageRef {
        conversation_id,
        message_id,
    };
    let stats = state
        .messages
        .notify(&message_ref, &message)
        .await
        .inspect_err(|e| error!("Message notification failed: {:?}", e))?;
    api_success(stats.into())
}

fn require_email(email: &str) -> Result<(), ApiError> {
    if email.trim().is_empty() {
        return Err(ApiError::BadRequest("email is required".into()));
    }
    Ok(())
}

async fn contact_us(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<ContactSubmission>,
) -> ApiResult<SubmissionReceipt> {
    require_email(&submission.email)?;
    let id = state.inquiries.submit_contact(&submission).await?;
    info!("Contact inquiry {} received", id);
    api_success(SubmissionReceipt {
        id,
        result: format!("inquiry with ID: {} added", id),
    })
}

async fn subscribe(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<SubscriptionSubmission>,
) -> ApiResult<SubmissionReceipt> {
    require_email(&submission.email)?;
    let id = state.inquiries.submit_subscription(&submission).await?;
    info!("Subscription {} received", id);
    api_success(SubmissionReceipt {
        id,
        result: format!("subscription with ID: {} added", id),
    })
}
