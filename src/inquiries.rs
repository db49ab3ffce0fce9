// src/inquiries.rs
//
// Contact-us and newsletter form submissions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::PgPool;
use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: Option<String>,
    pub email: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionSubmission {
    pub name: Option<String>,
    pub email: String,
    pub referral: Option<String>,
}

#[async_trait]
pub trait InquiryStore: Send + Sync {
    async fn submit_contact(&self, submission: &ContactSubmission) -> Result<Uuid, StoreError>;

    async fn submit_subscription(
        &self,
        submission: &SubscriptionSubmission,
    ) -> Result<Uuid, StoreError>;
}

#[derive(Clone)]
pub struct PgInquiryStore {
    pool: PgPool,
}

impl PgInquiryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InquiryStore for PgInquiryStore {
    async fn submit_contact(&self, submission: &ContactSubmission) -> Result<Uuid, StoreError> {
        const INSERT_SQL: &str = "
            INSERT INTO inquiries (id, name, email, message, created_at)
            VALUES ($1, $2, $3, $4, $5)
        ";
        let id = Uuid::new_v4();
        let now: DateTime<Utc> = Utc::now();
        let conn = self.pool.get().await?;
        conn.execute(
            INSERT_SQL,
            &[
                &id,
                &submission.name,
                &submission.email,
                &submission.message,
                &now,
            ],
        )
        .await?;
        info!("Stored inquiry {}", id);
        Ok(id)
    }

    async fn submit_subscription(
        &self,
        submission: &SubscriptionSubmission,
    ) -> Result<Uuid, StoreError> {
        const INSERT_SQL: &str = "
            INSERT INTO subscribers (id, name, email, referral, created_at)
            VALUES ($1, $2, $3, $4, $5)
        ";
        let id = Uuid::new_v4();
        let now: DateTime<Utc> = Utc::now();
        let conn = self.pool.get().await?;
        conn.execute(
            INSERT_SQL,
            &[
                &id,
                &submission.name,
                &submission.email,
                &submission.referral,
                &now,
            ],
        )
        .await?;
        info!("Stored subscription {}", id);
        Ok(id)
    }
}
