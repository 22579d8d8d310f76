// src/models/company.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "subscription_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
    PastDue,
    Canceled,
    Pending,
}

// ---
// Company (o tenant)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    #[schema(example = "Construtora Horizonte")]
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[schema(example = "starter")]
    pub subscription_plan_id: String,
    pub subscription_status: SubscriptionStatus,
    pub expire_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn plan_expired(&self, now: DateTime<Utc>) -> bool {
        self.expire_date.is_some_and(|expires| expires < now)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyPayload {
    #[validate(length(min = 2, message = "Company name must have at least 2 characters."))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid e-mail address."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub subscription_plan_id: Option<String>,
    pub expire_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn company(expire_date: Option<DateTime<Utc>>) -> Company {
        let now = Utc::now();
        Company {
            id: Uuid::new_v4(),
            name: "Horizonte".into(),
            email: "contato@horizonte.com".into(),
            phone: None,
            address: None,
            subscription_plan_id: "starter".into(),
            subscription_status: SubscriptionStatus::Active,
            expire_date,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn plan_without_expiry_never_expires() {
        assert!(!company(None).plan_expired(Utc::now()));
    }

    #[test]
    fn plan_expires_after_its_date() {
        let now = Utc::now();
        assert!(company(Some(now - Duration::days(1))).plan_expired(now));
        assert!(!company(Some(now + Duration::days(1))).plan_expired(now));
    }
}
