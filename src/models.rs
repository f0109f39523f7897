//! Account records and the summaries returned to clients.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewAdmin {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
}

/// Contributor account. `password_hash` is absent for accounts that only
/// sign in through the identity provider.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Developer {
    pub id: Uuid,
    pub github_id: String,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewDeveloper {
    pub github_id: String,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSummary {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

impl From<&Admin> for AdminSummary {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            email: admin.email.clone(),
            name: admin.name.clone(),
        }
    }
}

/// The `user` object returned by contributor signup.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorUser {
    pub id: Uuid,
    pub github_id: String,
    pub username: String,
    pub email: Option<String>,
}

impl From<&Developer> for ContributorUser {
    fn from(dev: &Developer) -> Self {
        Self {
            id: dev.id,
            github_id: dev.github_id.clone(),
            username: dev.username.clone(),
            email: dev.email.clone(),
        }
    }
}

/// Row of the admin contributor listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorSummary {
    pub id: Uuid,
    pub github_id: String,
    pub username: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Developer> for ContributorSummary {
    fn from(dev: &Developer) -> Self {
        Self {
            id: dev.id,
            github_id: dev.github_id.clone(),
            username: dev.username.clone(),
            email: dev.email.clone(),
            created_at: dev.created_at,
        }
    }
}
