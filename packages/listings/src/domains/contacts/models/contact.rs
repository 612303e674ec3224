use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ContactId, UserId};

/// Contact channel enum
///
/// Parsing is total: unrecognized types are kept as `Other` and get the same
/// treatment as email, minus the link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactType {
    Whatsapp,
    Call,
    Email,
    Instagram,
    Other(String),
}

impl ContactType {
    pub fn parse(s: &str) -> Self {
        match s {
            "whatsapp" => ContactType::Whatsapp,
            "call" => ContactType::Call,
            "email" => ContactType::Email,
            "instagram" => ContactType::Instagram,
            other => ContactType::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContactType::Whatsapp => "Chat on WhatsApp",
            ContactType::Call => "Make a call",
            ContactType::Email | ContactType::Other(_) => "Send an email",
            ContactType::Instagram => "Visit Instagram profile",
        }
    }

    /// Link that opens the channel, `None` for unrecognized types
    pub fn link(&self, value: &str) -> Option<String> {
        match self {
            ContactType::Whatsapp => Some(format!("https://wa.me/{}", value)),
            ContactType::Call => Some(format!("tel:{}", value)),
            ContactType::Email => Some(format!("mailto:{}", value)),
            ContactType::Instagram => Some(format!("https://instagram.com/{}", value)),
            ContactType::Other(_) => None,
        }
    }
}

impl std::fmt::Display for ContactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactType::Whatsapp => write!(f, "whatsapp"),
            ContactType::Call => write!(f, "call"),
            ContactType::Email => write!(f, "email"),
            ContactType::Instagram => write!(f, "instagram"),
            ContactType::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// A way to reach a user. Read-only here; contacts are managed elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    pub id: ContactId,
    pub owner_id: UserId,
    pub contact_type: String, // 'whatsapp', 'call', 'email', 'instagram'
    pub value: String,        // number, address or handle, not validated
    pub created_at: DateTime<Utc>,
}

/// A contact ready to be shown in the contact options dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactOption {
    pub id: ContactId,
    pub contact_type: String,
    pub label: &'static str,
    pub value: String,
    pub link: Option<String>,
}

impl Contact {
    pub fn kind(&self) -> ContactType {
        ContactType::parse(&self.contact_type)
    }

    pub fn option(&self) -> ContactOption {
        let kind = self.kind();
        ContactOption {
            id: self.id,
            contact_type: kind.to_string(),
            label: kind.label(),
            value: self.value.clone(),
            link: kind.link(&self.value),
        }
    }

    /// Find all contacts registered by a user
    pub async fn find_by_owner(owner_id: UserId, pool: &PgPool) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM contacts WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }
}
