use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use raisepath_core::{NotificationId, OwnerId};

/// Closed set of notification kinds raised by onboarding transitions.
///
/// New kinds are a schema change; nothing else in the system may invent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ProfileCreated,
    KycVerified,
    FinancialsLinked,
    DocumentAdded,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::ProfileCreated => "profile_created",
            NotificationKind::KycVerified => "kyc_verified",
            NotificationKind::FinancialsLinked => "financials_linked",
            NotificationKind::DocumentAdded => "document_added",
        }
    }
}

impl core::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification record (intent to tell a user something happened).
///
/// Created unread; `read_at` is set only through explicit acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub owner: OwnerId,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn new(
        owner: OwnerId,
        kind: NotificationKind,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            owner,
            kind,
            message: message.into(),
            created_at,
            read_at: None,
        }
    }

    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}
