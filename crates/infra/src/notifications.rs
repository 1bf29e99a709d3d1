//! Notification store collaborator (contract + in-memory implementation).
//!
//! The store keeps notification records and owns the acknowledgment
//! contract. It also implements [`NotificationSink`], so the coordinator can
//! hand intents straight to it.

use std::sync::{Arc, RwLock};

use chrono::Utc;

use raisepath_core::{NotificationId, OwnerId};
use raisepath_events::{Notification, NotificationKind, NotificationSink};

use crate::store::StoreError;

/// How many notifications a listing returns at most (most recent first).
const LIST_LIMIT: usize = 50;

/// Notification persistence collaborator.
pub trait NotificationStore: Send + Sync {
    fn append(&self, notification: Notification) -> Result<(), StoreError>;

    /// The owner's notifications, most recent first, capped at 50.
    fn list(&self, owner: &OwnerId) -> Result<Vec<Notification>, StoreError>;

    /// Acknowledge one notification. `NotFound` if the id does not belong to
    /// the owner.
    fn mark_read(&self, owner: &OwnerId, id: NotificationId) -> Result<(), StoreError>;

    /// Acknowledge every unread notification for the owner.
    fn mark_all_read(&self, owner: &OwnerId) -> Result<(), StoreError>;
}

impl<S> NotificationStore for Arc<S>
where
    S: NotificationStore + ?Sized,
{
    fn append(&self, notification: Notification) -> Result<(), StoreError> {
        (**self).append(notification)
    }

    fn list(&self, owner: &OwnerId) -> Result<Vec<Notification>, StoreError> {
        (**self).list(owner)
    }

    fn mark_read(&self, owner: &OwnerId, id: NotificationId) -> Result<(), StoreError> {
        (**self).mark_read(owner, id)
    }

    fn mark_all_read(&self, owner: &OwnerId) -> Result<(), StoreError> {
        (**self).mark_all_read(owner)
    }
}

/// In-memory notification store for tests/dev.
///
/// Records are kept in append order; listing walks backwards so creation
/// order doubles as recency order.
#[derive(Debug, Default)]
pub struct InMemoryNotificationStore {
    records: RwLock<Vec<Notification>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotificationStore for InMemoryNotificationStore {
    fn append(&self, notification: Notification) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        records.push(notification);
        Ok(())
    }

    fn list(&self, owner: &OwnerId) -> Result<Vec<Notification>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        Ok(records
            .iter()
            .rev()
            .filter(|n| &n.owner == owner)
            .take(LIST_LIMIT)
            .cloned()
            .collect())
    }

    fn mark_read(&self, owner: &OwnerId, id: NotificationId) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        let record = records
            .iter_mut()
            .find(|n| n.id == id && &n.owner == owner)
            .ok_or(StoreError::NotFound)?;
        record.read_at = Some(Utc::now());
        Ok(())
    }

    fn mark_all_read(&self, owner: &OwnerId) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        let now = Utc::now();
        for record in records.iter_mut() {
            if &record.owner == owner && record.read_at.is_none() {
                record.read_at = Some(now);
            }
        }
        Ok(())
    }
}

impl NotificationSink for InMemoryNotificationStore {
    type Error = StoreError;

    fn emit(&self, owner: &OwnerId, kind: NotificationKind, message: &str) -> Result<(), Self::Error> {
        self.append(Notification::new(owner.clone(), kind, message, Utc::now()))
    }
}
