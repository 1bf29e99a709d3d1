//! Notification emission abstraction (mechanics only).
//!
//! A [`NotificationSink`] is where the coordinator hands off notification
//! intents. The contract is deliberately minimal:
//!
//! - **Fire-and-forget**: emission failures must never roll back the domain
//!   transition that triggered them. Callers log and move on.
//! - **Transport-agnostic**: an implementation may write to an in-memory
//!   store, a database table, a message queue, etc.
//! - **Best-effort**: no delivery or ordering guarantees.

use std::sync::Arc;

use raisepath_core::OwnerId;

use crate::notification::NotificationKind;

/// Destination for notification intents raised by domain transitions.
pub trait NotificationSink: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn emit(&self, owner: &OwnerId, kind: NotificationKind, message: &str) -> Result<(), Self::Error>;
}

impl<S> NotificationSink for Arc<S>
where
    S: NotificationSink + ?Sized,
{
    type Error = S::Error;

    fn emit(&self, owner: &OwnerId, kind: NotificationKind, message: &str) -> Result<(), Self::Error> {
        (**self).emit(owner, kind, message)
    }
}
