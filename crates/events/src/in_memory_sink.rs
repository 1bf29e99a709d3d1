//! In-memory notification sink for tests/dev.

use std::convert::Infallible;
use std::sync::Mutex;

use raisepath_core::OwnerId;

use crate::notification::NotificationKind;
use crate::sink::NotificationSink;

/// What an [`InMemorySink`] remembers about one `emit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedNotification {
    pub owner: OwnerId,
    pub kind: NotificationKind,
    pub message: String,
}

/// Sink that records every emission in order.
///
/// - No IO / no async
/// - Never fails
#[derive(Debug, Default)]
pub struct InMemorySink {
    recorded: Mutex<Vec<RecordedNotification>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All emissions so far, in emission order.
    pub fn emitted(&self) -> Vec<RecordedNotification> {
        self.recorded.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Emissions of a given kind, in emission order.
    pub fn emitted_of_kind(&self, kind: NotificationKind) -> Vec<RecordedNotification> {
        self.emitted().into_iter().filter(|r| r.kind == kind).collect()
    }
}

impl NotificationSink for InMemorySink {
    type Error = Infallible;

    fn emit(&self, owner: &OwnerId, kind: NotificationKind, message: &str) -> Result<(), Self::Error> {
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.push(RecordedNotification {
                owner: owner.clone(),
                kind,
                message: message.to_string(),
            });
        }
        Ok(())
    }
}
