//! Domain events and the notification-intent contract.
//!
//! Coordinator operations describe what happened through typed events; the
//! subset worth telling a user about becomes a [`Notification`] delivered
//! through a fire-and-forget [`NotificationSink`].

pub mod event;
pub mod in_memory_sink;
pub mod notification;
pub mod sink;

pub use event::Event;
pub use in_memory_sink::{InMemorySink, RecordedNotification};
pub use notification::{Notification, NotificationKind};
pub use sink::NotificationSink;
