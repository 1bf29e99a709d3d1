//! Infrastructure layer: collaborator contracts and the coordinator pipeline.
//!
//! The domain crates stay pure; this crate owns the read-modify-write
//! orchestration against a [`store::ProfileStore`] and the best-effort
//! hand-off of notification intents.

pub mod coordinator;
pub mod notifications;
pub mod queries;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use coordinator::{CoordinatorError, OnboardingCoordinator};
pub use notifications::{InMemoryNotificationStore, NotificationStore};
pub use store::{InMemoryProfileStore, ProfileStore, StoreError};
