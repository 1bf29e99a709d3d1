//! Onboarding write-path orchestration.
//!
//! The coordinator owns the read-modify-write pipeline for every onboarding
//! operation:
//!
//! ```text
//! Command
//!   ↓
//! 1. Load the owner's profile from the store
//!   ↓
//! 2. Handle command (pure decision logic, produces events)
//!   ↓
//! 3. Apply events to the in-memory aggregate
//!   ↓
//! 4. Persist (create / compare-and-set update / atomic document append)
//!   ↓
//! 5. Emit notification intents (best-effort, never rolls back step 4)
//! ```
//!
//! On a compare-and-set conflict the coordinator reloads and re-decides, so
//! concurrent writers to the same profile (e.g. a verify racing a link) both
//! land without losing a flag. Store failures other than conflicts are
//! surfaced unchanged; there is no implicit retry for them.
//!
//! The coordinator never computes a score. Scoring is a read-path concern;
//! see [`crate::queries`].

use chrono::Utc;

use raisepath_core::{Aggregate, AggregateRoot, CompanyId, DocumentId, DomainError, ExpectedVersion, OwnerId};
use raisepath_events::{Event, NotificationSink};
use raisepath_onboarding::{
    CompanyProfile, CreateOrUpdateProfile, Document, DocumentMeta, LinkFinancials, ProfileCommand,
    ProfileEvent, ProfilePatch, RecordDocument, VerifyIdentity,
};

use crate::store::{ProfileStore, StoreError};

/// How many times a write is retried after a compare-and-set conflict before
/// giving up.
const WRITE_ATTEMPTS: usize = 5;

#[derive(Debug)]
pub enum CoordinatorError {
    /// Malformed input (deterministic, reported before any state change).
    Validation(String),
    /// A domain invariant was violated (e.g. owner mismatch).
    InvariantViolation(String),
    /// The operation targets a non-existent profile or notification.
    NotFound,
    /// Repeated compare-and-set conflicts; the caller may retry.
    Conflict(String),
    /// The persistence collaborator failed; surfaced unchanged.
    Store(StoreError),
}

impl From<DomainError> for CoordinatorError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => CoordinatorError::Validation(msg),
            DomainError::InvariantViolation(msg) => CoordinatorError::InvariantViolation(msg),
            DomainError::InvalidId(msg) => CoordinatorError::Validation(msg),
            DomainError::NotFound => CoordinatorError::NotFound,
            DomainError::Conflict(msg) => CoordinatorError::Conflict(msg),
        }
    }
}

impl From<StoreError> for CoordinatorError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => CoordinatorError::NotFound,
            other => CoordinatorError::Store(other),
        }
    }
}

/// Onboarding write-path coordinator.
///
/// Generic over the profile store and the notification sink so tests can use
/// the in-memory implementations and deployments can swap in real backends.
#[derive(Debug)]
pub struct OnboardingCoordinator<S, N> {
    store: S,
    sink: N,
}

impl<S, N> OnboardingCoordinator<S, N> {
    pub fn new(store: S, sink: N) -> Self {
        Self { store, sink }
    }

    pub fn into_parts(self) -> (S, N) {
        (self.store, self.sink)
    }
}

impl<S, N> OnboardingCoordinator<S, N>
where
    S: ProfileStore,
    N: NotificationSink,
{
    /// Create the owner's profile, or partially update it if it exists.
    ///
    /// Emits `profile_created` exactly once per owner: if two creators race,
    /// the loser's retry lands on the update path.
    pub fn create_or_update_profile(
        &self,
        owner: &OwnerId,
        patch: ProfilePatch,
    ) -> Result<CompanyProfile, CoordinatorError> {
        let command = ProfileCommand::CreateOrUpdateProfile(CreateOrUpdateProfile {
            owner: owner.clone(),
            company_id: CompanyId::new(),
            patch,
            occurred_at: Utc::now(),
        });
        self.execute(owner, command)
    }

    /// Mark the owner's profile KYC-verified.
    ///
    /// Idempotent: verifying an already-verified profile changes nothing and
    /// raises no duplicate notification.
    pub fn verify_identity(&self, owner: &OwnerId) -> Result<CompanyProfile, CoordinatorError> {
        let command = ProfileCommand::VerifyIdentity(VerifyIdentity {
            owner: owner.clone(),
            occurred_at: Utc::now(),
        });
        self.execute(owner, command)
    }

    /// Mark the owner's profile as having linked financial data.
    ///
    /// The token is opaque here; only its presence is validated.
    pub fn link_financials(
        &self,
        owner: &OwnerId,
        token: &str,
    ) -> Result<CompanyProfile, CoordinatorError> {
        let command = ProfileCommand::LinkFinancials(LinkFinancials {
            owner: owner.clone(),
            token: token.to_string(),
            occurred_at: Utc::now(),
        });
        self.execute(owner, command)
    }

    /// Record a document against the owner's profile.
    ///
    /// The document gets a server-assigned id and timestamp. Returns the
    /// recorded document.
    pub fn record_document(
        &self,
        owner: &OwnerId,
        meta: DocumentMeta,
    ) -> Result<Document, CoordinatorError> {
        let document_id = DocumentId::new();
        let command = ProfileCommand::RecordDocument(RecordDocument {
            owner: owner.clone(),
            document_id,
            meta,
            occurred_at: Utc::now(),
        });
        let profile = self.execute(owner, command)?;

        profile
            .documents()
            .iter()
            .find(|d| d.id == document_id)
            .cloned()
            .ok_or_else(|| {
                CoordinatorError::Store(StoreError::Backend(
                    "recorded document missing from stored profile".to_string(),
                ))
            })
    }

    /// Run one command through load → decide → apply → persist → notify.
    fn execute(
        &self,
        owner: &OwnerId,
        command: ProfileCommand,
    ) -> Result<CompanyProfile, CoordinatorError> {
        for _ in 0..WRITE_ATTEMPTS {
            // 1) Load (or start from an empty aggregate for first creation).
            let loaded = self.store.find_by_owner(owner)?;
            let mut profile = match loaded {
                Some(p) => p,
                None => CompanyProfile::empty(CompanyId::new()),
            };
            let expected = ExpectedVersion::Exact(profile.version());

            // 2) Decide (pure; no mutation).
            let events = profile.handle(&command)?;
            if events.is_empty() {
                // Accepted no-op (e.g. re-verifying an already-verified profile).
                return Ok(profile);
            }

            // 3) Evolve the in-memory aggregate.
            for event in &events {
                profile.apply(event);
            }

            // 4) Persist. Each event kind maps to the store operation that
            // keeps the write atomic for it.
            let persisted = match &events[0] {
                ProfileEvent::ProfileCreated(_) => self.store.create(profile.clone()),
                ProfileEvent::DocumentAdded(e) => {
                    self.store.append_document(owner, e.document.clone())
                }
                _ => self.store.update(owner, profile.clone(), expected),
            };

            match persisted {
                Ok(()) => {
                    // 5) Notify, best-effort.
                    self.notify(owner, &events);

                    // Return a fresh snapshot: concurrent writers may have
                    // landed between our append and this read.
                    return self
                        .store
                        .find_by_owner(owner)?
                        .ok_or(CoordinatorError::NotFound);
                }
                // Stale read (or lost a create race): reload and re-decide.
                Err(StoreError::Concurrency(reason)) => {
                    tracing::debug!(owner = %owner, %reason, "write conflict, retrying");
                    continue;
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(CoordinatorError::Conflict(format!(
            "gave up after {WRITE_ATTEMPTS} write conflicts for owner {owner}"
        )))
    }

    /// Hand notification intents to the sink. Failures are logged and
    /// swallowed: a delivered domain transition never turns into an error
    /// because a notification could not be raised.
    fn notify(&self, owner: &OwnerId, events: &[ProfileEvent]) {
        for event in events {
            tracing::debug!(owner = %owner, event = event.event_type(), "domain event");
            let Some((kind, message)) = event.notification_intent() else {
                continue;
            };
            if let Err(e) = self.sink.emit(owner, kind, &message) {
                tracing::warn!(owner = %owner, kind = kind.as_str(), error = ?e, "notification emit failed");
            }
        }
    }
}
