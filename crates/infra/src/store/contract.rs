use std::sync::Arc;

use thiserror::Error;

use raisepath_core::{ExpectedVersion, OwnerId};
use raisepath_onboarding::{CompanyProfile, Document};

/// Persistence failure surfaced unchanged to the caller.
///
/// The coordinator performs no implicit retry on `Backend` failures; retries,
/// if any, belong to the store implementation itself. `Concurrency` is the
/// one exception: the coordinator reloads and re-decides on it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Compare-and-set failed: the stored profile moved under the writer.
    #[error("concurrency conflict: {0}")]
    Concurrency(String),

    /// No profile exists for the targeted owner.
    #[error("profile not found")]
    NotFound,

    /// The storage backend failed (IO, poisoned lock, connection loss, ...).
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Persistence collaborator for company profiles, keyed by owner identity.
///
/// Exactly one profile per owner: `create` for a taken owner fails with
/// `Concurrency` so racing creators fall back to the update path.
///
/// Write operations must be atomic per profile. `update` is a compare-and-set
/// on the aggregate version; `append_document` is an atomic append (never a
/// read-count-then-write), so concurrent uploads are all counted.
pub trait ProfileStore: Send + Sync {
    fn find_by_owner(&self, owner: &OwnerId) -> Result<Option<CompanyProfile>, StoreError>;

    /// Persist a freshly created profile. Fails with `Concurrency` if a
    /// profile already exists for the owner.
    fn create(&self, profile: CompanyProfile) -> Result<(), StoreError>;

    /// Replace the stored profile if its version matches `expected`.
    fn update(
        &self,
        owner: &OwnerId,
        profile: CompanyProfile,
        expected: ExpectedVersion,
    ) -> Result<(), StoreError>;

    /// Atomically append a document to the owner's profile.
    fn append_document(&self, owner: &OwnerId, document: Document) -> Result<(), StoreError>;

    /// Documents for the owner's profile, in creation order.
    fn list_documents(&self, owner: &OwnerId) -> Result<Vec<Document>, StoreError>;
}

impl<S> ProfileStore for Arc<S>
where
    S: ProfileStore + ?Sized,
{
    fn find_by_owner(&self, owner: &OwnerId) -> Result<Option<CompanyProfile>, StoreError> {
        (**self).find_by_owner(owner)
    }

    fn create(&self, profile: CompanyProfile) -> Result<(), StoreError> {
        (**self).create(profile)
    }

    fn update(
        &self,
        owner: &OwnerId,
        profile: CompanyProfile,
        expected: ExpectedVersion,
    ) -> Result<(), StoreError> {
        (**self).update(owner, profile, expected)
    }

    fn append_document(&self, owner: &OwnerId, document: Document) -> Result<(), StoreError> {
        (**self).append_document(owner, document)
    }

    fn list_documents(&self, owner: &OwnerId) -> Result<Vec<Document>, StoreError> {
        (**self).list_documents(owner)
    }
}
