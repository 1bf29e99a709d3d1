use std::collections::HashMap;
use std::sync::RwLock;

use raisepath_core::{Aggregate, AggregateRoot, ExpectedVersion, OwnerId};
use raisepath_onboarding::{CompanyProfile, Document, DocumentAdded, ProfileEvent};

use super::contract::{ProfileStore, StoreError};

/// In-memory profile store keyed by owner.
///
/// Intended for tests/dev. All writes take the map's write lock, so each
/// operation is atomic per profile. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<OwnerId, CompanyProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn find_by_owner(&self, owner: &OwnerId) -> Result<Option<CompanyProfile>, StoreError> {
        let map = self
            .profiles
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(map.get(owner).cloned())
    }

    fn create(&self, profile: CompanyProfile) -> Result<(), StoreError> {
        let owner = profile
            .owner()
            .cloned()
            .ok_or_else(|| StoreError::Backend("profile has no owner".to_string()))?;

        let mut map = self
            .profiles
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        if map.contains_key(&owner) {
            return Err(StoreError::Concurrency(format!(
                "a profile already exists for owner {owner}"
            )));
        }

        map.insert(owner, profile);
        Ok(())
    }

    fn update(
        &self,
        owner: &OwnerId,
        profile: CompanyProfile,
        expected: ExpectedVersion,
    ) -> Result<(), StoreError> {
        let mut map = self
            .profiles
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        let current = map.get(owner).ok_or(StoreError::NotFound)?;
        let stored_version = current.version();
        // The expected version is the version the writer loaded, i.e. the
        // profile's version before its new events were applied.
        if !expected.matches(stored_version) {
            return Err(StoreError::Concurrency(format!(
                "expected {expected:?}, found {stored_version}"
            )));
        }

        map.insert(owner.clone(), profile);
        Ok(())
    }

    fn append_document(&self, owner: &OwnerId, document: Document) -> Result<(), StoreError> {
        let mut map = self
            .profiles
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        let profile = map.get_mut(owner).ok_or(StoreError::NotFound)?;

        // Evolve the stored aggregate through its own event so the version
        // counter stays coherent with writer-side applies.
        let occurred_at = document.created_at;
        let event = ProfileEvent::DocumentAdded(DocumentAdded {
            company_id: profile.id_typed(),
            owner: owner.clone(),
            document,
            occurred_at,
        });
        profile.apply(&event);
        Ok(())
    }

    fn list_documents(&self, owner: &OwnerId) -> Result<Vec<Document>, StoreError> {
        let map = self
            .profiles
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        let profile = map.get(owner).ok_or(StoreError::NotFound)?;
        Ok(profile.documents().to_vec())
    }
}
