//! Read-path queries over the profile store.
//!
//! The write path ([`crate::coordinator`]) never computes a score; callers
//! that want one go through here. Every query reads a consistent snapshot
//! and derives from it, so a score always reflects one observed state.

use raisepath_core::OwnerId;
use raisepath_onboarding::{CompanyProfile, Document};
use raisepath_scoring::{compute_score, ScoreView};

use crate::store::{ProfileStore, StoreError};

/// The owner's profile, if one has been created.
pub fn profile_for_owner<S: ProfileStore>(
    store: &S,
    owner: &OwnerId,
) -> Result<Option<CompanyProfile>, StoreError> {
    store.find_by_owner(owner)
}

/// Documents recorded against the owner's profile, in upload order.
///
/// Errors with [`StoreError::NotFound`] when no profile exists.
pub fn documents_for_owner<S: ProfileStore>(
    store: &S,
    owner: &OwnerId,
) -> Result<Vec<Document>, StoreError> {
    store.list_documents(owner)
}

/// Investability score for the owner's current profile state.
///
/// Pure derivation over one snapshot; nothing is persisted.
pub fn score_for_owner<S: ProfileStore>(
    store: &S,
    owner: &OwnerId,
) -> Result<ScoreView, StoreError> {
    let profile = store.find_by_owner(owner)?.ok_or(StoreError::NotFound)?;
    Ok(compute_score(&profile))
}
