//! Onboarding domain module (company profiles, verification steps, documents).
//!
//! This crate contains the business rules for onboarding a company —
//! profile creation, identity verification, financial-account linking and
//! document collection — implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod document;
pub mod profile;

pub use document::{Document, DocumentMeta, MediaType};
pub use profile::{
    CompanyProfile, CreateOrUpdateProfile, DocumentAdded, FinancialsLinked, KycVerified,
    LinkFinancials, ProfileCommand, ProfileCreated, ProfileEvent, ProfilePatch, ProfileUpdated,
    RecordDocument, VerifyIdentity,
};
